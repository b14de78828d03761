//! CLI Module for codevault
//! Lets users manage their snippet collection straight from the shell
//! without opening the terminal browser.

pub mod commands;

use crate::config::Config;
use crate::models::{FileStore, SnippetStore};
use anyhow::{Context, Result, anyhow, bail};
use colored::{ColoredString, Colorize};

/// Left gutter printed before every line of output
pub(crate) fn bar() -> ColoredString {
    "┃".bright_magenta()
}

/// Optional snippet fields given as `--flag value` pairs
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SnippetFlags {
    pub title: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub category: Option<String>,
    pub tags: Option<String>,
    /// Path to read the code from, `-` for stdin
    pub code_file: Option<String>,
}

impl SnippetFlags {
    pub fn parse(args: &[String]) -> Result<Self> {
        let mut flags = SnippetFlags::default();
        let mut iter = args.iter();

        while let Some(flag) = iter.next() {
            let slot = match flag.as_str() {
                "--title" | "-t" => &mut flags.title,
                "--description" | "-d" => &mut flags.description,
                "--language" | "-l" => &mut flags.language,
                "--category" | "-c" => &mut flags.category,
                "--tags" => &mut flags.tags,
                "--code-file" | "-f" => &mut flags.code_file,
                other => bail!("Unknown option: {}", other),
            };
            let value = iter
                .next()
                .with_context(|| format!("Missing value for {}", flag))?;
            *slot = Some(value.clone());
        }

        Ok(flags)
    }
}

/// Opens the configured on-disk store
pub fn open_store(config: &Config) -> Result<SnippetStore<FileStore>> {
    let backend = FileStore::new(&config.data_dir).with_context(|| {
        format!(
            "Failed to open data directory {}",
            config.data_dir.display()
        )
    })?;
    Ok(SnippetStore::new(backend, config.store_key.clone()))
}

/// Executes CLI commands based on the provided arguments
pub fn execute_cli(args: &[String], config: &Config) -> Result<()> {
    if args.is_empty() || matches!(args[0].as_str(), "help" | "--help" | "-h") {
        print_help();
        return Ok(());
    }

    let store = open_store(config)?;

    match args[0].as_str() {
        "list" | "ls" => {
            commands::list_snippets(&store, args.get(1).map(String::as_str))?;
        }
        "categories" | "cats" => {
            commands::list_categories(&store)?;
        }
        "show" | "view" | "cat" => {
            let Some(needle) = args.get(1) else {
                return Err(usage_error(
                    "Missing snippet title or ID",
                    "codevault show <TITLE_OR_ID>",
                ));
            };
            commands::show_snippet(&store, needle)?;
        }
        "search" | "find" => {
            let Some(query) = args.get(1) else {
                return Err(usage_error(
                    "Missing search query",
                    "codevault search <QUERY> [--category C]",
                ));
            };
            let category = match args.get(2).map(String::as_str) {
                Some("--category" | "-c") => args.get(3).map(String::as_str),
                Some(other) => bail!("Unknown option: {}", other),
                None => None,
            };
            commands::search_snippets(&store, query, category)?;
        }
        "add" | "new" => {
            let flags = SnippetFlags::parse(&args[1..])?;
            commands::add_snippet(&store, flags)?;
        }
        "edit" => {
            let Some(needle) = args.get(1) else {
                return Err(usage_error("Missing snippet ID", "codevault edit <ID> [OPTIONS]"));
            };
            let flags = SnippetFlags::parse(&args[2..])?;
            commands::edit_snippet(&store, needle, flags)?;
        }
        "delete" | "rm" => {
            let Some(needle) = args.get(1) else {
                return Err(usage_error("Missing snippet ID", "codevault delete <ID>"));
            };
            commands::delete_snippet(&store, needle)?;
        }
        "export" => {
            let dir = args
                .get(1)
                .map(std::path::PathBuf::from)
                .unwrap_or_else(|| config.export_dir.clone());
            commands::export_snippets(&store, &dir)?;
        }
        "import" => {
            let Some(path) = args.get(1) else {
                return Err(usage_error("Missing file to import", "codevault import <FILE>"));
            };
            commands::import_snippets(&store, std::path::Path::new(path))?;
        }
        other => {
            print_help();
            bail!("Unknown command: {}", other);
        }
    }

    Ok(())
}

fn usage_error(error: &str, usage: &str) -> anyhow::Error {
    anyhow!("{}. Usage: {}", error, usage)
}

/// Prints a failure in the same style as regular output
pub fn print_error(error: &anyhow::Error) {
    eprintln!("{}  {} {}", bar(), "Error:".bright_red().bold(), error);
    for cause in error.chain().skip(1) {
        eprintln!("{}    {}", bar(), cause.to_string().bright_black());
    }
}

/// Prints the help message with available commands
fn print_help() {
    let commands = [
        ("list, ls [CATEGORY]", "List snippets, optionally in one category"),
        ("categories", "List categories with snippet counts"),
        ("show, view <TITLE|ID>", "Display a snippet (partial title works)"),
        ("search, find <QUERY>", "Search titles, descriptions, code and tags"),
        ("add [OPTIONS]", "Add a snippet; code from --code-file or stdin"),
        ("edit <ID> [OPTIONS]", "Change fields of an existing snippet"),
        ("delete, rm <ID>", "Delete a snippet"),
        ("export [DIR]", "Write codevault-backup-<date>.json"),
        ("import <FILE>", "Merge snippets from a backup file"),
        ("help", "Display this help message"),
    ];
    let options = [
        ("-t, --title <TEXT>", "Snippet title"),
        ("-d, --description <TEXT>", "Free-text description"),
        ("-l, --language <LANG>", "Language used for highlighting"),
        ("-c, --category <NAME>", "Category used for filtering"),
        ("--tags <a,b,c>", "Comma-separated tags"),
        ("-f, --code-file <PATH|->", "Read code from a file or stdin"),
    ];

    println!("{}  {}", bar(), "CODEVAULT - SNIPPET MANAGER".bold());
    println!("{}  {}", bar(), "USAGE:".bright_yellow());
    println!("{}  codevault [COMMAND] [ARGS]", bar());
    println!("{}  {}", bar(), "COMMANDS:".bright_yellow());
    for (name, about) in commands {
        println!("{}  {:<27} {}", bar(), name.bright_white(), about);
    }
    println!("{}  {}", bar(), "OPTIONS:".bright_yellow());
    for (name, about) in options {
        println!("{}  {:<27} {}", bar(), name.bright_white(), about);
    }

    println!("{}  {}", bar(), "TIP:".bright_green());
    println!(
        "{}  Run with no arguments to open the interactive browser",
        bar()
    );
}
