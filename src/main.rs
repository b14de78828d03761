//! codevault - Code Snippet Vault
//!
//! With arguments, runs a single CLI command. Without arguments, opens
//! the interactive terminal browser.

use codevault::app::App;
use codevault::{Config, cli, handlers};
use color_eyre::{Report, Result};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
    crossterm::{
        event::{self, Event},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
};
use std::io;
use std::time::Duration;

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Config::load().map_err(to_report)?;
    let args: Vec<String> = std::env::args().skip(1).collect();

    if !args.is_empty() {
        if let Err(e) = cli::execute_cli(&args, &config) {
            cli::print_error(&e);
            std::process::exit(1);
        }
        return Ok(());
    }

    let store = cli::open_store(&config).map_err(to_report)?;
    let mut app = App::new(store, config.export_dir.clone());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = run(&mut terminal, &mut app);

    // Restore the terminal even when the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Keeps the full anyhow context chain in the eyre report
fn to_report(error: anyhow::Error) -> Report {
    Report::msg(format!("{:#}", error))
}

fn run<B, S>(terminal: &mut Terminal<B>, app: &mut App<S>) -> Result<()>
where
    B: Backend,
    S: codevault::models::KeyValueStore,
{
    loop {
        terminal.draw(|frame| app.render(frame))?;

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if handlers::keys::handle_key_events(key, app) {
                    return Ok(());
                }
            }
        }
    }
}
