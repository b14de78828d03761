use anyhow::{Context, Result};
use arboard::Clipboard;

/// Puts `text` on the system clipboard
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = Clipboard::new().context("Clipboard is not available")?;
    clipboard
        .set_text(text.to_string())
        .context("Failed to write to the clipboard")?;
    Ok(())
}
