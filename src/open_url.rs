use anyhow::{Context, Result};
use std::process::Command;
use tracing::warn;

/// Open a story link, preferring the configured command over the system default.
pub fn open_url(url: &str, open_command: Option<&str>) -> Result<()> {
    if let Some(cmd) = open_command {
        Command::new(cmd)
            .arg(url)
            .spawn()
            .with_context(|| format!("failed to run {cmd}"))?;
        return Ok(());
    }
    if let Err(e) = open::that(url) {
        warn!(url, error = %e, "system opener failed, trying firefox");
        let _ = Command::new("firefox").arg(url).spawn();
    }
    Ok(())
}
