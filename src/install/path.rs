//! Process PATH wiring for the installed binary

use std::path::Path;

use tracing::{debug, warn};

/// Prepends `dir` to the process PATH and, on a GitHub Actions runner,
/// appends it to the `$GITHUB_PATH` file so later workflow steps see it.
pub fn add_path(dir: &Path) {
    let dir_str = dir.display().to_string();

    let path = std::env::var("PATH").unwrap_or_default();
    let separator = if cfg!(windows) { ';' } else { ':' };
    // Single-threaded at this point; no other thread reads the environment.
    unsafe {
        std::env::set_var("PATH", format!("{dir_str}{separator}{path}"));
    }
    debug!("prepended {dir_str} to PATH");

    if let Ok(github_path) = std::env::var("GITHUB_PATH") {
        if let Err(e) = append_line(Path::new(&github_path), &dir_str) {
            warn!("failed to write {github_path}: {e}");
        }
    }
}

fn append_line(file: &Path, line: &str) -> std::io::Result<()> {
    use std::io::Write;

    let mut f = std::fs::OpenOptions::new().append(true).open(file)?;
    writeln!(f, "{line}")
}
