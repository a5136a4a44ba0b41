use std::fs::OpenOptions;
use std::path::Path;

use env_logger::{Builder, Env, Target};

/// Logs to stderr. Filter defaults to `info`, `RUST_LOG` overrides.
pub fn init_stderr() {
    let _ = Builder::from_env(Env::default().default_filter_or("info")).try_init();
}

/// Logs to a file instead of the terminal; used while the TUI owns the screen.
/// Falls back to stderr if the file cannot be opened.
pub fn init_file(path: &Path) {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => {
            let _ = Builder::from_env(Env::default().default_filter_or("info"))
                .target(Target::Pipe(Box::new(file)))
                .try_init();
        }
        Err(_) => init_stderr(),
    }
}
