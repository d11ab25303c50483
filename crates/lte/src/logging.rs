//! Logger setup. The terminal belongs to the editor, so log output only
//! ever goes to a file.

use anyhow::{Context, Result};
use env_logger::{Builder, Target};
use log::LevelFilter;
use std::{env, fs::File, io, path::PathBuf};

pub const LOG_FILE_VAR: &str = "LTE_LOG_FILE";

/// Initializes `env_logger` from `RUST_LOG` and `LTE_LOG_FILE`.
pub fn init() -> Result<()> {
    let log_file = match env::var_os(LOG_FILE_VAR) {
        Some(path) => {
            let path = PathBuf::from(path);
            let file = File::create(&path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            Some(file)
        }
        None => None,
    };

    let mut builder = Builder::from_default_env();
    configure(&mut builder, log_file, env::var_os("RUST_LOG").is_some());
    builder.init();
    Ok(())
}

/// Points `builder` at `log_file`. Without a file, output is discarded
/// whatever `RUST_LOG` says.
pub fn configure(builder: &mut Builder, log_file: Option<File>, rust_log_set: bool) {
    match log_file {
        Some(file) => {
            builder.target(Target::Pipe(Box::new(file)));
            if !rust_log_set {
                builder.filter_level(LevelFilter::Info);
                builder.filter_module("lte", LevelFilter::Debug);
                builder.filter_module("lte_core", LevelFilter::Debug);
            }
        }
        None => {
            builder.target(Target::Pipe(Box::new(io::sink())));
            builder.filter_level(LevelFilter::Off);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_log_file_silences_rust_log() {
        let mut builder = Builder::new();
        builder.parse_filters("debug");
        configure(&mut builder, None, true);
        assert_eq!(builder.build().filter(), LevelFilter::Off);
    }

    #[test]
    fn test_log_file_defaults_to_debug_for_lte() {
        let file = tempfile::tempfile().unwrap();
        let mut builder = Builder::new();
        configure(&mut builder, Some(file), false);
        assert_eq!(builder.build().filter(), LevelFilter::Debug);
    }

    #[test]
    fn test_log_file_respects_rust_log() {
        let file = tempfile::tempfile().unwrap();
        let mut builder = Builder::new();
        builder.parse_filters("warn");
        configure(&mut builder, Some(file), true);
        assert_eq!(builder.build().filter(), LevelFilter::Warn);
    }
}
