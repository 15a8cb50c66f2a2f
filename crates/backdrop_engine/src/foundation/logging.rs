//! Logging utilities

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system
///
/// Honours `RUST_LOG`; falls back to `default_level` when it is unset.
/// Returns `false` when a logger was already installed, in which case the
/// existing one is kept.
pub fn init(default_level: &str) -> bool {
    match env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).try_init() {
        Ok(()) => true,
        Err(e) => {
            log::debug!("Logger already installed, keeping it: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_keeps_existing_logger() {
        init("warn");
        assert!(!init("debug"));
    }
}
