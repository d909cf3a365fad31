//! Logger setup for hosts embedding the bank.

use env_logger::Env;

/// Install env_logger with `default_filter` unless `RUST_LOG` is set.
/// Returns false when a logger was already installed, which is harmless.
pub fn init(default_filter: &str) -> bool {
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_init_is_harmless() {
        init("debug");
        assert!(!init("info"));
        log::info!("logger installed");
    }
}
