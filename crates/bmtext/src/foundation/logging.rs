//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system
pub fn init() {
    env_logger::init();
}

/// Initialize the logging system with a default filter level
///
/// `RUST_LOG` still takes precedence when it is set, so a configured level
/// only decides what is shown when the environment says nothing.
pub fn init_with_level(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    // A host may already have installed a logger; keep theirs.
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("Logger already initialized, keeping existing logger");
    }
}
