//! Dispatcher configuration.
//!
//! Library defaults with runtime environment overrides, same shape as the
//! other config types in the workspace: `from_env()` for the process
//! dispatcher, `new()` for tests and embedders that want full control.
//!
//! # Example
//!
//! ```rust,ignore
//! use scall_dispatch::DispatchConfig;
//!
//! let config = DispatchConfig::from_env()
//!     .preload(["open", "close"])
//!     .restart_eintr(false);
//! ```

use scall_core::{env_get_bool, env_get_list};

pub mod defaults {
    /// Restart opted-in operations on EINTR.
    pub const RESTART_EINTR: bool = true;
    /// Bad `SCALL_PRELOAD` names are logged and skipped.
    pub const STRICT_PRELOAD: bool = false;
}

/// Environment variable names.
pub mod vars {
    pub const PRELOAD: &str = "SCALL_PRELOAD";
    pub const RESTART_EINTR: &str = "SCALL_RESTART_EINTR";
    pub const STRICT_PRELOAD: &str = "SCALL_STRICT_PRELOAD";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Identifiers resolved when the process dispatcher is built.
    pub preload: Vec<String>,
    /// Global switch for restart-on-EINTR.
    pub restart_eintr: bool,
    /// Treat a bad preload name as fatal.
    pub strict_preload: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl DispatchConfig {
    /// Library defaults with environment overrides.
    ///
    /// Environment variables (all optional):
    /// - `SCALL_PRELOAD` - Comma or whitespace separated identifiers
    /// - `SCALL_RESTART_EINTR` - Restart opted-in operations on EINTR (0/1)
    /// - `SCALL_STRICT_PRELOAD` - Fail on a bad preload name (0/1)
    pub fn from_env() -> Self {
        Self {
            preload: env_get_list(vars::PRELOAD),
            restart_eintr: env_get_bool(vars::RESTART_EINTR, defaults::RESTART_EINTR),
            strict_preload: env_get_bool(vars::STRICT_PRELOAD, defaults::STRICT_PRELOAD),
        }
    }

    /// Library defaults, no environment.
    pub fn new() -> Self {
        Self {
            preload: Vec::new(),
            restart_eintr: defaults::RESTART_EINTR,
            strict_preload: defaults::STRICT_PRELOAD,
        }
    }

    // Builder methods

    pub fn preload<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preload = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn restart_eintr(mut self, enable: bool) -> Self {
        self.restart_eintr = enable;
        self
    }

    pub fn strict_preload(mut self, enable: bool) -> Self {
        self.strict_preload = enable;
        self
    }
}
