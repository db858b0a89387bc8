//! Leveled stderr logging for scall.
//!
//! One line per record, written under the stderr lock so concurrent
//! dispatchers never interleave partial lines.
//!
//! # Environment Variables
//!
//! - `SCALL_LOG_LEVEL=<level>` - off, error, warn, info, debug, trace (or 0-5). Default: warn.
//! - `SCALL_FLUSH_EPRINT=1` - Flush stderr after each record.
//!
//! # Usage
//!
//! ```ignore
//! use scall_core::{kdebug, kwarn};
//!
//! kdebug!("loading {} from {}", name, unit);
//! kwarn!("preload: skipping {:?}: {}", name, err);
//! ```

use std::io::Write;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Once;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl LogLevel {
    pub fn from_u8(v: u8) -> Self {
        match v {
            0 => LogLevel::Off,
            1 => LogLevel::Error,
            2 => LogLevel::Warn,
            3 => LogLevel::Info,
            4 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            LogLevel::Off => "",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, ()> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "0" => Ok(LogLevel::Off),
            "error" | "1" => Ok(LogLevel::Error),
            "warn" | "2" => Ok(LogLevel::Warn),
            "info" | "3" => Ok(LogLevel::Info),
            "debug" | "4" => Ok(LogLevel::Debug),
            "trace" | "5" => Ok(LogLevel::Trace),
            _ => Err(()),
        }
    }
}

static LOG_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Warn as u8);
static FLUSH: AtomicBool = AtomicBool::new(false);
static INIT: Once = Once::new();

/// Read `SCALL_LOG_LEVEL` / `SCALL_FLUSH_EPRINT`. Runs once; later calls
/// are no-ops. Called lazily by the first record.
pub fn init() {
    INIT.call_once(|| {
        if let Some(level) = crate::env::env_get_opt::<LogLevel>("SCALL_LOG_LEVEL") {
            LOG_LEVEL.store(level as u8, Ordering::Relaxed);
        }
        FLUSH.store(crate::env::env_get_bool("SCALL_FLUSH_EPRINT", false), Ordering::Relaxed);
    });
}

#[inline]
pub fn log_level() -> LogLevel {
    init();
    LogLevel::from_u8(LOG_LEVEL.load(Ordering::Relaxed))
}

/// Override the level (after env initialization).
pub fn set_log_level(level: LogLevel) {
    init();
    LOG_LEVEL.store(level as u8, Ordering::Relaxed);
}

#[inline]
pub fn level_enabled(level: LogLevel) -> bool {
    level != LogLevel::Off && level <= log_level()
}

#[doc(hidden)]
pub fn _klog_impl(level: LogLevel, args: std::fmt::Arguments<'_>) {
    if !level_enabled(level) {
        return;
    }
    // Callers may log between a failing syscall and reading errno.
    let _scope = crate::errno::ErrnoScope::enter();
    let stderr = std::io::stderr();
    let mut handle = stderr.lock();
    let _ = writeln!(handle, "scall [{}] {}", level.tag(), args);
    if FLUSH.load(Ordering::Relaxed) {
        let _ = handle.flush();
    }
}

#[macro_export]
macro_rules! kerror {
    ($($arg:tt)*) => {{
        $crate::kprint::_klog_impl($crate::kprint::LogLevel::Error, format_args!($($arg)*));
    }};
}

#[macro_export]
macro_rules! kwarn {
    ($($arg:tt)*) => {{
        $crate::kprint::_klog_impl($crate::kprint::LogLevel::Warn, format_args!($($arg)*));
    }};
}

#[macro_export]
macro_rules! kinfo {
    ($($arg:tt)*) => {{
        $crate::kprint::_klog_impl($crate::kprint::LogLevel::Info, format_args!($($arg)*));
    }};
}

#[macro_export]
macro_rules! kdebug {
    ($($arg:tt)*) => {{
        $crate::kprint::_klog_impl($crate::kprint::LogLevel::Debug, format_args!($($arg)*));
    }};
}

#[macro_export]
macro_rules! ktrace {
    ($($arg:tt)*) => {{
        $crate::kprint::_klog_impl($crate::kprint::LogLevel::Trace, format_args!($($arg)*));
    }};
}
