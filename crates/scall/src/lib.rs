//! # scall - error-checked system calls by name
//!
//! Every operation performs exactly one system call. Failures come back as
//! a structured [`Failure`] (operation, errno, arguments) instead of a bare
//! return code, and tolerant variants such as `rmdir_if_exists` report the
//! absorbed errno through [`Outcome::Tolerated`] rather than pretending to
//! succeed.
//!
//! ## Quick Start
//!
//! ```ignore
//! use scall::{call, CallArgs, Outcome};
//!
//! let out = call("mkdir_if_missing", CallArgs::new().path("/tmp/spool").int(0o755))?;
//! match out {
//!     Outcome::Done(_) => println!("created"),
//!     Outcome::Tolerated(t) => println!("already there ({})", t.errno()),
//! }
//!
//! // Anything not tolerated is an error carrying the full call.
//! if let Err(e) = call("rmdir", CallArgs::new().path("/tmp/spool")) {
//!     eprintln!("{}", e);
//! }
//! ```
//!
//! ## Process dispatcher
//!
//! [`call`] and [`preload`] go through one process-wide [`Dispatcher`]
//! built on first use from [`DispatchConfig::from_env`]:
//!
//! - `SCALL_PRELOAD` - identifiers resolved when the dispatcher is built
//! - `SCALL_STRICT_PRELOAD` - panic on a bad preload name instead of skipping it
//! - `SCALL_RESTART_EINTR` - restart opted-in operations on EINTR (default on)
//! - `SCALL_LOG_LEVEL` - off, error, warn, info, debug, trace (default warn)
//!
//! Embedders that want their own loader or failure factory build a
//! [`Dispatcher`] directly.

use std::sync::{Arc, OnceLock};

// Re-export core types
pub use scall_core::{
    codes, is_valid_identifier, Arg, ArgKind, CallArgs, CallResult, Errno, Error, ErrorClass,
    Failure, FailureFactory, FileStat, LoadError, Operation, Outcome, RecordFactory,
    ResolveError, Signature, Tolerated, UnitLoader, UnitName, UsageError, Value,
};

// Re-export kprint macros and controls
pub use scall_core::{kdebug, kerror, kinfo, ktrace, kwarn};
pub use scall_core::kprint::{init as init_logging, set_log_level, LogLevel};

// Re-export env utilities
pub use scall_core::{env_get, env_get_bool, env_get_list, env_get_opt, env_is_set};

pub use scall_dispatch::{DispatchConfig, Dispatcher, OpStats};
pub use scall_module::{CatalogLoader, SysOp};

static DISPATCHER: OnceLock<Dispatcher> = OnceLock::new();

/// The process-wide dispatcher over the built-in catalog.
///
/// Built on first access; `SCALL_PRELOAD` is applied before it is returned.
///
/// # Panics
///
/// With `SCALL_STRICT_PRELOAD` set, panics if a preload name does not
/// resolve.
pub fn dispatcher() -> &'static Dispatcher {
    DISPATCHER.get_or_init(|| {
        let config = DispatchConfig::from_env();
        let d = Dispatcher::new(Arc::new(CatalogLoader::new())).with_config(config);
        let names = d.config().preload.clone();
        let strict = d.config().strict_preload;
        apply_preload(&d, &names, strict);
        d
    })
}

/// Resolve `name` on the process dispatcher and invoke it.
#[inline]
pub fn call(name: &str, args: CallArgs) -> CallResult {
    dispatcher().call(name, args)
}

/// Resolve identifiers ahead of use on the process dispatcher.
pub fn preload<S: AsRef<str>>(names: &[S]) -> Result<(), Error> {
    dispatcher().preload(names)
}

/// Counters for a resolved identifier on the process dispatcher.
pub fn stats(name: &str) -> Option<OpStats> {
    dispatcher().stats(name)
}

/// Configured preload: each name on its own, so one bad name does not stop
/// the rest unless `strict`. Returns how many resolved.
fn apply_preload(d: &Dispatcher, names: &[String], strict: bool) -> usize {
    let mut loaded = 0;
    for name in names {
        match d.preload(&[name]) {
            Ok(()) => loaded += 1,
            Err(e) if strict => panic!("SCALL_PRELOAD: {}", e),
            Err(e) => kwarn!("SCALL_PRELOAD: skipping {:?}: {}", name, e),
        }
    }
    if !names.is_empty() {
        kinfo!("preloaded {}/{} operations", loaded, names.len());
    }
    loaded
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn scratch_path(tag: &str) -> PathBuf {
        static SEQ: AtomicUsize = AtomicUsize::new(0);
        let n = SEQ.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!("scall-facade-{}-{}-{}", std::process::id(), n, tag))
    }

    #[test]
    fn process_dispatcher_is_shared() {
        assert!(std::ptr::eq(dispatcher(), dispatcher()));
    }

    #[test]
    fn call_through_facade() {
        let dir = scratch_path("mk");
        let args = CallArgs::new().path(&dir).int(0o755);

        let created = call("mkdir_if_missing", args.clone()).expect("created");
        assert!(created.is_done());
        let existed = call("mkdir_if_missing", args).expect("existed");
        assert_eq!(existed.tolerated_errno(), Some(codes::EEXIST));

        let gone = call("rmdir_if_exists", CallArgs::new().path(&dir)).expect("removed");
        assert!(gone.is_done());
        assert!(dispatcher().is_resolved("rmdir_if_exists"));
        assert!(stats("mkdir_if_missing").map_or(false, |s| s.tolerated >= 1));
    }

    #[test]
    fn facade_errors_keep_class() {
        let err = call("no_such_op", CallArgs::new()).unwrap_err();
        assert_eq!(err.class(), ErrorClass::Resolve);

        let err = call("close", CallArgs::new().fd(-1)).unwrap_err();
        assert_eq!(err.class(), ErrorClass::Os);
        let io_err: std::io::Error = err.into();
        assert_eq!(io_err.raw_os_error(), Some(libc::EBADF));
    }

    #[test]
    fn facade_preload() {
        preload(&["lstat", "chmod"]).expect("preload");
        assert!(dispatcher().is_resolved("lstat"));
        assert!(dispatcher().is_resolved("chmod"));
    }

    #[test]
    fn lenient_preload_skips_bad_names() {
        let d = Dispatcher::new(Arc::new(CatalogLoader::new()));
        let names: Vec<String> = ["open", "Bad-Name", "frobnicate", "close"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(apply_preload(&d, &names, false), 2);
        assert_eq!(d.resolved(), vec!["close", "open"]);
    }

    #[test]
    #[should_panic(expected = "SCALL_PRELOAD")]
    fn strict_preload_panics_on_bad_name() {
        let d = Dispatcher::new(Arc::new(CatalogLoader::new()));
        apply_preload(&d, &["frobnicate".to_string()], true);
    }
}
