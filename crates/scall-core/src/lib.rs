//! # scall-core
//!
//! Core types and traits for the scall registry: every exposed OS primitive
//! is an [`Operation`] performing exactly one system call, and every
//! invocation goes through one policy function, [`policy::invoke`], which
//! turns the raw errno into either a tolerated [`Outcome`] or a structured
//! [`Error`].
//!
//! This crate contains no syscall bodies and no registry. The default
//! catalog lives in `scall-module`; the lazy-loading registry lives in
//! `scall-dispatch`.
//!
//! ## Modules
//!
//! - `args` - Call arguments (`Arg`, `ArgKind`, `CallArgs`)
//! - `value` - Success values (`Value`, `FileStat`)
//! - `outcome` - `Outcome` / `Tolerated` for tolerant variants
//! - `codes` - Well-known errno constants and numeric error ids
//! - `errno` - Scoped access to the process errno slot
//! - `error` - Failure Record and the error taxonomy
//! - `operation` - The `Operation` contract
//! - `policy` - Signature check, interrupt restart, errno classification
//! - `loader` - Identifier validation, `UnitName`, `UnitLoader`
//! - `kprint` - Leveled stderr logging macros
//! - `env` - Environment variable configuration helpers

pub mod args;
pub mod value;
pub mod outcome;
pub mod codes;
pub mod errno;
pub mod error;
pub mod operation;
pub mod policy;
pub mod loader;
pub mod kprint;
pub mod env;

// Re-exports for convenience
pub use args::{Arg, ArgKind, CallArgs};
pub use value::{FileStat, Value};
pub use outcome::{Outcome, Tolerated};
pub use codes::Errno;
pub use errno::ErrnoScope;
pub use error::{
    Error, ErrorClass, Failure, FailureFactory, LoadError, RecordFactory, ResolveError,
    UsageError,
};
pub use operation::{Operation, Signature};
pub use policy::{invoke, Policy};
pub use loader::{is_valid_identifier, UnitLoader, UnitName};
pub use env::{env_get, env_get_bool, env_get_list, env_get_opt, env_is_set};

/// Result of a dispatched call.
pub type CallResult = Result<Outcome<Value>, Error>;
