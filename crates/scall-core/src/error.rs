//! Error taxonomy.
//!
//! Three disjoint classes reach the caller:
//!
//! | Class     | Type                     | Meaning                                  |
//! |-----------|--------------------------|------------------------------------------|
//! | `Os`      | [`Failure`]              | The syscall failed with a non-tolerated errno |
//! | `Resolve` | [`ResolveError`]         | The identifier cannot be loaded (developer error) |
//! | `Usage`   | [`UsageError`]           | Arguments do not match the operation's signature |
//!
//! Tolerated errnos are not errors at all; see [`crate::Outcome`].
//! Match on [`Error::class`], never on message text.

use std::fmt;
use std::io;

use nix::errno::Errno;

use crate::args::{ArgKind, CallArgs};
use crate::codes;

// ── Failure Record ────────────────────────────────────────────────

/// Structured description of one failed syscall.
///
/// Built at the instant of failure and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    op: &'static str,
    errno: Errno,
    args: CallArgs,
}

impl Failure {
    pub fn new(op: &'static str, errno: Errno, args: CallArgs) -> Self {
        Self { op, errno, args }
    }

    /// Identifier of the operation that failed.
    pub fn op(&self) -> &'static str {
        self.op
    }

    pub fn errno(&self) -> Errno {
        self.errno
    }

    /// Raw OS error code.
    pub fn raw_os_error(&self) -> i32 {
        self.errno as i32
    }

    /// The arguments the failing call was made with.
    pub fn args(&self) -> &CallArgs {
        &self.args
    }

    /// Numeric id (`2000 + errno`) for log correlation.
    pub fn code(&self) -> u64 {
        codes::errno_id(self.errno)
    }

    /// `io::Error` that keeps this record as its inner error. The kind
    /// follows the errno; `raw_os_error()` is `None` on the result.
    pub fn into_io_error(self) -> io::Error {
        let kind = io::Error::from_raw_os_error(self.raw_os_error()).kind();
        io::Error::new(kind, self)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} failed: {} ({})",
            self.op,
            self.args,
            codes::describe(self.errno),
            self.errno
        )
    }
}

impl std::error::Error for Failure {}

/// Plain OS error: `raw_os_error()` is preserved, the operation name and
/// arguments are dropped. Use [`Failure::into_io_error`] to keep them.
impl From<Failure> for io::Error {
    fn from(f: Failure) -> Self {
        io::Error::from_raw_os_error(f.raw_os_error())
    }
}

// ── Usage errors ──────────────────────────────────────────────────

/// The call did not match the operation's argument signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageError {
    pub op: &'static str,
    pub expected: &'static [ArgKind],
    pub got: Vec<ArgKind>,
}

fn write_kinds(f: &mut fmt::Formatter<'_>, kinds: &[ArgKind]) -> fmt::Result {
    f.write_str("(")?;
    for (i, k) in kinds.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", k)?;
    }
    f.write_str(")")
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: expected ", self.op)?;
        write_kinds(f, self.expected)?;
        f.write_str(", got ")?;
        write_kinds(f, &self.got)
    }
}

impl std::error::Error for UsageError {}

// ── Resolution errors ─────────────────────────────────────────────

/// Failure reported by a [`crate::UnitLoader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// No unit exists under the derived name.
    NotFound,
    /// The unit exists but could not be materialized.
    Failed(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::NotFound => write!(f, "unit not found"),
            LoadError::Failed(reason) => write!(f, "load failed: {}", reason),
        }
    }
}

impl std::error::Error for LoadError {}

/// An identifier could not be resolved to an implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Identifier is not a valid operation name.
    InvalidName(String),
    /// No implementation unit exists for the identifier.
    Unknown { name: String, unit: String },
    /// The unit was found but loading it failed.
    LoadFailed { name: String, unit: String, reason: String },
    /// The loader returned an implementation bound to another identifier.
    NameMismatch { name: String, loaded: &'static str },
}

impl ResolveError {
    pub fn name(&self) -> &str {
        match self {
            ResolveError::InvalidName(name) => name,
            ResolveError::Unknown { name, .. } => name,
            ResolveError::LoadFailed { name, .. } => name,
            ResolveError::NameMismatch { name, .. } => name,
        }
    }
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::InvalidName(name) => {
                write!(f, "invalid operation name {:?}", name)
            }
            ResolveError::Unknown { name, unit } => {
                write!(f, "unknown operation {:?} (no unit {})", name, unit)
            }
            ResolveError::LoadFailed { name, unit, reason } => {
                write!(f, "cannot load operation {:?} from {}: {}", name, unit, reason)
            }
            ResolveError::NameMismatch { name, loaded } => {
                write!(f, "unit for {:?} provides operation {:?}", name, loaded)
            }
        }
    }
}

impl std::error::Error for ResolveError {}

// ── Top-level error ───────────────────────────────────────────────

/// Error class, for matching by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    Os,
    Resolve,
    Usage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A syscall failed with an errno that was not tolerated.
    Os(Failure),
    /// The identifier could not be resolved.
    Resolve(ResolveError),
    /// The arguments did not match the operation's signature.
    Usage(UsageError),
}

impl Error {
    pub fn class(&self) -> ErrorClass {
        match self {
            Error::Os(_) => ErrorClass::Os,
            Error::Resolve(_) => ErrorClass::Resolve,
            Error::Usage(_) => ErrorClass::Usage,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Error::Os(f) => Some(f),
            _ => None,
        }
    }

    /// The OS errno, for `Os` errors only.
    pub fn errno(&self) -> Option<Errno> {
        self.failure().map(Failure::errno)
    }

    /// Developer errors (resolution or usage) as opposed to runtime OS failures.
    pub fn is_developer_error(&self) -> bool {
        !matches!(self, Error::Os(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Os(e) => write!(f, "{}", e),
            Error::Resolve(e) => write!(f, "{}", e),
            Error::Usage(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Os(e) => Some(e),
            Error::Resolve(e) => Some(e),
            Error::Usage(e) => Some(e),
        }
    }
}

impl From<Failure> for Error {
    fn from(e: Failure) -> Self {
        Error::Os(e)
    }
}

impl From<ResolveError> for Error {
    fn from(e: ResolveError) -> Self {
        Error::Resolve(e)
    }
}

impl From<UsageError> for Error {
    fn from(e: UsageError) -> Self {
        Error::Usage(e)
    }
}

impl Error {
    /// Like the `From` conversion, but `Os` errors keep their record; see
    /// [`Failure::into_io_error`].
    pub fn into_io_error(self) -> io::Error {
        match self {
            Error::Os(f) => f.into_io_error(),
            other => io::Error::new(io::ErrorKind::InvalidInput, other),
        }
    }
}

impl From<Error> for io::Error {
    fn from(e: Error) -> Self {
        match e {
            Error::Os(f) => f.into(),
            other => io::Error::new(io::ErrorKind::InvalidInput, other),
        }
    }
}

// ── Failure factory ───────────────────────────────────────────────

/// Builds the error object for a failed syscall.
///
/// The policy layer calls this and propagates whatever it returns; it never
/// builds error values or text itself.
pub trait FailureFactory: Send + Sync {
    fn make(&self, op: &'static str, errno: Errno, args: &CallArgs) -> Error;
}

/// Default factory: a plain [`Failure`] record.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecordFactory;

impl FailureFactory for RecordFactory {
    fn make(&self, op: &'static str, errno: Errno, args: &CallArgs) -> Error {
        Error::Os(Failure::new(op, errno, args.clone()))
    }
}
