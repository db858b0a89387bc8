//! Result shape for tolerant variants.
//!
//! A tolerant operation (`unlink_if_exists`, `mkdir_if_missing`, ...) never
//! reports an absorbed errno as success. `Outcome::Done` is the real
//! success; `Outcome::Tolerated` names the errno that was absorbed, so
//! "removed", "was already absent because ENOENT" and "was already absent
//! because ENOTDIR" stay three different answers. Anything else is an
//! `Err` from the policy layer.

use std::fmt;

use nix::errno::Errno;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The syscall succeeded.
    Done(T),
    /// The syscall failed with an errno in the operation's tolerated set.
    Tolerated(Tolerated),
}

/// An absorbed failure: which operation, and which errno.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tolerated {
    op: &'static str,
    errno: Errno,
}

impl Tolerated {
    pub fn new(op: &'static str, errno: Errno) -> Self {
        Self { op, errno }
    }

    pub fn op(&self) -> &'static str {
        self.op
    }

    pub fn errno(&self) -> Errno {
        self.errno
    }
}

impl fmt::Display for Tolerated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: tolerated {}", self.op, self.errno)
    }
}

impl<T> Outcome<T> {
    /// True only for a real success. A tolerated outcome is falsy.
    #[inline]
    pub fn is_done(&self) -> bool {
        matches!(self, Outcome::Done(_))
    }

    #[inline]
    pub fn is_tolerated(&self) -> bool {
        matches!(self, Outcome::Tolerated(_))
    }

    /// The absorbed errno, if this outcome was tolerated.
    pub fn tolerated_errno(&self) -> Option<Errno> {
        match self {
            Outcome::Done(_) => None,
            Outcome::Tolerated(t) => Some(t.errno()),
        }
    }

    pub fn tolerated(&self) -> Option<&Tolerated> {
        match self {
            Outcome::Done(_) => None,
            Outcome::Tolerated(t) => Some(t),
        }
    }

    /// The success value; `None` when tolerated.
    pub fn done(self) -> Option<T> {
        match self {
            Outcome::Done(v) => Some(v),
            Outcome::Tolerated(_) => None,
        }
    }

    pub fn as_done(&self) -> Option<&T> {
        match self {
            Outcome::Done(v) => Some(v),
            Outcome::Tolerated(_) => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Done(v) => Outcome::Done(f(v)),
            Outcome::Tolerated(t) => Outcome::Tolerated(t),
        }
    }
}
