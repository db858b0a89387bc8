//! Scoped access to the process errno slot.
//!
//! The errno slot is thread-local OS state. A syscall body reads it only in
//! the instant after its call returns (via [`check`]); the surrounding
//! [`ErrnoScope`] puts back whatever value the caller had when the scope was
//! entered, so neither a successful nor a failing call leaves it changed.

use nix::errno::Errno;

/// Saves errno on entry, restores it on drop.
///
/// ```
/// use scall_core::ErrnoScope;
/// use nix::errno::Errno;
///
/// Errno::set_raw(0);
/// {
///     let _scope = ErrnoScope::enter();
///     Errno::set_raw(libc::ENOENT);
/// }
/// assert_eq!(Errno::last_raw(), 0);
/// ```
#[must_use = "errno is restored when the scope is dropped"]
pub struct ErrnoScope {
    saved: i32,
}

impl ErrnoScope {
    #[inline]
    pub fn enter() -> Self {
        Self { saved: Errno::last_raw() }
    }

    /// The errno value the caller had on entry.
    #[inline]
    pub fn saved(&self) -> i32 {
        self.saved
    }
}

impl Drop for ErrnoScope {
    #[inline]
    fn drop(&mut self) {
        Errno::set_raw(self.saved);
    }
}

/// Classify a raw syscall return: `-1` → `Err(errno)`, anything else `Ok`.
///
/// Works for `c_int`, `ssize_t` and `off_t` returns.
#[inline]
pub fn check<S>(ret: S) -> Result<S, Errno>
where
    S: nix::errno::ErrnoSentinel + PartialEq<S>,
{
    Errno::result(ret)
}

/// Run `f` with errno isolated from the caller.
#[inline]
pub fn isolated<T, F: FnOnce() -> T>(f: F) -> T {
    let _scope = ErrnoScope::enter();
    f()
}
