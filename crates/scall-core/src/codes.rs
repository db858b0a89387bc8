//! Well-known errno values and numeric error ids.
//!
//! The constants are the host's own values (re-exported from
//! `nix::errno::Errno`), never redefined here. Tolerated-error sets are
//! written in terms of these.
//!
//! Numeric id formula: `2000 + errno`. Seeing id `2002` in a log line
//! immediately tells you ENOENT(2).

pub use nix::errno::Errno;

// ── Filesystem ────────────────────────────────────────────────────

pub const ENOENT: Errno = Errno::ENOENT;
pub const EEXIST: Errno = Errno::EEXIST;
pub const ENOTDIR: Errno = Errno::ENOTDIR;
pub const EISDIR: Errno = Errno::EISDIR;
pub const ENOTEMPTY: Errno = Errno::ENOTEMPTY;
pub const EACCES: Errno = Errno::EACCES;
pub const EPERM: Errno = Errno::EPERM;
pub const EBADF: Errno = Errno::EBADF;

// ── Process / signal ──────────────────────────────────────────────

pub const EINTR: Errno = Errno::EINTR;
pub const EAGAIN: Errno = Errno::EAGAIN;
pub const EINVAL: Errno = Errno::EINVAL;

// ── Networking ────────────────────────────────────────────────────

pub const ENOTCONN: Errno = Errno::ENOTCONN;
pub const ECONNREFUSED: Errno = Errno::ECONNREFUSED;
pub const EADDRINUSE: Errno = Errno::EADDRINUSE;
pub const ENOTSOCK: Errno = Errno::ENOTSOCK;

/// Base of the errno id range.
pub const ERRNO_ID_BASE: u64 = 2000;

/// Numeric id for an errno: `2000 + errno`.
///
/// ```
/// use scall_core::codes::{errno_id, ENOENT};
/// assert_eq!(errno_id(ENOENT), 2000 + libc::ENOENT as u64);
/// ```
#[inline]
pub fn errno_id(errno: Errno) -> u64 {
    ERRNO_ID_BASE + errno as i32 as u64
}

/// Short human description (`strerror`-style) for an errno.
#[inline]
pub fn describe(errno: Errno) -> &'static str {
    errno.desc()
}

/// Convert a raw errno value into `Errno`. Unknown values map to
/// `Errno::UnknownErrno`.
#[inline]
pub fn from_raw(raw: i32) -> Errno {
    Errno::from_raw(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_match_host() {
        assert_eq!(ENOENT as i32, libc::ENOENT);
        assert_eq!(EEXIST as i32, libc::EEXIST);
        assert_eq!(EINTR as i32, libc::EINTR);
        assert_eq!(ENOTCONN as i32, libc::ENOTCONN);
    }

    #[test]
    fn id_formula_predictable() {
        assert_eq!(errno_id(EPERM), 2001);
        assert_eq!(errno_id(ENOENT), 2002);
        assert_eq!(errno_id(EINTR), 2004);
    }

    #[test]
    fn raw_roundtrip_known() {
        assert_eq!(from_raw(libc::EEXIST), EEXIST);
    }

    #[test]
    fn describe_is_nonempty() {
        assert!(!describe(ENOENT).is_empty());
    }
}
