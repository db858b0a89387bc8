//! Call arguments.
//!
//! Operations are invoked by identifier with a positional argument list
//! shaped like the analogous OS primitive. Each argument carries its kind so
//! the policy layer can reject mismatched calls before any syscall runs.

use std::ffi::CString;
use std::fmt;
use std::net::SocketAddr;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::io::RawFd;
use std::path::{Path, PathBuf};

use nix::errno::Errno;

cfg_if::cfg_if! {
    if #[cfg(any(target_os = "macos", target_os = "ios"))] {
        /// Largest length handed to a single `read`/`recv`. Darwin fails
        /// requests above `INT_MAX` with EINVAL.
        pub const MAX_IO_LEN: usize = libc::c_int::MAX as usize - 1;
    } else {
        /// Largest length handed to a single `read`/`recv`.
        pub const MAX_IO_LEN: usize = isize::MAX as usize;
    }
}

/// Kind of a single positional argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgKind {
    /// Filesystem path.
    Path,
    /// Open file descriptor.
    Fd,
    /// Integer: flags, mode, length, offset, domain, backlog...
    Int,
    /// Byte buffer to be written or sent.
    Bytes,
    /// Socket address.
    Addr,
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ArgKind::Path => "path",
            ArgKind::Fd => "fd",
            ArgKind::Int => "int",
            ArgKind::Bytes => "bytes",
            ArgKind::Addr => "addr",
        };
        f.write_str(s)
    }
}

/// A single positional argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    Path(PathBuf),
    Fd(RawFd),
    Int(i64),
    Bytes(Vec<u8>),
    Addr(SocketAddr),
}

impl Arg {
    pub fn kind(&self) -> ArgKind {
        match self {
            Arg::Path(_) => ArgKind::Path,
            Arg::Fd(_) => ArgKind::Fd,
            Arg::Int(_) => ArgKind::Int,
            Arg::Bytes(_) => ArgKind::Bytes,
            Arg::Addr(_) => ArgKind::Addr,
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Path(p) => write!(f, "{:?}", p),
            Arg::Fd(fd) => write!(f, "fd {}", fd),
            Arg::Int(v) => write!(f, "{}", v),
            Arg::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Arg::Addr(a) => write!(f, "{}", a),
        }
    }
}

/// Positional argument list for one invocation.
///
/// Built with the chaining helpers:
///
/// ```
/// use scall_core::CallArgs;
///
/// let args = CallArgs::new()
///     .path("/tmp/scall-doc")
///     .int(libc::O_WRONLY as i64 | libc::O_CREAT as i64)
///     .int(0o644);
/// assert_eq!(args.len(), 3);
/// ```
///
/// Accessors return `EINVAL` on a kind mismatch. The policy layer checks the
/// signature before a syscall body runs, so bodies only see that for paths
/// containing an interior NUL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallArgs {
    args: Vec<Arg>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self { args: Vec::new() }
    }

    pub fn push(mut self, arg: Arg) -> Self {
        self.args.push(arg);
        self
    }

    pub fn path(self, path: impl AsRef<Path>) -> Self {
        self.push(Arg::Path(path.as_ref().to_path_buf()))
    }

    pub fn fd(self, fd: RawFd) -> Self {
        self.push(Arg::Fd(fd))
    }

    pub fn int(self, v: i64) -> Self {
        self.push(Arg::Int(v))
    }

    pub fn bytes(self, data: impl Into<Vec<u8>>) -> Self {
        self.push(Arg::Bytes(data.into()))
    }

    pub fn addr(self, addr: SocketAddr) -> Self {
        self.push(Arg::Addr(addr))
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn as_slice(&self) -> &[Arg] {
        &self.args
    }

    pub fn kinds(&self) -> Vec<ArgKind> {
        self.args.iter().map(Arg::kind).collect()
    }

    /// Path argument at `idx`, as a NUL-terminated C string.
    pub fn c_path(&self, idx: usize) -> Result<CString, Errno> {
        match self.args.get(idx) {
            Some(Arg::Path(p)) => {
                CString::new(p.as_os_str().as_bytes()).map_err(|_| Errno::EINVAL)
            }
            _ => Err(Errno::EINVAL),
        }
    }

    pub fn fd_at(&self, idx: usize) -> Result<RawFd, Errno> {
        match self.args.get(idx) {
            Some(Arg::Fd(fd)) => Ok(*fd),
            _ => Err(Errno::EINVAL),
        }
    }

    pub fn int_at(&self, idx: usize) -> Result<i64, Errno> {
        match self.args.get(idx) {
            Some(Arg::Int(v)) => Ok(*v),
            _ => Err(Errno::EINVAL),
        }
    }

    /// Integer argument at `idx` converted to `usize`; negative is `EINVAL`.
    pub fn len_at(&self, idx: usize) -> Result<usize, Errno> {
        usize::try_from(self.int_at(idx)?).map_err(|_| Errno::EINVAL)
    }

    /// Integer argument at `idx` as a C `int`; out of range is `EINVAL`.
    pub fn c_int_at(&self, idx: usize) -> Result<libc::c_int, Errno> {
        libc::c_int::try_from(self.int_at(idx)?).map_err(|_| Errno::EINVAL)
    }

    /// Permission bits at `idx`; out of range for `mode_t` is `EINVAL`.
    pub fn mode_at(&self, idx: usize) -> Result<libc::mode_t, Errno> {
        libc::mode_t::try_from(self.int_at(idx)?).map_err(|_| Errno::EINVAL)
    }

    /// File offset at `idx`; out of range for `off_t` is `EINVAL`.
    pub fn off_at(&self, idx: usize) -> Result<libc::off_t, Errno> {
        libc::off_t::try_from(self.int_at(idx)?).map_err(|_| Errno::EINVAL)
    }

    /// Empty buffer with room for the length at `idx`, clamped to
    /// [`MAX_IO_LEN`]. The allocation is fallible: a length the allocator
    /// cannot satisfy is `ENOMEM` rather than an abort. Capacity is
    /// reserved but not touched, so the kernel only faults in what it fills.
    pub fn buffer_at(&self, idx: usize) -> Result<Vec<u8>, Errno> {
        let len = self.len_at(idx)?.min(MAX_IO_LEN);
        let mut buf = Vec::new();
        buf.try_reserve_exact(len).map_err(|_| Errno::ENOMEM)?;
        Ok(buf)
    }

    pub fn bytes_at(&self, idx: usize) -> Result<&[u8], Errno> {
        match self.args.get(idx) {
            Some(Arg::Bytes(b)) => Ok(b),
            _ => Err(Errno::EINVAL),
        }
    }

    pub fn addr_at(&self, idx: usize) -> Result<SocketAddr, Errno> {
        match self.args.get(idx) {
            Some(Arg::Addr(a)) => Ok(*a),
            _ => Err(Errno::EINVAL),
        }
    }
}

impl From<Vec<Arg>> for CallArgs {
    fn from(args: Vec<Arg>) -> Self {
        Self { args }
    }
}

impl fmt::Display for CallArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", arg)?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_order() {
        let args = CallArgs::new().path("/a").fd(3).int(7);
        assert_eq!(args.kinds(), vec![ArgKind::Path, ArgKind::Fd, ArgKind::Int]);
        assert_eq!(args.fd_at(1), Ok(3));
        assert_eq!(args.int_at(2), Ok(7));
    }

    #[test]
    fn wrong_kind_is_einval() {
        let args = CallArgs::new().int(1);
        assert_eq!(args.fd_at(0), Err(Errno::EINVAL));
        assert_eq!(args.int_at(1), Err(Errno::EINVAL));
    }

    #[test]
    fn interior_nul_path_is_einval() {
        let args = CallArgs::new().path("/tmp/a\0b");
        assert_eq!(args.c_path(0), Err(Errno::EINVAL));
    }

    #[test]
    fn negative_len_rejected() {
        let args = CallArgs::new().int(-1);
        assert_eq!(args.len_at(0), Err(Errno::EINVAL));
    }

    #[test]
    fn c_int_range_checked() {
        let args = CallArgs::new().int(-7).int(i64::MAX).int(i64::from(libc::c_int::MIN) - 1);
        assert_eq!(args.c_int_at(0), Ok(-7));
        assert_eq!(args.c_int_at(1), Err(Errno::EINVAL));
        assert_eq!(args.c_int_at(2), Err(Errno::EINVAL));
    }

    #[test]
    fn mode_range_checked() {
        let args = CallArgs::new().int(0o755).int(-1).int(1 << 40);
        assert_eq!(args.mode_at(0), Ok(0o755));
        assert_eq!(args.mode_at(1), Err(Errno::EINVAL));
        assert_eq!(args.mode_at(2), Err(Errno::EINVAL));
    }

    #[test]
    fn buffer_reserves_requested_len() {
        let args = CallArgs::new().int(64).int(0);
        let buf = args.buffer_at(0).expect("buffer");
        assert!(buf.is_empty());
        assert!(buf.capacity() >= 64);
        assert_eq!(args.buffer_at(1).map(|b| b.len()), Ok(0));
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn huge_buffer_is_enomem_not_abort() {
        let args = CallArgs::new().int(i64::MAX);
        assert_eq!(args.buffer_at(0).err(), Some(Errno::ENOMEM));
    }

    #[test]
    fn display_elides_bytes() {
        let args = CallArgs::new().fd(4).bytes(vec![0u8; 16]);
        assert_eq!(args.to_string(), "(fd 4, <16 bytes>)");
    }
}
