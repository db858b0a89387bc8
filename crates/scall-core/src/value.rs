//! Success values returned by operations.
//!
//! The shape follows the analogous OS primitive: `open` yields a descriptor,
//! `write` a byte count, `stat` a [`FileStat`], `mkdir` nothing.

use std::net::SocketAddr;
use std::os::unix::io::RawFd;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Unit,
    Fd(RawFd),
    Count(usize),
    Bytes(Vec<u8>),
    Stat(FileStat),
    Addr(SocketAddr),
}

impl Value {
    pub fn as_fd(&self) -> Option<RawFd> {
        match self {
            Value::Fd(fd) => Some(*fd),
            _ => None,
        }
    }

    pub fn as_count(&self) -> Option<usize> {
        match self {
            Value::Count(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_stat(&self) -> Option<&FileStat> {
        match self {
            Value::Stat(st) => Some(st),
            _ => None,
        }
    }

    pub fn as_addr(&self) -> Option<SocketAddr> {
        match self {
            Value::Addr(a) => Some(*a),
            _ => None,
        }
    }
}

/// Subset of `struct stat`, widened to fixed-size integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub dev: u64,
    pub ino: u64,
    pub mode: u32,
    pub nlink: u64,
    pub uid: u32,
    pub gid: u32,
    pub size: i64,
}

impl FileStat {
    #[inline]
    fn file_type(&self) -> u32 {
        self.mode & libc::S_IFMT as u32
    }

    pub fn is_dir(&self) -> bool {
        self.file_type() == libc::S_IFDIR as u32
    }

    pub fn is_file(&self) -> bool {
        self.file_type() == libc::S_IFREG as u32
    }

    pub fn is_symlink(&self) -> bool {
        self.file_type() == libc::S_IFLNK as u32
    }

    /// Permission bits (`mode & 0o7777`).
    pub fn permissions(&self) -> u32 {
        self.mode & 0o7777
    }
}

impl From<&libc::stat> for FileStat {
    #[allow(clippy::unnecessary_cast)]
    fn from(st: &libc::stat) -> Self {
        Self {
            dev: st.st_dev as u64,
            ino: st.st_ino as u64,
            mode: st.st_mode as u32,
            nlink: st.st_nlink as u64,
            uid: st.st_uid as u32,
            gid: st.st_gid as u32,
            size: st.st_size as i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat_with_mode(mode: u32) -> FileStat {
        FileStat { dev: 0, ino: 0, mode, nlink: 1, uid: 0, gid: 0, size: 0 }
    }

    #[test]
    fn file_type_bits() {
        let dir = stat_with_mode(libc::S_IFDIR as u32 | 0o755);
        assert!(dir.is_dir());
        assert!(!dir.is_file());
        assert_eq!(dir.permissions(), 0o755);

        let link = stat_with_mode(libc::S_IFLNK as u32 | 0o777);
        assert!(link.is_symlink());
        assert!(!link.is_dir());
    }

    #[test]
    fn accessors_match_variant() {
        assert_eq!(Value::Fd(5).as_fd(), Some(5));
        assert_eq!(Value::Count(5).as_fd(), None);
        assert_eq!(Value::Bytes(b"hi".to_vec()).into_bytes(), Some(b"hi".to_vec()));
        assert!(Value::Unit.as_stat().is_none());
    }
}
