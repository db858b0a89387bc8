//! `SocketAddr` ⇄ `SockaddrStorage` conversion.

use std::net::{SocketAddr, SocketAddrV4, SocketAddrV6};

use nix::errno::Errno;
use nix::sys::socket::SockaddrStorage;

#[inline]
pub fn to_storage(addr: SocketAddr) -> SockaddrStorage {
    SockaddrStorage::from(addr)
}

/// Decode a kernel-filled address. Families other than INET/INET6 are
/// `EAFNOSUPPORT`.
pub fn from_storage(storage: &SockaddrStorage) -> Result<SocketAddr, Errno> {
    if let Some(sin) = storage.as_sockaddr_in() {
        return Ok(SocketAddr::V4(SocketAddrV4::from(*sin)));
    }
    if let Some(sin6) = storage.as_sockaddr_in6() {
        return Ok(SocketAddr::V6(SocketAddrV6::from(*sin6)));
    }
    Err(Errno::EAFNOSUPPORT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::sys::socket::{SockaddrLike, UnixAddr};
    use std::mem;

    #[test]
    fn v4_layout() {
        let addr: SocketAddr = "127.0.0.1:8080".parse().expect("addr");
        let storage = to_storage(addr);
        assert_eq!(storage.len() as usize, mem::size_of::<libc::sockaddr_in>());
        assert_eq!(from_storage(&storage), Ok(addr));
    }

    #[test]
    fn v6_layout() {
        let addr: SocketAddr = "[::1]:9".parse().expect("addr");
        let storage = to_storage(addr);
        assert_eq!(storage.len() as usize, mem::size_of::<libc::sockaddr_in6>());
        assert_eq!(from_storage(&storage), Ok(addr));
    }

    #[test]
    fn unknown_family_rejected() {
        let unix = UnixAddr::new("/tmp/scall-sock").expect("unix addr");
        // SAFETY: `unix` is a valid sockaddr of the reported length.
        let storage = unsafe { SockaddrStorage::from_raw(unix.as_ptr().cast(), Some(unix.len())) }
            .expect("storage");
        assert_eq!(from_storage(&storage), Err(Errno::EAFNOSUPPORT));
    }
}
