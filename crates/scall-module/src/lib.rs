//! # scall-module: default catalog
//!
//! Every operation here is a one-call passthrough to libc, described by a
//! [`SysOp`] descriptor: identifier, argument signature, tolerated errnos,
//! restart-on-EINTR flag and the body function. Tolerant variants reuse the
//! plain body with a different tolerated set, so the single-call guarantee
//! is shared.
//!
//! ## Catalog
//!
//! | Module | Operations |
//! |--------|------------|
//! | `io`   | open, close, read, write, lseek, fsync |
//! | `fs`   | unlink, unlink_if_exists, rename, link, symlink, chmod, stat, lstat |
//! | `dir`  | mkdir, mkdir_if_missing, rmdir, rmdir_if_exists, chdir |
//! | `net`  | socket, bind, listen, accept, connect, getsockname, send, recv, shutdown, shutdown_if_connected |
//!
//! [`CatalogLoader`] resolves `scall/op/<identifier>` unit names against
//! these tables and materializes an `Arc<dyn Operation>` on demand.

pub mod sysop;
pub mod sockaddr;
pub mod io;
pub mod fs;
pub mod dir;
pub mod net;
pub mod catalog;

pub use catalog::CatalogLoader;
pub use sysop::SysOp;
