//! Socket operations.
//!
//! `accept`, `send` and `recv` restart on EINTR. `connect` never does: a
//! reissued connect after EINTR reports EALREADY/EISCONN instead of the
//! original outcome.

use std::ptr;

use nix::errno::Errno;
use nix::sys::socket::{self as nix_socket, SockaddrStorage};

use scall_core::codes::ENOTCONN;
use scall_core::errno::check;
use scall_core::{ArgKind, CallArgs, Value};

use crate::sockaddr;
use crate::sysop::SysOp;

const FD_ADDR: &[ArgKind] = &[ArgKind::Fd, ArgKind::Addr];
const FD_INT: &[ArgKind] = &[ArgKind::Fd, ArgKind::Int];

pub const OPS: &[SysOp] = &[
    SysOp::plain("socket", &[ArgKind::Int, ArgKind::Int, ArgKind::Int], socket),
    SysOp::plain("bind", FD_ADDR, bind),
    SysOp::plain("listen", FD_INT, listen),
    SysOp::plain("accept", &[ArgKind::Fd], accept).restartable(),
    SysOp::plain("connect", FD_ADDR, connect),
    SysOp::plain("getsockname", &[ArgKind::Fd], getsockname),
    SysOp::plain("send", &[ArgKind::Fd, ArgKind::Bytes, ArgKind::Int], send).restartable(),
    SysOp::plain("recv", &[ArgKind::Fd, ArgKind::Int, ArgKind::Int], recv).restartable(),
    SysOp::plain("shutdown", FD_INT, shutdown),
    SysOp::tolerant("shutdown_if_connected", FD_INT, &[ENOTCONN], shutdown),
];

/// `socket(domain, type, protocol)` → fd.
fn socket(args: &CallArgs) -> Result<Value, Errno> {
    let domain = args.c_int_at(0)?;
    let ty = args.c_int_at(1)?;
    let protocol = args.c_int_at(2)?;
    let fd = check(unsafe { libc::socket(domain, ty, protocol) })?;
    Ok(Value::Fd(fd))
}

fn bind(args: &CallArgs) -> Result<Value, Errno> {
    let fd = args.fd_at(0)?;
    let addr = sockaddr::to_storage(args.addr_at(1)?);
    nix_socket::bind(fd, &addr)?;
    Ok(Value::Unit)
}

fn listen(args: &CallArgs) -> Result<Value, Errno> {
    let fd = args.fd_at(0)?;
    let backlog = args.c_int_at(1)?;
    check(unsafe { libc::listen(fd, backlog) })?;
    Ok(Value::Unit)
}

/// `accept(fd)` → connected fd. The peer address is not requested;
/// use `getsockname` on either end if needed.
fn accept(args: &CallArgs) -> Result<Value, Errno> {
    let fd = args.fd_at(0)?;
    let conn = check(unsafe { libc::accept(fd, ptr::null_mut(), ptr::null_mut()) })?;
    Ok(Value::Fd(conn))
}

fn connect(args: &CallArgs) -> Result<Value, Errno> {
    let fd = args.fd_at(0)?;
    let addr = sockaddr::to_storage(args.addr_at(1)?);
    nix_socket::connect(fd, &addr)?;
    Ok(Value::Unit)
}

fn getsockname(args: &CallArgs) -> Result<Value, Errno> {
    let fd = args.fd_at(0)?;
    let local: SockaddrStorage = nix_socket::getsockname(fd)?;
    Ok(Value::Addr(sockaddr::from_storage(&local)?))
}

/// `send(fd, bytes, flags)` → bytes sent.
fn send(args: &CallArgs) -> Result<Value, Errno> {
    let fd = args.fd_at(0)?;
    let data = args.bytes_at(1)?;
    let flags = args.c_int_at(2)?;
    let n = check(unsafe { libc::send(fd, data.as_ptr().cast(), data.len(), flags) })?;
    Ok(Value::Count(n as usize))
}

/// `recv(fd, len, flags)` → up to `len` bytes.
fn recv(args: &CallArgs) -> Result<Value, Errno> {
    let fd = args.fd_at(0)?;
    let mut buf = args.buffer_at(1)?;
    let flags = args.c_int_at(2)?;
    let n = check(unsafe { libc::recv(fd, buf.as_mut_ptr().cast(), buf.capacity(), flags) })?;
    // SAFETY: the kernel initialized the first `n` bytes.
    unsafe { buf.set_len(n as usize) };
    Ok(Value::Bytes(buf))
}

/// `shutdown(fd, how)`.
fn shutdown(args: &CallArgs) -> Result<Value, Errno> {
    let fd = args.fd_at(0)?;
    let how = args.c_int_at(1)?;
    check(unsafe { libc::shutdown(fd, how) })?;
    Ok(Value::Unit)
}
