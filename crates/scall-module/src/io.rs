//! Descriptor I/O: open, close, read, write, lseek, fsync.

use nix::errno::Errno;

use scall_core::errno::check;
use scall_core::{ArgKind, CallArgs, Value};

use crate::sysop::SysOp;

pub const OPS: &[SysOp] = &[
    SysOp::plain("open", &[ArgKind::Path, ArgKind::Int, ArgKind::Int], open),
    SysOp::plain("close", &[ArgKind::Fd], close),
    SysOp::plain("read", &[ArgKind::Fd, ArgKind::Int], read).restartable(),
    SysOp::plain("write", &[ArgKind::Fd, ArgKind::Bytes], write).restartable(),
    SysOp::plain("lseek", &[ArgKind::Fd, ArgKind::Int, ArgKind::Int], lseek),
    SysOp::plain("fsync", &[ArgKind::Fd], fsync),
];

/// `open(path, flags, mode)` → fd.
fn open(args: &CallArgs) -> Result<Value, Errno> {
    let path = args.c_path(0)?;
    let flags = args.c_int_at(1)?;
    let mode = libc::c_uint::from(args.mode_at(2)?);
    let fd = check(unsafe { libc::open(path.as_ptr(), flags, mode) })?;
    Ok(Value::Fd(fd))
}

/// `close(fd)`. Never restarted: on Linux the descriptor is gone even when
/// EINTR is reported.
fn close(args: &CallArgs) -> Result<Value, Errno> {
    let fd = args.fd_at(0)?;
    check(unsafe { libc::close(fd) })?;
    Ok(Value::Unit)
}

/// `read(fd, len)` → up to `len` bytes. An empty result is EOF.
fn read(args: &CallArgs) -> Result<Value, Errno> {
    let fd = args.fd_at(0)?;
    let mut buf = args.buffer_at(1)?;
    let n = check(unsafe { libc::read(fd, buf.as_mut_ptr().cast(), buf.capacity()) })?;
    // SAFETY: the kernel initialized the first `n` bytes.
    unsafe { buf.set_len(n as usize) };
    Ok(Value::Bytes(buf))
}

/// `write(fd, bytes)` → bytes written. Short writes are returned as-is.
fn write(args: &CallArgs) -> Result<Value, Errno> {
    let fd = args.fd_at(0)?;
    let data = args.bytes_at(1)?;
    let n = check(unsafe { libc::write(fd, data.as_ptr().cast(), data.len()) })?;
    Ok(Value::Count(n as usize))
}

/// `lseek(fd, offset, whence)` → resulting offset.
fn lseek(args: &CallArgs) -> Result<Value, Errno> {
    let fd = args.fd_at(0)?;
    let offset = args.off_at(1)?;
    let whence = args.c_int_at(2)?;
    let pos = check(unsafe { libc::lseek(fd, offset, whence) })?;
    Ok(Value::Count(pos as usize))
}

fn fsync(args: &CallArgs) -> Result<Value, Errno> {
    let fd = args.fd_at(0)?;
    check(unsafe { libc::fsync(fd) })?;
    Ok(Value::Unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testutil::{run, scratch_path};
    use scall_core::{ErrorClass, Outcome};

    fn open_rw_create(path: &std::path::Path) -> i32 {
        let flags = (libc::O_RDWR | libc::O_CREAT | libc::O_TRUNC | libc::O_CLOEXEC) as i64;
        let out = run("open", CallArgs::new().path(path).int(flags).int(0o600)).expect("open");
        out.done().and_then(|v| v.as_fd()).expect("fd")
    }

    #[test]
    fn write_seek_read_roundtrip() {
        let path = scratch_path("io_rw");
        let fd = open_rw_create(&path);

        let wrote = run("write", CallArgs::new().fd(fd).bytes(b"hello".to_vec())).expect("write");
        assert_eq!(wrote, Outcome::Done(Value::Count(5)));

        let pos = run("lseek", CallArgs::new().fd(fd).int(0).int(libc::SEEK_SET as i64)).expect("lseek");
        assert_eq!(pos, Outcome::Done(Value::Count(0)));

        let read = run("read", CallArgs::new().fd(fd).int(64)).expect("read");
        assert_eq!(read, Outcome::Done(Value::Bytes(b"hello".to_vec())));

        run("fsync", CallArgs::new().fd(fd)).expect("fsync");
        run("close", CallArgs::new().fd(fd)).expect("close");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn open_missing_without_create_fails_enoent() {
        let path = scratch_path("io_missing");
        let err = run("open", CallArgs::new().path(&path).int(libc::O_RDONLY as i64).int(0))
            .unwrap_err();
        assert_eq!(err.class(), ErrorClass::Os);
        assert_eq!(err.errno(), Some(Errno::ENOENT));
        assert_eq!(err.failure().map(|f| f.args().clone()),
                   Some(CallArgs::new().path(&path).int(libc::O_RDONLY as i64).int(0)));
    }

    #[test]
    fn close_bad_fd_is_ebadf() {
        let err = run("close", CallArgs::new().fd(-1)).unwrap_err();
        assert_eq!(err.errno(), Some(Errno::EBADF));
    }

    #[test]
    fn read_negative_len_is_einval() {
        let err = run("read", CallArgs::new().fd(0).int(-5)).unwrap_err();
        assert_eq!(err.errno(), Some(Errno::EINVAL));
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn read_huge_len_fails_without_aborting() {
        let args = CallArgs::new().fd(-1).int(i64::MAX);
        let err = run("read", args.clone()).unwrap_err();
        assert_eq!(err.class(), ErrorClass::Os);
        assert_eq!(err.errno(), Some(Errno::ENOMEM));
        assert_eq!(err.failure().map(|f| f.args().clone()), Some(args));
    }

    #[test]
    fn open_flags_out_of_int_range_is_einval() {
        let path = scratch_path("io_wide_flags");
        let args = CallArgs::new().path(&path).int(i64::MAX).int(0);
        let err = run("open", args.clone()).unwrap_err();
        assert_eq!(err.class(), ErrorClass::Os);
        assert_eq!(err.errno(), Some(Errno::EINVAL));
        assert_eq!(err.failure().map(|f| f.args().clone()), Some(args));
        assert!(!path.exists());
    }

    #[test]
    fn lseek_whence_out_of_int_range_is_einval() {
        let path = scratch_path("io_wide_whence");
        let fd = open_rw_create(&path);
        let whence = i64::from(libc::SEEK_SET) + (1 << 32);
        let err = run("lseek", CallArgs::new().fd(fd).int(0).int(whence)).unwrap_err();
        assert_eq!(err.errno(), Some(Errno::EINVAL));
        run("close", CallArgs::new().fd(fd)).expect("close");
        let _ = std::fs::remove_file(&path);
    }
}
