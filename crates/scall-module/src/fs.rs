//! Path operations: unlink, rename, link, symlink, chmod, stat, lstat.

use std::mem;

use nix::errno::Errno;

use scall_core::codes::{ENOENT, ENOTDIR};
use scall_core::errno::check;
use scall_core::{ArgKind, CallArgs, FileStat, Value};

use crate::sysop::SysOp;

const PATH: &[ArgKind] = &[ArgKind::Path];
const PATH_PATH: &[ArgKind] = &[ArgKind::Path, ArgKind::Path];

pub const OPS: &[SysOp] = &[
    SysOp::plain("unlink", PATH, unlink),
    // ENOTDIR: a path prefix is not a directory, so the target cannot exist.
    SysOp::tolerant("unlink_if_exists", PATH, &[ENOENT, ENOTDIR], unlink),
    SysOp::plain("rename", PATH_PATH, rename),
    SysOp::plain("link", PATH_PATH, link),
    SysOp::plain("symlink", PATH_PATH, symlink),
    SysOp::plain("chmod", &[ArgKind::Path, ArgKind::Int], chmod),
    SysOp::plain("stat", PATH, stat),
    SysOp::plain("lstat", PATH, lstat),
];

fn unlink(args: &CallArgs) -> Result<Value, Errno> {
    let path = args.c_path(0)?;
    check(unsafe { libc::unlink(path.as_ptr()) })?;
    Ok(Value::Unit)
}

/// `rename(from, to)`.
fn rename(args: &CallArgs) -> Result<Value, Errno> {
    let from = args.c_path(0)?;
    let to = args.c_path(1)?;
    check(unsafe { libc::rename(from.as_ptr(), to.as_ptr()) })?;
    Ok(Value::Unit)
}

/// `link(existing, new)`.
fn link(args: &CallArgs) -> Result<Value, Errno> {
    let existing = args.c_path(0)?;
    let new = args.c_path(1)?;
    check(unsafe { libc::link(existing.as_ptr(), new.as_ptr()) })?;
    Ok(Value::Unit)
}

/// `symlink(target, linkpath)`.
fn symlink(args: &CallArgs) -> Result<Value, Errno> {
    let target = args.c_path(0)?;
    let linkpath = args.c_path(1)?;
    check(unsafe { libc::symlink(target.as_ptr(), linkpath.as_ptr()) })?;
    Ok(Value::Unit)
}

fn chmod(args: &CallArgs) -> Result<Value, Errno> {
    let path = args.c_path(0)?;
    let mode = args.mode_at(1)?;
    check(unsafe { libc::chmod(path.as_ptr(), mode) })?;
    Ok(Value::Unit)
}

fn stat(args: &CallArgs) -> Result<Value, Errno> {
    let path = args.c_path(0)?;
    let mut st: libc::stat = unsafe { mem::zeroed() };
    check(unsafe { libc::stat(path.as_ptr(), &mut st) })?;
    Ok(Value::Stat(FileStat::from(&st)))
}

fn lstat(args: &CallArgs) -> Result<Value, Errno> {
    let path = args.c_path(0)?;
    let mut st: libc::stat = unsafe { mem::zeroed() };
    check(unsafe { libc::lstat(path.as_ptr(), &mut st) })?;
    Ok(Value::Stat(FileStat::from(&st)))
}
