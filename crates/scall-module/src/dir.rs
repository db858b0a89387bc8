//! Directory operations: mkdir, rmdir, chdir.

use nix::errno::Errno;

use scall_core::codes::{EEXIST, ENOENT};
use scall_core::errno::check;
use scall_core::{ArgKind, CallArgs, Value};

use crate::sysop::SysOp;

const PATH_MODE: &[ArgKind] = &[ArgKind::Path, ArgKind::Int];

pub const OPS: &[SysOp] = &[
    SysOp::plain("mkdir", PATH_MODE, mkdir),
    SysOp::tolerant("mkdir_if_missing", PATH_MODE, &[EEXIST], mkdir),
    SysOp::plain("rmdir", &[ArgKind::Path], rmdir),
    SysOp::tolerant("rmdir_if_exists", &[ArgKind::Path], &[ENOENT], rmdir),
    SysOp::plain("chdir", &[ArgKind::Path], chdir),
];

fn mkdir(args: &CallArgs) -> Result<Value, Errno> {
    let path = args.c_path(0)?;
    let mode = args.mode_at(1)?;
    check(unsafe { libc::mkdir(path.as_ptr(), mode) })?;
    Ok(Value::Unit)
}

fn rmdir(args: &CallArgs) -> Result<Value, Errno> {
    let path = args.c_path(0)?;
    check(unsafe { libc::rmdir(path.as_ptr()) })?;
    Ok(Value::Unit)
}

fn chdir(args: &CallArgs) -> Result<Value, Errno> {
    let path = args.c_path(0)?;
    check(unsafe { libc::chdir(path.as_ptr()) })?;
    Ok(Value::Unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testutil::{run, scratch_path};

    #[test]
    fn mkdir_if_missing_created_vs_existed() {
        let dir = scratch_path("dir_mk");

        let created = run("mkdir_if_missing", CallArgs::new().path(&dir).int(0o755)).expect("created");
        assert!(created.is_done());

        let existed = run("mkdir_if_missing", CallArgs::new().path(&dir).int(0o755)).expect("existed");
        assert!(!existed.is_done());
        assert_eq!(existed.tolerated_errno(), Some(EEXIST));
        assert_ne!(created, existed);

        let _ = std::fs::remove_dir(&dir);
    }

    #[test]
    fn plain_mkdir_raises_eexist() {
        let dir = scratch_path("dir_plain");
        run("mkdir", CallArgs::new().path(&dir).int(0o700)).expect("mkdir");
        let err = run("mkdir", CallArgs::new().path(&dir).int(0o700)).unwrap_err();
        assert_eq!(err.errno(), Some(EEXIST));
        let _ = std::fs::remove_dir(&dir);
    }

    #[test]
    fn mkdir_negative_mode_is_einval() {
        let dir = scratch_path("dir_neg_mode");
        let err = run("mkdir_if_missing", CallArgs::new().path(&dir).int(-1)).unwrap_err();
        assert_eq!(err.errno(), Some(Errno::EINVAL));
        assert!(!dir.exists());
    }

    #[test]
    fn rmdir_if_exists_tolerates_only_enoent() {
        let dir = scratch_path("dir_rm");
        std::fs::create_dir(&dir).expect("seed");
        std::fs::write(dir.join("keep"), b"x").expect("seed child");

        // Non-empty: not tolerated.
        let err = run("rmdir_if_exists", CallArgs::new().path(&dir)).unwrap_err();
        assert!(matches!(err.errno(), Some(Errno::ENOTEMPTY) | Some(Errno::EEXIST)));

        std::fs::remove_file(dir.join("keep")).expect("clear child");
        let removed = run("rmdir_if_exists", CallArgs::new().path(&dir)).expect("removed");
        assert!(removed.is_done());

        let absent = run("rmdir_if_exists", CallArgs::new().path(&dir)).expect("absent");
        assert_eq!(absent.tolerated_errno(), Some(ENOENT));
    }

    #[test]
    fn chdir_missing_fails() {
        let dir = scratch_path("dir_cd_missing");
        let err = run("chdir", CallArgs::new().path(&dir)).unwrap_err();
        assert_eq!(err.errno(), Some(ENOENT));
    }
}
