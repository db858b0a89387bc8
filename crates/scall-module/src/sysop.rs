//! `SysOp`: table-driven `Operation` implementation.

use nix::errno::Errno;

use scall_core::{CallArgs, Operation, Signature, Value};

/// Body of a single system call.
pub type SyscallFn = fn(&CallArgs) -> Result<Value, Errno>;

/// Const-constructible operation descriptor.
#[derive(Clone, Copy)]
pub struct SysOp {
    pub name: &'static str,
    pub signature: Signature,
    pub tolerates: &'static [Errno],
    pub restart: bool,
    pub body: SyscallFn,
}

impl SysOp {
    /// Plain operation: every errno fails.
    pub const fn plain(name: &'static str, signature: Signature, body: SyscallFn) -> Self {
        Self { name, signature, tolerates: &[], restart: false, body }
    }

    /// Same body, with `tolerates` absorbed into `Outcome::Tolerated`.
    pub const fn tolerant(
        name: &'static str,
        signature: Signature,
        tolerates: &'static [Errno],
        body: SyscallFn,
    ) -> Self {
        Self { name, signature, tolerates, restart: false, body }
    }

    /// Mark the call as safe to reissue after `EINTR`.
    pub const fn restartable(mut self) -> Self {
        self.restart = true;
        self
    }
}

impl Operation for SysOp {
    fn name(&self) -> &'static str {
        self.name
    }

    fn signature(&self) -> Signature {
        self.signature
    }

    fn tolerates(&self) -> &'static [Errno] {
        self.tolerates
    }

    fn restart_on_interrupt(&self) -> bool {
        self.restart
    }

    #[inline]
    fn syscall(&self, args: &CallArgs) -> Result<Value, Errno> {
        (self.body)(args)
    }
}

impl std::fmt::Debug for SysOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.describe())
    }
}
