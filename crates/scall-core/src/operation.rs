//! The contract every registered primitive satisfies.

use nix::errno::Errno;

use crate::args::{ArgKind, CallArgs};
use crate::value::Value;

/// Positional argument kinds accepted by an operation.
pub type Signature = &'static [ArgKind];

/// One exposed OS primitive.
///
/// # Contract
///
/// - [`syscall`](Operation::syscall) performs exactly one underlying system
///   call per invocation. No loops over targets, no batches, no follow-up
///   calls on failure.
/// - Arguments mirror the OS primitive; [`signature`](Operation::signature)
///   declares them and the policy layer rejects anything else.
/// - On failure the body returns the errno read immediately after the call
///   (see [`crate::errno::check`]) and nothing else.
///
/// Implementations are stateless and shared across threads.
pub trait Operation: Send + Sync {
    /// Unique identifier, e.g. `"rmdir_if_exists"`.
    fn name(&self) -> &'static str;

    fn signature(&self) -> Signature;

    /// Errnos absorbed into `Outcome::Tolerated`. Empty for plain operations.
    fn tolerates(&self) -> &'static [Errno] {
        &[]
    }

    /// Whether an `EINTR` from this call may be restarted by the policy
    /// layer. Must stay `false` for calls that are not safe to reissue
    /// (`close`, `connect`).
    fn restart_on_interrupt(&self) -> bool {
        false
    }

    /// Issue the system call.
    fn syscall(&self, args: &CallArgs) -> Result<Value, Errno>;

    fn is_tolerant(&self) -> bool {
        !self.tolerates().is_empty()
    }

    /// One-line description: `name(kind, ...) tolerates [ERRNO, ...]`.
    fn describe(&self) -> String {
        let kinds: Vec<String> = self.signature().iter().map(|k| k.to_string()).collect();
        let mut s = format!("{}({})", self.name(), kinds.join(", "));
        if self.is_tolerant() {
            let tol: Vec<String> = self.tolerates().iter().map(|e| format!("{:?}", e)).collect();
            s.push_str(&format!(" tolerates [{}]", tol.join(", ")));
        }
        if self.restart_on_interrupt() {
            s.push_str(" restarts on EINTR");
        }
        s
    }
}
