//! The policy wrapper applied to every invocation.
//!
//! ```text
//! invoke(op, args)
//!   1. signature check        → Err(Usage) before any syscall
//!   2. ErrnoScope::enter()     save caller's errno
//!   3. op.syscall(args)        exactly one call
//!        EINTR && restartable → reissue (still one call per attempt)
//!   4. classify               still inside the scope: logging and the
//!                              factory may touch errno
//!        Ok(v)                → Done(v)
//!        errno ∈ tolerates    → Tolerated(errno)
//!        otherwise            → Err(factory.make(op, errno, args))
//!   5. scope drop              caller's errno restored
//! ```

use crate::args::CallArgs;
use crate::error::{Error, FailureFactory, RecordFactory, UsageError};
use crate::errno::ErrnoScope;
use crate::operation::Operation;
use crate::outcome::{Outcome, Tolerated};
use crate::value::Value;
use crate::CallResult;

use nix::errno::Errno;

static RECORD_FACTORY: RecordFactory = RecordFactory;

/// Invocation policy knobs shared by all operations of one dispatcher.
#[derive(Clone, Copy)]
pub struct Policy<'a> {
    factory: &'a dyn FailureFactory,
    restart_eintr: bool,
}

impl<'a> Policy<'a> {
    pub fn new(factory: &'a dyn FailureFactory) -> Self {
        Self { factory, restart_eintr: true }
    }

    /// Global switch for restart-on-EINTR. Operations still have to opt in.
    pub fn restart_eintr(mut self, enabled: bool) -> Self {
        self.restart_eintr = enabled;
        self
    }

    pub fn factory(&self) -> &'a dyn FailureFactory {
        self.factory
    }
}

impl Default for Policy<'static> {
    fn default() -> Self {
        Policy::new(&RECORD_FACTORY)
    }
}

/// Reject calls whose argument kinds do not match the operation signature.
pub fn check_signature(op: &dyn Operation, args: &CallArgs) -> Result<(), UsageError> {
    let expected = op.signature();
    let matches = expected.len() == args.len()
        && expected.iter().zip(args.as_slice()).all(|(k, a)| *k == a.kind());
    if matches {
        Ok(())
    } else {
        Err(UsageError { op: op.name(), expected, got: args.kinds() })
    }
}

/// Run one operation under the error policy.
pub fn invoke(op: &dyn Operation, args: &CallArgs, policy: &Policy<'_>) -> CallResult {
    check_signature(op, args)?;

    let _scope = ErrnoScope::enter();
    let restart = policy.restart_eintr && op.restart_on_interrupt();
    let result = loop {
        match op.syscall(args) {
            Err(Errno::EINTR) if restart => {
                crate::ktrace!("{}: EINTR, restarting", op.name());
            }
            other => break other,
        }
    };

    classify(op, args, result, policy.factory)
}

fn classify(
    op: &dyn Operation,
    args: &CallArgs,
    result: Result<Value, Errno>,
    factory: &dyn FailureFactory,
) -> CallResult {
    match result {
        Ok(v) => Ok(Outcome::Done(v)),
        Err(errno) if op.tolerates().contains(&errno) => {
            crate::kdebug!("{}{}: tolerated {:?}", op.name(), args, errno);
            Ok(Outcome::Tolerated(Tolerated::new(op.name(), errno)))
        }
        Err(errno) => {
            crate::ktrace!("{}{}: failed {:?}", op.name(), args, errno);
            Err(factory.make(op.name(), errno, args))
        }
    }
}
