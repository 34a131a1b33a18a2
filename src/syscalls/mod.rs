//! The numbered syscall surface.

pub mod file;
pub mod process;

pub use process::ELF_MAGIC;

use crate::error::KernelError;
use crate::kernel::Kernel;

/// Result of one syscall attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyscallOutcome {
    /// Finished with a return value (negative on error).
    Done(i32),
    /// Waiting on an interrupt-side event; re-issue the call after the
    /// next one.
    Blocked,
}

/// A decoded syscall, one variant per number.
pub enum Syscall<'a> {
    Halt { status: u8 },
    Execute { command: &'a [u8] },
    Read { fd: i32, buf: &'a mut [u8] },
    Write { fd: i32, buf: &'a [u8] },
    Open { name: &'a [u8] },
    Close { fd: i32 },
    Getargs { buf: &'a mut [u8], nbytes: i32 },
    Vidmap { screen_start: u32 },
    SetHandler { signum: i32 },
    Sigreturn,
}

impl Syscall<'_> {
    /// The wire number user programs trap with.
    pub fn number(&self) -> u32 {
        match self {
            Syscall::Halt { .. } => 1,
            Syscall::Execute { .. } => 2,
            Syscall::Read { .. } => 3,
            Syscall::Write { .. } => 4,
            Syscall::Open { .. } => 5,
            Syscall::Close { .. } => 6,
            Syscall::Getargs { .. } => 7,
            Syscall::Vidmap { .. } => 8,
            Syscall::SetHandler { .. } => 9,
            Syscall::Sigreturn => 10,
        }
    }
}

/// Run one syscall against the kernel. Errors flatten to `Done(-1)`, as
/// user programs only ever observe a sign.
pub fn dispatch(kernel: &mut Kernel, call: Syscall<'_>) -> SyscallOutcome {
    let number = call.number();
    let result = match call {
        Syscall::Halt { status } => kernel.halt(status).map(|_| 0),
        Syscall::Execute { command } => kernel.execute(command).map(|pid| pid.0 as i32),
        Syscall::Read { fd, buf } => match kernel.read(fd, buf) {
            Ok(Some(n)) => Ok(n as i32),
            Ok(None) => return SyscallOutcome::Blocked,
            Err(err) => Err(err),
        },
        Syscall::Write { fd, buf } => kernel.write(fd, buf).map(|n| n as i32),
        Syscall::Open { name } => kernel.open(name).map(|fd| fd as i32),
        Syscall::Close { fd } => kernel.close(fd).map(|_| 0),
        Syscall::Getargs { buf, nbytes } => kernel.getargs(buf, nbytes).map(|_| 0),
        Syscall::Vidmap { screen_start } => kernel.vidmap(screen_start).map(|addr| addr as i32),
        Syscall::SetHandler { .. } | Syscall::Sigreturn => Err(KernelError::Unsupported),
    };

    match result {
        Ok(value) => SyscallOutcome::Done(value),
        Err(err) => {
            log::debug!("syscall {} failed: {}", number, err);
            SyscallOutcome::Done(-1)
        }
    }
}
