//! trios: the process-management core of a three-terminal teaching
//! kernel.
//!
//! One CPU, three terminal sessions, at most six live processes. A
//! periodic timer rotates the CPU round robin across the sessions;
//! every process carries an eight-slot descriptor table dispatching to
//! the console, a read-only filesystem and a virtualized periodic
//! device. Hardware is consumed through narrow seams so the whole core
//! runs (and is tested) as ordinary code.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod console;
pub mod drivers;
pub mod error;
pub mod fs;
pub mod interrupts;
pub mod kernel;
pub mod memory;
pub mod process;
pub mod scheduler;
pub mod syscalls;
pub mod terminal;

pub use error::{KResult, KernelError};
pub use kernel::Kernel;

use alloc::boxed::Box;

use interrupts::{Fault, InterruptController};
use syscalls::{Syscall, SyscallOutcome};

/// The kernel cell platform interrupt handlers reach through. Embedders
/// that drive a `Kernel` directly never touch it.
static KERNEL: spin::Mutex<Option<Kernel>> = spin::Mutex::new(None);

/// Install a kernel into the global cell.
pub fn init(image: Box<[u8]>, irq: Box<dyn InterruptController + Send>) -> KResult<()> {
    let kernel = Kernel::new(image, irq)?;
    *KERNEL.lock() = Some(kernel);
    Ok(())
}

/// Run a closure against the installed kernel, if there is one.
pub fn with_kernel<R>(f: impl FnOnce(&mut Kernel) -> R) -> Option<R> {
    KERNEL.lock().as_mut().map(f)
}

pub fn timer_interrupt() {
    let _ = with_kernel(|kernel| kernel.timer_tick());
}

pub fn rtc_interrupt() {
    let _ = with_kernel(|kernel| kernel.rtc_tick());
}

pub fn keyboard_input(byte: u8) {
    let _ = with_kernel(|kernel| kernel.accept_input_char(byte));
}

pub fn session_hotkey(target: usize) {
    let _ = with_kernel(|kernel| kernel.request_session_switch(target));
}

pub fn fault(fault: Fault) {
    let _ = with_kernel(|kernel| interrupts::hardware_fault(kernel, fault));
}

pub fn syscall(call: Syscall<'_>) -> SyscallOutcome {
    with_kernel(|kernel| syscalls::dispatch(kernel, call)).unwrap_or(SyscallOutcome::Done(-1))
}
