//! Round-robin scheduling across the terminal sessions.
//!
//! The timer interrupt drives a fixed 0 -> 1 -> 2 -> 0 rotation. Each
//! session's foreground process gets one slot per cycle; a session that
//! has never run anything gets its root shell started on its first slot.

pub mod context;

pub use context::{Cpu, ExecContext};

use crate::interrupts::TIMER_LINE;
use crate::kernel::Kernel;
use crate::memory;
use crate::process::PcbFlags;
use crate::terminal::SESSION_COUNT;

/// Command launched on a session's first scheduling slot.
pub const DEFAULT_SHELL: &[u8] = b"shell";

/// Timer interrupt entry point. Acknowledges the timer line on every
/// exit path.
pub fn timer_tick(kernel: &mut Kernel) {
    let exec = kernel.sessions.executing;

    // Cold session: stash where the kernel is now, bring the session on
    // screen and start its root shell in place. No rotation this tick.
    if kernel.sessions.session(exec).pcb.is_none() {
        let here = kernel.cpu.capture();
        kernel.sessions.session_mut(exec).pending_boot = Some(here);
        let _ = kernel.request_session_switch(exec);
        log::info!("terminal {}: starting shell", exec);
        kernel.irq.acknowledge(TIMER_LINE);
        if kernel.execute(DEFAULT_SHELL).is_err() {
            log::error!("terminal {}: shell failed to start", exec);
        }
        return;
    }

    // Snapshot the outgoing process so its slot can resume later.
    let snapshot = kernel.cpu.capture();
    if let Some(pid) = kernel.sessions.session(exec).pcb {
        if let Ok(pcb) = kernel.pcbs.get_mut(pid) {
            pcb.user_ctx = snapshot;
        }
    }

    let next = (exec + 1) % SESSION_COUNT;
    kernel.sessions.executing = next;

    let Some(pid) = kernel.sessions.session(next).pcb else {
        // Empty target; its own slot will bootstrap it.
        kernel.irq.acknowledge(TIMER_LINE);
        return;
    };

    // Retarget the video window for the incoming session, install its
    // address space and kernel stack, then hand over the CPU.
    let displayed = kernel.sessions.displayed;
    kernel.mmu.map_console_window(next, displayed);
    kernel.mmu.map_process(pid.0);
    kernel.cpu.set_kernel_stack(memory::kernel_stack_top(pid.0));

    if let Ok(pcb) = kernel.pcbs.get_mut(pid) {
        pcb.flags.remove(PcbFlags::RESUME_PENDING);
        let ctx = pcb.user_ctx;
        kernel.cpu.restore(&ctx);
    }
    kernel.irq.acknowledge(TIMER_LINE);
}
