pub mod pic;

pub use pic::{InterruptController, IrqLine, SilentPic, KEYBOARD_LINE, RTC_LINE, TIMER_LINE};

use crate::kernel::Kernel;

/// Status a fault victim's parent observes, by convention one past the
/// largest value a process can pass to halt itself.
pub const FAULT_STATUS: u32 = 256;

/// Hardware trap classes. These are asynchronous faults, not syscall
/// errors: the faulting process is terminated, never the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    DivideError,
    Debug,
    NonMaskableInterrupt,
    Breakpoint,
    Overflow,
    BoundRangeExceeded,
    InvalidOpcode,
    DeviceNotAvailable,
    DoubleFault,
    CoprocessorSegmentOverrun,
    InvalidTss,
    SegmentNotPresent,
    StackFault,
    GeneralProtection,
    PageFault,
    Reserved,
    FloatingPointError,
    AlignmentCheck,
    MachineCheck,
    SimdFloatingPoint,
}

impl Fault {
    pub fn message(&self) -> &'static str {
        match self {
            Fault::DivideError => "Division Error Exception",
            Fault::Debug => "Debug Exception",
            Fault::NonMaskableInterrupt => "NMI Interrupt",
            Fault::Breakpoint => "Breakpoint Exception",
            Fault::Overflow => "Overflow Exception",
            Fault::BoundRangeExceeded => "Bound Range Exceeded Exception",
            Fault::InvalidOpcode => "Invalid Opcode Exception",
            Fault::DeviceNotAvailable => "Device Not Available Exception",
            Fault::DoubleFault => "Double Fault Exception",
            Fault::CoprocessorSegmentOverrun => "Coprocessor Segment Overrun",
            Fault::InvalidTss => "Invalid TSS Exception",
            Fault::SegmentNotPresent => "Segment Not Present",
            Fault::StackFault => "Stack Fault Exception",
            Fault::GeneralProtection => "General Protection Exception",
            Fault::PageFault => "Page Fault Exception",
            Fault::Reserved => "Reserved",
            Fault::FloatingPointError => "x87 FPU Floating Point Error",
            Fault::AlignmentCheck => "Alignment Check Exception",
            Fault::MachineCheck => "Machine Check Exception",
            Fault::SimdFloatingPoint => "SIMD Floating Point Exception",
        }
    }
}

impl core::fmt::Display for Fault {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.message())
    }
}

/// Trap entry point: squash the faulting process and hand control back
/// to its parent (or a fresh shell if it was the session root).
pub fn hardware_fault(kernel: &mut Kernel, fault: Fault) {
    log::error!("{}: squashing user program", fault);
    if kernel.terminate(FAULT_STATUS).is_err() {
        // Fault with no process on the executing session; nothing to
        // squash.
        log::warn!("{} with no running process", fault);
    }
}
