/// An execution continuation: the point a process (or the kernel itself)
/// was running at when it last gave up the CPU. The scheduler stores one
/// per process and resumes it later; its contents are not inspectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecContext {
    eip: u32,
    esp: u32,
    ebp: u32,
}

impl ExecContext {
    /// An empty continuation, used for slots that have never run.
    pub fn empty() -> ExecContext {
        ExecContext { eip: 0, esp: 0, ebp: 0 }
    }
}

/// The single hardware execution context. Tracks the current instruction
/// and stack pointers, the result register a resumed caller observes, and
/// the privileged stack target installed for the next trap entry.
pub struct Cpu {
    eip: u32,
    esp: u32,
    ebp: u32,
    result: u32,
    esp0: u32,
}

impl Cpu {
    pub fn new() -> Cpu {
        Cpu {
            eip: 0,
            esp: 0,
            ebp: 0,
            result: 0,
            esp0: crate::memory::kernel_stack_top(0),
        }
    }

    /// Snapshot the current execution point.
    pub fn capture(&self) -> ExecContext {
        ExecContext {
            eip: self.eip,
            esp: self.esp,
            ebp: self.ebp,
        }
    }

    /// Transfer control to a previously captured continuation.
    pub fn restore(&mut self, ctx: &ExecContext) {
        self.eip = ctx.eip;
        self.esp = ctx.esp;
        self.ebp = ctx.ebp;
    }

    /// Transfer control to a fresh user program: instruction pointer at
    /// its declared entry, stack at the top of the user window.
    pub fn enter_user(&mut self, entry: u32) {
        self.eip = entry;
        self.esp = crate::memory::USER_STACK_TOP;
        self.ebp = crate::memory::USER_STACK_TOP;
    }

    pub fn instruction_pointer(&self) -> u32 {
        self.eip
    }

    /// Value observed by the caller most recently resumed (halt status).
    pub fn result(&self) -> u32 {
        self.result
    }

    pub fn set_result(&mut self, value: u32) {
        self.result = value;
    }

    /// Privileged stack pointer used on the next interrupt/syscall entry.
    pub fn kernel_stack(&self) -> u32 {
        self.esp0
    }

    pub fn set_kernel_stack(&mut self, top: u32) {
        self.esp0 = top;
    }
}
