//! Process control blocks and the fixed-capacity process table.

use alloc::boxed::Box;
use bit_field::BitField;
use bitflags::bitflags;

use crate::error::{KResult, KernelError};
use crate::fs::FdEntry;
use crate::memory::USER_LOAD_ADDR;
use crate::scheduler::context::ExecContext;

pub const MAX_PROCESSES: usize = 6;
pub const MAX_OPEN_FILES: usize = 8;
pub const NAME_CAPACITY: usize = 32;
pub const ARG_CAPACITY: usize = 40;

/// Process id, an index into the process table. Valid only while the
/// corresponding slot is in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pid(pub usize);

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PcbFlags: u8 {
        /// Root of a terminal session.
        const IS_SHELL = 1 << 0;
        /// Preempted (or bootstrapped) before ever running; the saved
        /// user context must be consumed on the next schedule.
        const RESUME_PENDING = 1 << 1;
    }
}

/// Process control block: one per live process.
pub struct Pcb {
    pub pid: Pid,
    /// The process that issued the `execute` creating this one. Absent
    /// for a session's bootstrap shell. Back-reference only; a child
    /// never keeps its parent alive.
    pub parent: Option<Pid>,
    /// The caller's execution point at creation; `halt` resumes it.
    pub parent_ctx: ExecContext,
    /// This process's execution point at its last preemption.
    pub user_ctx: ExecContext,
    /// Privileged stack target in force when this process was created,
    /// restored when it halts.
    pub saved_esp0: u32,
    pub files: [FdEntry; MAX_OPEN_FILES],
    pub name: [u8; NAME_CAPACITY],
    pub name_len: usize,
    pub args: [u8; ARG_CAPACITY],
    pub arg_len: usize,
    pub flags: PcbFlags,
    /// The loaded program image.
    pub image: Box<[u8]>,
}

impl Pcb {
    pub fn new(pid: Pid, parent: Option<Pid>) -> Pcb {
        let mut files = [FdEntry::closed(); MAX_OPEN_FILES];
        // Slots 0/1 are the session's input/output, open from birth.
        files[0] = FdEntry::terminal();
        files[1] = FdEntry::terminal();

        Pcb {
            pid,
            parent,
            parent_ctx: ExecContext::empty(),
            user_ctx: ExecContext::empty(),
            saved_esp0: 0,
            files,
            name: [0; NAME_CAPACITY],
            name_len: 0,
            args: [0; ARG_CAPACITY],
            arg_len: 0,
            flags: PcbFlags::empty(),
            image: Box::new([]),
        }
    }

    pub fn name_bytes(&self) -> &[u8] {
        &self.name[..self.name_len]
    }

    pub fn is_shell(&self) -> bool {
        self.flags.contains(PcbFlags::IS_SHELL)
    }

    /// Byte of the loaded image as seen at a user virtual address. The
    /// image sits at the fixed load address inside the user window.
    pub fn user_byte(&self, addr: u32) -> Option<u8> {
        let offset = addr.checked_sub(USER_LOAD_ADDR)? as usize;
        self.image.get(offset).copied()
    }
}

/// Fixed-size table of PCB slots indexed by pid, plus the allocation
/// bitmap and the global live-process count.
pub struct PcbTable {
    slots: [Option<Pcb>; MAX_PROCESSES],
    in_use: u8,
    /// Live processes across all sessions, capped at MAX_PROCESSES.
    pub live: u32,
}

impl PcbTable {
    pub fn new() -> PcbTable {
        PcbTable {
            slots: core::array::from_fn(|_| None),
            in_use: 0,
            live: 0,
        }
    }

    /// Claim the lowest free pid. The slot stays empty until `insert`.
    pub fn allocate(&mut self) -> Option<Pid> {
        for i in 0..MAX_PROCESSES {
            if !self.in_use.get_bit(i) {
                self.in_use.set_bit(i, true);
                return Some(Pid(i));
            }
        }
        None
    }

    pub fn insert(&mut self, pcb: Pcb) {
        let pid = pcb.pid;
        debug_assert!(self.in_use.get_bit(pid.0));
        self.slots[pid.0] = Some(pcb);
    }

    /// Drop a process and free its pid for immediate reuse.
    pub fn release(&mut self, pid: Pid) {
        self.slots[pid.0] = None;
        self.in_use.set_bit(pid.0, false);
    }

    pub fn is_live(&self, pid: Pid) -> bool {
        pid.0 < MAX_PROCESSES && self.in_use.get_bit(pid.0)
    }

    pub fn get(&self, pid: Pid) -> KResult<&Pcb> {
        self.slots
            .get(pid.0)
            .and_then(|slot| slot.as_ref())
            .ok_or(KernelError::InvalidDescriptor)
    }

    pub fn get_mut(&mut self, pid: Pid) -> KResult<&mut Pcb> {
        self.slots
            .get_mut(pid.0)
            .and_then(|slot| slot.as_mut())
            .ok_or(KernelError::InvalidDescriptor)
    }
}
