//! Process lifecycle: `execute` and `halt`.

use alloc::vec;

use crate::error::{KResult, KernelError};
use crate::fs::{FileOps, FileType};
use crate::kernel::Kernel;
use crate::memory;
use crate::process::{Pcb, PcbFlags, Pid, ARG_CAPACITY, MAX_PROCESSES, NAME_CAPACITY};
use crate::scheduler::DEFAULT_SHELL;

/// First four bytes of every loadable program image.
pub const ELF_MAGIC: [u8; 4] = [0x7F, b'E', b'L', b'F'];
/// Image offset of the little-endian entry-point word.
const ENTRY_OFFSET: usize = 24;

struct Command<'a> {
    name: &'a [u8],
    args: &'a [u8],
}

/// Split a raw command line into the program name and the argument
/// blob. Lines arriving from the console keep their terminator; strip
/// it first. A leading blank or an empty line is rejected outright.
fn parse_command(raw: &[u8]) -> KResult<Command<'_>> {
    let mut end = raw.len();
    while end > 0 && (raw[end - 1] == b'\n' || raw[end - 1] == b'\r') {
        end -= 1;
    }
    let raw = &raw[..end];

    if raw.is_empty() || raw[0] == b' ' {
        return Err(KernelError::InvalidCommand);
    }

    let split = raw.iter().position(|&b| b == b' ').unwrap_or(raw.len());
    let name = &raw[..split];
    if name.len() > NAME_CAPACITY {
        return Err(KernelError::InvalidCommand);
    }

    let mut args = &raw[split..];
    while let [b' ', rest @ ..] = args {
        args = rest;
    }
    if args.len() > ARG_CAPACITY {
        return Err(KernelError::InvalidCommand);
    }

    Ok(Command { name, args })
}

impl Kernel {
    /// Load and start a program on the executing session. Returns the
    /// new process id, with the CPU left at the program's entry point.
    pub fn execute(&mut self, command: &[u8]) -> KResult<Pid> {
        let parsed = parse_command(command)?;

        if self.pcbs.live as usize >= MAX_PROCESSES {
            return Err(KernelError::ProcessLimitExceeded);
        }

        let dentry = self.fs.lookup_by_name(parsed.name)?;
        if dentry.file_type != FileType::Regular {
            return Err(KernelError::NotExecutable);
        }

        let mut header = [0u8; ENTRY_OFFSET + 4];
        let got = self.fs.read_data(dentry.inode, 0, &mut header)?;
        if got < header.len() || header[..4] != ELF_MAGIC {
            return Err(KernelError::NotExecutable);
        }
        let entry = u32::from_le_bytes([
            header[ENTRY_OFFSET],
            header[ENTRY_OFFSET + 1],
            header[ENTRY_OFFSET + 2],
            header[ENTRY_OFFSET + 3],
        ]);

        // Pull in the whole image before claiming a pid so a failed
        // load leaves no half-created process behind.
        let size = self.fs.file_size(dentry.inode)? as usize;
        let mut image = vec![0u8; size].into_boxed_slice();
        self.fs.read_data(dentry.inode, 0, &mut image)?;

        let pid = self
            .pcbs
            .allocate()
            .ok_or(KernelError::ProcessLimitExceeded)?;

        let session_index = self.sessions.executing;
        let parent = self.sessions.session(session_index).pcb;

        let mut pcb = Pcb::new(pid, parent);
        pcb.name[..parsed.name.len()].copy_from_slice(parsed.name);
        pcb.name_len = parsed.name.len();
        pcb.args[..parsed.args.len()].copy_from_slice(parsed.args);
        pcb.arg_len = parsed.args.len();
        pcb.parent_ctx = self.cpu.capture();
        pcb.saved_esp0 = self.cpu.kernel_stack();
        pcb.image = image;
        if parsed.name == DEFAULT_SHELL {
            pcb.flags.insert(PcbFlags::IS_SHELL);
        }
        // A bootstrap shell inherits the execution point the scheduler
        // stashed when it found the session cold.
        if let Some(ctx) = self.sessions.session_mut(session_index).pending_boot.take() {
            pcb.user_ctx = ctx;
            pcb.flags.insert(PcbFlags::RESUME_PENDING);
        }

        self.pcbs.insert(pcb);
        self.pcbs.live += 1;

        let session = self.sessions.session_mut(session_index);
        session.pcb = Some(pid);
        session.num_programs += 1;

        self.mmu.map_process(pid.0);
        self.cpu.set_kernel_stack(memory::kernel_stack_top(pid.0));
        self.cpu.enter_user(entry);
        Ok(pid)
    }

    /// Voluntary exit with a user status.
    pub fn halt(&mut self, status: u8) -> KResult<()> {
        self.terminate(status as u32)
    }

    /// Tear down the executing process. The parent resumes with
    /// `status` in its result register; a session losing its last
    /// process gets a fresh shell in place instead.
    pub fn terminate(&mut self, status: u32) -> KResult<()> {
        let session_index = self.sessions.executing;
        let pid = self
            .sessions
            .session(session_index)
            .pcb
            .ok_or(KernelError::InvalidDescriptor)?;

        let (parent, parent_ctx, saved_esp0, had_rtc) = {
            let pcb = self.pcbs.get_mut(pid)?;
            let mut had_rtc = false;
            for entry in pcb.files.iter_mut() {
                if entry.is_busy() {
                    if entry.ops == FileOps::Rtc {
                        had_rtc = true;
                    }
                    entry.clear();
                }
            }
            (pcb.parent, pcb.parent_ctx, pcb.saved_esp0, had_rtc)
        };
        if had_rtc {
            self.rtc.close(session_index);
        }

        self.pcbs.release(pid);
        self.pcbs.live -= 1;

        let remaining = {
            let session = self.sessions.session_mut(session_index);
            session.num_programs -= 1;
            session.num_programs
        };

        if remaining == 0 {
            self.sessions.session_mut(session_index).pcb = None;
            log::info!("terminal {}: respawning shell", session_index);
            self.execute(DEFAULT_SHELL).map(|_| ())
        } else {
            let parent = parent.ok_or(KernelError::InvalidDescriptor)?;
            self.sessions.session_mut(session_index).pcb = Some(parent);
            self.mmu.map_process(parent.0);
            self.cpu.set_kernel_stack(saved_esp0);
            self.cpu.set_result(status);
            self.cpu.restore(&parent_ctx);
            Ok(())
        }
    }
}
