//! The kernel state structure and its interrupt-facing entry points.

use alloc::boxed::Box;

use crate::console::{self, Console};
use crate::drivers::RtcDevice;
use crate::error::{KResult, KernelError};
use crate::fs::FileSystem;
use crate::interrupts::{InterruptController, KEYBOARD_LINE, RTC_LINE, TIMER_LINE};
use crate::memory::AddressSpace;
use crate::process::{Pcb, PcbTable, Pid};
use crate::scheduler::{self, Cpu};
use crate::terminal::{SessionTable, SESSION_COUNT};

/// Every piece of mutable kernel state, initialized once at boot.
/// Operations take this structure (or references into it); nothing
/// lives in ambient globals.
pub struct Kernel {
    pub cpu: Cpu,
    pub mmu: AddressSpace,
    pub pcbs: PcbTable,
    pub sessions: SessionTable,
    pub console: Console,
    pub rtc: RtcDevice,
    pub fs: FileSystem,
    pub irq: Box<dyn InterruptController + Send>,
}

impl Kernel {
    /// Bring up the kernel around a filesystem image, unmasking the
    /// interrupt lines the core depends on.
    pub fn new(image: Box<[u8]>, mut irq: Box<dyn InterruptController + Send>) -> KResult<Kernel> {
        let fs = FileSystem::new(image)?;
        irq.enable(TIMER_LINE);
        irq.enable(KEYBOARD_LINE);
        irq.enable(RTC_LINE);
        log::info!("kernel up: {} directory entries", fs.dentry_count());
        Ok(Kernel {
            cpu: Cpu::new(),
            mmu: AddressSpace::new(),
            pcbs: PcbTable::new(),
            sessions: SessionTable::new(),
            console: Console::new(),
            rtc: RtcDevice::new(),
            fs,
            irq,
        })
    }

    /// Pid bound to the executing session, if a program is running there.
    pub fn current_pid(&self) -> Option<Pid> {
        self.sessions.current_pid()
    }

    pub(crate) fn current_pcb(&self) -> KResult<&Pcb> {
        let pid = self.current_pid().ok_or(KernelError::InvalidDescriptor)?;
        self.pcbs.get(pid)
    }

    pub(crate) fn current_pcb_mut(&mut self) -> KResult<&mut Pcb> {
        let pid = self.current_pid().ok_or(KernelError::InvalidDescriptor)?;
        self.pcbs.get_mut(pid)
    }

    /// Timer interrupt handler body.
    pub fn timer_tick(&mut self) {
        scheduler::timer_tick(self);
    }

    /// Real periodic-device interrupt: advance every session's virtual
    /// channel.
    pub fn rtc_tick(&mut self) {
        self.rtc.tick();
        self.irq.acknowledge(RTC_LINE);
    }

    /// Keyboard interrupt: feed one byte into the displayed session's
    /// line discipline and echo whatever it accepts.
    pub fn accept_input_char(&mut self, byte: u8) {
        let index = self.sessions.displayed;
        let session = self.sessions.session_mut(index);
        if let Some(echo) = session.buffer_char(byte) {
            console::write_char(self.console.live_mut(), &mut session.cursor, echo);
        }
        self.irq.acknowledge(KEYBOARD_LINE);
    }

    /// Hotkey path: put a different session's page on the display.
    /// Scheduling state is untouched.
    pub fn request_session_switch(&mut self, target: usize) -> KResult<()> {
        if target >= SESSION_COUNT {
            return Err(KernelError::InvalidCommand);
        }
        let old = self.sessions.displayed;
        if target == old {
            return Ok(());
        }
        self.console.save_into(&mut self.sessions.session_mut(old).shadow);
        self.console.load_from(&self.sessions.session(target).shadow);
        self.sessions.displayed = target;
        let executing = self.sessions.executing;
        self.mmu.map_console_window(executing, target);
        Ok(())
    }

    /// Render one byte on behalf of a session: onto the live page when
    /// that session is displayed, otherwise into its retained page.
    pub(crate) fn put_char(&mut self, index: usize, byte: u8) {
        if index == self.sessions.displayed {
            let session = self.sessions.session_mut(index);
            console::write_char(self.console.live_mut(), &mut session.cursor, byte);
        } else {
            self.sessions.session_mut(index).render_offscreen(byte);
        }
    }
}
