//! Terminal session registry.
//!
//! Three sessions exist for the lifetime of the kernel. The displayed
//! session (the one the keyboard echoes into) and the executing session
//! (the one whose process owns the CPU) are tracked independently.

use crate::console::{self, Cursor, VideoPage, VIDEO_PAGE};
use crate::process::Pid;
use crate::scheduler::context::ExecContext;

pub const SESSION_COUNT: usize = 3;
pub const LINE_CAPACITY: usize = 128;

pub struct Session {
    /// Foreground process for this session, if a shell has been started.
    pub pcb: Option<Pid>,
    pub cursor: Cursor,
    buffer: [u8; LINE_CAPACITY],
    buffer_len: usize,
    /// Raised by the line discipline on enter; unblocks a pending read.
    pub enter_seen: bool,
    /// Live processes spawned within this session.
    pub num_programs: u32,
    /// Retained video page shown while this session is off screen.
    pub shadow: VideoPage,
    /// Kernel execution point stashed when the scheduler found this
    /// session cold; consumed by the bootstrap shell's PCB.
    pub pending_boot: Option<ExecContext>,
}

impl Session {
    fn new() -> Session {
        let mut shadow = [0u8; VIDEO_PAGE];
        console::clear_page(&mut shadow);
        Session {
            pcb: None,
            cursor: Cursor::origin(),
            buffer: [0; LINE_CAPACITY],
            buffer_len: 0,
            enter_seen: false,
            num_programs: 0,
            shadow,
            pending_boot: None,
        }
    }

    pub fn line_len(&self) -> usize {
        self.buffer_len
    }

    /// Render a byte into this session's retained page while it is off
    /// screen.
    pub fn render_offscreen(&mut self, byte: u8) {
        console::write_char(&mut self.shadow, &mut self.cursor, byte);
    }

    /// Feed one accepted key into the line buffer. Returns the byte to
    /// echo, if any. `\n` always fits (stored at the current length,
    /// capped to the buffer), backspace erases, anything else is kept
    /// only while a byte of room remains for the newline.
    pub fn buffer_char(&mut self, byte: u8) -> Option<u8> {
        match byte {
            b'\n' => {
                let at = self.buffer_len.min(LINE_CAPACITY - 1);
                self.buffer[at] = b'\n';
                self.enter_seen = true;
                Some(b'\n')
            }
            0x08 => {
                if self.buffer_len == 0 {
                    return None;
                }
                self.buffer_len -= 1;
                self.buffer[self.buffer_len] = 0;
                Some(0x08)
            }
            _ => {
                if self.buffer_len < LINE_CAPACITY - 1 {
                    self.buffer[self.buffer_len] = byte;
                    self.buffer_len += 1;
                    Some(byte)
                } else {
                    None
                }
            }
        }
    }

    /// Drain the submitted line (including its trailing newline) into
    /// `buf`, clearing the buffer and the enter flag. Only meaningful
    /// once `enter_seen` is raised.
    pub fn take_line(&mut self, buf: &mut [u8]) -> usize {
        let line_len = (self.buffer_len + 1).min(LINE_CAPACITY);
        let copied = line_len.min(buf.len());
        buf[..copied].copy_from_slice(&self.buffer[..copied]);

        self.buffer = [0; LINE_CAPACITY];
        self.buffer_len = 0;
        self.enter_seen = false;
        copied
    }
}

pub struct SessionTable {
    sessions: [Session; SESSION_COUNT],
    /// Session whose retained page is on the display.
    pub displayed: usize,
    /// Session whose process currently owns the CPU.
    pub executing: usize,
}

impl SessionTable {
    pub fn new() -> SessionTable {
        SessionTable {
            sessions: core::array::from_fn(|_| Session::new()),
            displayed: 0,
            executing: 0,
        }
    }

    pub fn session(&self, index: usize) -> &Session {
        &self.sessions[index]
    }

    pub fn session_mut(&mut self, index: usize) -> &mut Session {
        &mut self.sessions[index]
    }

    pub fn executing_session(&self) -> &Session {
        &self.sessions[self.executing]
    }

    pub fn executing_session_mut(&mut self) -> &mut Session {
        let index = self.executing;
        &mut self.sessions[index]
    }

    pub fn displayed_session_mut(&mut self) -> &mut Session {
        let index = self.displayed;
        &mut self.sessions[index]
    }

    /// Pid bound to the executing session, if any.
    pub fn current_pid(&self) -> Option<Pid> {
        self.executing_session().pcb
    }
}
