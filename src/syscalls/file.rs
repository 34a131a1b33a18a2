//! Descriptor-table operations: read, write, open, close, getargs and
//! vidmap.

use crate::error::{KResult, KernelError};
use crate::fs::{FdEntry, FdState, FileOps, FileType};
use crate::kernel::Kernel;
use crate::memory::{USER_BASE, USER_SPAN};
use crate::process::MAX_OPEN_FILES;

impl Kernel {
    fn descriptor(&self, fd: i32) -> KResult<FdEntry> {
        let index = usize::try_from(fd).map_err(|_| KernelError::InvalidDescriptor)?;
        if index >= MAX_OPEN_FILES {
            return Err(KernelError::InvalidDescriptor);
        }
        let entry = self.current_pcb()?.files[index];
        if !entry.is_busy() {
            return Err(KernelError::InvalidDescriptor);
        }
        Ok(entry)
    }

    fn advance_cursor(&mut self, fd: i32, by: u32) -> KResult<()> {
        let pcb = self.current_pcb_mut()?;
        pcb.files[fd as usize].pos += by;
        Ok(())
    }

    /// Read through a descriptor. `Ok(None)` means the call blocks; the
    /// caller re-issues it once the awaited event fires.
    pub fn read(&mut self, fd: i32, buf: &mut [u8]) -> KResult<Option<usize>> {
        // Descriptor 1 is the output half of the console pair.
        if fd == 1 {
            return Err(KernelError::InvalidDescriptor);
        }
        let session_index = self.sessions.executing;
        let entry = self.descriptor(fd)?;

        match entry.ops {
            FileOps::Terminal => {
                let session = self.sessions.session_mut(session_index);
                if !session.enter_seen {
                    return Ok(None);
                }
                Ok(Some(session.take_line(buf)))
            }
            FileOps::Rtc => {
                if self.rtc.consume_tick(session_index) {
                    Ok(Some(0))
                } else {
                    Ok(None)
                }
            }
            FileOps::Regular => {
                let n = self.fs.read_data(entry.inode, entry.pos, buf)?;
                self.advance_cursor(fd, n as u32)?;
                Ok(Some(n))
            }
            FileOps::Directory => match self.fs.lookup_by_index(entry.pos) {
                Ok(dentry) => {
                    let name = dentry.name_bytes();
                    let n = name.len().min(buf.len());
                    buf[..n].copy_from_slice(&name[..n]);
                    self.advance_cursor(fd, 1)?;
                    Ok(Some(n))
                }
                // Past the last entry; enumeration is over.
                Err(_) => Ok(Some(0)),
            },
            FileOps::Null => Err(KernelError::InvalidDescriptor),
        }
    }

    /// Write through a descriptor. Never blocks.
    pub fn write(&mut self, fd: i32, buf: &[u8]) -> KResult<usize> {
        // Descriptor 0 is the input half of the console pair.
        if fd == 0 {
            return Err(KernelError::InvalidDescriptor);
        }
        let session_index = self.sessions.executing;
        let entry = self.descriptor(fd)?;

        match entry.ops {
            FileOps::Terminal => {
                for &byte in buf {
                    self.put_char(session_index, byte);
                }
                Ok(buf.len())
            }
            FileOps::Rtc => {
                if buf.len() != 4 {
                    return Err(KernelError::InvalidCommand);
                }
                let freq = u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
                self.rtc.set_frequency(session_index, freq)?;
                Ok(4)
            }
            // The filesystem is read only.
            FileOps::Regular | FileOps::Directory | FileOps::Null => {
                Err(KernelError::Unsupported)
            }
        }
    }

    /// Bind a named resource to the lowest free descriptor slot.
    pub fn open(&mut self, name: &[u8]) -> KResult<usize> {
        let dentry = self.fs.lookup_by_name(name)?;
        let session_index = self.sessions.executing;

        let ops = match dentry.file_type {
            FileType::RtcDevice => FileOps::Rtc,
            FileType::Directory => FileOps::Directory,
            FileType::Regular => FileOps::Regular,
        };
        let inode = match dentry.file_type {
            FileType::Regular => dentry.inode,
            _ => 0,
        };

        let slot = {
            let pcb = self.current_pcb_mut()?;
            let slot = pcb
                .files
                .iter()
                .position(|entry| !entry.is_busy())
                .ok_or(KernelError::InvalidDescriptor)?;
            pcb.files[slot] = FdEntry {
                ops,
                inode,
                pos: 0,
                state: FdState::Busy,
            };
            slot
        };

        if ops == FileOps::Rtc {
            self.rtc.open(session_index);
        }
        Ok(slot)
    }

    /// Release a descriptor. Slots 0 and 1 are pinned open for the
    /// process's lifetime.
    pub fn close(&mut self, fd: i32) -> KResult<()> {
        let index = usize::try_from(fd).map_err(|_| KernelError::InvalidDescriptor)?;
        if index < 2 || index >= MAX_OPEN_FILES {
            return Err(KernelError::InvalidDescriptor);
        }
        let session_index = self.sessions.executing;

        let ops = {
            let pcb = self.current_pcb_mut()?;
            let entry = &mut pcb.files[index];
            if !entry.is_busy() {
                return Err(KernelError::InvalidDescriptor);
            }
            let ops = entry.ops;
            entry.clear();
            ops
        };

        if ops == FileOps::Rtc {
            self.rtc.close(session_index);
        }
        Ok(())
    }

    /// Copy the argument blob recorded at creation, truncated to the
    /// caller's buffer and NUL terminated when there is room.
    pub fn getargs(&mut self, buf: &mut [u8], nbytes: i32) -> KResult<usize> {
        let nbytes = usize::try_from(nbytes).map_err(|_| KernelError::NoArguments)?;
        if nbytes == 0 {
            return Err(KernelError::NoArguments);
        }
        let pcb = self.current_pcb()?;
        if pcb.arg_len == 0 {
            return Err(KernelError::NoArguments);
        }
        let copied = pcb.arg_len.min(nbytes).min(buf.len());
        buf[..copied].copy_from_slice(&pcb.args[..copied]);
        if copied < nbytes && copied < buf.len() {
            buf[copied] = 0;
        }
        Ok(copied)
    }

    /// Map the console window into user-visible space. The caller's
    /// pointer must sit inside its own 4 MB window; the fixed virtual
    /// base of the mapping comes back.
    pub fn vidmap(&mut self, screen_start: u32) -> KResult<u32> {
        if !(USER_BASE..USER_BASE + USER_SPAN).contains(&screen_start) {
            return Err(KernelError::InvalidAddress);
        }
        let executing = self.sessions.executing;
        let displayed = self.sessions.displayed;
        self.mmu.map_console_window(executing, displayed);
        Ok(USER_BASE + USER_SPAN)
    }
}
