/// The operation set a descriptor dispatches through, one variant per
/// device kind. `Null` is what a freed slot carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOps {
    Null,
    Terminal,
    Directory,
    Regular,
    Rtc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FdState {
    Free,
    Busy,
}

/// One slot of a process's 8-entry descriptor table.
#[derive(Debug, Clone, Copy)]
pub struct FdEntry {
    pub ops: FileOps,
    /// Backing inode for regular files; 0 otherwise.
    pub inode: u32,
    /// Cursor into the backing resource (byte offset, or dentry index
    /// for directories).
    pub pos: u32,
    pub state: FdState,
}

impl FdEntry {
    pub const fn closed() -> FdEntry {
        FdEntry {
            ops: FileOps::Null,
            inode: 0,
            pos: 0,
            state: FdState::Free,
        }
    }

    /// A session input/output slot, bound to the console from creation.
    pub const fn terminal() -> FdEntry {
        FdEntry {
            ops: FileOps::Terminal,
            inode: 0,
            pos: 0,
            state: FdState::Busy,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.state == FdState::Busy
    }

    /// Return the slot to its freed state with a null operation set.
    pub fn clear(&mut self) {
        *self = FdEntry::closed();
    }
}
