//! Per-process address-space switching.
//!
//! The hardware tables are modeled exactly as the CPU would see them: one
//! page directory and one page table of raw 32-bit entries. The core
//! programs entries for the user window and the video page; everything
//! else is the identity-mapped kernel region set up once at construction.

use bitflags::bitflags;

use super::{
    shadow_phys, user_phys, FOUR_KB, FOUR_MB, USER_SLOT, VIDEO_ADDRESS, VIDEO_INDEX,
};

const TABLE_ENTRIES: usize = 1024;

bitflags! {
    /// x86 page directory/table entry bits used by the core.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PageFlags: u32 {
        const PRESENT    = 1 << 0;
        const READ_WRITE = 1 << 1;
        const USER       = 1 << 2;
        /// 4 MB page (directory entries only).
        const PAGE_4MB   = 1 << 7;
    }
}

/// The memory-mapping state of the machine: a page directory, the first
/// page table, and a count of translation-cache flushes. Every mapping
/// change must be followed by a flush before it can take effect.
pub struct AddressSpace {
    directory: [u32; TABLE_ENTRIES],
    table: [u32; TABLE_ENTRIES],
    tlb_flushes: u64,
}

impl AddressSpace {
    pub fn new() -> AddressSpace {
        let mut space = AddressSpace {
            directory: [PageFlags::READ_WRITE.bits(); TABLE_ENTRIES],
            table: [0; TABLE_ENTRIES],
            tlb_flushes: 0,
        };

        // Identity map the first 4 MB through the page table; the video
        // page and the per-session retained pages are user-visible.
        for i in 0..TABLE_ENTRIES {
            space.table[i] = (i as u32 * FOUR_KB) | PageFlags::READ_WRITE.bits();
        }
        for i in 0..4 {
            space.table[VIDEO_INDEX + i] |= (PageFlags::USER | PageFlags::PRESENT).bits();
        }

        // Directory slot 0 covers the page table; slot 1 is the kernel's
        // own 4 MB page.
        space.directory[0] = (PageFlags::READ_WRITE | PageFlags::PRESENT).bits();
        space.directory[1] =
            FOUR_MB | (PageFlags::PAGE_4MB | PageFlags::READ_WRITE | PageFlags::PRESENT).bits();

        space.flush_tlb();
        space
    }

    /// Install the flat 4 MB user mapping for `pid` at the fixed virtual
    /// base. Must run before any instruction of that process executes.
    pub fn map_process(&mut self, pid: usize) {
        let flags =
            PageFlags::PAGE_4MB | PageFlags::USER | PageFlags::READ_WRITE | PageFlags::PRESENT;
        self.directory[USER_SLOT] = user_phys(pid) | flags.bits();
        self.flush_tlb();
    }

    /// Retarget the video window for the session being rendered: the live
    /// page when that session is the displayed one, otherwise its
    /// retained page.
    pub fn map_console_window(&mut self, executing: usize, displayed: usize) {
        let phys = if executing == displayed {
            VIDEO_ADDRESS
        } else {
            shadow_phys(executing)
        };
        let flags = PageFlags::USER | PageFlags::READ_WRITE | PageFlags::PRESENT;
        self.table[VIDEO_INDEX] = phys | flags.bits();
        self.flush_tlb();
    }

    /// Point the video window back at the live display page.
    pub fn restore_console_window(&mut self) {
        let flags = PageFlags::USER | PageFlags::READ_WRITE | PageFlags::PRESENT;
        self.table[VIDEO_INDEX] = VIDEO_ADDRESS | flags.bits();
        self.flush_tlb();
    }

    fn flush_tlb(&mut self) {
        self.tlb_flushes += 1;
    }

    /// Raw directory entry for the user window.
    pub fn user_entry(&self) -> u32 {
        self.directory[USER_SLOT]
    }

    /// Raw table entry for the video window.
    pub fn video_entry(&self) -> u32 {
        self.table[VIDEO_INDEX]
    }

    pub fn tlb_flushes(&self) -> u64 {
        self.tlb_flushes
    }
}
