pub mod paging;

pub use paging::{AddressSpace, PageFlags};

pub const FOUR_KB: u32 = 0x1000;
pub const EIGHT_KB: u32 = 0x2000;
pub const FOUR_MB: u32 = 0x40_0000;
pub const EIGHT_MB: u32 = 0x80_0000;

/// Fixed virtual base of the single 4 MB user mapping (128 MB).
pub const USER_BASE: u32 = 0x0800_0000;
/// Size of every user address space.
pub const USER_SPAN: u32 = FOUR_MB;
/// Where program images are loaded inside the user window.
pub const USER_LOAD_ADDR: u32 = 0x0804_8000;
/// Initial user stack pointer, at the very top of the user window.
pub const USER_STACK_TOP: u32 = USER_BASE + USER_SPAN - 4;

/// Physical address of the live text-mode video page.
pub const VIDEO_ADDRESS: u32 = 0xB8000;
/// Page-table slot covering the video page.
pub const VIDEO_INDEX: usize = 0xB8;
/// Page-directory slot covering the user window (128 MB / 4 MB).
pub const USER_SLOT: usize = 32;

/// Physical base of the 4 MB region backing a process.
/// Kernel memory ends at 8 MB; user regions are stacked after it by pid.
pub const fn user_phys(pid: usize) -> u32 {
    EIGHT_MB + pid as u32 * FOUR_MB
}

/// Top of the per-process kernel stack, just below the end of kernel memory.
pub const fn kernel_stack_top(pid: usize) -> u32 {
    EIGHT_MB - pid as u32 * EIGHT_KB
}

/// Physical base of a session's retained (off-screen) video page.
pub const fn shadow_phys(session: usize) -> u32 {
    VIDEO_ADDRESS + (session as u32 + 1) * FOUR_KB
}
