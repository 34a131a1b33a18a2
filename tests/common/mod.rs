//! Shared fixtures: an in-memory filesystem image builder and a booted
//! kernel around it.

#![allow(dead_code)]

use trios::interrupts::SilentPic;
use trios::syscalls::ELF_MAGIC;
use trios::Kernel;

const BLOCK: usize = 4096;

pub const SHELL_ENTRY: u32 = 0x0804_8100;
pub const COUNTER_ENTRY: u32 = 0x0804_8200;
pub const FISH_ENTRY: u32 = 0x0804_8300;

/// A minimal loadable image: magic, entry word, nothing else of note.
pub fn program(entry: u32) -> Vec<u8> {
    let mut image = vec![0u8; 48];
    image[..4].copy_from_slice(&ELF_MAGIC);
    image[24..28].copy_from_slice(&entry.to_le_bytes());
    image
}

/// Builds a boot-block filesystem image entry by entry. The root
/// directory entry is always present.
pub struct ImageBuilder {
    entries: Vec<(Vec<u8>, u32, Option<Vec<u8>>)>,
}

impl ImageBuilder {
    pub fn new() -> ImageBuilder {
        ImageBuilder {
            entries: vec![(b".".to_vec(), 1, None)],
        }
    }

    pub fn file(mut self, name: &str, data: Vec<u8>) -> ImageBuilder {
        self.entries.push((name.as_bytes().to_vec(), 2, Some(data)));
        self
    }

    pub fn device(mut self, name: &str) -> ImageBuilder {
        self.entries.push((name.as_bytes().to_vec(), 0, None));
        self
    }

    pub fn build(self) -> Box<[u8]> {
        let mut inodes: Vec<Vec<u8>> = Vec::new();
        let mut data_blocks: Vec<Vec<u8>> = Vec::new();
        let mut dentries: Vec<(Vec<u8>, u32, u32)> = Vec::new();

        for (name, kind, data) in &self.entries {
            let inode = if let Some(data) = data {
                let index = inodes.len() as u32;
                let mut block = vec![0u8; BLOCK];
                block[..4].copy_from_slice(&(data.len() as u32).to_le_bytes());
                for (i, chunk) in data.chunks(BLOCK).enumerate() {
                    let b = data_blocks.len() as u32;
                    block[4 + i * 4..8 + i * 4].copy_from_slice(&b.to_le_bytes());
                    let mut payload = vec![0u8; BLOCK];
                    payload[..chunk.len()].copy_from_slice(chunk);
                    data_blocks.push(payload);
                }
                inodes.push(block);
                index
            } else {
                0
            };
            dentries.push((name.clone(), *kind, inode));
        }

        let total = 1 + inodes.len() + data_blocks.len();
        let mut image = vec![0u8; total * BLOCK];
        image[..4].copy_from_slice(&(dentries.len() as u32).to_le_bytes());
        image[4..8].copy_from_slice(&(inodes.len() as u32).to_le_bytes());
        image[8..12].copy_from_slice(&(data_blocks.len() as u32).to_le_bytes());
        for (i, (name, kind, inode)) in dentries.iter().enumerate() {
            let base = 64 * (i + 1);
            image[base..base + name.len()].copy_from_slice(name);
            image[base + 32..base + 36].copy_from_slice(&kind.to_le_bytes());
            image[base + 36..base + 40].copy_from_slice(&inode.to_le_bytes());
        }
        for (i, block) in inodes.iter().enumerate() {
            let base = (1 + i) * BLOCK;
            image[base..base + BLOCK].copy_from_slice(block);
        }
        for (i, block) in data_blocks.iter().enumerate() {
            let base = (1 + inodes.len() + i) * BLOCK;
            image[base..base + BLOCK].copy_from_slice(block);
        }
        image.into_boxed_slice()
    }
}

/// A kernel over the stock test image: a shell, two other programs, a
/// couple of plain files and the periodic device.
pub fn standard_kernel() -> Kernel {
    let image = ImageBuilder::new()
        .device("rtc")
        .file("shell", program(SHELL_ENTRY))
        .file("counter", program(COUNTER_ENTRY))
        .file("fish", program(FISH_ENTRY))
        .file("frame0.txt", b"Have you seen this fish?".to_vec())
        .file("verylarge.txt", vec![b'z'; 5000])
        .build();
    Kernel::new(image, Box::new(SilentPic)).expect("valid image")
}

/// Drive timer ticks until all three sessions run a shell. Boot takes
/// two ticks per session after the first (one to rotate in, one to
/// bootstrap).
pub fn boot_all(kernel: &mut Kernel) {
    for _ in 0..5 {
        kernel.timer_tick();
    }
}

pub fn type_line(kernel: &mut Kernel, line: &str) {
    for byte in line.bytes() {
        kernel.accept_input_char(byte);
    }
}
