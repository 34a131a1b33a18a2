//! Read-only boot-block filesystem.
//!
//! Image layout: a 4 KB boot block (64-byte header, then up to 63
//! 64-byte directory entries), `inode_count` 4 KB inodes (length followed
//! by data-block indices), then 4 KB data blocks. Everything is
//! little-endian.

use alloc::boxed::Box;

use crate::error::{KResult, KernelError};

pub const BLOCK_SIZE: usize = 4096;
pub const ENTRY_SIZE: usize = 64;
pub const MAX_NAME_LENGTH: usize = 32;
pub const MAX_DENTRIES: usize = 63;
/// Block pointers an inode block can hold after its length word.
pub const MAX_FILE_BLOCKS: usize = BLOCK_SIZE / 4 - 1;

/// Resource kinds a directory entry can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    RtcDevice,
    Directory,
    Regular,
}

impl FileType {
    fn from_raw(raw: u32) -> Option<FileType> {
        match raw {
            0 => Some(FileType::RtcDevice),
            1 => Some(FileType::Directory),
            2 => Some(FileType::Regular),
            _ => None,
        }
    }
}

/// One directory entry: a fixed-width name, a kind, and a backing inode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dentry {
    pub name: [u8; MAX_NAME_LENGTH],
    pub file_type: FileType,
    pub inode: u32,
}

impl Dentry {
    /// Name bytes up to the first NUL.
    pub fn name_bytes(&self) -> &[u8] {
        let len = self
            .name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(MAX_NAME_LENGTH);
        &self.name[..len]
    }
}

/// A parsed, immutable filesystem image.
pub struct FileSystem {
    image: Box<[u8]>,
}

impl FileSystem {
    pub fn new(image: Box<[u8]>) -> KResult<FileSystem> {
        if image.len() < BLOCK_SIZE {
            return Err(KernelError::NotFound);
        }
        let fs = FileSystem { image };
        let blocks_needed = 1 + fs.inode_count() as usize + fs.data_block_count() as usize;
        if fs.image.len() < blocks_needed * BLOCK_SIZE {
            return Err(KernelError::NotFound);
        }
        Ok(fs)
    }

    fn u32_at(&self, offset: usize) -> u32 {
        let bytes = [
            self.image[offset],
            self.image[offset + 1],
            self.image[offset + 2],
            self.image[offset + 3],
        ];
        u32::from_le_bytes(bytes)
    }

    pub fn dentry_count(&self) -> u32 {
        self.u32_at(0).min(MAX_DENTRIES as u32)
    }

    pub fn inode_count(&self) -> u32 {
        self.u32_at(4)
    }

    pub fn data_block_count(&self) -> u32 {
        self.u32_at(8)
    }

    fn dentry_at(&self, index: usize) -> KResult<Dentry> {
        let base = ENTRY_SIZE * (index + 1);
        let mut name = [0u8; MAX_NAME_LENGTH];
        name.copy_from_slice(&self.image[base..base + MAX_NAME_LENGTH]);
        let file_type = FileType::from_raw(self.u32_at(base + MAX_NAME_LENGTH))
            .ok_or(KernelError::NotFound)?;
        let inode = self.u32_at(base + MAX_NAME_LENGTH + 4);
        Ok(Dentry {
            name,
            file_type,
            inode,
        })
    }

    /// Resolve a name to its directory entry.
    pub fn lookup_by_name(&self, name: &[u8]) -> KResult<Dentry> {
        if name.is_empty() || name.len() > MAX_NAME_LENGTH {
            return Err(KernelError::NotFound);
        }
        for i in 0..self.dentry_count() as usize {
            let dentry = self.dentry_at(i)?;
            if dentry.name_bytes() == name {
                return Ok(dentry);
            }
        }
        Err(KernelError::NotFound)
    }

    /// Directory entry at a position, for directory-style enumeration.
    pub fn lookup_by_index(&self, index: u32) -> KResult<Dentry> {
        if index >= self.dentry_count() {
            return Err(KernelError::NotFound);
        }
        self.dentry_at(index as usize)
    }

    /// Length in bytes of the file behind an inode.
    pub fn file_size(&self, inode: u32) -> KResult<u32> {
        if inode >= self.inode_count() {
            return Err(KernelError::NotFound);
        }
        Ok(self.u32_at(self.inode_base(inode)))
    }

    fn inode_base(&self, inode: u32) -> usize {
        BLOCK_SIZE * (1 + inode as usize)
    }

    fn data_block_base(&self, block: u32) -> usize {
        BLOCK_SIZE * (1 + self.inode_count() as usize + block as usize)
    }

    /// Copy up to `buf.len()` bytes starting at `offset` in the file
    /// behind `inode`. Short reads clamp to the file length; an offset at
    /// or past the end reads zero bytes.
    pub fn read_data(&self, inode: u32, offset: u32, buf: &mut [u8]) -> KResult<usize> {
        let length = self.file_size(inode)?;
        if offset >= length {
            return Ok(0);
        }

        let remaining = (length - offset) as usize;
        let to_copy = buf.len().min(remaining);
        let inode_base = self.inode_base(inode);

        let mut copied = 0;
        while copied < to_copy {
            let file_pos = offset as usize + copied;
            let block_index = file_pos / BLOCK_SIZE;
            let block_offset = file_pos % BLOCK_SIZE;

            // A declared length past the pointer capacity is corrupt.
            if block_index >= MAX_FILE_BLOCKS {
                return Err(KernelError::NotFound);
            }
            let block = self.u32_at(inode_base + 4 + block_index * 4);
            if block >= self.data_block_count() {
                return Err(KernelError::NotFound);
            }
            let chunk = (BLOCK_SIZE - block_offset).min(to_copy - copied);
            let src = self.data_block_base(block) + block_offset;
            buf[copied..copied + chunk].copy_from_slice(&self.image[src..src + chunk]);
            copied += chunk;
        }

        Ok(copied)
    }
}
