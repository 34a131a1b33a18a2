pub mod fd;
pub mod filesys;

pub use fd::{FdEntry, FdState, FileOps};
pub use filesys::{Dentry, FileSystem, FileType};
