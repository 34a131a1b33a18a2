use core::fmt;

/// Errors surfaced by kernel operations. The numbered dispatch layer
/// flattens every variant to a negative return value; the variants exist
/// so internal callers can tell the cases apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelError {
    /// Malformed command line or device control value.
    InvalidCommand,
    /// All process slots are live.
    ProcessLimitExceeded,
    /// The named file is not a loadable program.
    NotExecutable,
    /// Name or index resolved to nothing.
    NotFound,
    /// Descriptor out of range, not open, or not closable.
    InvalidDescriptor,
    /// Caller pointer outside its address space.
    InvalidAddress,
    /// The process was started without arguments.
    NoArguments,
    /// Operation is declared but not provided.
    Unsupported,
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            KernelError::InvalidCommand => write!(f, "invalid command"),
            KernelError::ProcessLimitExceeded => write!(f, "process limit exceeded"),
            KernelError::NotExecutable => write!(f, "not an executable"),
            KernelError::NotFound => write!(f, "not found"),
            KernelError::InvalidDescriptor => write!(f, "invalid descriptor"),
            KernelError::InvalidAddress => write!(f, "invalid address"),
            KernelError::NoArguments => write!(f, "no arguments"),
            KernelError::Unsupported => write!(f, "unsupported operation"),
        }
    }
}

pub type KResult<T> = Result<T, KernelError>;
