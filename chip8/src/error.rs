use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown opcode {opcode:#06X} at {addr:#05X}")]
    UnknownOpcode { opcode: u16, addr: u16 },

    #[error("call stack overflow at {addr:#05X}")]
    StackOverflow { addr: u16 },

    #[error("return with empty call stack at {addr:#05X}")]
    StackUnderflow { addr: u16 },

    #[error("{len} byte write at {addr:#05X} runs past the end of memory")]
    MemoryOutOfRange { addr: u16, len: usize },

    #[error("rom is too large ({size} bytes), max size is {max} bytes")]
    RomTooLarge { size: usize, max: usize },

    #[error("read rom file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("interpreter halted after a fatal error")]
    Halted,
}

impl Error {
    /// Whether the interpreter stopped running because of this error
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::UnknownOpcode { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn test_is_fatal() {
        let unknown = Error::UnknownOpcode {
            opcode: 0x5121,
            addr: 0x200,
        };
        assert!(!unknown.is_fatal());
        assert_eq!(unknown.to_string(), "unknown opcode 0x5121 at 0x200");
        assert!(Error::StackOverflow { addr: 0x200 }.is_fatal());
        assert!(Error::StackUnderflow { addr: 0x200 }.is_fatal());
    }
}
