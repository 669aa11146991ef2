use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to open process: {0}")]
    ProcessOpenFailed(String),

    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    #[error("Failed to read process memory at address {address:#x}: {message}")]
    MemoryReadFailed { address: u64, message: String },

    #[error("Address overflow: {address:#x} + {offset:#x}")]
    AddressOverflow { address: u64, offset: u64 },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Failed to load pointer definitions: {0}")]
    Load(String),

    #[error("No pointer chain resolved to a readable address")]
    NoConsensus,

    #[error("Failed to confirm value at winning address {address:#x}")]
    StabilizationRead { address: u64 },

    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error is a "file not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }

    pub(crate) fn read_failed(address: u64, message: impl Into<String>) -> Self {
        Error::MemoryReadFailed {
            address,
            message: message.into(),
        }
    }
}
