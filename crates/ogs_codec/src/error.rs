use thiserror::Error;

/// Failure of a primitive read or write.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CodecError {
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("string payload is not valid UTF-8")]
    InvalidUtf8(#[from] alloc::string::FromUtf8Error),

    #[error("byte {0:#04x} is not a boolean")]
    InvalidBool(u8),

    #[error("{0:#x} is not a unicode scalar value")]
    InvalidChar(u32),

    #[error("decimal scale {0} exceeds 28")]
    InvalidDecimal(u8),

    #[error("`{text}` is not an RFC 3339 timestamp: {source}")]
    InvalidDateTime {
        text: alloc::string::String,
        source: chrono::ParseError,
    },

    #[error("length prefix does not fit in 32 bits")]
    LengthOverflow,
}
