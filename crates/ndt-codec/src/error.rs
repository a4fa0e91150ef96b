use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unknown element tag: {0}")]
    UnknownDType(u8),
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
    #[error("{what} {value} exceeds the limit of {limit}")]
    LimitExceeded {
        what: &'static str,
        value: usize,
        limit: usize,
    },
    #[error("tensor error: {0}")]
    Tensor(#[from] ndt_tensor::TensorError),
}

pub type Result<T> = std::result::Result<T, CodecError>;
