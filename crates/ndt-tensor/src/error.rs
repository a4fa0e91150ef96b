use thiserror::Error;

use crate::dtype::DType;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TensorError {
    #[error("invalid shape {0:?}: every dimension must be positive")]
    InvalidShape(Vec<usize>),
    #[error("data size mismatch: shape needs {expected} elements, got {got}")]
    DataSizeMismatch { expected: usize, got: usize },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("index {index:?} out of bounds for shape {shape:?}")]
    IndexOutOfBounds { index: Vec<usize>, shape: Vec<usize> },
    #[error("indices iterator doesn't have a next element")]
    NoNextElement,
    #[error("invalid type: expected {expected}, got {got}")]
    InvalidType { expected: DType, got: DType },
}

impl TensorError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        TensorError::InvalidArgument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, TensorError>;
