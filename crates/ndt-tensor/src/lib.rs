//! `ndt-tensor` - Generic N-dimensional tensors with shared, view-based storage.
//!
//! This crate provides:
//! - A `Tensor<T>` type over a reference-counted buffer plus an indirection table
//! - Zero-copy view transforms (reshape, transpose, slice, reverse, ...)
//! - NumPy-style broadcasting for binary operations
//! - Elementwise arithmetic, comparison, bitwise and logical operations
//! - Axis reductions (sum, product, max, min, mean, variance, argmax, ...)
//! - The closed set of element kinds (`DType`) and their numeric capabilities

pub mod broadcast;
pub mod dtype;
pub mod error;
pub mod iter;
pub mod numeric;
mod ops;
mod reduce;
pub mod shape;
pub mod storage;
pub mod tensor;
mod view;

// Re-export primary types at the crate root for convenience.
pub use broadcast::broadcast;
pub use dtype::{DType, Element};
pub use error::{Result, TensorError};
pub use iter::IndexIter;
pub use numeric::{Integral, Numeric};
pub use shape::Shape;
pub use storage::Storage;
pub use tensor::Tensor;
