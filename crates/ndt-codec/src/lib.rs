//! `ndt-codec` - Bit-exact binary encoding of `ndt-tensor` tensors.
//!
//! An encoded tensor is a big-endian header (element tag, rank, shape,
//! row-major strides) followed by the elements in row-major order. Booleans
//! are bit-packed. Decoding yields a [`DynTensor`] whose element kind is
//! discovered from the header.

pub mod codec;
pub mod config;
pub mod error;
pub mod file;
pub mod header;
pub mod payload;
pub mod value;

pub use codec::{decode, decode_from, decode_from_with, decode_with, encode, encode_to};
pub use config::DecodeConfig;
pub use error::{CodecError, Result};
pub use file::{load, load_with, save};
pub use header::TensorHeader;
pub use payload::WireElement;
pub use value::DynTensor;
