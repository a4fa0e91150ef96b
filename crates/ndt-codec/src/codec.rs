use std::io::{self, Read, Write};

use ndt_tensor::{DType, Tensor};
use tracing::debug;

use crate::config::DecodeConfig;
use crate::error::{CodecError, Result};
use crate::header::TensorHeader;
use crate::payload::WireElement;
use crate::value::DynTensor;

/// Encode `tensor` (header followed by payload) into a new buffer.
///
/// Views are encoded by their logical contents in row-major order, so the
/// decoded tensor is always compact.
pub fn encode<T: WireElement>(tensor: &Tensor<T>) -> Result<Vec<u8>> {
    let header = TensorHeader::new(T::DTYPE, tensor.shape().clone());
    let mut buf = Vec::with_capacity(header.encoded_len() + header.payload_len());
    header.write(&mut buf)?;
    T::write_payload(&tensor.to_vec(), &mut buf);
    debug!(
        dtype = %T::DTYPE,
        shape = %tensor.shape(),
        bytes = buf.len(),
        "encoded tensor"
    );
    Ok(buf)
}

/// Encode `tensor` into `writer`.
pub fn encode_to<T: WireElement, W: Write>(tensor: &Tensor<T>, writer: &mut W) -> Result<()> {
    let buf = encode(tensor)?;
    writer.write_all(&buf)?;
    Ok(())
}

/// Decode a complete encoded tensor with the default limits.
pub fn decode(bytes: &[u8]) -> Result<DynTensor> {
    decode_with(bytes, &DecodeConfig::default())
}

/// Decode a complete encoded tensor. Trailing bytes are an error.
///
/// The payload is decoded directly from `bytes`; a header declaring more
/// payload than `bytes` holds is rejected before anything is allocated.
pub fn decode_with(bytes: &[u8], config: &DecodeConfig) -> Result<DynTensor> {
    let mut reader = bytes;
    let header = TensorHeader::parse(&mut reader, config)?;
    let len = header.payload_len();
    if reader.len() < len {
        return Err(CodecError::InvalidPayload(format!(
            "truncated payload: header declares {} bytes, {} remain",
            len,
            reader.len()
        )));
    }
    if reader.len() > len {
        return Err(CodecError::InvalidPayload(format!(
            "{} trailing bytes after the payload",
            reader.len() - len
        )));
    }
    decode_payload(&header, reader)
}

/// Read one encoded tensor from `reader` with the default limits.
pub fn decode_from<R: Read>(reader: &mut R) -> Result<DynTensor> {
    decode_from_with(reader, &DecodeConfig::default())
}

/// Read one encoded tensor from `reader`, leaving any following bytes unread.
pub fn decode_from_with<R: Read>(reader: &mut R, config: &DecodeConfig) -> Result<DynTensor> {
    let header = TensorHeader::parse(reader, config)?;
    let len = header.payload_len();
    let mut payload = Vec::new();
    reader.by_ref().take(len as u64).read_to_end(&mut payload)?;
    if payload.len() < len {
        return Err(CodecError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("payload ended after {} of {} bytes", payload.len(), len),
        )));
    }
    decode_payload(&header, &payload)
}

fn decode_payload(header: &TensorHeader, payload: &[u8]) -> Result<DynTensor> {
    debug!(
        dtype = %header.dtype,
        shape = %header.shape,
        bytes = header.encoded_len() + payload.len(),
        "decoded tensor"
    );
    match header.dtype {
        DType::Bool => build::<bool>(header, payload),
        DType::I8 => build::<i8>(header, payload),
        DType::I16 => build::<i16>(header, payload),
        DType::I32 => build::<i32>(header, payload),
        DType::F32 => build::<f32>(header, payload),
        DType::I64 => build::<i64>(header, payload),
        DType::F64 => build::<f64>(header, payload),
    }
}

fn build<T: WireElement>(header: &TensorHeader, payload: &[u8]) -> Result<DynTensor> {
    let data = T::read_payload(payload, header.numel())?;
    let tensor = Tensor::from_vec(header.shape.dims(), data)?;
    Ok(T::into_dyn(tensor))
}
