//! Packed element payloads.
//!
//! Numeric kinds are written as fixed-width big-endian values. Booleans are
//! bit-packed eight to a byte, least-significant bit first, with the final
//! partial byte zero-padded.

use ndt_tensor::{Element, Tensor};

use crate::error::{CodecError, Result};
use crate::value::DynTensor;

/// An element type the codec can carry.
pub trait WireElement: Element {
    /// Append the packed form of `values` to `out`.
    fn write_payload(values: &[Self], out: &mut Vec<u8>);

    /// Unpack exactly `numel` values from `bytes`.
    ///
    /// `bytes` must be `Self::DTYPE.payload_len(numel)` long.
    fn read_payload(bytes: &[u8], numel: usize) -> Result<Vec<Self>>;

    fn into_dyn(tensor: Tensor<Self>) -> DynTensor;

    /// The typed tensor inside `value`, or `value` back if it holds another kind.
    fn from_dyn(value: DynTensor) -> std::result::Result<Tensor<Self>, DynTensor>;
}

fn check_len<T: Element>(bytes: &[u8], numel: usize) -> Result<()> {
    let expected = T::DTYPE.payload_len(numel);
    if bytes.len() != expected {
        return Err(CodecError::InvalidPayload(format!(
            "{} payload of {} elements needs {} bytes, got {}",
            T::DTYPE,
            numel,
            expected,
            bytes.len()
        )));
    }
    Ok(())
}

impl WireElement for bool {
    fn write_payload(values: &[bool], out: &mut Vec<u8>) {
        for chunk in values.chunks(8) {
            let byte = chunk
                .iter()
                .enumerate()
                .fold(0u8, |acc, (bit, &on)| acc | ((on as u8) << bit));
            out.push(byte);
        }
    }

    fn read_payload(bytes: &[u8], numel: usize) -> Result<Vec<bool>> {
        check_len::<bool>(bytes, numel)?;
        Ok((0..numel).map(|i| (bytes[i / 8] >> (i % 8)) & 1 == 1).collect())
    }

    fn into_dyn(tensor: Tensor<bool>) -> DynTensor {
        DynTensor::Bool(tensor)
    }

    fn from_dyn(value: DynTensor) -> std::result::Result<Tensor<bool>, DynTensor> {
        match value {
            DynTensor::Bool(t) => Ok(t),
            other => Err(other),
        }
    }
}

macro_rules! impl_wire_numeric {
    ($($t:ty => $variant:ident),+ $(,)?) => {
        $(
            impl WireElement for $t {
                fn write_payload(values: &[$t], out: &mut Vec<u8>) {
                    out.reserve(values.len() * std::mem::size_of::<$t>());
                    for v in values {
                        out.extend_from_slice(&v.to_be_bytes());
                    }
                }

                fn read_payload(bytes: &[u8], numel: usize) -> Result<Vec<$t>> {
                    check_len::<$t>(bytes, numel)?;
                    const WIDTH: usize = std::mem::size_of::<$t>();
                    let values = bytes
                        .chunks_exact(WIDTH)
                        .map(|chunk| {
                            let mut buf = [0u8; WIDTH];
                            buf.copy_from_slice(chunk);
                            <$t>::from_be_bytes(buf)
                        })
                        .collect();
                    Ok(values)
                }

                fn into_dyn(tensor: Tensor<$t>) -> DynTensor {
                    DynTensor::$variant(tensor)
                }

                fn from_dyn(value: DynTensor) -> std::result::Result<Tensor<$t>, DynTensor> {
                    match value {
                        DynTensor::$variant(t) => Ok(t),
                        other => Err(other),
                    }
                }
            }
        )+
    };
}

impl_wire_numeric!(
    i8 => I8,
    i16 => I16,
    i32 => I32,
    f32 => F32,
    i64 => I64,
    f64 => F64,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_packing_lsb_first() {
        let mut out = Vec::new();
        let bits = [true, false, true, true, false, false, false, false, false, true];
        bool::write_payload(&bits, &mut out);
        assert_eq!(out, vec![0b0000_1101, 0b0000_0010]);
        assert_eq!(bool::read_payload(&out, bits.len()).unwrap(), bits.to_vec());
    }

    #[test]
    fn test_big_endian() {
        let mut out = Vec::new();
        i32::write_payload(&[1, -2], &mut out);
        assert_eq!(out, vec![0, 0, 0, 1, 0xff, 0xff, 0xff, 0xfe]);

        let mut out = Vec::new();
        f32::write_payload(&[1.0], &mut out);
        assert_eq!(out, vec![0x3f, 0x80, 0, 0]);

        let mut out = Vec::new();
        i16::write_payload(&[0x0102], &mut out);
        assert_eq!(out, vec![1, 2]);
    }

    #[test]
    fn test_length_checked() {
        assert!(matches!(
            i64::read_payload(&[0; 7], 1).unwrap_err(),
            CodecError::InvalidPayload(_)
        ));
        assert!(bool::read_payload(&[0, 0], 8).is_err());
        assert!(i8::read_payload(&[], 0).unwrap().is_empty());
    }

    #[test]
    fn test_dyn_round_trip() {
        let t = Tensor::from_vec(&[2], vec![1.5f64, -2.0]).unwrap();
        let value = f64::into_dyn(t.clone());
        assert!(i32::from_dyn(value.clone()).is_err());
        assert_eq!(f64::from_dyn(value).unwrap(), t);
    }
}
