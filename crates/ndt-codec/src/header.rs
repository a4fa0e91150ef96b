use std::io::{Read, Write};

use ndt_tensor::{DType, Shape};

use crate::config::DecodeConfig;
use crate::error::{CodecError, Result};

/// Fixed part of an encoded tensor: element tag and rank.
pub const PREFIX_LEN: usize = 5;

/// Parsed tensor header.
///
/// Layout (all integers big-endian `i32`):
///   - 1 byte: element tag (bool=1, i8=2, i16=3, i32=4, f32=5, i64=6, f64=7)
///   - 4 bytes: rank
///   - rank x 4 bytes: shape
///   - rank x 4 bytes: row-major strides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TensorHeader {
    pub dtype: DType,
    pub shape: Shape,
}

impl TensorHeader {
    pub fn new(dtype: DType, shape: Shape) -> Self {
        TensorHeader { dtype, shape }
    }

    /// Number of elements described by the header.
    pub fn numel(&self) -> usize {
        self.shape.numel()
    }

    /// Bytes the payload following this header occupies.
    pub fn payload_len(&self) -> usize {
        self.dtype.payload_len(self.numel())
    }

    /// Bytes the header itself occupies.
    pub fn encoded_len(&self) -> usize {
        PREFIX_LEN + 8 * self.shape.ndim()
    }

    pub fn write(&self, writer: &mut impl Write) -> Result<()> {
        writer.write_all(&[self.dtype.to_tag()])?;
        write_dim(writer, self.shape.ndim(), "rank")?;
        for &d in self.shape.dims() {
            write_dim(writer, d, "dimension")?;
        }
        for s in self.shape.strides() {
            write_dim(writer, s, "stride")?;
        }
        Ok(())
    }

    /// Parse a header, rejecting it against `config` before reading the
    /// variable-length part.
    ///
    /// Strides must equal the row-major strides of the shape.
    pub fn parse(reader: &mut impl Read, config: &DecodeConfig) -> Result<TensorHeader> {
        let mut tag = [0u8; 1];
        reader.read_exact(&mut tag)?;
        let dtype = DType::from_tag(tag[0]).ok_or(CodecError::UnknownDType(tag[0]))?;

        let rank = read_dim(reader, "rank")?;
        if rank > config.max_rank {
            return Err(CodecError::LimitExceeded {
                what: "rank",
                value: rank,
                limit: config.max_rank,
            });
        }

        let mut dims = Vec::with_capacity(rank);
        for _ in 0..rank {
            dims.push(read_dim(reader, "dimension")?);
        }
        let shape = Shape::new(dims)?;
        let numel = shape
            .dims()
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
            .unwrap_or(usize::MAX);
        if numel > config.max_elements {
            return Err(CodecError::LimitExceeded {
                what: "element count",
                value: numel,
                limit: config.max_elements,
            });
        }

        let expected = shape.strides();
        for (axis, &want) in expected.iter().enumerate() {
            let got = read_dim(reader, "stride")?;
            if got != want {
                return Err(CodecError::InvalidPayload(format!(
                    "stride {} of axis {} is not row-major for shape {} (expected {})",
                    got, axis, shape, want
                )));
            }
        }

        Ok(TensorHeader { dtype, shape })
    }
}

fn write_dim(writer: &mut impl Write, value: usize, what: &'static str) -> Result<()> {
    let value = i32::try_from(value).map_err(|_| CodecError::LimitExceeded {
        what,
        value,
        limit: i32::MAX as usize,
    })?;
    writer.write_all(&value.to_be_bytes())?;
    Ok(())
}

fn read_dim(reader: &mut impl Read, what: &str) -> Result<usize> {
    let mut buf4 = [0u8; 4];
    reader.read_exact(&mut buf4)?;
    let value = i32::from_be_bytes(buf4);
    usize::try_from(value)
        .map_err(|_| CodecError::InvalidPayload(format!("negative {}: {}", what, value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(dtype: DType, dims: &[usize]) -> TensorHeader {
        TensorHeader::new(dtype, Shape::from_slice(dims).unwrap())
    }

    #[test]
    fn test_layout() {
        let mut buf = Vec::new();
        header(DType::I16, &[2, 3]).write(&mut buf).unwrap();
        assert_eq!(
            buf,
            vec![3, 0, 0, 0, 2, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0, 3, 0, 0, 0, 1]
        );
        assert_eq!(buf.len(), header(DType::I16, &[2, 3]).encoded_len());
    }

    #[test]
    fn test_parse_round_trip() {
        let h = header(DType::F64, &[4, 1, 5]);
        let mut buf = Vec::new();
        h.write(&mut buf).unwrap();
        let parsed = TensorHeader::parse(&mut buf.as_slice(), &DecodeConfig::default()).unwrap();
        assert_eq!(parsed, h);
        assert_eq!(parsed.payload_len(), 160);
    }

    #[test]
    fn test_rank_zero() {
        let h = TensorHeader::new(DType::Bool, Shape::empty());
        let mut buf = Vec::new();
        h.write(&mut buf).unwrap();
        assert_eq!(buf, vec![1, 0, 0, 0, 0]);
        assert_eq!(h.payload_len(), 0);
    }

    #[test]
    fn test_unknown_tag() {
        let bytes = [9u8, 0, 0, 0, 0];
        let err = TensorHeader::parse(&mut &bytes[..], &DecodeConfig::default()).unwrap_err();
        assert!(matches!(err, CodecError::UnknownDType(9)));
    }

    #[test]
    fn test_limits() {
        let mut buf = Vec::new();
        header(DType::I8, &[1000, 1000]).write(&mut buf).unwrap();
        let config = DecodeConfig::default().with_max_elements(999);
        let err = TensorHeader::parse(&mut buf.as_slice(), &config).unwrap_err();
        assert!(matches!(err, CodecError::LimitExceeded { what: "element count", .. }));

        let config = DecodeConfig::default().with_max_rank(1);
        let err = TensorHeader::parse(&mut buf.as_slice(), &config).unwrap_err();
        assert!(matches!(err, CodecError::LimitExceeded { what: "rank", .. }));
    }

    #[test]
    fn test_non_row_major_strides() {
        let bytes = [4u8, 0, 0, 0, 2, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0, 1, 0, 0, 0, 2];
        let err = TensorHeader::parse(&mut &bytes[..], &DecodeConfig::default()).unwrap_err();
        assert!(matches!(err, CodecError::InvalidPayload(_)));
    }

    #[test]
    fn test_zero_dimension() {
        let bytes = [4u8, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1];
        let err = TensorHeader::parse(&mut &bytes[..], &DecodeConfig::default()).unwrap_err();
        assert!(matches!(err, CodecError::Tensor(_)));
    }

    #[test]
    fn test_truncated() {
        let bytes = [4u8, 0, 0, 0, 1, 0, 0];
        let err = TensorHeader::parse(&mut &bytes[..], &DecodeConfig::default()).unwrap_err();
        assert!(matches!(err, CodecError::Io(_)));
    }
}
