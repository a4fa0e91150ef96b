use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use memmap2::Mmap;
use ndt_tensor::Tensor;
use tracing::debug;

use crate::codec::{decode_with, encode_to};
use crate::config::DecodeConfig;
use crate::error::{CodecError, Result};
use crate::payload::WireElement;
use crate::value::DynTensor;

/// Write `tensor` to `path`, replacing any existing file.
pub fn save<T: WireElement>(path: &Path, tensor: &Tensor<T>) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    encode_to(tensor, &mut writer)?;
    writer.flush()?;
    debug!(path = %path.display(), shape = %tensor.shape(), "saved tensor");
    Ok(())
}

/// Load a tensor previously written with [`save`], using the default limits.
pub fn load(path: &Path) -> Result<DynTensor> {
    load_with(path, &DecodeConfig::default())
}

/// Load a tensor from `path`.
///
/// The file is memory-mapped and decoded in place; it must hold exactly one
/// encoded tensor.
pub fn load_with(path: &Path, config: &DecodeConfig) -> Result<DynTensor> {
    let file = File::open(path)?;
    let len = file.metadata()?.len();
    if len == 0 {
        return Err(CodecError::InvalidPayload(format!(
            "{} is empty",
            path.display()
        )));
    }

    // SAFETY: the map is read-only and dropped before returning; the decoded
    // tensor owns a copy of the elements.
    let mmap = unsafe { Mmap::map(&file)? };
    let value = decode_with(&mmap, config)?;
    debug!(
        path = %path.display(),
        bytes = len,
        dtype = %value.dtype(),
        shape = %value.shape(),
        "loaded tensor"
    );
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.ndt");
        let t = Tensor::from_vec(&[2, 2], vec![1.0f32, 2.0, 3.0, 4.0]).unwrap();
        save(&path, &t).unwrap();
        let back = load(&path).unwrap().into_tensor::<f32>().unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn test_load_empty_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = load(file.path()).unwrap_err();
        assert!(matches!(err, CodecError::InvalidPayload(_)));
    }

    #[test]
    fn test_load_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("missing.ndt")).unwrap_err();
        assert!(matches!(err, CodecError::Io(_)));
    }

    #[test]
    fn test_load_respects_limits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.ndt");
        save(&path, &Tensor::<i64>::zeros(&[10, 10]).unwrap()).unwrap();
        let config = DecodeConfig::default().with_max_elements(50);
        assert!(matches!(
            load_with(&path, &config).unwrap_err(),
            CodecError::LimitExceeded { .. }
        ));
    }
}
