use ndt_tensor::{DType, Shape, Tensor, TensorError};

use crate::error::Result;
use crate::payload::WireElement;

/// A decoded tensor whose element kind is known only at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum DynTensor {
    Bool(Tensor<bool>),
    I8(Tensor<i8>),
    I16(Tensor<i16>),
    I32(Tensor<i32>),
    F32(Tensor<f32>),
    I64(Tensor<i64>),
    F64(Tensor<f64>),
}

macro_rules! each_variant {
    ($value:expr, $t:ident => $body:expr) => {
        match $value {
            DynTensor::Bool($t) => $body,
            DynTensor::I8($t) => $body,
            DynTensor::I16($t) => $body,
            DynTensor::I32($t) => $body,
            DynTensor::F32($t) => $body,
            DynTensor::I64($t) => $body,
            DynTensor::F64($t) => $body,
        }
    };
}

impl DynTensor {
    pub fn dtype(&self) -> DType {
        match self {
            DynTensor::Bool(_) => DType::Bool,
            DynTensor::I8(_) => DType::I8,
            DynTensor::I16(_) => DType::I16,
            DynTensor::I32(_) => DType::I32,
            DynTensor::F32(_) => DType::F32,
            DynTensor::I64(_) => DType::I64,
            DynTensor::F64(_) => DType::F64,
        }
    }

    pub fn shape(&self) -> &Shape {
        each_variant!(self, t => t.shape())
    }

    pub fn size(&self) -> usize {
        each_variant!(self, t => t.size())
    }

    /// Extract the typed tensor.
    ///
    /// # Errors
    /// `InvalidType` if the tensor holds a different element kind.
    pub fn into_tensor<T: WireElement>(self) -> Result<Tensor<T>> {
        let got = self.dtype();
        T::from_dyn(self).map_err(|_| {
            TensorError::InvalidType {
                expected: T::DTYPE,
                got,
            }
            .into()
        })
    }

    /// Borrowing form of [`DynTensor::into_tensor`].
    pub fn as_tensor<T: WireElement>(&self) -> Result<Tensor<T>> {
        self.clone().into_tensor()
    }
}

impl<T: WireElement> From<Tensor<T>> for DynTensor {
    fn from(tensor: Tensor<T>) -> Self {
        T::into_dyn(tensor)
    }
}
