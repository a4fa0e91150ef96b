use std::fmt;

use tracing::debug;

use crate::dtype::{DType, Element};
use crate::error::{Result, TensorError};
use crate::iter::IndexIter;
use crate::numeric::Numeric;
use crate::shape::Shape;
use crate::storage::Storage;

/// A dense N-dimensional tensor over a shared, indirected buffer.
///
/// Logical positions are resolved in two steps: a multi-index is folded with
/// the row-major strides of the tensor's own shape into a flat position in
/// `[0, size)`, and the indirection table maps that flat position to an offset
/// in storage. View operators (`reshape`, `transpose`, `slice`, ...) build a new
/// table over the same storage, so writes through a view are visible through
/// every tensor sharing the buffer.
///
/// `Clone` is a deep copy: the clone owns a fresh compact buffer.
pub struct Tensor<T> {
    storage: Storage<T>,
    shape: Shape,
    strides: Vec<usize>,
    table: Vec<usize>,
    is_view: bool,
}

fn identity_table(size: usize) -> Vec<usize> {
    (0..size).collect()
}

impl<T> Tensor<T> {
    /// Assemble a tensor from already-validated parts.
    ///
    /// Strides are always derived from `shape`; `table` must have one entry
    /// per element.
    pub(crate) fn from_parts(
        storage: Storage<T>,
        shape: Shape,
        table: Vec<usize>,
        is_view: bool,
    ) -> Self {
        debug_assert_eq!(table.len(), shape.numel());
        let strides = shape.strides();
        Tensor {
            storage,
            shape,
            strides,
            table,
            is_view,
        }
    }

    /// Wrap a compact buffer laid out in row-major order.
    pub(crate) fn from_buffer(shape: Shape, data: Vec<T>) -> Self {
        let table = identity_table(shape.numel());
        Tensor::from_parts(Storage::from_vec(data), shape, table, false)
    }

    /// The rank-0 tensor with no elements.
    pub fn empty() -> Self {
        Tensor::from_buffer(Shape::empty(), Vec::new())
    }

    /// Returns a reference to the tensor's shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Size of each dimension.
    pub fn dims(&self) -> &[usize] {
        self.shape.dims()
    }

    /// Number of dimensions.
    pub fn rank(&self) -> usize {
        self.shape.ndim()
    }

    /// Number of logical elements (0 for the rank-0 tensor).
    pub fn size(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Row-major strides of the logical shape.
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// True if the storage may be shared with another tensor.
    pub fn is_view(&self) -> bool {
        self.is_view
    }

    /// Returns the underlying storage handle.
    pub fn storage(&self) -> &Storage<T> {
        &self.storage
    }

    pub fn shares_storage_with(&self, other: &Tensor<T>) -> bool {
        self.storage.ptr_eq(&other.storage)
    }

    /// A fresh row-major iterator over this tensor's multi-indices.
    pub fn indices(&self) -> IndexIter {
        self.shape.indices()
    }

    pub(crate) fn table(&self) -> &[usize] {
        &self.table
    }

    /// A second handle onto the same elements with its own copy of the metadata.
    pub(crate) fn alias(&self) -> Tensor<T> {
        Tensor {
            storage: self.storage.clone(),
            shape: self.shape.clone(),
            strides: self.strides.clone(),
            table: self.table.clone(),
            is_view: true,
        }
    }

    /// Row-major flat position of `index`.
    ///
    /// # Errors
    /// - `InvalidArgument` if `index` is empty, the tensor has rank 0, or the
    ///   index length differs from the rank.
    /// - `IndexOutOfBounds` if any component is outside its dimension.
    pub(crate) fn flat_index(&self, index: &[usize]) -> Result<usize> {
        if index.is_empty() {
            return Err(TensorError::invalid(
                "invalid indices, the indices array is empty",
            ));
        }
        if self.rank() == 0 {
            return Err(TensorError::invalid("cannot index into a rank-0 tensor"));
        }
        if index.len() != self.rank() {
            return Err(TensorError::InvalidArgument(format!(
                "index {:?} has {} components but the tensor has rank {}",
                index,
                index.len(),
                self.rank()
            )));
        }
        let mut flat = 0;
        for (i, (&idx, &dim)) in index.iter().zip(self.shape.dims()).enumerate() {
            if idx >= dim {
                return Err(TensorError::IndexOutOfBounds {
                    index: index.to_vec(),
                    shape: self.shape.dims().to_vec(),
                });
            }
            flat += self.strides[i] * idx;
        }
        Ok(flat)
    }

    /// Physical storage offset of the element at `index`.
    pub fn offset_of(&self, index: &[usize]) -> Result<usize> {
        let flat = self.flat_index(index)?;
        Ok(self.table[flat])
    }

    /// Write `value` at `index`.
    ///
    /// Takes `&self`: the write lands in the shared buffer and is observed by
    /// every view over it. On error nothing is written.
    pub fn set(&self, index: &[usize], value: T) -> Result<()> {
        let offset = self.offset_of(index)?;
        self.storage.write()[offset] = value;
        Ok(())
    }
}

impl<T: Clone> Tensor<T> {
    /// Create a tensor from row-major data and a shape.
    ///
    /// # Errors
    /// `InvalidShape` for a zero dimension, `DataSizeMismatch` if
    /// `data.len()` differs from the product of `dims`.
    pub fn from_vec(dims: &[usize], data: Vec<T>) -> Result<Self> {
        let shape = Shape::from_slice(dims)?;
        if data.len() != shape.numel() {
            return Err(TensorError::DataSizeMismatch {
                expected: shape.numel(),
                got: data.len(),
            });
        }
        Ok(Tensor::from_buffer(shape, data))
    }

    /// A tensor of the given shape with every element equal to `value`.
    pub fn full(dims: &[usize], value: T) -> Result<Self> {
        let shape = Shape::from_slice(dims)?;
        let data = vec![value; shape.numel()];
        Ok(Tensor::from_buffer(shape, data))
    }

    /// A shape `[1]` tensor holding `value`.
    pub fn scalar(value: T) -> Self {
        Tensor::from_buffer(Shape::from_dims(vec![1]), vec![value])
    }

    /// Build a tensor by calling `init` once per multi-index, in row-major order.
    ///
    /// For the rank-0 shape the result is the empty tensor and `init` is not
    /// called.
    pub fn from_fn<F>(dims: &[usize], mut init: F) -> Result<Self>
    where
        F: FnMut(&[usize]) -> T,
    {
        let shape = Shape::from_slice(dims)?;
        let size = shape.numel();
        let data: Vec<T> = shape.indices().take(size).map(|idx| init(&idx)).collect();
        Ok(Tensor::from_buffer(shape, data))
    }

    /// A 2-D tensor from equally long rows.
    ///
    /// # Errors
    /// `InvalidArgument` if there are no rows or the rows differ in length.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        let width = match rows.first() {
            Some(row) => row.len(),
            None => return Err(TensorError::invalid("cannot build a tensor from zero rows")),
        };
        if rows.iter().any(|row| row.len() != width) {
            return Err(TensorError::invalid(
                "arrays do not all have the same length in each dimension",
            ));
        }
        let height = rows.len();
        let data = rows.into_iter().flatten().collect();
        Tensor::from_vec(&[height, width], data)
    }

    /// Read the element at `index`.
    pub fn get(&self, index: &[usize]) -> Result<T> {
        let offset = self.offset_of(index)?;
        Ok(self.storage.read()[offset].clone())
    }

    /// Snapshot of the elements in row-major order.
    pub fn to_vec(&self) -> Vec<T> {
        self.storage.gather(&self.table)
    }
}

impl<T: Clone + Default> Tensor<T> {
    /// A tensor of the given shape filled with `T::default()`.
    pub fn new(dims: &[usize]) -> Result<Self> {
        Tensor::full(dims, T::default())
    }
}

impl<T: Numeric> Tensor<T> {
    /// A tensor of the given shape filled with zero.
    pub fn zeros(dims: &[usize]) -> Result<Self> {
        Tensor::full(dims, T::zero())
    }

    /// A tensor of the given shape filled with one.
    pub fn ones(dims: &[usize]) -> Result<Self> {
        Tensor::full(dims, T::one())
    }

    /// The `n x n` identity matrix.
    pub fn identity(n: usize) -> Result<Self> {
        Tensor::from_fn(&[n, n], |idx| if idx[0] == idx[1] { T::one() } else { T::zero() })
    }
}

impl<T: Element> Tensor<T> {
    /// Element kind of this tensor.
    pub fn dtype(&self) -> DType {
        T::DTYPE
    }
}

impl<T: Clone> Clone for Tensor<T> {
    fn clone(&self) -> Self {
        if self.is_view {
            debug!(shape = %self.shape, "materializing view into a deep copy");
        }
        Tensor::from_buffer(self.shape.clone(), self.to_vec())
    }
}

impl<T: Clone> From<Vec<T>> for Tensor<T> {
    /// A 1-D tensor; an empty vector gives the rank-0 empty tensor.
    fn from(data: Vec<T>) -> Self {
        if data.is_empty() {
            return Tensor::empty();
        }
        let shape = Shape::from_dims(vec![data.len()]);
        Tensor::from_buffer(shape, data)
    }
}

impl<T: Clone + PartialEq> PartialEq for Tensor<T> {
    fn eq(&self, other: &Self) -> bool {
        self.shape == other.shape && self.to_vec() == other.to_vec()
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape.dims())
            .field("is_view", &self.is_view)
            .field("data", &self.to_vec())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Tensor<i32> {
        Tensor::from_vec(&[2, 3], vec![5, 6, 1, -1, 0, 2]).unwrap()
    }

    #[test]
    fn test_from_vec() {
        let t = sample();
        assert_eq!(t.dims(), &[2, 3]);
        assert_eq!(t.rank(), 2);
        assert_eq!(t.size(), 6);
        assert_eq!(t.strides(), &[3, 1]);
        assert_eq!(t.dtype(), DType::I32);
        assert!(!t.is_view());
        assert_eq!(t.to_vec(), vec![5, 6, 1, -1, 0, 2]);
    }

    #[test]
    fn test_from_vec_size_mismatch() {
        let err = Tensor::from_vec(&[2, 2], vec![1, 2, 3]).unwrap_err();
        assert_eq!(err, TensorError::DataSizeMismatch { expected: 4, got: 3 });
    }

    #[test]
    fn test_invalid_shape() {
        let err = Tensor::<f32>::zeros(&[3, 0]).unwrap_err();
        assert!(matches!(err, TensorError::InvalidShape(_)));
    }

    #[test]
    fn test_get_set() {
        let t = sample();
        assert_eq!(t.get(&[1, 2]).unwrap(), 2);
        t.set(&[1, 2], 9).unwrap();
        assert_eq!(t.get(&[1, 2]).unwrap(), 9);
        assert_eq!(t.offset_of(&[1, 0]).unwrap(), 3);
    }

    #[test]
    fn test_index_errors() {
        let t = sample();
        assert!(matches!(
            t.get(&[2, 0]).unwrap_err(),
            TensorError::IndexOutOfBounds { .. }
        ));
        assert!(matches!(t.get(&[]).unwrap_err(), TensorError::InvalidArgument(_)));
        assert!(matches!(t.get(&[0]).unwrap_err(), TensorError::InvalidArgument(_)));
        let empty = Tensor::<i32>::empty();
        assert!(matches!(
            empty.get(&[0]).unwrap_err(),
            TensorError::InvalidArgument(_)
        ));
    }

    #[test]
    fn test_failed_set_has_no_effect() {
        let t = sample();
        assert!(t.set(&[0, 3], 100).is_err());
        assert_eq!(t.to_vec(), vec![5, 6, 1, -1, 0, 2]);
    }

    #[test]
    fn test_constructors() {
        assert_eq!(Tensor::<i64>::zeros(&[2]).unwrap().to_vec(), vec![0, 0]);
        assert_eq!(Tensor::<f64>::ones(&[1, 2]).unwrap().to_vec(), vec![1.0, 1.0]);
        assert_eq!(Tensor::full(&[3], 7u8).unwrap().to_vec(), vec![7, 7, 7]);
        assert_eq!(Tensor::<bool>::new(&[2]).unwrap().to_vec(), vec![false, false]);
        let s = Tensor::scalar(4i16);
        assert_eq!(s.dims(), &[1]);
        assert_eq!(s.to_vec(), vec![4]);
    }

    #[test]
    fn test_identity() {
        let eye = Tensor::<i32>::identity(3).unwrap();
        assert_eq!(eye.to_vec(), vec![1, 0, 0, 0, 1, 0, 0, 0, 1]);
    }

    #[test]
    fn test_from_fn_visits_row_major() {
        let t = Tensor::from_fn(&[2, 2], |idx| idx[0] * 10 + idx[1]).unwrap();
        assert_eq!(t.to_vec(), vec![0, 1, 10, 11]);
    }

    #[test]
    fn test_from_rows() {
        let t = Tensor::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
        assert_eq!(t.dims(), &[2, 3]);
        assert_eq!(t.get(&[1, 0]).unwrap(), 4);
        assert!(Tensor::from_rows(vec![vec![1, 2], vec![3]]).is_err());
        assert!(Tensor::<i32>::from_rows(vec![]).is_err());
    }

    #[test]
    fn test_empty() {
        let t = Tensor::<f32>::empty();
        assert_eq!(t.rank(), 0);
        assert_eq!(t.size(), 0);
        assert!(t.is_empty());
        assert!(t.to_vec().is_empty());
        assert_eq!(Tensor::<f32>::from(Vec::new()), t);
    }

    #[test]
    fn test_clone_is_deep() {
        let t = sample();
        let c = t.clone();
        assert!(!c.shares_storage_with(&t));
        c.set(&[0, 0], 100).unwrap();
        assert_eq!(t.get(&[0, 0]).unwrap(), 5);
        assert_eq!(c, Tensor::from_vec(&[2, 3], vec![100, 6, 1, -1, 0, 2]).unwrap());
    }

    #[test]
    fn test_equality_checks_shape() {
        let a = Tensor::from_vec(&[2, 2], vec![1, 2, 3, 4]).unwrap();
        let b = Tensor::from_vec(&[4], vec![1, 2, 3, 4]).unwrap();
        assert_ne!(a, b);
        assert_eq!(Tensor::from(vec![1, 2, 3, 4]), b);
    }
}
