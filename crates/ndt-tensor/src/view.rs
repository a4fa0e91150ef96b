//! View transforms.
//!
//! Every operator here returns a tensor over the same storage as its source
//! (except `flatten`, and `reshape` of a non-compact view) with a freshly
//! built indirection table. No element is copied.

use std::ops::Range;

use tracing::{debug, warn};

use crate::error::{Result, TensorError};
use crate::shape::Shape;
use crate::tensor::Tensor;

impl<T: Clone> Tensor<T> {
    /// Build a view of `shape` over this tensor's storage.
    ///
    /// `source_flat` maps each new multi-index to the row-major flat position
    /// of the source element it reads.
    fn remap<F>(&self, shape: Shape, mut source_flat: F) -> Tensor<T>
    where
        F: FnMut(&[usize]) -> usize,
    {
        let size = shape.numel();
        let table = shape
            .indices()
            .take(size)
            .map(|index| self.table()[source_flat(&index)])
            .collect();
        Tensor::from_parts(self.storage().clone(), shape, table, true)
    }

    fn check_axis(&self, dimension: usize, op: &str) -> Result<()> {
        if dimension >= self.rank() {
            return Err(TensorError::InvalidArgument(format!(
                "{}: dimension {} out of range for rank {}",
                op,
                dimension,
                self.rank()
            )));
        }
        Ok(())
    }

    /// Same elements in row-major order under a new shape.
    ///
    /// The result shares storage unless `self` is a view whose storage holds
    /// more elements than it exposes, in which case the elements are first
    /// copied into a compact buffer.
    ///
    /// # Errors
    /// `InvalidArgument` if the element counts differ.
    pub fn reshape(&self, dims: &[usize]) -> Result<Tensor<T>> {
        let shape = Shape::from_slice(dims)?;
        if shape.numel() != self.size() {
            return Err(TensorError::InvalidArgument(format!(
                "cannot reshape tensor of shape {} into shape {}",
                self.shape(),
                shape
            )));
        }
        if self.is_view() && self.storage().len() != self.size() {
            debug!(from = %self.shape(), to = %shape, "materializing view for reshape");
            return Ok(Tensor::from_buffer(shape, self.to_vec()));
        }
        Ok(Tensor::from_parts(
            self.storage().clone(),
            shape,
            self.table().to_vec(),
            true,
        ))
    }

    /// Reshape to rank 1, sharing storage where `reshape` would.
    pub fn ravel(&self) -> Result<Tensor<T>> {
        if self.is_empty() {
            return Ok(self.alias());
        }
        self.reshape(&[self.size()])
    }

    /// Rank-1 deep copy.
    pub fn flatten(&self) -> Tensor<T> {
        if self.is_empty() {
            return Tensor::empty();
        }
        debug!(shape = %self.shape(), "flattening into a new buffer");
        Tensor::from_buffer(Shape::from_dims(vec![self.size()]), self.to_vec())
    }

    /// Reverse the order of all axes.
    pub fn transpose(&self) -> Tensor<T> {
        let mut dims = self.dims().to_vec();
        dims.reverse();
        let strides = self.strides().to_vec();
        let mut old = vec![0; dims.len()];
        self.remap(Shape::from_dims(dims), |index| {
            for (o, &i) in old.iter_mut().zip(index.iter().rev()) {
                *o = i;
            }
            Shape::flat(&strides, &old)
        })
    }

    /// Exchange axes `d1` and `d2`.
    pub fn swap_dimensions(&self, d1: usize, d2: usize) -> Result<Tensor<T>> {
        self.check_axis(d1, "swap_dimensions")?;
        self.check_axis(d2, "swap_dimensions")?;
        let mut dims = self.dims().to_vec();
        dims.swap(d1, d2);
        let strides = self.strides().to_vec();
        let mut old = vec![0; dims.len()];
        Ok(self.remap(Shape::from_dims(dims), |index| {
            old.copy_from_slice(index);
            old.swap(d1, d2);
            Shape::flat(&strides, &old)
        }))
    }

    /// Sub-tensor selected by one half-open range per axis.
    ///
    /// # Errors
    /// `InvalidArgument` if the number of ranges differs from the rank, or a
    /// range is empty or ends past its dimension.
    pub fn slice(&self, ranges: &[Range<usize>]) -> Result<Tensor<T>> {
        if ranges.len() != self.rank() {
            return Err(TensorError::InvalidArgument(format!(
                "got {} slice ranges for a tensor of rank {}",
                ranges.len(),
                self.rank()
            )));
        }
        let mut dims = Vec::with_capacity(ranges.len());
        for (axis, (range, &dim)) in ranges.iter().zip(self.dims()).enumerate() {
            if range.end > dim {
                return Err(TensorError::InvalidArgument(format!(
                    "slice end {} exceeds dimension {} of size {}",
                    range.end, axis, dim
                )));
            }
            if range.end <= range.start {
                return Err(TensorError::InvalidArgument(format!(
                    "slice range {:?} on dimension {} is empty",
                    range, axis
                )));
            }
            dims.push(range.end - range.start);
        }
        let base: usize = ranges
            .iter()
            .zip(self.strides())
            .map(|(r, s)| r.start * s)
            .sum();
        let strides = self.strides().to_vec();
        Ok(self.remap(Shape::from_dims(dims), |index| {
            base + Shape::flat(&strides, index)
        }))
    }

    /// Reverse the element order along `dimension`.
    pub fn reverse(&self, dimension: usize) -> Result<Tensor<T>> {
        self.check_axis(dimension, "reverse")?;
        let extent = self.dims()[dimension];
        let stride = self.strides()[dimension];
        let strides = self.strides().to_vec();
        Ok(self.remap(self.shape().clone(), |index| {
            let flat = Shape::flat(&strides, index);
            let i = index[dimension];
            flat - i * stride + (extent - 1 - i) * stride
        }))
    }

    /// Remove the size-1 axis `dimension`.
    pub fn squeeze(&self, dimension: usize) -> Result<Tensor<T>> {
        self.check_axis(dimension, "squeeze")?;
        if self.dims()[dimension] != 1 {
            return Err(TensorError::InvalidArgument(format!(
                "cannot squeeze dimension {} of size {}",
                dimension,
                self.dims()[dimension]
            )));
        }
        let mut dims = self.dims().to_vec();
        dims.remove(dimension);
        self.reshape(&dims)
    }

    /// Insert a size-1 axis at `dimension` (which may equal the rank).
    pub fn expand(&self, dimension: usize) -> Result<Tensor<T>> {
        if dimension > self.rank() {
            return Err(TensorError::InvalidArgument(format!(
                "expand: dimension {} out of range for rank {}",
                dimension,
                self.rank()
            )));
        }
        let mut dims = self.dims().to_vec();
        dims.insert(dimension, 1);
        self.reshape(&dims)
    }

    /// Reshape to `dims`, keeping the first elements in row-major order.
    ///
    /// A smaller target silently drops the trailing elements. A larger target
    /// is an `InvalidArgument` error.
    pub fn resize(&self, dims: &[usize]) -> Result<Tensor<T>> {
        let shape = Shape::from_slice(dims)?;
        let new_size = shape.numel();
        if new_size == self.size() {
            return self.reshape(dims);
        }
        if new_size > self.size() {
            return Err(TensorError::InvalidArgument(format!(
                "cannot resize tensor of {} elements to shape {}",
                self.size(),
                shape
            )));
        }
        warn!(
            from = %self.shape(),
            to = %shape,
            dropped = self.size() - new_size,
            "resize discards trailing elements"
        );
        self.ravel()?.slice(&[0..new_size])?.reshape(dims)
    }
}
