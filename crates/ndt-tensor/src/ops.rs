//! Elementwise operations.
//!
//! Unary operations produce a new compact tensor of the same shape. Binary
//! operations broadcast their operands first (see [`crate::broadcast`]).

use std::cmp::Ordering;

use crate::broadcast::broadcast;
use crate::error::{Result, TensorError};
use crate::numeric::{Integral, Numeric};
use crate::shape::Shape;
use crate::tensor::Tensor;

impl<T: Clone> Tensor<T> {
    /// Apply `f` to every element, in row-major order.
    pub fn map<U, F>(&self, f: F) -> Tensor<U>
    where
        F: FnMut(T) -> U,
    {
        let data = self.to_vec().into_iter().map(f).collect();
        Tensor::from_buffer(self.shape().clone(), data)
    }

    /// Apply a fallible `f` to every element, stopping at the first error.
    pub fn try_map<U, F>(&self, f: F) -> Result<Tensor<U>>
    where
        F: FnMut(T) -> Result<U>,
    {
        let data = self.to_vec().into_iter().map(f).collect::<Result<Vec<U>>>()?;
        Ok(Tensor::from_buffer(self.shape().clone(), data))
    }

    /// Broadcast `self` against `other` and combine them pairwise.
    pub fn binary_op<U, V, F>(&self, other: &Tensor<U>, mut f: F) -> Result<Tensor<V>>
    where
        U: Clone,
        F: FnMut(T, U) -> V,
    {
        self.try_binary_op(other, |a, b| Ok(f(a, b)))
    }

    /// Like [`Tensor::binary_op`] with a fallible combiner.
    pub fn try_binary_op<U, V, F>(&self, other: &Tensor<U>, mut f: F) -> Result<Tensor<V>>
    where
        U: Clone,
        F: FnMut(T, U) -> Result<V>,
    {
        let (a, b) = broadcast(self, other)?;
        let data = a
            .to_vec()
            .into_iter()
            .zip(b.to_vec())
            .map(|(x, y)| f(x, y))
            .collect::<Result<Vec<V>>>()?;
        Ok(Tensor::from_buffer(a.shape().clone(), data))
    }

    /// Replace every element for which `pred` holds with `f(element)`.
    pub fn replace<P, F>(&self, mut pred: P, mut f: F) -> Tensor<T>
    where
        P: FnMut(&T) -> bool,
        F: FnMut(T) -> T,
    {
        self.map(|x| if pred(&x) { f(x) } else { x })
    }

    /// Select the sub-tensors whose leading coordinates are `true` in `mask`.
    ///
    /// `mask` must have the shape of some leading prefix of `self`'s axes. The
    /// result has shape `[k] ++ shape[mask.rank()..]` where `k` counts the true
    /// cells; if `k` is 0 the empty tensor is returned.
    pub fn apply_mask(&self, mask: &Tensor<bool>) -> Result<Tensor<T>> {
        let mask_rank = mask.rank();
        if mask_rank > self.rank() || mask.dims() != &self.dims()[..mask_rank] {
            return Err(TensorError::InvalidArgument(format!(
                "mask of shape {} does not match the leading axes of shape {}",
                mask.shape(),
                self.shape()
            )));
        }
        let keep = mask.to_vec();
        let count = keep.iter().filter(|&&b| b).count();
        if count == 0 {
            return Ok(Tensor::empty());
        }
        let tail = &self.dims()[mask_rank..];
        let chunk: usize = tail.iter().product();
        let data = self.to_vec();
        let mut selected = Vec::with_capacity(count * chunk);
        for (cell, &on) in keep.iter().enumerate() {
            if on {
                selected.extend_from_slice(&data[cell * chunk..(cell + 1) * chunk]);
            }
        }
        let mut dims = vec![count];
        dims.extend_from_slice(tail);
        Ok(Tensor::from_buffer(Shape::from_dims(dims), selected))
    }

    /// The elements for which `pred` holds, as a rank-1 tensor (or the empty
    /// tensor if none do).
    pub fn filter<P>(&self, pred: P) -> Result<Tensor<T>>
    where
        P: FnMut(T) -> bool,
    {
        self.apply_mask(&self.map(pred))
    }

    /// Join `self` and `other` along `dimension`.
    ///
    /// # Errors
    /// `InvalidArgument` if the ranks differ, `dimension` is out of range, or
    /// any other axis differs in size.
    pub fn concatenate(&self, other: &Tensor<T>, dimension: usize) -> Result<Tensor<T>> {
        if self.rank() != other.rank() {
            return Err(TensorError::InvalidArgument(format!(
                "cannot concatenate tensors of rank {} and {}",
                self.rank(),
                other.rank()
            )));
        }
        if dimension >= self.rank() {
            return Err(TensorError::InvalidArgument(format!(
                "concatenate: dimension {} out of range for rank {}",
                dimension,
                self.rank()
            )));
        }
        let off_axis_match = self
            .dims()
            .iter()
            .zip(other.dims())
            .enumerate()
            .all(|(axis, (a, b))| axis == dimension || a == b);
        if !off_axis_match {
            return Err(TensorError::InvalidArgument(format!(
                "cannot concatenate shapes {} and {} along dimension {}",
                self.shape(),
                other.shape(),
                dimension
            )));
        }

        let outer: usize = self.dims()[..dimension].iter().product();
        let chunk_a: usize = self.dims()[dimension..].iter().product();
        let chunk_b: usize = other.dims()[dimension..].iter().product();
        let (a, b) = (self.to_vec(), other.to_vec());
        let mut data = Vec::with_capacity(a.len() + b.len());
        for o in 0..outer {
            data.extend_from_slice(&a[o * chunk_a..(o + 1) * chunk_a]);
            data.extend_from_slice(&b[o * chunk_b..(o + 1) * chunk_b]);
        }
        let mut dims = self.dims().to_vec();
        dims[dimension] += other.dims()[dimension];
        Ok(Tensor::from_buffer(Shape::from_dims(dims), data))
    }
}

impl<T: Clone + PartialEq> Tensor<T> {
    /// Whether any element equals `value`.
    pub fn contains(&self, value: &T) -> bool {
        self.to_vec().iter().any(|x| x == value)
    }
}

impl<T: Numeric> Tensor<T> {
    /// Elementwise sum. Integer kinds wrap on overflow.
    pub fn add(&self, other: &Tensor<T>) -> Result<Tensor<T>> {
        self.binary_op(other, Numeric::add)
    }

    /// Elementwise difference.
    pub fn sub(&self, other: &Tensor<T>) -> Result<Tensor<T>> {
        self.binary_op(other, Numeric::sub)
    }

    /// Elementwise product.
    pub fn mul(&self, other: &Tensor<T>) -> Result<Tensor<T>> {
        self.binary_op(other, Numeric::mul)
    }

    /// Elementwise division; fails on integer division by zero.
    pub fn div(&self, other: &Tensor<T>) -> Result<Tensor<T>> {
        self.try_binary_op(other, Numeric::div)
    }

    /// Elementwise remainder, with the sign of the dividend. Fails on
    /// integer remainder by zero.
    pub fn rem(&self, other: &Tensor<T>) -> Result<Tensor<T>> {
        self.try_binary_op(other, Numeric::rem)
    }

    /// `self` raised to `other`, evaluated in `f64`.
    pub fn pow(&self, other: &Tensor<T>) -> Result<Tensor<T>> {
        self.binary_op(other, Numeric::pow)
    }

    /// Square root of every element. Integer kinds truncate.
    pub fn sqrt(&self) -> Tensor<T> {
        self.map(Numeric::sqrt)
    }

    /// Elementwise `>`.
    pub fn greater_than(&self, other: &Tensor<T>) -> Result<Tensor<bool>> {
        self.binary_op(other, |a, b| a > b)
    }

    /// Elementwise `<`.
    pub fn less_than(&self, other: &Tensor<T>) -> Result<Tensor<bool>> {
        self.binary_op(other, |a, b| a < b)
    }

    /// Elementwise `>=`.
    pub fn greater_equal(&self, other: &Tensor<T>) -> Result<Tensor<bool>> {
        self.binary_op(other, |a, b| a >= b)
    }

    /// Elementwise `<=`.
    pub fn less_equal(&self, other: &Tensor<T>) -> Result<Tensor<bool>> {
        self.binary_op(other, |a, b| a <= b)
    }

    /// Elementwise `==`. NaN is unequal to everything.
    pub fn equal(&self, other: &Tensor<T>) -> Result<Tensor<bool>> {
        self.binary_op(other, |a, b| a == b)
    }

    /// Elementwise `!=`.
    pub fn not_equal(&self, other: &Tensor<T>) -> Result<Tensor<bool>> {
        self.binary_op(other, |a, b| a != b)
    }

    /// Three-way comparison: -1, 0 or 1 per element.
    pub fn compare(&self, other: &Tensor<T>) -> Result<Tensor<i32>> {
        self.binary_op(other, |a, b| match a.compare(b) {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        })
    }

    /// Convert every element with `as` semantics.
    pub fn cast<U: Numeric>(&self) -> Tensor<U> {
        self.map(<T as Numeric>::cast::<U>)
    }

    /// `true` wherever the element is non-zero.
    pub fn to_bool(&self) -> Tensor<bool> {
        self.map(Numeric::boolean_value)
    }

    /// One for `true`, zero for `false`.
    pub fn from_bool(mask: &Tensor<bool>) -> Tensor<T> {
        mask.map(|b| if b { T::one() } else { T::zero() })
    }
}

impl<T: Integral> Tensor<T> {
    /// Bitwise AND.
    pub fn bit_and(&self, other: &Tensor<T>) -> Result<Tensor<T>> {
        self.binary_op(other, Integral::bit_and)
    }

    /// Bitwise OR.
    pub fn bit_or(&self, other: &Tensor<T>) -> Result<Tensor<T>> {
        self.binary_op(other, Integral::bit_or)
    }

    /// Bitwise XOR.
    pub fn bit_xor(&self, other: &Tensor<T>) -> Result<Tensor<T>> {
        self.binary_op(other, Integral::bit_xor)
    }

    /// Left shift; the amount is masked to the type width.
    pub fn shift_left(&self, other: &Tensor<T>) -> Result<Tensor<T>> {
        self.binary_op(other, Integral::shift_left)
    }

    /// Arithmetic right shift; the amount is masked to the type width.
    pub fn shift_right(&self, other: &Tensor<T>) -> Result<Tensor<T>> {
        self.binary_op(other, Integral::shift_right)
    }

    /// Bitwise complement.
    pub fn bit_not(&self) -> Tensor<T> {
        self.map(Integral::bit_not)
    }
}

impl Tensor<bool> {
    /// Elementwise AND of two masks.
    pub fn logical_and(&self, other: &Tensor<bool>) -> Result<Tensor<bool>> {
        self.binary_op(other, |a, b| a && b)
    }

    /// Elementwise OR of two masks.
    pub fn logical_or(&self, other: &Tensor<bool>) -> Result<Tensor<bool>> {
        self.binary_op(other, |a, b| a || b)
    }

    /// Elementwise XOR of two masks.
    pub fn logical_xor(&self, other: &Tensor<bool>) -> Result<Tensor<bool>> {
        self.binary_op(other, |a, b| a ^ b)
    }

    /// Negate every element of the mask.
    pub fn logical_not(&self) -> Tensor<bool> {
        self.map(|b| !b)
    }
}
