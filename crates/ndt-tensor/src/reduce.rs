//! Reductions along an axis.

use crate::error::{Result, TensorError};
use crate::numeric::Numeric;
use crate::shape::Shape;
use crate::tensor::Tensor;

fn check_reduction(rank: usize, dimension: usize, keep_dimensions: bool) -> Result<()> {
    if dimension >= rank {
        return Err(TensorError::InvalidArgument(format!(
            "cannot reduce dimension {} of a rank {} tensor",
            dimension, rank
        )));
    }
    if rank == 1 && !keep_dimensions {
        return Err(TensorError::invalid(
            "keep_dimensions cannot be false for a rank 1 tensor",
        ));
    }
    Ok(())
}

impl<T: Clone> Tensor<T> {
    /// Fold every element into the cell that shares all of its coordinates
    /// except `dimension`, starting each cell from `identity`.
    ///
    /// With `keep_dimensions` the result has the input's rank and size 1 along
    /// `dimension`; otherwise that axis is removed.
    ///
    /// # Errors
    /// `InvalidArgument` if `dimension` is out of range, or if the input has
    /// rank 1 and `keep_dimensions` is false.
    pub fn reduce_along<A, F>(
        &self,
        identity: A,
        mut acc: F,
        dimension: usize,
        keep_dimensions: bool,
    ) -> Result<Tensor<A>>
    where
        A: Clone,
        F: FnMut(A, T) -> A,
    {
        check_reduction(self.rank(), dimension, keep_dimensions)?;
        let mut kept = self.dims().to_vec();
        kept[dimension] = 1;
        let kept = Shape::from_dims(kept);
        let out_strides = kept.strides();

        let mut cells = vec![identity; kept.numel()];
        for (x, index) in self.to_vec().into_iter().zip(self.indices()) {
            let cell: usize = index
                .iter()
                .zip(&out_strides)
                .enumerate()
                .filter(|&(axis, _)| axis != dimension)
                .map(|(_, (i, s))| i * s)
                .sum();
            let slot = &mut cells[cell];
            *slot = acc(slot.clone(), x);
        }

        let shape = if keep_dimensions {
            kept
        } else {
            let mut dims = self.dims().to_vec();
            dims.remove(dimension);
            Shape::from_dims(dims)
        };
        Ok(Tensor::from_buffer(shape, cells))
    }

    /// Reduce over `dimension` and every axis to its right.
    ///
    /// With `keep_dimensions` the result keeps the input's rank with axes
    /// `dimension..` set to 1; otherwise those axes are removed (a
    /// `dimension` of 0 leaves shape `[1]`).
    pub fn reduce_all<F>(
        &self,
        identity: T,
        acc: F,
        dimension: usize,
        keep_dimensions: bool,
    ) -> Result<Tensor<T>>
    where
        F: FnMut(T, T) -> T,
    {
        check_reduction(self.rank(), dimension, keep_dimensions)?;
        let mut merged = self.dims()[..=dimension].to_vec();
        merged[dimension] = self.dims()[dimension] * self.strides()[dimension];
        let reduced = self
            .reshape(&merged)?
            .reduce_along(identity, acc, dimension, true)?;

        if keep_dimensions {
            let mut dims = self.dims().to_vec();
            dims[dimension..].fill(1);
            return reduced.reshape(&dims);
        }
        if reduced.rank() == 1 {
            return Ok(reduced);
        }
        reduced.squeeze(dimension)
    }
}

impl<T: Numeric> Tensor<T> {
    /// Sum along `dimension`. Integer kinds wrap on overflow.
    pub fn sum(&self, dimension: usize, keep_dimensions: bool) -> Result<Tensor<T>> {
        self.reduce_along(T::zero(), Numeric::add, dimension, keep_dimensions)
    }

    /// Product along `dimension`.
    pub fn product(&self, dimension: usize, keep_dimensions: bool) -> Result<Tensor<T>> {
        self.reduce_along(T::one(), Numeric::mul, dimension, keep_dimensions)
    }

    /// Largest element along `dimension`.
    pub fn max(&self, dimension: usize, keep_dimensions: bool) -> Result<Tensor<T>> {
        self.reduce_along(T::min_value(), Numeric::maximum, dimension, keep_dimensions)
    }

    /// Smallest element along `dimension`.
    pub fn min(&self, dimension: usize, keep_dimensions: bool) -> Result<Tensor<T>> {
        self.reduce_along(T::max_value(), Numeric::minimum, dimension, keep_dimensions)
    }

    /// Arithmetic mean along `dimension`.
    ///
    /// Accumulates in `f64` and converts each cell back once, so integer
    /// kinds neither overflow the sum nor the axis length. Integer results
    /// truncate toward zero.
    pub fn mean(&self, dimension: usize, keep_dimensions: bool) -> Result<Tensor<T>> {
        let totals = self.reduce_along(
            0.0f64,
            |acc, x: T| acc + x.to_f64(),
            dimension,
            keep_dimensions,
        )?;
        let count = self.dims()[dimension] as f64;
        Ok(totals.map(|total| T::from_f64(total / count)))
    }

    /// Population variance along `dimension`, computed in `f64`.
    pub fn variance(&self, dimension: usize, keep_dimensions: bool) -> Result<Tensor<T>> {
        check_reduction(self.rank(), dimension, keep_dimensions)?;
        let n = self.dims()[dimension];
        if n == 1 {
            let mut dims = self.dims().to_vec();
            if keep_dimensions {
                dims[dimension] = 1;
            } else {
                dims.remove(dimension);
            }
            return Tensor::zeros(&dims);
        }
        let values = self.cast::<f64>();
        let mean = values.mean(dimension, true)?;
        let deviation = values.sub(&mean)?;
        let squared = deviation.mul(&deviation)?;
        Ok(squared.mean(dimension, keep_dimensions)?.cast::<T>())
    }

    /// Population standard deviation along `dimension`.
    pub fn std(&self, dimension: usize, keep_dimensions: bool) -> Result<Tensor<T>> {
        Ok(self.variance(dimension, keep_dimensions)?.sqrt())
    }

    /// Position of the largest element along `dimension`; ties resolve to the
    /// first occurrence.
    pub fn argmax(&self, dimension: usize, keep_dimensions: bool) -> Result<Tensor<i32>> {
        self.arg_reduce(dimension, keep_dimensions, |current, element| current >= element)
    }

    /// Position of the smallest element along `dimension`; ties resolve to the
    /// first occurrence.
    pub fn argmin(&self, dimension: usize, keep_dimensions: bool) -> Result<Tensor<i32>> {
        self.arg_reduce(dimension, keep_dimensions, |current, element| current <= element)
    }

    fn arg_reduce<K>(
        &self,
        dimension: usize,
        keep_dimensions: bool,
        mut keep_current: K,
    ) -> Result<Tensor<i32>>
    where
        K: FnMut(T, T) -> bool,
    {
        check_reduction(self.rank(), dimension, keep_dimensions)?;
        let positions = self.indices().map(|index| index[dimension]);
        let pairs: Vec<(usize, T)> = positions.zip(self.to_vec()).collect();
        let pairs = Tensor::from_buffer(self.shape().clone(), pairs);
        let best = pairs.reduce_along(
            None,
            |acc: Option<(usize, T)>, (i, x)| match acc {
                Some((j, y)) if keep_current(y, x) => Some((j, y)),
                _ => Some((i, x)),
            },
            dimension,
            keep_dimensions,
        )?;
        Ok(best.map(|cell| cell.map_or(-1, |(i, _)| i as i32)))
    }
}
