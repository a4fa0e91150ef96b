use crate::error::{Result, TensorError};
use crate::iter::IndexIter;
use std::fmt;

/// A validated tensor shape: every dimension is strictly positive.
///
/// The rank-0 shape is allowed and describes the empty tensor, whose size is 0
/// (not 1 as in scalar-array conventions).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Shape {
    dims: Vec<usize>,
}

impl Shape {
    /// Create a new shape from a vector of dimensions.
    ///
    /// # Errors
    /// Returns `InvalidShape` if any dimension is zero.
    pub fn new(dims: Vec<usize>) -> Result<Self> {
        if dims.contains(&0) {
            return Err(TensorError::InvalidShape(dims));
        }
        Ok(Shape { dims })
    }

    /// Create a shape from a slice of dimensions.
    pub fn from_slice(dims: &[usize]) -> Result<Self> {
        Shape::new(dims.to_vec())
    }

    // Callers guarantee every dimension is positive.
    pub(crate) fn from_dims(dims: Vec<usize>) -> Self {
        debug_assert!(!dims.contains(&0));
        Shape { dims }
    }

    /// The rank-0 shape of the empty tensor.
    pub fn empty() -> Self {
        Shape { dims: Vec::new() }
    }

    /// Number of dimensions (rank).
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Total number of elements; 0 for the rank-0 shape.
    pub fn numel(&self) -> usize {
        if self.dims.is_empty() {
            return 0;
        }
        self.dims.iter().product()
    }

    /// Returns a reference to the underlying dimension sizes.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Row-major strides: each entry is the product of the dimensions to its
    /// right, so `[2, 3, 4]` gives `[12, 4, 1]`.
    pub fn strides(&self) -> Vec<usize> {
        let mut strides = vec![0usize; self.dims.len()];
        let mut stride = 1;
        for i in (0..self.dims.len()).rev() {
            strides[i] = stride;
            stride *= self.dims[i];
        }
        strides
    }

    /// Row-major flat position of `index`, without bounds checks.
    pub(crate) fn flat(strides: &[usize], index: &[usize]) -> usize {
        strides.iter().zip(index).map(|(s, i)| s * i).sum()
    }

    /// A fresh row-major iterator over every multi-index of this shape.
    pub fn indices(&self) -> IndexIter {
        IndexIter::new(&self.dims)
    }

    /// Common shape of `a` and `b` under broadcasting.
    ///
    /// Dimensions are paired from the trailing end. Each pair must be equal or
    /// contain a 1, and the larger size wins. Leading dimensions of the longer
    /// shape carry over unchanged.
    ///
    /// # Errors
    /// `InvalidArgument` if some pair differs and neither side is 1.
    pub fn broadcast_shape(a: &Shape, b: &Shape) -> Result<Shape> {
        let (long, short) = if a.ndim() >= b.ndim() { (a, b) } else { (b, a) };
        let lead = long.ndim() - short.ndim();
        let mut dims = long.dims[..lead].to_vec();
        for (&dl, &ds) in long.dims[lead..].iter().zip(&short.dims) {
            match (dl, ds) {
                _ if dl == ds => dims.push(dl),
                (1, _) => dims.push(ds),
                (_, 1) => dims.push(dl),
                _ => {
                    return Err(TensorError::InvalidArgument(format!(
                        "could not broadcast operands together with shapes {} {}",
                        a, b
                    )));
                }
            }
        }
        Ok(Shape { dims })
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", d)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_shape() {
        let s = Shape::new(vec![2, 3, 4]).unwrap();
        assert_eq!(s.ndim(), 3);
        assert_eq!(s.numel(), 24);
        assert_eq!(s.dims(), &[2, 3, 4]);
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let err = Shape::new(vec![2, 0, 4]).unwrap_err();
        assert_eq!(err, TensorError::InvalidShape(vec![2, 0, 4]));
    }

    #[test]
    fn test_strides() {
        let s = Shape::new(vec![2, 3, 4]).unwrap();
        assert_eq!(s.strides(), vec![12, 4, 1]);
    }

    #[test]
    fn test_size_and_strides_invariants() {
        for dims in [vec![1], vec![5], vec![3, 1], vec![2, 3, 4, 5], vec![1, 1, 7]] {
            let s = Shape::new(dims.clone()).unwrap();
            let strides = s.strides();
            assert_eq!(s.numel(), dims.iter().product::<usize>());
            assert_eq!(strides.len(), s.ndim());
            assert_eq!(strides[s.ndim() - 1], 1);
            for i in 0..s.ndim() {
                assert_eq!(strides[i], dims[i + 1..].iter().product::<usize>());
            }
        }
    }

    #[test]
    fn test_empty_shape() {
        let s = Shape::empty();
        assert_eq!(s.ndim(), 0);
        assert_eq!(s.numel(), 0);
        assert_eq!(s.strides(), Vec::<usize>::new());
    }

    #[test]
    fn test_display() {
        let s = Shape::new(vec![2, 3]).unwrap();
        assert_eq!(s.to_string(), "[2, 3]");
        assert_eq!(Shape::empty().to_string(), "[]");
    }

    #[test]
    fn test_broadcast_same() {
        let a = Shape::new(vec![2, 3]).unwrap();
        let b = Shape::new(vec![2, 3]).unwrap();
        let c = Shape::broadcast_shape(&a, &b).unwrap();
        assert_eq!(c.dims(), &[2, 3]);
    }

    #[test]
    fn test_broadcast_expand() {
        let a = Shape::new(vec![2, 1]).unwrap();
        let b = Shape::new(vec![1, 3]).unwrap();
        let c = Shape::broadcast_shape(&a, &b).unwrap();
        assert_eq!(c.dims(), &[2, 3]);
    }

    #[test]
    fn test_broadcast_different_ndim() {
        let a = Shape::new(vec![3]).unwrap();
        let b = Shape::new(vec![2, 3]).unwrap();
        let c = Shape::broadcast_shape(&a, &b).unwrap();
        assert_eq!(c.dims(), &[2, 3]);
    }

    #[test]
    fn test_broadcast_error() {
        let a = Shape::new(vec![2, 3]).unwrap();
        let b = Shape::new(vec![2, 4]).unwrap();
        let err = Shape::broadcast_shape(&a, &b).unwrap_err();
        assert!(matches!(err, TensorError::InvalidArgument(msg) if msg.contains("could not broadcast")));
    }
}
