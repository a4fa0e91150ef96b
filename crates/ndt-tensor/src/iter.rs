use std::iter::FusedIterator;

use crate::error::{Result, TensorError};

/// Row-major iterator over every multi-index of a shape.
///
/// The last dimension varies fastest, which is also the order in which
/// storage is laid out for a compact tensor, so the n-th index yielded has
/// flat position n. Every call site gets its own cursor; cloning an iterator
/// forks an independent traversal from the current position.
///
/// For the rank-0 shape a single empty index is yielded.
#[derive(Debug, Clone)]
pub struct IndexIter {
    dims: Vec<usize>,
    current: Vec<usize>,
    remaining: usize,
}

impl IndexIter {
    pub fn new(dims: &[usize]) -> Self {
        let remaining = if dims.is_empty() {
            1
        } else {
            dims.iter().product()
        };
        IndexIter {
            dims: dims.to_vec(),
            current: vec![0; dims.len()],
            remaining,
        }
    }

    /// Like [`Iterator::next`], but an exhausted iterator is an error.
    pub fn advance(&mut self) -> Result<Vec<usize>> {
        self.next().ok_or(TensorError::NoNextElement)
    }

    fn step(&mut self) {
        for d in (0..self.dims.len()).rev() {
            self.current[d] += 1;
            if self.current[d] < self.dims[d] {
                return;
            }
            self.current[d] = 0;
        }
    }
}

impl Iterator for IndexIter {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.remaining == 0 {
            return None;
        }
        let index = self.current.clone();
        self.remaining -= 1;
        if self.remaining > 0 {
            self.step();
        }
        Some(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for IndexIter {}

impl FusedIterator for IndexIter {}
