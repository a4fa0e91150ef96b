//! Broadcasting of two operands to a common shape.
//!
//! Shapes are aligned from the trailing dimension. Inside the aligned region
//! every size-1 axis is stretched to its counterpart's size; if one operand
//! has more leading dimensions, the other is replicated across them. All
//! stretching is eager: the returned tensors own compact buffers of the
//! common shape.

use tracing::{debug, trace};

use crate::error::{Result, TensorError};
use crate::shape::Shape;
use crate::tensor::Tensor;

/// Bring `a` and `b` to a common shape.
///
/// Operands that already share a shape are returned as aliases of the
/// inputs, without copying.
///
/// # Errors
/// `InvalidArgument` if some aligned pair of dimensions differs and neither
/// is 1, or if exactly one operand is the empty tensor.
pub fn broadcast<A: Clone, B: Clone>(
    a: &Tensor<A>,
    b: &Tensor<B>,
) -> Result<(Tensor<A>, Tensor<B>)> {
    if a.shape() == b.shape() {
        return Ok((a.alias(), b.alias()));
    }
    if a.is_empty() || b.is_empty() {
        return Err(incompatible(a.shape(), b.shape()));
    }
    let target = Shape::broadcast_shape(a.shape(), b.shape())?;
    debug!(lhs = %a.shape(), rhs = %b.shape(), %target, "broadcasting operands");
    Ok((expand_to(a, &target), expand_to(b, &target)))
}

/// Stretch the size-1 axes of `t` to `target`, then replicate it across the
/// leading dimensions it lacks. Already matching operands are aliased.
fn expand_to<T: Clone>(t: &Tensor<T>, target: &Shape) -> Tensor<T> {
    let lead = target.ndim() - t.rank();
    let mut out = t.alias();
    for (axis, &want) in target.dims()[lead..].iter().enumerate() {
        if out.dims()[axis] != want {
            out = stretch_axis(&out, axis, want);
        }
    }
    if lead > 0 {
        out = replicate_leading(&out, &target.dims()[..lead]);
    }
    out
}

fn incompatible(a: &Shape, b: &Shape) -> TensorError {
    TensorError::InvalidArgument(format!(
        "could not broadcast operands together with shapes {} {}",
        a, b
    ))
}

/// Repeat the size-1 `axis` of `t` `n` times.
fn stretch_axis<T: Clone>(t: &Tensor<T>, axis: usize, n: usize) -> Tensor<T> {
    trace!(shape = %t.shape(), axis, n, "stretching axis");
    let mut dims = t.dims().to_vec();
    dims[axis] = n;
    let shape = Shape::from_dims(dims);
    let data = t.to_vec();
    let strides = t.strides().to_vec();
    let mut source = vec![0; shape.ndim()];
    let stretched = shape
        .indices()
        .take(shape.numel())
        .map(|index| {
            source.copy_from_slice(&index);
            source[axis] = 0;
            data[Shape::flat(&strides, &source)].clone()
        })
        .collect();
    Tensor::from_buffer(shape, stretched)
}

/// Prefix `t` with the `leading` dimensions, copying its content once per
/// leading index.
fn replicate_leading<T: Clone>(t: &Tensor<T>, leading: &[usize]) -> Tensor<T> {
    trace!(shape = %t.shape(), ?leading, "replicating across leading dimensions");
    let copies: usize = leading.iter().product();
    let data = t.to_vec();
    let mut dims = leading.to_vec();
    dims.extend_from_slice(t.dims());
    let mut replicated = Vec::with_capacity(copies * data.len());
    for _ in 0..copies {
        replicated.extend_from_slice(&data);
    }
    Tensor::from_buffer(Shape::from_dims(dims), replicated)
}
