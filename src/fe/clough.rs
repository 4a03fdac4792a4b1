//! Clough-Tocher cubics on edges.
//!
//! The cubics are defined on `t = (xi + 1) / 2` in `[0, 1]`. Derivatives with respect to the
//! reference coordinate `xi` pick up a factor `1 / 2` per order, and the slope functions are
//! scaled by `dx/dt = 2 dx/dxi`.
use super::{Derivative, ScalingCoefficients};
use crate::element::ElemType;
use crate::error::{Error, Result};
use crate::fe::FEFamily;
use crate::Real;
use nalgebra::Point3;
use numeric_literals::replace_float_literals;
use ElemType::*;

fn check_order(elem_type: ElemType, order: usize) -> Result<()> {
    match elem_type {
        NodeElem => Ok(()),
        Edge2 | Edge3 if order == 3 => Ok(()),
        Edge2 | Edge3 => Err(Error::UnsupportedOrder {
            family: FEFamily::Clough,
            elem_type,
            order,
        }),
        _ => Err(Error::UnsupportedElement {
            family: FEFamily::Clough,
            elem_type,
        }),
    }
}

pub fn n_dofs(elem_type: ElemType, order: usize) -> Result<usize> {
    check_order(elem_type, order)?;
    Ok(if elem_type == NodeElem { 1 } else { 4 })
}

pub fn n_dofs_at_node(elem_type: ElemType, order: usize, node: usize) -> Result<usize> {
    check_order(elem_type, order)?;
    Ok(match (elem_type, node) {
        (NodeElem, _) => 1,
        (_, 0 | 1) => 2,
        _ => 0,
    })
}

/// Cubic functions of `t` in `[0, 1]`: values at `t = 0` and `t = 1`, then unit slopes at
/// `t = 0` and `t = 1`.
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
fn raw_shape<T: Real>(i: usize, t: T, n_derivatives: usize) -> T {
    match (i, n_derivatives) {
        (0, 0) => 1.0 - 3.0 * t * t + 2.0 * t * t * t,
        (1, 0) => 3.0 * t * t - 2.0 * t * t * t,
        (2, 0) => t - 2.0 * t * t + t * t * t,
        (3, 0) => -t * t + t * t * t,
        (0, 1) => -6.0 * t + 6.0 * t * t,
        (1, 1) => 6.0 * t - 6.0 * t * t,
        (2, 1) => 1.0 - 4.0 * t + 3.0 * t * t,
        (3, 1) => -2.0 * t + 3.0 * t * t,
        (0, _) => -6.0 + 12.0 * t,
        (1, _) => 6.0 - 12.0 * t,
        (2, _) => -4.0 + 6.0 * t,
        _ => -2.0 + 6.0 * t,
    }
}

/// Shape function `i` at reference point `p`, with derivatives taken with respect to the
/// reference coordinate `xi = 2 t - 1`.
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
pub fn shape<T: Real>(i: usize, p: &Point3<T>, derivative: Derivative, scaling: &ScalingCoefficients<T>) -> T {
    let n_derivatives = derivative.orders()[0];
    let t = 0.5 * (p.x + 1.0);
    let chain_rule = T::powi(0.5, n_derivatives as i32);
    // The derivative functions carry dx/dt = 2 dx/dxi
    let coefficient = match i {
        2 => 2.0 * scaling.d1xd1x,
        3 => 2.0 * scaling.d2xd2x,
        _ => 1.0,
    };
    coefficient * chain_rule * raw_shape(i, t, n_derivatives)
}
