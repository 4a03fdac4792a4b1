//! C1 Hermite functions on edges.
//!
//! The cubic functions interpolate values and first derivatives at the two vertices. Higher
//! orders add the bubbles `x^(i - 4) (x^2 - 1)^2 / i!`, which vanish together with their first
//! derivative at both vertices.
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
        Edge2 | Edge3 if order >= 3 => Ok(()),
        Edge2 | Edge3 => Err(Error::UnsupportedOrder {
            family: FEFamily::Hermite,
            elem_type,
            order,
        }),
        _ => Err(Error::UnsupportedElement {
            family: FEFamily::Hermite,
            elem_type,
        }),
    }
}

pub fn n_dofs(elem_type: ElemType, order: usize) -> Result<usize> {
    check_order(elem_type, order)?;
    Ok(if elem_type == NodeElem { 1 } else { order + 1 })
}

/// A value and a derivative at each vertex.
pub fn n_dofs_at_node(elem_type: ElemType, order: usize, node: usize) -> Result<usize> {
    check_order(elem_type, order)?;
    Ok(match (elem_type, node) {
        (NodeElem, _) => 1,
        (_, 0 | 1) => 2,
        _ => 0,
    })
}

pub fn n_dofs_per_elem(elem_type: ElemType, order: usize) -> Result<usize> {
    check_order(elem_type, order)?;
    Ok(if elem_type == NodeElem { 0 } else { order - 3 })
}

fn factorial<T: Real>(n: usize) -> T {
    (2..=n).fold(T::one(), |acc, k| acc * T::from_usize(k).expect("usize must fit in T"))
}

/// `x^k`, or zero for negative `k`. Negative powers only appear with vanishing coefficients.
fn power<T: Real>(x: T, k: isize) -> T {
    if k < 0 {
        T::zero()
    } else {
        x.powi(k as i32)
    }
}

/// The `n_derivatives`-th derivative of raw function `i` on `[-1, 1]`.
///
/// Functions 0 and 1 interpolate the values at `x = -1` and `x = 1`, functions 2 and 3 have
/// unit slope at `x = -1` and `x = 1` respectively.
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
fn raw_shape<T: Real>(i: usize, x: T, n_derivatives: usize) -> T {
    match (i, n_derivatives) {
        (0, 0) => 0.25 * (2.0 - 3.0 * x + x * x * x),
        (1, 0) => 0.25 * (2.0 + 3.0 * x - x * x * x),
        (2, 0) => 0.25 * (1.0 - x - x * x + x * x * x),
        (3, 0) => 0.25 * (-1.0 - x + x * x + x * x * x),
        (0, 1) => 0.75 * (-1.0 + x * x),
        (1, 1) => 0.75 * (1.0 - x * x),
        (2, 1) => 0.25 * (-1.0 - 2.0 * x + 3.0 * x * x),
        (3, 1) => 0.25 * (-1.0 + 2.0 * x + 3.0 * x * x),
        (0, _) => 1.5 * x,
        (1, _) => -1.5 * x,
        (2, _) => 0.5 * (-1.0 + 3.0 * x),
        (3, _) => 0.5 * (1.0 + 3.0 * x),
        (i, n_derivatives) => {
            let m = i as isize - 4;
            let mf = T::from_isize(m).expect("isize must fit in T");
            let q = x * x - 1.0;
            let numerator = match n_derivatives {
                0 => power(x, m) * q * q,
                1 => mf * power(x, m - 1) * q * q + 4.0 * power(x, m + 1) * q,
                _ => {
                    mf * (mf - 1.0) * power(x, m - 2) * q * q
                        + (8.0 * mf + 4.0) * power(x, m) * q
                        + 8.0 * power(x, m + 2)
                }
            };
            numerator / factorial(i)
        }
    }
}

/// Shape function `i` of an edge, with the derivative functions scaled to unit physical slope.
pub fn shape<T: Real>(i: usize, p: &Point3<T>, derivative: Derivative, scaling: &ScalingCoefficients<T>) -> T {
    let n_derivatives = derivative.orders()[0];
    let x = p.x;
    match i {
        0 => raw_shape(0, x, n_derivatives),
        1 => scaling.d1xd1x * raw_shape(2, x, n_derivatives),
        2 => raw_shape(1, x, n_derivatives),
        3 => scaling.d2xd2x * raw_shape(3, x, n_derivatives),
        _ => raw_shape(i, x, n_derivatives),
    }
}
