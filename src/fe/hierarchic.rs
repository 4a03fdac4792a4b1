//! Hierarchic bases built from integrated Legendre-like monomials.
//!
//! The 1D functions are the two hat functions followed by the bubbles `(x^n - 1) / n!` for
//! even and `(x^n - x) / n!` for odd degrees `n >= 2`. Quadrilateral functions are tensor
//! products of these.
use super::{quad_i0_i1, Derivative};
use crate::element::ElemType;
use crate::error::{Error, Result};
use crate::fe::FEFamily;
use crate::geometry::lexicographically_greater;
use crate::mesh::ElemView;
use crate::Real;
use nalgebra::Point3;
use numeric_literals::replace_float_literals;
use ElemType::*;

fn check_order(family: FEFamily, elem_type: ElemType, order: usize) -> Result<()> {
    let supported = match elem_type {
        NodeElem => true,
        Edge2 | Edge3 | Quad8 | Quad9 => order >= 1,
        Quad4 => order == 1,
        _ => return Err(Error::UnsupportedElement { family, elem_type }),
    };
    if supported {
        Ok(())
    } else {
        Err(Error::UnsupportedOrder {
            family,
            elem_type,
            order,
        })
    }
}

pub fn n_dofs(family: FEFamily, elem_type: ElemType, order: usize) -> Result<usize> {
    check_order(family, elem_type, order)?;
    Ok(match elem_type.dim() {
        0 => 1,
        1 => order + 1,
        _ => (order + 1) * (order + 1),
    })
}

pub fn n_dofs_at_node(elem_type: ElemType, order: usize, node: usize) -> Result<usize> {
    check_order(FEFamily::Hierarchic, elem_type, order)?;
    let n = if elem_type == NodeElem || elem_type.is_vertex(node) {
        1
    } else if elem_type.is_edge(node) {
        order - 1
    } else {
        // Centre node of a Quad9
        (order - 1) * (order - 1)
    };
    Ok(n)
}

pub fn n_dofs_per_elem(elem_type: ElemType, order: usize) -> Result<usize> {
    check_order(FEFamily::Hierarchic, elem_type, order)?;
    Ok(match elem_type {
        Edge2 => order - 1,
        // Serendipity quads have no centre node, the bubbles belong to the element
        Quad8 => (order - 1) * (order - 1),
        _ => 0,
    })
}

pub fn side_n_dofs(elem_type: ElemType) -> Result<usize> {
    match elem_type {
        NodeElem => Ok(1),
        Edge2 | Edge3 => Ok(2),
        _ => Err(Error::UnsupportedElement {
            family: FEFamily::SideHierarchic,
            elem_type,
        }),
    }
}

/// One function per side node of an edge, nothing on the mid node.
pub fn side_n_dofs_at_node(elem_type: ElemType, node: usize) -> Result<usize> {
    side_n_dofs(elem_type)?;
    Ok(if elem_type == NodeElem || elem_type.is_vertex(node) {
        1
    } else {
        0
    })
}

/// `x^n / n!`, accumulated factor by factor so that neither the power nor the factorial can
/// overflow on its own.
fn scaled_power<T: Real>(x: T, n: usize) -> T {
    (1..=n).fold(T::one(), |acc, k| {
        acc * x / T::from_usize(k).expect("usize must fit in T")
    })
}

/// The `n_derivatives`-th derivative of the 1D hierarchic function `i`.
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
fn hierarchic_1d<T: Real>(i: usize, xi: T, n_derivatives: usize) -> T {
    match (i, n_derivatives) {
        (0, 0) => 0.5 * (1.0 - xi),
        (1, 0) => 0.5 * (1.0 + xi),
        (0, 1) => -0.5,
        (1, 1) => 0.5,
        (0 | 1, _) => 0.0,
        (n, 0) if n % 2 == 0 => scaled_power(xi, n) - scaled_power(1.0, n),
        (n, 0) => scaled_power(xi, n) - xi * scaled_power(1.0, n),
        (n, 1) if n % 2 == 0 => scaled_power(xi, n - 1),
        (n, 1) => scaled_power(xi, n - 1) - scaled_power(1.0, n),
        (n, _) => scaled_power(xi, n - 2),
    }
}

pub fn shape_1d<T: Real>(i: usize, p: &Point3<T>, derivative: Derivative) -> T {
    hierarchic_1d(i, p.x, derivative.orders()[0])
}

/// Tensor product hierarchic functions on a quadrilateral.
///
/// Odd degree edge functions are negated when the edge runs against the lexicographic order of
/// its vertices. Without an element no function is negated, which gives the discontinuous
/// variant of the basis.
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
pub fn shape_2d<T: Real>(order: usize, i: usize, p: &Point3<T>, derivative: Derivative, elem: Option<&ElemView<T>>) -> T {
    let (i0, i1) = quad_i0_i1(i, order);
    let odd = |k: usize| k > 2 && k % 2 == 1;
    let sign = match elem {
        Some(elem) => {
            let greater = |a: usize, b: usize| lexicographically_greater(&elem.point(a), &elem.point(b));
            let flipped = if odd(i0) && i1 == 0 {
                greater(0, 1)
            } else if odd(i0) && i1 == 1 {
                greater(3, 2)
            } else if i0 == 0 && odd(i1) {
                greater(0, 3)
            } else if i0 == 1 && odd(i1) {
                greater(1, 2)
            } else {
                false
            };
            if flipped {
                -1.0
            } else {
                1.0
            }
        }
        None => 1.0,
    };
    let [d0, d1] = derivative.orders();
    sign * hierarchic_1d(i0, p.x, d0) * hierarchic_1d(i1, p.y, d1)
}

/// Indicator of the side closest to `p`: function `1` on the right half of the edge, function
/// `0` on the left.
pub fn side_shape_1d<T: Real>(i: usize, p: &Point3<T>, derivative: Derivative) -> T {
    let right_side = p.x > T::zero();
    if derivative == Derivative::Value && right_side == (i == 1) {
        T::one()
    } else {
        T::zero()
    }
}
