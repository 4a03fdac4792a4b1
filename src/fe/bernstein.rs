//! Bernstein polynomial bases on edges, quadrilaterals and triangles.
//!
//! All functions are products of powers of barycentric coordinates, which lets values and
//! derivatives share one representation: a [`Monomial`] is differentiated symbolically before it
//! is evaluated, so derivatives are exact.
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

fn unsupported_order(elem_type: ElemType, order: usize) -> Error {
    Error::UnsupportedOrder {
        family: FEFamily::Bernstein,
        elem_type,
        order,
    }
}

fn check_order(elem_type: ElemType, order: usize) -> Result<()> {
    let supported = match elem_type {
        NodeElem => true,
        Edge2 | Edge3 | Quad9 | Hex27 | Tri7 => order >= 1,
        Quad4 | Hex8 | Tri3 | Tet4 => order == 1,
        Quad8 | Hex20 | Tri6 | Tet10 | Tet14 => (1..=2).contains(&order),
        _ => {
            return Err(Error::UnsupportedElement {
                family: FEFamily::Bernstein,
                elem_type,
            })
        }
    };
    if supported {
        Ok(())
    } else {
        Err(unsupported_order(elem_type, order))
    }
}

pub fn n_dofs(elem_type: ElemType, order: usize) -> Result<usize> {
    check_order(elem_type, order)?;
    let o = order;
    let n = match elem_type {
        NodeElem => 1,
        Edge2 | Edge3 => o + 1,
        Quad4 | Quad8 => [4, 8][o - 1],
        Hex8 | Hex20 => [8, 20][o - 1],
        Quad9 => (o + 1) * (o + 1),
        Hex27 => (o + 1) * (o + 1) * (o + 1),
        Tri3 | Tri6 | Tri7 => (o + 1) * (o + 2) / 2,
        _ => (o + 1) * (o + 2) * (o + 3) / 6,
    };
    Ok(n)
}

pub fn n_dofs_at_node(elem_type: ElemType, order: usize, node: usize) -> Result<usize> {
    check_order(elem_type, order)?;
    let o = order;
    let n = if elem_type == NodeElem || elem_type.is_vertex(node) {
        1
    } else if elem_type.is_edge(node) {
        o - 1
    } else if elem_type.dim() == 3 && elem_type.is_face(node) {
        // Tetrahedral face nodes carry nothing at the supported orders
        if elem_type == Hex27 {
            (o - 1) * (o - 1)
        } else {
            0
        }
    } else if elem_type == Tri7 {
        (o - 1) * o.saturating_sub(2) / 2
    } else if elem_type == Quad9 {
        (o - 1) * (o - 1)
    } else {
        // Centre node of a Hex27
        (o - 1) * (o - 1) * (o - 1)
    };
    Ok(n)
}

pub fn n_dofs_per_elem(elem_type: ElemType, order: usize) -> Result<usize> {
    check_order(elem_type, order)?;
    Ok(match elem_type {
        // An Edge2 has no mid node to carry the interior functions
        Edge2 => order - 1,
        Tri6 => (order - 1) * order.saturating_sub(2) / 2,
        _ => 0,
    })
}

/// A product `coefficient * l0^e0 * l1^e1 * l2^e2` of powers of barycentric coordinates.
#[derive(Debug, Copy, Clone)]
struct Monomial<T> {
    coefficient: T,
    exponents: [usize; 3],
}

/// Barycentric coordinates of a reference point with their constant reference gradients.
struct Barycentric<T> {
    values: [T; 3],
    gradients: [[T; 2]; 3],
}

impl<T: Real> Barycentric<T> {
    /// `((1 - xi) / 2, (1 + xi) / 2)` on the interval `[-1, 1]`.
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn interval(xi: T) -> Self {
        Self {
            values: [0.5 * (1.0 - xi), 0.5 * (1.0 + xi), 0.0],
            gradients: [[-0.5, 0.0], [0.5, 0.0], [0.0, 0.0]],
        }
    }

    /// `(1 - x - y, x, y)` on the reference triangle.
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn triangle(p: &Point3<T>) -> Self {
        Self {
            values: [1.0 - p.x - p.y, p.x, p.y],
            gradients: [[-1.0, -1.0], [1.0, 0.0], [0.0, 1.0]],
        }
    }

    fn differentiate(&self, terms: Vec<Monomial<T>>, direction: usize) -> Vec<Monomial<T>> {
        let mut derivative = Vec::with_capacity(2 * terms.len());
        for term in terms {
            for k in 0..3 {
                let gradient = self.gradients[k][direction];
                if term.exponents[k] == 0 || gradient == T::zero() {
                    continue;
                }
                let mut exponents = term.exponents;
                exponents[k] -= 1;
                let power = T::from_usize(term.exponents[k]).expect("usize must fit in T");
                derivative.push(Monomial {
                    coefficient: term.coefficient * power * gradient,
                    exponents,
                });
            }
        }
        derivative
    }

    /// Evaluates the derivative of `term` taken `orders[j]` times along direction `j`.
    fn evaluate(&self, term: Monomial<T>, orders: [usize; 2]) -> T {
        let mut terms = vec![term];
        for (direction, &order) in orders.iter().enumerate() {
            for _ in 0..order {
                terms = self.differentiate(terms, direction);
            }
        }
        terms
            .iter()
            .map(|term| {
                term.exponents
                    .iter()
                    .zip(&self.values)
                    .fold(term.coefficient, |acc, (&e, &l)| acc * l.powi(e as i32))
            })
            .fold(T::zero(), |acc, value| acc + value)
    }
}

fn binomial<T: Real>(n: usize, k: usize) -> T {
    T::from_usize(num::integer::binomial(n, k)).expect("usize must fit in T")
}

/// The Bernstein polynomial of degree `order` with `Edge3` indexing: `0` and `1` are the
/// vertex functions and `k >= 2` is `B_{k-1}`.
fn edge_monomial<T: Real>(order: usize, index: usize) -> Monomial<T> {
    let k = match index {
        0 => 0,
        1 => order,
        _ => index - 1,
    };
    Monomial {
        coefficient: binomial(order, k),
        exponents: [order - k, k, 0],
    }
}

fn bernstein_1d<T: Real>(order: usize, index: usize, xi: T, n_derivatives: usize) -> T {
    Barycentric::interval(xi).evaluate(edge_monomial(order, index), [n_derivatives, 0])
}

pub fn shape_1d<T: Real>(elem_type: ElemType, order: usize, i: usize, p: &Point3<T>, derivative: Derivative) -> T {
    debug_assert!(matches!(elem_type, Edge2 | Edge3));
    bernstein_1d(order, i, p.x, derivative.orders()[0])
}

pub fn shape_2d<T: Real>(
    elem_type: ElemType,
    order: usize,
    i: usize,
    p: &Point3<T>,
    derivative: Derivative,
    elem: &ElemView<T>,
) -> Result<T> {
    match elem_type {
        Quad8 if order == 2 => Ok(serendipity_shape(i, p, derivative)),
        Quad4 | Quad8 | Quad9 => Ok(tensor_shape(order, i, p, derivative, elem)),
        Tri3 | Tri6 | Tri7 => triangle_shape(elem_type, order, i, p, derivative, elem),
        _ => Err(Error::UnsupportedElement {
            family: FEFamily::Bernstein,
            elem_type,
        }),
    }
}

fn tensor_product<T: Real>(order: usize, i0: usize, i1: usize, p: &Point3<T>, derivative: Derivative) -> T {
    let [d0, d1] = derivative.orders();
    bernstein_1d(order, i0, p.x, d0) * bernstein_1d(order, i1, p.y, d1)
}

/// Tensor product functions, with the edge functions of each edge reversed when the edge runs
/// against the lexicographic order of its vertices.
fn tensor_shape<T: Real>(order: usize, i: usize, p: &Point3<T>, derivative: Derivative, elem: &ElemView<T>) -> T {
    let (mut i0, mut i1) = quad_i0_i1(i, order);
    let greater = |a: usize, b: usize| lexicographically_greater(&elem.point(a), &elem.point(b));
    let edge_functions = order.saturating_sub(1);
    let edge = if (4..4 + 4 * edge_functions).contains(&i) {
        Some((i - 4) / edge_functions)
    } else {
        None
    };
    let reversed = |index: usize| order + 2 - index;
    match edge {
        Some(0) if greater(0, 1) => i0 = reversed(i0),
        Some(1) if greater(1, 2) => i1 = reversed(i1),
        Some(2) if greater(3, 2) => i0 = reversed(i0),
        Some(3) if greater(0, 3) => i1 = reversed(i1),
        _ => {}
    }
    tensor_product(order, i0, i1, p, derivative)
}

/// Second order serendipity functions: the tensor product functions of the vertices and edges,
/// each corrected by a multiple of the discarded interior bubble.
fn serendipity_shape<T: Real>(i: usize, p: &Point3<T>, derivative: Derivative) -> T {
    const I0: [usize; 9] = [0, 1, 1, 0, 2, 1, 2, 0, 2];
    const I1: [usize; 9] = [0, 0, 1, 1, 0, 2, 1, 2, 2];
    const SCALE: [f64; 8] = [-0.25, -0.25, -0.25, -0.25, 0.5, 0.5, 0.5, 0.5];
    let scale = T::from_f64(SCALE[i]).expect("Literal must fit in T");
    tensor_product(2, I0[i], I1[i], p, derivative) + scale * tensor_product(2, I0[8], I1[8], p, derivative)
}

/// Exponents of `(r, x, y)`, with `r = 1 - x - y`, of the triangle functions in the interior of
/// the element. Their enumeration order is fixed per order.
fn triangle_interior_exponents(order: usize) -> &'static [[usize; 3]] {
    match order {
        3 => &[[1, 1, 1]],
        4 => &[[2, 1, 1], [1, 2, 1], [1, 1, 2]],
        5 => &[[3, 1, 1], [2, 1, 2], [2, 2, 1], [1, 1, 3], [1, 3, 1], [1, 2, 2]],
        6 => &[
            [4, 1, 1],
            [3, 1, 2],
            [3, 2, 1],
            [2, 1, 3],
            [2, 3, 1],
            [2, 2, 2],
            [1, 1, 4],
            [1, 2, 3],
            [1, 3, 2],
            [1, 4, 1],
        ],
        _ => &[],
    }
}

fn triangle_exponents(order: usize, i: usize) -> Option<[usize; 3]> {
    let p = order;
    let m = p.saturating_sub(1);
    let exponents = match i {
        0 => [p, 0, 0],
        1 => [0, p, 0],
        2 => [0, 0, p],
        _ if i < 3 + m => {
            let k = i - 3;
            [p - 1 - k, k + 1, 0]
        }
        _ if i < 3 + 2 * m => {
            let k = i - 3 - m;
            [0, p - 1 - k, k + 1]
        }
        _ if i < 3 + 3 * m => {
            let k = i - 3 - 2 * m;
            [p - 1 - k, 0, k + 1]
        }
        _ => *triangle_interior_exponents(order).get(i - 3 - 3 * m)?,
    };
    Some(exponents)
}

/// Triangle functions up to sixth order.
///
/// The functions of an edge are listed from its lower to its higher global node id, which
/// makes neighbors agree on the numbering of shared edge functions.
fn triangle_shape<T: Real>(
    elem_type: ElemType,
    order: usize,
    i: usize,
    p: &Point3<T>,
    derivative: Derivative,
    elem: &ElemView<T>,
) -> Result<T> {
    if order > 6 {
        return Err(unsupported_order(elem_type, order));
    }
    let m = order.saturating_sub(1);
    let mut shape = i;
    for edge in 0..3 {
        let start = 3 + edge * m;
        if !(start..start + m).contains(&i) {
            continue;
        }
        let positive = elem.positive_edge_orientation(edge)?;
        // Edge 2 runs from vertex 2 to vertex 0, while its functions are listed from vertex 0
        let flip = if edge == 2 { !positive } else { positive };
        if flip {
            shape = 2 * start + m - 1 - i;
        }
    }

    let exponents = triangle_exponents(order, shape).ok_or(Error::InvalidShapeIndex {
        family: FEFamily::Bernstein,
        elem_type,
        order,
        index: i,
    })?;
    let [a, b, c] = exponents;
    let term = Monomial {
        coefficient: binomial::<T>(order, a) * binomial(order - a, b),
        exponents: [a, b, c],
    };
    Ok(Barycentric::triangle(p).evaluate(term, derivative.orders()))
}
