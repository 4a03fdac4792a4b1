//! Grid quadrature rules on reference elements.
//!
//! The rules place points on a regular grid of `np = order + 1` points per direction, with
//! equal weights per grid cell. They are cheap and robust for non-polynomial integrands (and
//! integrate linear functions exactly on edges, quadrilaterals, triangles, hexahedra and
//! prisms), but are not optimal for polynomials.
use crate::element::ElemType;
use crate::error::{Error, Result};
use crate::Real;
use nalgebra::Point3;
use numeric_literals::replace_float_literals;
use std::ops::{AddAssign, Mul};

pub type QuadraturePair<T> = (Vec<T>, Vec<Point3<T>>);

/// A quadrature rule consisting of weights and points in reference coordinates.
pub trait Quadrature<T: Real> {
    fn weights(&self) -> &[T];
    fn points(&self) -> &[Point3<T>];

    /// Approximates the integral of the given function using this quadrature rule.
    fn integrate<U, Function>(&self, f: Function) -> U
    where
        Function: Fn(&Point3<T>) -> U,
        U: num::Zero + Mul<T, Output = U> + AddAssign<U>,
    {
        let mut integral = U::zero();
        for (w, p) in self.weights().iter().zip(self.points()) {
            integral += f(p) * *w;
        }
        integral
    }
}

impl<T: Real> Quadrature<T> for QuadraturePair<T> {
    fn weights(&self) -> &[T] {
        &self.0
    }

    fn points(&self) -> &[Point3<T>] {
        &self.1
    }
}

/// Grid quadrature of a given order on a reference element.
#[derive(Debug, Clone, PartialEq)]
pub struct QGrid<T: Real> {
    elem_type: ElemType,
    order: usize,
    weights: Vec<T>,
    points: Vec<Point3<T>>,
}

impl<T: Real> QGrid<T> {
    pub fn new(elem_type: ElemType, order: usize) -> Result<Self> {
        use ElemType::*;
        let np = order + 1;
        let (weights, points) = match elem_type.first_order_type() {
            NodeElem => (vec![T::one()], vec![Point3::origin()]),
            Edge2 => grid_1d(np),
            Quad4 => tensor_product(&grid_1d(np), &grid_1d(np), 1),
            Hex8 => tensor_product(&tensor_product(&grid_1d(np), &grid_1d(np), 1), &grid_1d(np), 2),
            Tri3 => triangle_grid(np),
            Tet4 => tetrahedron_grid(np),
            Prism6 => tensor_product(&triangle_grid(np), &grid_1d(np), 2),
            _ => {
                return Err(Error::NotImplemented {
                    elem_type,
                    operation: "grid quadrature",
                })
            }
        };
        log::trace!("Built grid quadrature of order {order} on {elem_type:?} with {} points", points.len());
        Ok(Self {
            elem_type,
            order,
            weights,
            points,
        })
    }

    pub fn elem_type(&self) -> ElemType {
        self.elem_type
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn n_points(&self) -> usize {
        self.points.len()
    }
}

impl<T: Real> Quadrature<T> for QGrid<T> {
    fn weights(&self) -> &[T] {
        &self.weights
    }

    fn points(&self) -> &[Point3<T>] {
        &self.points
    }
}

fn from_usize<T: Real>(n: usize) -> T {
    T::from_usize(n).expect("usize must fit in T")
}

/// Midpoints of `np` equal cells of `[-1, 1]`.
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
fn grid_1d<T: Real>(np: usize) -> QuadraturePair<T> {
    let n = from_usize::<T>(np);
    (0..np)
        .map(|i| {
            let x = (2.0 * from_usize::<T>(i) + 1.0) / n - 1.0;
            (2.0 / n, Point3::new(x, 0.0, 0.0))
        })
        .unzip()
}

/// Combines a rule in the leading coordinates with a 1D rule placed along `direction`.
fn tensor_product<T: Real>(leading: &QuadraturePair<T>, trailing: &QuadraturePair<T>, direction: usize) -> QuadraturePair<T> {
    let mut weights = Vec::with_capacity(leading.0.len() * trailing.0.len());
    let mut points = Vec::with_capacity(weights.capacity());
    for (w_trailing, p_trailing) in trailing.0.iter().zip(&trailing.1) {
        for (w_leading, p_leading) in leading.0.iter().zip(&leading.1) {
            let mut p = *p_leading;
            p[direction] = p_trailing.x;
            weights.push(*w_leading * *w_trailing);
            points.push(p);
        }
    }
    (weights, points)
}

/// Centroids of the `np^2` congruent triangles of a uniform subdivision of the reference
/// triangle.
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
fn triangle_grid<T: Real>(np: usize) -> QuadraturePair<T> {
    let n = from_usize::<T>(np);
    let weight = 0.5 / (n * n);
    let mut rule = (Vec::new(), Vec::new());
    for j in 0..np {
        for i in 0..np - j {
            let (x, y) = (from_usize::<T>(i), from_usize::<T>(j));
            rule.0.push(weight);
            rule.1.push(Point3::new((x + 1.0 / 3.0) / n, (y + 1.0 / 3.0) / n, 0.0));
            if i + j + 1 < np {
                rule.0.push(weight);
                rule.1.push(Point3::new((x + 2.0 / 3.0) / n, (y + 2.0 / 3.0) / n, 0.0));
            }
        }
    }
    rule
}

/// Equally weighted points of a regular lattice inside the reference tetrahedron.
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
fn tetrahedron_grid<T: Real>(np: usize) -> QuadraturePair<T> {
    let n = from_usize::<T>(np);
    let mut points = Vec::new();
    for k in 0..np {
        for j in 0..np - k {
            for i in 0..np - k - j {
                let [x, y, z] = [i, j, k].map(from_usize::<T>);
                points.push(Point3::new((x + 0.25) / n, (y + 0.25) / n, (z + 0.25) / n));
            }
        }
    }
    let weight = 1.0 / (6.0 * from_usize::<T>(points.len()));
    (vec![weight; points.len()], points)
}
