//! Geometric (Lagrange) maps from reference to physical coordinates.
use super::{infinite, ElemType};
use crate::error::{Error, Result};
use crate::Real;
use nalgebra::{DMatrix, DVector, Point3, Vector3};
use numeric_literals::replace_float_literals;
use serde::{Deserialize, Serialize};

/// Settings for the Gauss-Newton iteration used to invert element maps.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct InverseMapSettings<T> {
    pub max_iterations: Option<usize>,
    /// Convergence tolerance on the reference coordinate update.
    pub tolerance: T,
}

impl<T: Real> Default for InverseMapSettings<T> {
    fn default() -> Self {
        Self {
            max_iterations: Some(20),
            tolerance: T::from_f64(1e-12).expect("Literal must fit in T"),
        }
    }
}

/// The element type whose Lagrange basis is used as the geometric map.
///
/// Nodes beyond those of the map type (face and interior nodes of enriched elements, or
/// mid-edge nodes of serendipity hexahedra and prisms) do not affect the geometry.
fn map_type(elem_type: ElemType) -> ElemType {
    use ElemType::*;
    match elem_type {
        Tri7 => Tri6,
        Tet14 => Tet10,
        Hex20 => Hex8,
        Prism15 | Prism18 => Prism6,
        other => other,
    }
}

/// 1D Lagrange basis of order 1 or 2 at nodes in `{-1, 0, 1}`, with its derivative.
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
fn lagrange_1d<T: Real>(order: usize, node: T, x: T) -> (T, T) {
    match (order, node) {
        (1, n) if n < 0.0 => (0.5 * (1.0 - x), -0.5),
        (1, _) => (0.5 * (1.0 + x), 0.5),
        (_, n) if n < 0.0 => (0.5 * x * (x - 1.0), x - 0.5),
        (_, n) if n > 0.0 => (0.5 * x * (x + 1.0), x + 0.5),
        _ => (1.0 - x * x, -2.0 * x),
    }
}

fn tensor_product<T: Real>(elem_type: ElemType, xi: &Point3<T>) -> (Vec<T>, Vec<Vector3<T>>) {
    let topology = elem_type.topology();
    let (dim, order) = (topology.dim, topology.default_order);
    let mut values = Vec::with_capacity(topology.n_nodes);
    let mut gradients = Vec::with_capacity(topology.n_nodes);
    for node in topology.master_points() {
        let factors: Vec<(T, T)> = (0..dim)
            .map(|d| lagrange_1d(order, T::from_f64(node[d]).expect("Literal must fit in T"), xi[d]))
            .collect();
        values.push(factors.iter().map(|(v, _)| *v).fold(T::one(), |a, b| a * b));
        gradients.push(Vector3::from_fn(|d, _| {
            if d < dim {
                factors
                    .iter()
                    .enumerate()
                    .map(|(k, (v, dv))| if k == d { *dv } else { *v })
                    .fold(T::one(), |a, b| a * b)
            } else {
                T::zero()
            }
        }));
    }
    (values, gradients)
}

#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
fn quad8<T: Real>(xi: &Point3<T>) -> (Vec<T>, Vec<Vector3<T>>) {
    let (x, y) = (xi.x, xi.y);
    let mut values = Vec::with_capacity(8);
    let mut gradients = Vec::with_capacity(8);
    for node in super::quadrilateral::QUAD8.master_points() {
        let xn = T::from_f64(node[0]).expect("Literal must fit in T");
        let yn = T::from_f64(node[1]).expect("Literal must fit in T");
        if xn != 0.0 && yn != 0.0 {
            let (a, b, c) = (1.0 + x * xn, 1.0 + y * yn, x * xn + y * yn - 1.0);
            values.push(0.25 * a * b * c);
            gradients.push(Vector3::new(
                0.25 * xn * b * (c + a),
                0.25 * yn * a * (c + b),
                0.0,
            ));
        } else if xn == 0.0 {
            values.push(0.5 * (1.0 - x * x) * (1.0 + y * yn));
            gradients.push(Vector3::new(-x * (1.0 + y * yn), 0.5 * yn * (1.0 - x * x), 0.0));
        } else {
            values.push(0.5 * (1.0 + x * xn) * (1.0 - y * y));
            gradients.push(Vector3::new(0.5 * xn * (1.0 - y * y), -y * (1.0 + x * xn), 0.0));
        }
    }
    (values, gradients)
}

/// Barycentric coordinates of a simplex point and their (constant) gradients.
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
fn barycentric<T: Real>(dim: usize, xi: &Point3<T>) -> (Vec<T>, Vec<Vector3<T>>) {
    let mut lambda = vec![1.0 - (0..dim).fold(T::zero(), |acc, d| acc + xi[d])];
    let mut gradients = vec![Vector3::from_fn(|d, _| if d < dim { -1.0 } else { 0.0 })];
    for d in 0..dim {
        lambda.push(xi[d]);
        gradients.push(Vector3::ith(d, 1.0));
    }
    (lambda, gradients)
}

/// Quadratic Lagrange basis on a simplex, with mid-edge nodes on the given vertex pairs.
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
fn quadratic_simplex<T: Real>(dim: usize, edges: &[[usize; 2]], xi: &Point3<T>) -> (Vec<T>, Vec<Vector3<T>>) {
    let (l, dl) = barycentric(dim, xi);
    let mut values: Vec<T> = l.iter().map(|&li| li * (2.0 * li - 1.0)).collect();
    let mut gradients: Vec<Vector3<T>> = l
        .iter()
        .zip(&dl)
        .map(|(&li, dli)| dli * (4.0 * li - 1.0))
        .collect();
    for &[a, b] in edges {
        values.push(4.0 * l[a] * l[b]);
        gradients.push((dl[a] * l[b] + dl[b] * l[a]) * 4.0);
    }
    (values, gradients)
}

#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
fn prism6<T: Real>(xi: &Point3<T>) -> (Vec<T>, Vec<Vector3<T>>) {
    let (tri, dtri) = barycentric(2, xi);
    let mut values = Vec::with_capacity(6);
    let mut gradients = Vec::with_capacity(6);
    for sign in [-1.0, 1.0] {
        let (z, dz) = (0.5 * (1.0 + sign * xi.z), 0.5 * sign);
        for (t, dt) in tri.iter().zip(&dtri) {
            values.push(*t * z);
            gradients.push(Vector3::new(dt.x * z, dt.y * z, *t * dz));
        }
    }
    (values, gradients)
}

/// Values and reference gradients of the geometric shape functions of `elem_type`.
///
/// The returned vectors may be shorter than the number of nodes of the element, see
/// [`ElemType::default_order`]. Infinite elements have no polynomial geometric map.
pub fn shape_functions<T: Real>(elem_type: ElemType, xi: &Point3<T>) -> Result<(Vec<T>, Vec<Vector3<T>>)> {
    use ElemType::*;
    let shapes = match map_type(elem_type) {
        NodeElem => (vec![T::one()], vec![Vector3::zeros()]),
        Edge2 | Edge3 | Quad4 | Quad9 | Hex8 | Hex27 => tensor_product(map_type(elem_type), xi),
        Quad8 => quad8(xi),
        Tri3 => barycentric(2, xi),
        Tri6 => quadratic_simplex(2, &[[0, 1], [1, 2], [2, 0]], xi),
        Tet4 => barycentric(3, xi),
        Tet10 => quadratic_simplex(3, &[[0, 1], [1, 2], [0, 2], [0, 3], [1, 3], [2, 3]], xi),
        Prism6 => prism6(xi),
        InfEdge2 | InfQuad4 | InfHex8 => {
            return Err(Error::NotImplemented {
                elem_type,
                operation: "polynomial geometric map",
            })
        }
        other => unreachable!("{other:?} is mapped to a lower order type"),
    };
    Ok(shapes)
}

/// Maps reference coordinates to physical coordinates.
pub fn map_reference_coords<T: Real>(elem_type: ElemType, points: &[Point3<T>], xi: &Point3<T>) -> Result<Point3<T>> {
    super::check_node_count(elem_type, points)?;
    if elem_type.is_infinite() {
        return infinite::map_reference_coords(elem_type, points, xi);
    }
    let (values, _) = shape_functions(elem_type, xi)?;
    let x = values
        .iter()
        .zip(points)
        .fold(Vector3::zeros(), |acc, (phi, p)| acc + p.coords * *phi);
    Ok(Point3::from(x))
}

/// The `3 x dim` Jacobian of the reference map.
pub fn reference_jacobian<T: Real>(elem_type: ElemType, points: &[Point3<T>], xi: &Point3<T>) -> Result<DMatrix<T>> {
    super::check_node_count(elem_type, points)?;
    if elem_type.is_infinite() {
        return infinite::reference_jacobian(elem_type, points, xi);
    }
    let dim = elem_type.dim();
    let (_, gradients) = shape_functions(elem_type, xi)?;
    let mut jacobian = DMatrix::zeros(3, dim);
    for (grad, p) in gradients.iter().zip(points) {
        for k in 0..dim {
            for i in 0..3 {
                jacobian[(i, k)] += p[i] * grad[k];
            }
        }
    }
    Ok(jacobian)
}

/// Reference coordinates used as the starting point of the inverse map.
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
fn reference_centroid<T: Real>(elem_type: ElemType) -> Point3<T> {
    use ElemType::*;
    match elem_type.first_order_type() {
        Tri3 => Point3::new(1.0 / 3.0, 1.0 / 3.0, 0.0),
        Tet4 => Point3::new(0.25, 0.25, 0.25),
        Prism6 => Point3::new(1.0 / 3.0, 1.0 / 3.0, 0.0),
        _ => Point3::origin(),
    }
}

/// Largest distance between any two vertices.
pub(crate) fn diameter<T: Real>(elem_type: ElemType, points: &[Point3<T>]) -> T {
    let vertices = &points[..elem_type.n_vertices().min(points.len())];
    let mut diameter = T::zero();
    for (i, a) in vertices.iter().enumerate() {
        for b in &vertices[i + 1..] {
            diameter = diameter.max(nalgebra::distance(a, b));
        }
    }
    diameter
}

/// Finds reference coordinates `xi` such that the map of `xi` is closest to `p`.
///
/// For elements whose reference dimension is lower than three, the iteration solves the
/// normal equations of the least-squares problem, so the result is the reference point of the
/// projection of `p` onto the element manifold.
pub fn inverse_map<T: Real>(
    elem_type: ElemType,
    points: &[Point3<T>],
    p: &Point3<T>,
    settings: &InverseMapSettings<T>,
) -> Result<Point3<T>> {
    super::check_node_count(elem_type, points)?;
    if elem_type.is_infinite() {
        return infinite::inverse_map(elem_type, points, p, settings);
    }
    let dim = elem_type.dim();
    let mut xi = reference_centroid(elem_type);
    if dim == 0 {
        return Ok(xi);
    }

    let mut iteration = 0;
    loop {
        let residual = p - map_reference_coords(elem_type, points, &xi)?;
        let j = reference_jacobian(elem_type, points, &xi)?;
        let jt = j.transpose();
        let rhs = &jt * DVector::from_column_slice(residual.as_slice());
        let step = (&jt * &j)
            .full_piv_lu()
            .solve(&rhs)
            .ok_or(Error::InverseMapFailed { iterations: iteration })?;
        for d in 0..dim {
            xi[d] += step[d];
        }
        iteration += 1;

        if step.norm() <= settings.tolerance {
            log::trace!("Inverse map of {elem_type:?} converged in {iteration} iterations");
            return Ok(xi);
        }
        if settings.max_iterations.map_or(false, |max| iteration >= max) {
            log::debug!("Inverse map of {elem_type:?} did not converge in {iteration} iterations");
            return Err(Error::InverseMapFailed { iterations: iteration });
        }
    }
}

/// Whether the physical point `p` lies in the element, up to tolerance `tol`.
///
/// The tolerance applies to reference coordinates. For elements whose reference dimension is
/// lower than three, `p` must additionally lie within `tol` times the element diameter of the
/// element manifold.
pub fn contains_point<T: Real>(elem_type: ElemType, points: &[Point3<T>], p: &Point3<T>, tol: T) -> bool {
    if points.len() != elem_type.n_nodes() {
        return false;
    }
    match elem_type {
        ElemType::NodeElem => return nalgebra::distance(&points[0], p) <= tol,
        ElemType::InfHex8 => return infinite::infinite_hex_contains_point(points, p, tol),
        _ => {}
    }

    let settings = InverseMapSettings::default();
    let Ok(xi) = inverse_map(elem_type, points, p, &settings) else {
        return false;
    };
    if !elem_type.on_reference_element(&xi, tol) {
        return false;
    }
    if elem_type.dim() < 3 {
        let Ok(projection) = map_reference_coords(elem_type, points, &xi) else {
            return false;
        };
        let distance = nalgebra::distance(&projection, p);
        distance <= tol * diameter(elem_type, points)
    } else {
        true
    }
}
