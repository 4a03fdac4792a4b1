//! Infinite elements.
//!
//! An infinite element extends a finite base element (a point, an edge or a quadrilateral)
//! radially to infinity. The rays start at the *origin* of the element, which is chosen so that
//! every base node lies half-way between the origin and the corresponding outer node. With
//! radial reference coordinate `zeta`, the base sits at `zeta = -1`, the outer nodes at
//! `zeta = 0` and infinity corresponds to `zeta = 1`.
use super::{map, ElemType, InverseMapSettings, Topology};
use crate::error::{Error, Result};
use crate::Real;
use nalgebra::{DMatrix, DVector, Point3, Vector3};
use numeric_literals::replace_float_literals;
use ElemType::*;

const INF_HEX8_SIDES: &[&[usize]] = &[&[0, 1, 2, 3], &[0, 1, 4, 5], &[1, 2, 5, 6], &[2, 3, 6, 7], &[3, 0, 7, 4]];
const INF_HEX8_EDGES: &[&[usize]] = &[
    &[0, 1],
    &[1, 2],
    &[2, 3],
    &[0, 3],
    &[0, 4],
    &[1, 5],
    &[2, 6],
    &[3, 7],
];

pub const INF_HEX8: Topology = Topology {
    dim: 3,
    n_nodes: 8,
    n_vertices: 8,
    n_edge_nodes: 0,
    n_face_nodes: 0,
    n_faces: 5,
    n_children: 4,
    default_order: 1,
    side_nodes: INF_HEX8_SIDES,
    side_types: &[Quad4, InfQuad4, InfQuad4, InfQuad4, InfQuad4],
    edge_nodes: INF_HEX8_EDGES,
    edge_types: &[Edge2, Edge2, Edge2, Edge2, InfEdge2, InfEdge2, InfEdge2, InfEdge2],
    edge_sides: &[
        [0, 1],
        [0, 2],
        [0, 3],
        [0, 4],
        [1, 4],
        [1, 2],
        [2, 3],
        [3, 4],
    ],
    master_points: &[
        [-1.0, -1.0, -1.0],
        [1.0, -1.0, -1.0],
        [1.0, 1.0, -1.0],
        [-1.0, 1.0, -1.0],
        [-1.0, -1.0, 0.0],
        [1.0, -1.0, 0.0],
        [1.0, 1.0, 0.0],
        [-1.0, 1.0, 0.0],
    ],
};

/// Every child touches the base. Child `c` touches the lateral sides `c + 1` and `c`, where
/// side 4 plays the role of side 0.
pub fn is_child_on_side(child: usize, side: usize) -> bool {
    side == 0 || child + 1 == side || child == side % 4
}

fn base_type(elem_type: ElemType) -> ElemType {
    match elem_type {
        InfEdge2 => NodeElem,
        InfQuad4 => Edge2,
        _ => Quad4,
    }
}

/// The point from which the rays of an infinite element emanate.
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
pub fn infinite_envelope_origin<T: Real>(elem_type: ElemType, points: &[Point3<T>]) -> Point3<T> {
    let outer = elem_type.n_vertices() / 2;
    Point3::from(points[0].coords * 2.0 - points[outer].coords)
}

fn base_coordinates<T: Real>(elem_type: ElemType, xi: &Point3<T>) -> Point3<T> {
    let radial = elem_type.dim() - 1;
    Point3::from(Vector3::from_fn(|d, _| if d < radial { xi[d] } else { T::zero() }))
}

#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
fn radial_scaling<T: Real>(elem_type: ElemType, xi: &Point3<T>) -> Result<T> {
    let zeta = xi[elem_type.dim() - 1];
    if zeta >= 1.0 {
        return Err(Error::NotImplemented {
            elem_type,
            operation: "mapping the point at infinity",
        });
    }
    Ok(2.0 / (1.0 - zeta))
}

pub fn map_reference_coords<T: Real>(elem_type: ElemType, points: &[Point3<T>], xi: &Point3<T>) -> Result<Point3<T>> {
    let base_type = base_type(elem_type);
    let origin = infinite_envelope_origin(elem_type, points);
    let base = map::map_reference_coords(
        base_type,
        &points[..base_type.n_nodes()],
        &base_coordinates(elem_type, xi),
    )?;
    let t = radial_scaling(elem_type, xi)?;
    Ok(origin + (base - origin) * t)
}

#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
pub fn reference_jacobian<T: Real>(elem_type: ElemType, points: &[Point3<T>], xi: &Point3<T>) -> Result<DMatrix<T>> {
    let base_type = base_type(elem_type);
    let base_points = &points[..base_type.n_nodes()];
    let base_xi = base_coordinates(elem_type, xi);
    let origin = infinite_envelope_origin(elem_type, points);
    let base = map::map_reference_coords(base_type, base_points, &base_xi)?;
    let base_jacobian = map::reference_jacobian(base_type, base_points, &base_xi)?;
    let t = radial_scaling(elem_type, xi)?;

    let radial = elem_type.dim() - 1;
    let mut jacobian = DMatrix::zeros(3, elem_type.dim());
    jacobian
        .columns_mut(0, radial)
        .copy_from(&(base_jacobian * t));
    // d/dzeta of 2 / (1 - zeta) is t^2 / 2
    jacobian
        .column_mut(radial)
        .copy_from(&((base - origin) * (t * t * 0.5)));
    Ok(jacobian)
}

/// Inverts the radial map by Gauss-Newton in the variables `(base coordinates, t)`, with
/// `t = 2 / (1 - zeta)` the radial scaling.
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
pub fn inverse_map<T: Real>(
    elem_type: ElemType,
    points: &[Point3<T>],
    p: &Point3<T>,
    settings: &InverseMapSettings<T>,
) -> Result<Point3<T>> {
    let base_type = base_type(elem_type);
    let base_points = &points[..base_type.n_nodes()];
    let radial = elem_type.dim() - 1;
    let origin = infinite_envelope_origin(elem_type, points);

    let mut base_xi = Point3::origin();
    let base_center = map::map_reference_coords(base_type, base_points, &base_xi)?;
    let center_distance = nalgebra::distance(&base_center, &origin);
    if center_distance == 0.0 {
        return Err(Error::InverseMapFailed { iterations: 0 });
    }
    let mut t = nalgebra::distance(p, &origin) / center_distance;

    let mut iteration = 0;
    loop {
        let base = map::map_reference_coords(base_type, base_points, &base_xi)?;
        let residual: Vector3<T> = p - (origin + (base - origin) * t);
        let mut j = DMatrix::zeros(3, radial + 1);
        j.columns_mut(0, radial)
            .copy_from(&(map::reference_jacobian(base_type, base_points, &base_xi)? * t));
        j.column_mut(radial).copy_from(&(base - origin));

        let jt = j.transpose();
        let step = (&jt * &j)
            .full_piv_lu()
            .solve(&(&jt * DVector::from_column_slice(residual.as_slice())))
            .ok_or(Error::InverseMapFailed { iterations: iteration })?;
        for d in 0..radial {
            base_xi[d] += step[d];
        }
        t += step[radial];
        iteration += 1;

        if step.norm() <= settings.tolerance * t.abs().max(1.0) {
            break;
        }
        if settings.max_iterations.map_or(false, |max| iteration >= max) {
            return Err(Error::InverseMapFailed { iterations: iteration });
        }
    }

    if t <= 0.0 {
        // The point lies behind the origin
        return Err(Error::InverseMapFailed { iterations: iteration });
    }
    let mut xi = base_xi;
    xi[radial] = 1.0 - 2.0 / t;
    Ok(xi)
}

/// Containment test for infinite hexahedra.
///
/// Two cheap envelope tests reject points that are clearly closer to the origin than the base,
/// or that lie in a different direction from the origin. Only the remaining points are mapped
/// back to the reference element.
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
pub fn infinite_hex_contains_point<T: Real>(points: &[Point3<T>], p: &Point3<T>, tol: T) -> bool {
    if points.len() != InfHex8.n_nodes() {
        return false;
    }
    let origin = infinite_envelope_origin(InfHex8, points);
    let base: Vec<Vector3<T>> = points[..4].iter().map(|x| x - origin).collect();

    // The base is not spherical, so its closest point to the origin may be closer than any of
    // its vertices
    let min_vertex_distance_squared = base
        .iter()
        .map(|v| v.norm_squared())
        .fold(T::max_value().unwrap_or(T::one()), |a, b| a.min(b));
    let max_diagonal_squared = (points[0] - points[2])
        .norm_squared()
        .max((points[1] - points[3]).norm_squared());
    let min_distance_squared = min_vertex_distance_squared - 0.5 * max_diagonal_squared;
    let p_o = p - origin;
    if 1.01 * p_o.norm_squared() < min_distance_squared {
        return false;
    }

    // Compare directions on the unit sphere around the origin
    let p_dir = p_o.normalize();
    let directions: Vec<Vector3<T>> = base.iter().map(|v| v.normalize()).collect();
    let max_h = 1.01
        * (directions[0] - directions[2])
            .norm_squared()
            .max((directions[1] - directions[3]).norm_squared());
    if directions
        .iter()
        .any(|d| (p_dir - d).norm_squared() > max_h)
    {
        return false;
    }

    match inverse_map(InfHex8, points, p, &InverseMapSettings::default()) {
        Ok(xi) => InfHex8.on_reference_element(&xi, tol),
        Err(_) => false,
    }
}
