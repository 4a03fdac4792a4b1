//! Geometric element quality metrics.
use super::{map, ElemType, TOLERANCE};
use crate::error::{Error, Result};
use crate::geometry::cross_norm;
use crate::Real;
use nalgebra::{Point3, Vector3};
use numeric_literals::replace_float_literals;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElemQuality {
    EdgeLengthRatio,
    AspectRatio,
    Taper,
    Warp,
    Stretch,
    Diagonal,
    Distortion,
    MinAngle,
    MaxAngle,
    Condition,
    Jacobian,
    ScaledJacobian,
    Shear,
    Shape,
    Skew,
    Size,
    Twist,
}

fn is_quad(elem_type: ElemType) -> bool {
    elem_type.first_order_type() == ElemType::Quad4
}

/// Computes quality metric `metric` of an element with node coordinates `points`.
pub fn quality<T: Real>(elem_type: ElemType, points: &[Point3<T>], metric: ElemQuality) -> Result<T> {
    super::check_node_count(elem_type, points)?;
    let specific = if is_quad(elem_type) {
        quad_quality(points, metric)
    } else if elem_type == ElemType::InfHex8 {
        infinite_hex_quality(points, metric)
    } else {
        None
    };
    match specific {
        Some(value) => Ok(value),
        None => generic_quality(elem_type, points, metric),
    }
}

/// The range of acceptable values of `metric`.
///
/// Unknown metrics produce `(-1, -1)`.
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
pub fn qual_bounds<T: Real>(elem_type: ElemType, metric: ElemQuality) -> Result<(T, T)> {
    use ElemQuality::*;
    if elem_type.is_infinite() {
        return Err(Error::NotImplemented {
            elem_type,
            operation: "qual_bounds",
        });
    }
    let bounds = match metric {
        EdgeLengthRatio | AspectRatio => (1.0, 4.0),
        Taper => (0.0, 0.7),
        Warp => (0.9, 1.0),
        Stretch => (0.25, 1.0),
        MinAngle => (45.0, 90.0),
        MaxAngle => (90.0, 135.0),
        Condition => (1.0, 4.0),
        Jacobian | ScaledJacobian => (0.5, 1.0),
        Shear | Shape | Skew | Size => (0.3, 1.0),
        Distortion => (0.6, 1.0),
        Twist => (0.0, 1.0),
        Diagonal => {
            log::warn!("Invalid quality measure {metric:?} chosen for {elem_type:?}");
            (-1.0, -1.0)
        }
    };
    Ok(bounds)
}

fn length<T: Real>(points: &[Point3<T>], a: usize, b: usize) -> T {
    nalgebra::distance(&points[a], &points[b])
}

fn min_max<T: Real>(a: T, b: T) -> (T, T) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
fn quad_quality<T: Real>(points: &[Point3<T>], metric: ElemQuality) -> Option<T> {
    use ElemQuality::*;
    let p = |i: usize| points[i];
    let value = match metric {
        AspectRatio => {
            // Midlines joining opposite edge midpoints
            let midpoint = |a: usize, b: usize| (p(a).coords + p(b).coords) * 0.5;
            let v0 = midpoint(2, 3) - midpoint(0, 1);
            let v1 = midpoint(1, 2) - midpoint(3, 0);
            let (v0_norm, v1_norm) = (v0.norm(), v1.norm());
            if v0_norm == 0.0 || v1_norm == 0.0 {
                return Some(0.0);
            }
            let sin_theta = cross_norm(&v0, &v1) / v0_norm / v1_norm;
            let (min0, max0) = min_max(v0_norm, v1_norm * sin_theta);
            let (min1, max1) = min_max(v0_norm * sin_theta, v1_norm);
            (max0 / min0).max(max1 / min1)
        }
        Distortion | Diagonal => {
            let (d02, d13) = (length(points, 0, 2), length(points, 1, 3));
            if d02 > 0.0 && d13 > 0.0 {
                let (min, max) = min_max(d02, d13);
                min / max
            } else {
                0.0
            }
        }
        Stretch => {
            let min_edge = [(0, 1), (1, 2), (2, 3), (3, 0)]
                .iter()
                .map(|&(a, b)| length(points, a, b))
                .fold(T::max_value().unwrap_or(T::one()), |a, b| a.min(b));
            let d_max = length(points, 0, 2).max(length(points, 1, 3));
            if d_max == 0.0 {
                0.0
            } else {
                T::sqrt(2.0) * min_edge / d_max
            }
        }
        Shape | Skew => {
            // Knupp's algebraic metrics built from the metric tensors of the nodal Jacobians
            let mut tensors = [[T::zero(); 3]; 4];
            let mut alpha = [T::zero(); 4];
            for k in 0..4 {
                let e1 = p((k + 1) % 4) - p(k);
                let e2 = p((k + 3) % 4) - p(k);
                let (t00, t01, t11) = (e1.dot(&e1), e1.dot(&e2), e2.dot(&e2));
                tensors[k] = [t00, t01, t11];
                alpha[k] = (t00 * t11 - t01 * t01).max(0.0).sqrt();
            }
            if alpha.iter().any(|&a| a == 0.0) {
                return Some(0.0);
            }
            let mut den = T::zero();
            for ([t00, _, t11], a) in tensors.iter().zip(&alpha) {
                den += if metric == Shape {
                    (*t00 + *t11) / *a
                } else {
                    (*t00 * *t11).sqrt() / *a
                };
            }
            let numerator = if metric == Shape { 8.0 } else { 4.0 };
            if den == 0.0 {
                0.0
            } else {
                numerator / den
            }
        }
        Twist => {
            let corner = |k: usize| {
                let a = p((k + 1) % 4) - p(k);
                let b = p((k + 3) % 4) - p(k);
                a.cross(&b)
            };
            let corners: Vec<Vector3<T>> = (0..4).map(corner).collect();
            let tol = T::from_f64(TOLERANCE * TOLERANCE).expect("Literal must fit in T");
            if corners.iter().any(|c| c.norm() < tol) {
                0.0
            } else if corners[1..].iter().any(|c| corners[0].dot(c) <= 0.0) {
                0.0
            } else {
                1.0
            }
        }
        Warp => {
            let normal = |k: usize| {
                let a = p((k + 1) % 4) - p(k);
                let b = p((k + 3) % 4) - p(k);
                a.cross(&b).normalize()
            };
            normal(0).dot(&normal(2)).min(normal(1).dot(&normal(3)))
        }
        _ => return None,
    };
    Some(value)
}

/// Metrics of infinite hexahedra only consider the base face.
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
fn infinite_hex_quality<T: Real>(points: &[Point3<T>], metric: ElemQuality) -> Option<T> {
    use ElemQuality::*;
    let edges = [(0, 1), (1, 2), (2, 3), (0, 3)].map(|(a, b)| length(points, a, b));
    let (d02, d13) = (length(points, 0, 2), length(points, 1, 3));
    let value = match metric {
        Diagonal => {
            let (min, max) = min_max(d02, d13);
            min / max
        }
        Taper => {
            let ratio = |a: T, b: T| {
                let (min, max) = min_max(a, b);
                min / max
            };
            ratio(edges[0], edges[2]).min(ratio(edges[3], edges[1]))
        }
        Stretch => {
            let min_edge = edges.iter().fold(edges[0], |a, &b| a.min(b));
            T::sqrt(3.0) * min_edge / d02.max(d13)
        }
        _ => return None,
    };
    Some(value)
}

/// Pairs of vertices joined by an edge of the element.
fn vertex_edges(elem_type: ElemType) -> Vec<(usize, usize)> {
    match elem_type.dim() {
        0 => vec![],
        1 => vec![(0, 1)],
        _ => (0..elem_type.n_edges())
            .filter_map(|e| elem_type.edge_nodes(e).ok())
            .map(|nodes| (nodes[0], nodes[1]))
            .collect(),
    }
}

#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
fn generic_quality<T: Real>(elem_type: ElemType, points: &[Point3<T>], metric: ElemQuality) -> Result<T> {
    use ElemQuality::*;
    let unsupported = Error::UnsupportedQuality { elem_type, metric };
    match metric {
        EdgeLengthRatio => {
            let lengths: Vec<T> = vertex_edges(elem_type)
                .into_iter()
                .map(|(a, b)| length(points, a, b))
                .collect();
            let (first, rest) = lengths.split_first().ok_or(unsupported)?;
            let (min, max) = rest
                .iter()
                .fold((*first, *first), |(min, max), &l| (min.min(l), max.max(l)));
            Ok(if min == 0.0 { 0.0 } else { max / min })
        }
        MinAngle | MaxAngle if elem_type.dim() == 2 && !elem_type.is_infinite() => {
            let n_sides = elem_type.n_sides();
            let mut angles = Vec::with_capacity(n_sides);
            for s in 0..n_sides {
                // Angle at the first vertex of side s, enclosed by side s and the preceding side
                let side = elem_type.side_nodes(s)?;
                let previous = elem_type.side_nodes((s + n_sides - 1) % n_sides)?;
                let a = points[side[1]] - points[side[0]];
                let b = points[previous[0]] - points[side[0]];
                let cos = (a.dot(&b) / (a.norm() * b.norm())).clamp(-1.0, 1.0);
                angles.push(cos.acos() * 180.0 / T::pi());
            }
            let init = angles[0];
            Ok(if metric == MinAngle {
                angles.iter().fold(init, |a, &b| a.min(b))
            } else {
                angles.iter().fold(init, |a, &b| a.max(b))
            })
        }
        Jacobian | ScaledJacobian if elem_type.dim() > 0 => {
            let mut min_value: Option<T> = None;
            for v in 0..elem_type.n_vertices() {
                let xi = elem_type.master_point(v)?;
                let j = map::reference_jacobian(elem_type, points, &xi)?;
                let measure = if j.ncols() == 3 {
                    j.determinant()
                } else {
                    (j.transpose() * &j).determinant().max(0.0).sqrt()
                };
                let value = if metric == ScaledJacobian {
                    let scale = j
                        .column_iter()
                        .fold(T::one(), |acc, column| acc * column.norm());
                    if scale == 0.0 {
                        0.0
                    } else {
                        measure / scale
                    }
                } else {
                    measure
                };
                min_value = Some(min_value.map_or(value, |m| m.min(value)));
            }
            min_value.ok_or(unsupported)
        }
        _ => Err(unsupported),
    }
}
