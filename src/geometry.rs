//! Small geometric helpers shared by the element topology and the partitioner.
use crate::Real;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Lexicographic comparison of two points, coordinate by coordinate.
///
/// This is the ordering used to decide the orientation of shared edges on quadrilaterals.
pub fn lexicographic_cmp<T: Real>(a: &Point3<T>, b: &Point3<T>) -> Ordering {
    for i in 0..3 {
        if a[i] > b[i] {
            return Ordering::Greater;
        } else if a[i] < b[i] {
            return Ordering::Less;
        }
    }
    Ordering::Equal
}

/// Returns `true` if `a` comes strictly after `b` in the lexicographic point ordering.
pub fn lexicographically_greater<T: Real>(a: &Point3<T>, b: &Point3<T>) -> bool {
    lexicographic_cmp(a, b) == Ordering::Greater
}

pub fn triple_product<T: Real>(a: &Vector3<T>, b: &Vector3<T>, c: &Vector3<T>) -> T {
    a.dot(&b.cross(c))
}

/// Norm of the cross product of two vectors.
pub fn cross_norm<T: Real>(a: &Vector3<T>, b: &Vector3<T>) -> T {
    a.cross(b).norm()
}

/// Axis-aligned bounding box in three dimensions.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox<T: Real> {
    min: Point3<T>,
    max: Point3<T>,
}

impl<T: Real> From<Point3<T>> for BoundingBox<T> {
    fn from(point: Point3<T>) -> Self {
        Self { min: point, max: point }
    }
}

impl<T: Real> BoundingBox<T> {
    pub fn min(&self) -> &Point3<T> {
        &self.min
    }

    pub fn max(&self) -> &Point3<T> {
        &self.max
    }

    /// Computes the minimal bounding box which encloses both `self` and `other`.
    pub fn enclose(&self, other: &Self) -> Self {
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3<T>>) -> Option<Self> {
        let mut points = points.into_iter();
        points.next().map(|first_point| {
            points.fold(BoundingBox::from(*first_point), |aabb, point| {
                aabb.enclose(&BoundingBox::from(*point))
            })
        })
    }

    pub fn extents(&self) -> Vector3<T> {
        self.max - self.min
    }

    /// Maps a point to `[0, 1]^3` relative to the box.
    ///
    /// Degenerate directions (zero extent) map to zero.
    pub fn normalized_coordinates(&self, point: &Point3<T>) -> Vector3<T> {
        let extents = self.extents();
        Vector3::from_fn(|i, _| {
            if extents[i] > T::zero() {
                (point[i] - self.min[i]) / extents[i]
            } else {
                T::zero()
            }
        })
    }
}
