use crate::element::ElemType;
use ::proptest::prelude::*;
use nalgebra::Point3;

/// Points in the reference element of the given type.
///
/// Infinite elements are sampled in the reference element of their finite counterpart.
pub fn reference_point(elem_type: ElemType) -> BoxedStrategy<Point3<f64>> {
    use ElemType::*;
    let interval = -1.0..=1.0;
    let unit = 0.0..=1.0;
    match elem_type.first_order_type() {
        NodeElem => Just(Point3::origin()).boxed(),
        Edge2 | InfEdge2 => interval.prop_map(|x| Point3::new(x, 0.0, 0.0)).boxed(),
        Quad4 | InfQuad4 => [interval.clone(), interval]
            .prop_map(|[x, y]| Point3::new(x, y, 0.0))
            .boxed(),
        Tri3 => [unit.clone(), unit]
            .prop_map(|[a, b]| {
                // Reflect points of the unit square outside the triangle back into it
                let (x, y) = if a + b > 1.0 { (1.0 - a, 1.0 - b) } else { (a, b) };
                Point3::new(x, y, 0.0)
            })
            .boxed(),
        Tet4 => [unit.clone(), unit.clone(), unit]
            .prop_map(|mut u| {
                u.sort_by(f64::total_cmp);
                Point3::new(u[0], u[1] - u[0], u[2] - u[1])
            })
            .boxed(),
        Prism6 => (reference_point(Tri3), interval)
            .prop_map(|(p, z)| Point3::new(p.x, p.y, z))
            .boxed(),
        _ => [interval.clone(), interval.clone(), interval]
            .prop_map(|[x, y, z]| Point3::new(x, y, z))
            .boxed(),
    }
}
