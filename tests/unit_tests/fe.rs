use crate::reference_element_mesh;
use fenris_fe::element::ElemType;
use fenris_fe::error::Error;
use fenris_fe::fe::{shape, shape_deriv, shape_second_deriv, FEContinuity, FEFamily, FEType, ShapeEvaluator};
use fenris_fe::mesh::{ElemView, Mesh};
use fenris_fe::proptest::reference_point;
use matrixcompare::assert_scalar_eq;
use nalgebra::Point3;
use paste::paste;
use proptest::prelude::*;

const FAMILIES: [FEFamily; 6] = [
    FEFamily::Bernstein,
    FEFamily::Hierarchic,
    FEFamily::L2Hierarchic,
    FEFamily::SideHierarchic,
    FEFamily::Hermite,
    FEFamily::Clough,
];

#[test]
fn n_dofs_of_selected_types() {
    let bernstein = |order| FEType::new(FEFamily::Bernstein, order);
    assert_eq!(bernstein(2).n_dofs(ElemType::Tri6), Ok(6));
    assert_eq!(bernstein(2).n_dofs(ElemType::Quad9), Ok(9));
    assert_eq!(bernstein(3).n_dofs(ElemType::Quad9), Ok(16));
    assert_eq!(bernstein(4).n_dofs(ElemType::Edge2), Ok(5));
    assert_eq!(bernstein(2).n_dofs(ElemType::Hex27), Ok(27));
    assert_eq!(bernstein(2).n_dofs(ElemType::Tet10), Ok(10));
    assert_eq!(bernstein(5).n_dofs(ElemType::Tri7), Ok(21));
    assert_eq!(bernstein(0).n_dofs(ElemType::NodeElem), Ok(1));
    assert_eq!(
        bernstein(4).n_dofs(ElemType::Tri6),
        Err(Error::UnsupportedOrder {
            family: FEFamily::Bernstein,
            elem_type: ElemType::Tri6,
            order: 4
        })
    );

    assert_eq!(FEType::new(FEFamily::Hierarchic, 3).n_dofs(ElemType::Quad8), Ok(16));
    assert_eq!(FEType::new(FEFamily::L2Hierarchic, 2).n_dofs(ElemType::Edge3), Ok(3));
    assert_eq!(FEType::new(FEFamily::SideHierarchic, 1).n_dofs(ElemType::Edge3), Ok(2));
    assert_eq!(FEType::new(FEFamily::Hermite, 5).n_dofs(ElemType::Edge3), Ok(6));
    assert_eq!(FEType::new(FEFamily::Clough, 3).n_dofs(ElemType::Edge2), Ok(4));
    assert_eq!(FEType::new(FEFamily::Hermite, 3).n_dofs_per_elem(ElemType::Edge2), Ok(0));
    assert_eq!(FEType::new(FEFamily::Hermite, 3).n_dofs_at_node(ElemType::Edge2, 1), Ok(2));
}

#[test]
fn dofs_are_distributed_over_nodes_and_element() {
    for family in FAMILIES {
        for elem_type in ElemType::ALL {
            for order in 0..=6 {
                let fe_type = FEType::new(family, order);
                let Ok(n_dofs) = fe_type.n_dofs(elem_type) else {
                    continue;
                };
                let at_nodes: usize = (0..elem_type.n_nodes())
                    .map(|node| fe_type.n_dofs_at_node(elem_type, node).unwrap())
                    .sum();
                let per_elem = fe_type.n_dofs_per_elem(elem_type).unwrap();
                assert_eq!(at_nodes + per_elem, n_dofs, "{fe_type:?} on {elem_type:?}");
            }
        }
    }
}

#[test]
fn continuity_and_hierarchy_of_families() {
    let fe = |family| FEType::new(family, 3);
    assert_eq!(fe(FEFamily::Bernstein).continuity(), FEContinuity::C0);
    assert_eq!(fe(FEFamily::Hierarchic).continuity(), FEContinuity::C0);
    assert_eq!(fe(FEFamily::L2Hierarchic).continuity(), FEContinuity::Discontinuous);
    assert_eq!(fe(FEFamily::SideHierarchic).continuity(), FEContinuity::SideDiscontinuous);
    assert_eq!(fe(FEFamily::Hermite).continuity(), FEContinuity::C1);
    assert_eq!(fe(FEFamily::Clough).continuity(), FEContinuity::C1);

    assert!(fe(FEFamily::Hierarchic).is_hierarchic());
    assert!(fe(FEFamily::Hermite).is_hierarchic());
    assert!(!fe(FEFamily::Bernstein).is_hierarchic());
    assert!(!fe(FEFamily::Clough).is_hierarchic());
}

#[test]
fn evaluation_errors() {
    let origin = Point3::origin();
    let requires_orientation = |family, elem_type, order| {
        matches!(
            FEType::new(family, order).shape_for_type(elem_type, 0, &origin),
            Err(Error::OrientationRequired(_))
        )
    };
    assert!(requires_orientation(FEFamily::Bernstein, ElemType::Quad9, 2));
    assert!(requires_orientation(FEFamily::Bernstein, ElemType::Tri6, 2));
    assert!(requires_orientation(FEFamily::Hierarchic, ElemType::Quad9, 2));
    assert!(requires_orientation(FEFamily::Hermite, ElemType::Edge2, 3));
    assert!(requires_orientation(FEFamily::Clough, ElemType::Edge2, 3));

    assert!(FEType::new(FEFamily::L2Hierarchic, 2)
        .shape_for_type(ElemType::Quad9, 0, &origin)
        .is_ok());
    assert!(FEType::new(FEFamily::Bernstein, 2)
        .shape_for_type(ElemType::Edge3, 0, &origin)
        .is_ok());

    let bernstein = FEType::new(FEFamily::Bernstein, 2);
    assert_eq!(
        bernstein.shape_for_type(ElemType::Edge3, 3, &origin),
        Err(Error::InvalidShapeIndex {
            family: FEFamily::Bernstein,
            elem_type: ElemType::Edge3,
            order: 2,
            index: 3
        })
    );
    assert_eq!(
        bernstein.shape_deriv_for_type(ElemType::Edge3, 0, 1, &origin),
        Err(Error::InvalidDerivative {
            elem_type: ElemType::Edge3,
            direction: 1
        })
    );
    assert_eq!(
        bernstein.shape_second_deriv_for_type(ElemType::Edge3, 0, 1, &origin),
        Err(Error::InvalidDerivative {
            elem_type: ElemType::Edge3,
            direction: 1
        })
    );
    assert_eq!(
        bernstein.shape_for_type(ElemType::InfQuad4, 0, &origin),
        Err(Error::UnsupportedElement {
            family: FEFamily::Bernstein,
            elem_type: ElemType::InfQuad4
        })
    );
    assert_eq!(
        FEType::new(FEFamily::Hermite, 3).shape_for_type(ElemType::Quad4, 0, &origin),
        Err(Error::UnsupportedElement {
            family: FEFamily::Hermite,
            elem_type: ElemType::Quad4
        })
    );
    assert!(matches!(
        FEType::new(FEFamily::Clough, 4).shape_for_type(ElemType::Edge2, 0, &origin),
        Err(Error::UnsupportedOrder { .. })
    ));

    let (mesh, id) = reference_element_mesh(ElemType::Quad4);
    let quad = mesh.elem_view(id).unwrap();
    assert_eq!(
        shape(FEType::new(FEFamily::Bernstein, 3), &quad, 0, &origin),
        Err(Error::UnsupportedOrder {
            family: FEFamily::Bernstein,
            elem_type: ElemType::Quad4,
            order: 3
        })
    );

    let (mesh, id) = reference_element_mesh(ElemType::Tri7);
    let tri = mesh.elem_view(id).unwrap();
    assert!(matches!(
        shape(FEType::new(FEFamily::Bernstein, 7), &tri, 0, &Point3::new(0.2, 0.2, 0.0)),
        Err(Error::UnsupportedOrder { .. })
    ));
}

#[test]
fn point_elements_have_a_single_constant_function() {
    for family in FAMILIES {
        let fe_type = FEType::new(family, 1);
        assert_eq!(fe_type.n_dofs(ElemType::NodeElem), Ok(1));
        assert_eq!(fe_type.shape_for_type(ElemType::NodeElem, 0, &Point3::<f64>::origin()), Ok(1.0));
    }
}

#[test]
fn side_hierarchic_functions_indicate_the_closest_side() {
    let fe_type = FEType::new(FEFamily::SideHierarchic, 1);
    let at = |x: f64| Point3::new(x, 0.0, 0.0);
    assert_eq!(fe_type.shape_for_type(ElemType::Edge3, 0, &at(-0.5)), Ok(1.0));
    assert_eq!(fe_type.shape_for_type(ElemType::Edge3, 1, &at(-0.5)), Ok(0.0));
    assert_eq!(fe_type.shape_for_type(ElemType::Edge3, 0, &at(0.5)), Ok(0.0));
    assert_eq!(fe_type.shape_for_type(ElemType::Edge3, 1, &at(0.5)), Ok(1.0));
    assert_eq!(fe_type.shape_deriv_for_type(ElemType::Edge3, 1, 0, &at(0.5)), Ok(0.0));
}

#[test]
fn hierarchic_edge_functions_are_nested() {
    // The functions of order p are the first functions of order p + 1
    let x = Point3::new(0.3, 0.0, 0.0);
    for order in 1..6 {
        let low = FEType::new(FEFamily::Hierarchic, order);
        let high = FEType::new(FEFamily::Hierarchic, order + 1);
        for i in 0..=order {
            assert_eq!(
                low.shape_for_type(ElemType::Edge3, i, &x),
                high.shape_for_type(ElemType::Edge3, i, &x)
            );
        }
    }
}

fn all_shapes(fe_type: FEType, elem: &ElemView<f64>, p: &Point3<f64>) -> Vec<f64> {
    let n = fe_type.n_dofs(elem.elem_type()).unwrap();
    (0..n).map(|i| shape(fe_type, elem, i, p).unwrap()).collect()
}

#[test]
fn shape_functions_are_kronecker_at_vertices() {
    let cases = [
        (FEFamily::Bernstein, ElemType::Edge3, 1..=6),
        (FEFamily::Bernstein, ElemType::Quad9, 1..=6),
        (FEFamily::Bernstein, ElemType::Tri7, 1..=6),
        (FEFamily::Bernstein, ElemType::Quad8, 1..=2),
        (FEFamily::Hierarchic, ElemType::Edge3, 1..=6),
        (FEFamily::Hierarchic, ElemType::Quad9, 1..=6),
    ];
    for (family, elem_type, orders) in cases {
        let (mesh, id) = reference_element_mesh(elem_type);
        let elem = mesh.elem_view(id).unwrap();
        for order in orders {
            let fe_type = FEType::new(family, order);
            for vertex in 0..elem_type.n_vertices() {
                let values = all_shapes(fe_type, &elem, &elem.point(vertex));
                for (i, value) in values.into_iter().enumerate() {
                    let expected = if i == vertex { 1.0 } else { 0.0 };
                    assert_scalar_eq!(value, expected, comp = abs, tol = 1e-12);
                }
            }
        }
    }
}

fn sum_of_shapes(fe_type: FEType, elem_type: ElemType, p: &Point3<f64>) -> f64 {
    let (mesh, id) = reference_element_mesh(elem_type);
    let elem = mesh.elem_view(id).unwrap();
    all_shapes(fe_type, &elem, p).into_iter().sum()
}

proptest! {
    #[test]
    fn bernstein_edge_is_partition_of_unity(p in reference_point(ElemType::Edge3)) {
        for order in 1..=6 {
            let sum = sum_of_shapes(FEType::new(FEFamily::Bernstein, order), ElemType::Edge3, &p);
            prop_assert!((sum - 1.0).abs() <= 1e-12);
        }
    }

    #[test]
    fn bernstein_quad_is_partition_of_unity(p in reference_point(ElemType::Quad9)) {
        for order in 1..=6 {
            let sum = sum_of_shapes(FEType::new(FEFamily::Bernstein, order), ElemType::Quad9, &p);
            prop_assert!((sum - 1.0).abs() <= 1e-12);
        }
        let sum = sum_of_shapes(FEType::new(FEFamily::Bernstein, 2), ElemType::Quad8, &p);
        prop_assert!((sum - 1.0).abs() <= 1e-12);
    }

    #[test]
    fn bernstein_triangle_is_partition_of_unity(p in reference_point(ElemType::Tri7)) {
        for order in 1..=6 {
            let sum = sum_of_shapes(FEType::new(FEFamily::Bernstein, order), ElemType::Tri7, &p);
            prop_assert!((sum - 1.0).abs() <= 1e-12);
        }
        let sum = sum_of_shapes(FEType::new(FEFamily::Bernstein, 2), ElemType::Tri6, &p);
        prop_assert!((sum - 1.0).abs() <= 1e-12);
    }
}

/// Compares first and second derivatives with central differences of the next lower
/// derivative.
fn check_derivatives(fe_type: FEType, elem_type: ElemType, p: &Point3<f64>) {
    let (mesh, id) = reference_element_mesh(elem_type);
    let elem = mesh.elem_view(id).unwrap();
    let h = 1e-6;
    let dim = elem_type.dim();
    let shifted = |direction: usize, delta: f64| {
        let mut q = *p;
        q[direction] += delta;
        q
    };

    for i in 0..fe_type.n_dofs(elem_type).unwrap() {
        for j in 0..dim {
            let forward = shape(fe_type, &elem, i, &shifted(j, h)).unwrap();
            let backward = shape(fe_type, &elem, i, &shifted(j, -h)).unwrap();
            let exact = shape_deriv(fe_type, &elem, i, j, p).unwrap();
            assert_scalar_eq!(exact, (forward - backward) / (2.0 * h), comp = abs, tol = 1e-5);
        }
        for j in 0..dim * (dim + 1) / 2 {
            let (a, b) = match (dim, j) {
                (1, _) | (_, 0) => (0, 0),
                (_, 1) => (0, 1),
                _ => (1, 1),
            };
            let forward = shape_deriv(fe_type, &elem, i, a, &shifted(b, h)).unwrap();
            let backward = shape_deriv(fe_type, &elem, i, a, &shifted(b, -h)).unwrap();
            let exact = shape_second_deriv(fe_type, &elem, i, j, p).unwrap();
            assert_scalar_eq!(exact, (forward - backward) / (2.0 * h), comp = abs, tol = 1e-5);
        }
    }
}

macro_rules! derivative_tests {
    ($($family:ident, $elem_type:ident, $orders:expr;)*) => {
        paste! {
            proptest! {
                #![proptest_config(ProptestConfig::with_cases(32))]
                $(
                #[test]
                fn [<$family:snake _ $elem_type:snake _derivatives_match_finite_differences>](
                    p in reference_point(ElemType::$elem_type)
                ) {
                    for order in $orders {
                        check_derivatives(FEType::new(FEFamily::$family, order), ElemType::$elem_type, &p);
                    }
                }
                )*
            }
        }
    };
}

derivative_tests! {
    Bernstein, Edge3, 1..=6;
    Bernstein, Quad9, 1..=6;
    Bernstein, Quad8, 1..=2;
    Bernstein, Tri7, 1..=6;
    Bernstein, Tri6, 1..=2;
    Hierarchic, Edge3, 1..=6;
    Hierarchic, Quad9, 1..=6;
    L2Hierarchic, Quad9, 1..=4;
    Hermite, Edge2, 3..=6;
    Clough, Edge2, 3..=3;
}

/// Two `Quad9` elements sharing the edge `x = 1`, traversed in opposite directions.
fn quad9_pair() -> (Mesh<f64>, usize, usize) {
    let coords = [
        (0.0, 0.0),
        (1.0, 0.0),
        (1.0, 1.0),
        (0.0, 1.0),
        (0.5, 0.0),
        (1.0, 0.5),
        (0.5, 1.0),
        (0.0, 0.5),
        (0.5, 0.5),
        (2.0, 1.0),
        (2.0, 0.0),
        (1.5, 1.0),
        (1.5, 0.0),
        (2.0, 0.5),
        (1.5, 0.5),
    ];
    let vertices = coords.iter().map(|&(x, y)| Point3::new(x, y, 0.0)).collect();
    let mut mesh = Mesh::from_vertices(vertices);
    let a = mesh.add_elem(ElemType::Quad9, (0..9).collect()).unwrap();
    let b = mesh
        .add_elem(ElemType::Quad9, vec![9, 2, 1, 10, 11, 5, 12, 13, 14])
        .unwrap();
    (mesh, a, b)
}

#[test]
fn quad_bases_are_continuous_across_shared_edge() {
    let (mesh, a, b) = quad9_pair();
    let (a, b) = (mesh.elem_view(a).unwrap(), mesh.elem_view(b).unwrap());
    for family in [FEFamily::Bernstein, FEFamily::Hierarchic] {
        for order in 2..=5 {
            let fe_type = FEType::new(family, order);
            // Edge 1 of both elements is the shared edge
            let edge_functions = order + 3..2 * order + 2;
            let mut pairs = vec![(1, 2), (2, 1)];
            pairs.extend(edge_functions.clone().map(|i| (i, i)));

            for y in [0.0, 0.1, 0.35, 0.5, 0.8, 1.0] {
                let pa = Point3::new(1.0, 2.0 * y - 1.0, 0.0);
                let pb = Point3::new(1.0, 1.0 - 2.0 * y, 0.0);
                for &(ia, ib) in &pairs {
                    let value_a = shape(fe_type, &a, ia, &pa).unwrap();
                    let value_b = shape(fe_type, &b, ib, &pb).unwrap();
                    assert_scalar_eq!(value_a, value_b, comp = abs, tol = 1e-12);
                    // The reference coordinates along the edge run in opposite directions
                    let tangential_a = shape_deriv(fe_type, &a, ia, 1, &pa).unwrap();
                    let tangential_b = shape_deriv(fe_type, &b, ib, 1, &pb).unwrap();
                    assert_scalar_eq!(tangential_a, -tangential_b, comp = abs, tol = 1e-12);
                }

                for i in 0..fe_type.n_dofs(ElemType::Quad9).unwrap() {
                    if !pairs.iter().any(|&(ia, _)| ia == i) {
                        assert_scalar_eq!(shape(fe_type, &a, i, &pa).unwrap(), 0.0, comp = abs, tol = 1e-12);
                    }
                }
            }
        }
    }
}

/// Two `Tri7` elements sharing the edge from `(0, 0)` to `(1, 0)`.
fn tri7_pair() -> (Mesh<f64>, usize, usize) {
    let coords = [
        (0.0, 0.0),
        (1.0, 0.0),
        (0.0, 1.0),
        (1.0, -1.0),
        (0.5, 0.0),
        (0.5, 0.5),
        (0.0, 0.5),
        (1.0 / 3.0, 1.0 / 3.0),
        (0.5, -0.5),
        (1.0, -0.5),
        (2.0 / 3.0, -1.0 / 3.0),
    ];
    let vertices = coords.iter().map(|&(x, y)| Point3::new(x, y, 0.0)).collect();
    let mut mesh = Mesh::from_vertices(vertices);
    let a = mesh.add_elem(ElemType::Tri7, vec![0, 1, 2, 4, 5, 6, 7]).unwrap();
    let b = mesh.add_elem(ElemType::Tri7, vec![1, 0, 3, 4, 8, 9, 10]).unwrap();
    (mesh, a, b)
}

#[test]
fn triangle_bases_are_continuous_across_shared_edge() {
    let (mesh, a, b) = tri7_pair();
    let (a, b) = (mesh.elem_view(a).unwrap(), mesh.elem_view(b).unwrap());
    for order in 1..=6 {
        let fe_type = FEType::new(FEFamily::Bernstein, order);
        let mut pairs = vec![(0, 1), (1, 0)];
        pairs.extend((3..3 + order - 1).map(|i| (i, i)));

        for s in [0.0, 0.2, 0.5, 0.7, 1.0] {
            let pa = Point3::new(s, 0.0, 0.0);
            let pb = Point3::new(1.0 - s, 0.0, 0.0);
            for &(ia, ib) in &pairs {
                let value_a = shape(fe_type, &a, ia, &pa).unwrap();
                let value_b = shape(fe_type, &b, ib, &pb).unwrap();
                assert_scalar_eq!(value_a, value_b, comp = abs, tol = 1e-12);
            }
            for i in 0..fe_type.n_dofs(ElemType::Tri7).unwrap() {
                if !pairs.iter().any(|&(ia, _)| ia == i) {
                    assert_scalar_eq!(shape(fe_type, &a, i, &pa).unwrap(), 0.0, comp = abs, tol = 1e-12);
                }
            }
        }
    }
}

fn edge_mesh(x1: f64) -> (Mesh<f64>, usize) {
    let mut mesh = Mesh::from_vertices(vec![Point3::origin(), Point3::new(x1, 0.0, 0.0)]);
    let id = mesh.add_elem(ElemType::Edge2, vec![0, 1]).unwrap();
    (mesh, id)
}

#[test]
fn hermite_and_clough_derivative_dofs_have_unit_physical_slope() {
    // dx/dxi = 1.5 on [0, 3]
    let (mesh, id) = edge_mesh(3.0);
    let elem = mesh.elem_view(id).unwrap();
    let left = Point3::new(-1.0, 0.0, 0.0);
    let right = Point3::new(1.0, 0.0, 0.0);

    for fe_type in [FEType::new(FEFamily::Hermite, 3), FEType::new(FEFamily::Clough, 3)] {
        let (value_dofs, slope_dofs) = match fe_type.family {
            FEFamily::Hermite => ([0, 2], [1, 3]),
            _ => ([0, 1], [2, 3]),
        };
        assert_scalar_eq!(shape(fe_type, &elem, value_dofs[0], &left).unwrap(), 1.0, comp = abs, tol = 1e-12);
        assert_scalar_eq!(shape(fe_type, &elem, value_dofs[1], &right).unwrap(), 1.0, comp = abs, tol = 1e-12);
        assert_scalar_eq!(shape(fe_type, &elem, slope_dofs[0], &left).unwrap(), 0.0, comp = abs, tol = 1e-12);
        assert_scalar_eq!(
            shape_deriv(fe_type, &elem, slope_dofs[0], 0, &left).unwrap(),
            1.5,
            comp = abs,
            tol = 1e-12
        );
        assert_scalar_eq!(
            shape_deriv(fe_type, &elem, slope_dofs[1], 0, &right).unwrap(),
            1.5,
            comp = abs,
            tol = 1e-12
        );
        assert_scalar_eq!(
            shape_deriv(fe_type, &elem, value_dofs[0], 0, &left).unwrap(),
            0.0,
            comp = abs,
            tol = 1e-12
        );
    }
}

#[test]
fn hermite_bubbles_vanish_with_their_slopes_at_vertices() {
    let (mesh, id) = edge_mesh(2.0);
    let elem = mesh.elem_view(id).unwrap();
    let fe_type = FEType::new(FEFamily::Hermite, 6);
    for x in [-1.0, 1.0] {
        let p = Point3::new(x, 0.0, 0.0);
        for i in 4..7 {
            assert_scalar_eq!(shape(fe_type, &elem, i, &p).unwrap(), 0.0, comp = abs, tol = 1e-12);
            assert_scalar_eq!(shape_deriv(fe_type, &elem, i, 0, &p).unwrap(), 0.0, comp = abs, tol = 1e-12);
        }
    }
}

#[test]
fn shape_evaluator_does_not_reuse_scaling_of_deleted_element() {
    let mut mesh = Mesh::from_vertices(vec![
        Point3::origin(),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(3.0, 0.0, 0.0),
    ]);
    let fe_type = FEType::new(FEFamily::Hermite, 3);
    let mut evaluator = ShapeEvaluator::new(fe_type);
    let left = Point3::new(-1.0, 0.0, 0.0);

    let id = mesh.add_elem(ElemType::Edge2, vec![0, 1]).unwrap();
    let slope = evaluator.shape_deriv(&mesh.elem_view(id).unwrap(), 1, 0, &left).unwrap();
    assert_scalar_eq!(slope, 0.5, comp = abs, tol = 1e-12);

    mesh.delete_elem(id).unwrap();
    let recycled = mesh.add_elem(ElemType::Edge2, vec![0, 2]).unwrap();
    assert_eq!(recycled, id);
    let slope = evaluator.shape_deriv(&mesh.elem_view(recycled).unwrap(), 1, 0, &left).unwrap();
    assert_scalar_eq!(slope, 1.5, comp = abs, tol = 1e-12);
}

#[test]
fn shape_evaluator_matches_free_functions() {
    let (mesh, id) = reference_element_mesh(ElemType::Quad9);
    let elem = mesh.elem_view(id).unwrap();
    let fe_type = FEType::new(FEFamily::Bernstein, 3);
    let mut evaluator = ShapeEvaluator::new(fe_type);
    let p = Point3::new(0.25, -0.4, 0.0);

    let values = evaluator.shapes(&elem, &p).unwrap();
    assert_eq!(values, all_shapes(fe_type, &elem, &p));
    assert_scalar_eq!(values.iter().sum::<f64>(), 1.0, comp = abs, tol = 1e-12);
    assert_eq!(
        evaluator.shape_second_deriv(&elem, 5, 1, &p).unwrap(),
        shape_second_deriv(fe_type, &elem, 5, 1, &p).unwrap()
    );
}
