use fenris_fe::element::ElemType;
use fenris_fe::error::Error;
use fenris_fe::quadrature::{QGrid, Quadrature};
use matrixcompare::assert_scalar_eq;

#[test]
fn grid_weights_sum_to_reference_volume() {
    let cases = [
        (ElemType::NodeElem, 1.0),
        (ElemType::Edge2, 2.0),
        (ElemType::Edge3, 2.0),
        (ElemType::Quad4, 4.0),
        (ElemType::Quad9, 4.0),
        (ElemType::Hex8, 8.0),
        (ElemType::Tri3, 0.5),
        (ElemType::Tri6, 0.5),
        (ElemType::Tet4, 1.0 / 6.0),
        (ElemType::Prism6, 1.0),
    ];
    for (elem_type, volume) in cases {
        for order in 0..5 {
            let rule = QGrid::<f64>::new(elem_type, order).unwrap();
            let sum: f64 = rule.weights().iter().sum();
            assert_scalar_eq!(sum, volume, comp = abs, tol = 1e-12);
            assert_eq!(rule.weights().len(), rule.points().len());
            for p in rule.points() {
                assert!(elem_type.on_reference_element(p, 1e-12));
            }
        }
    }
}

#[test]
fn grid_point_counts() {
    assert_eq!(QGrid::<f64>::new(ElemType::Edge2, 3).unwrap().n_points(), 4);
    assert_eq!(QGrid::<f64>::new(ElemType::Quad4, 2).unwrap().n_points(), 9);
    assert_eq!(QGrid::<f64>::new(ElemType::Hex8, 1).unwrap().n_points(), 8);
    assert_eq!(QGrid::<f64>::new(ElemType::Tri3, 1).unwrap().n_points(), 4);
    assert_eq!(QGrid::<f64>::new(ElemType::Tet4, 1).unwrap().n_points(), 4);
    assert_eq!(QGrid::<f64>::new(ElemType::Prism6, 1).unwrap().n_points(), 8);

    let rule = QGrid::<f64>::new(ElemType::Quad9, 2).unwrap();
    assert_eq!(rule.elem_type(), ElemType::Quad9);
    assert_eq!(rule.order(), 2);
}

#[test]
fn grid_integrates_linear_functions_exactly() {
    let integrate_x = |elem_type, order| QGrid::<f64>::new(elem_type, order).unwrap().integrate(|p| p.x);
    for order in 0..4 {
        assert_scalar_eq!(integrate_x(ElemType::Edge2, order), 0.0, comp = abs, tol = 1e-12);
        assert_scalar_eq!(integrate_x(ElemType::Quad4, order), 0.0, comp = abs, tol = 1e-12);
        assert_scalar_eq!(integrate_x(ElemType::Tri3, order), 1.0 / 6.0, comp = abs, tol = 1e-12);
        assert_scalar_eq!(integrate_x(ElemType::Prism6, order), 1.0 / 3.0, comp = abs, tol = 1e-12);
    }

    let rule = QGrid::<f64>::new(ElemType::Hex8, 2).unwrap();
    let integral = rule.integrate(|p| 1.0 + p.x + 2.0 * p.y - p.z);
    assert_scalar_eq!(integral, 8.0, comp = abs, tol = 1e-12);
}

#[test]
fn grid_is_not_implemented_for_infinite_hexahedra() {
    assert!(matches!(
        QGrid::<f64>::new(ElemType::InfHex8, 1),
        Err(Error::NotImplemented {
            elem_type: ElemType::InfHex8,
            ..
        })
    ));
}
