use fenris_fe::element::ElemType;
use fenris_fe::error::Error;
use fenris_fe::mesh::procedural::{
    create_unit_box_uniform_hex_mesh, create_unit_square_uniform_quad_mesh, create_unit_square_uniform_tri_mesh,
    create_uniform_tensor_mesh,
};
use fenris_fe::mesh::{Elem, Mesh};
use matrixcompare::assert_scalar_eq;
use nalgebra::{Point3, Vector3};

#[test]
fn element_ids_are_recycled_but_unique_ids_are_not() {
    let mut mesh = Mesh::from_vertices(vec![
        Point3::origin(),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(2.0, 0.0, 0.0),
    ]);
    let a = mesh.add_elem(ElemType::Edge2, vec![0, 1]).unwrap();
    let b = mesh.add_elem(ElemType::Edge2, vec![1, 2]).unwrap();
    mesh.find_neighbors();
    assert_eq!(mesh.elem(a).unwrap().neighbor(1), Some(b));

    let deleted = mesh.delete_elem(a).unwrap();
    assert_eq!(deleted.unique_id(), Some(0));
    assert_eq!(mesh.elem(b).unwrap().neighbor(0), None);
    assert!(mesh.elem(a).is_none());
    assert_eq!(mesh.n_elem(), 1);

    let c = mesh.add_elem(ElemType::Edge2, vec![0, 1]).unwrap();
    assert_eq!(c, a);
    assert_eq!(mesh.elem(c).unwrap().unique_id(), Some(2));
    assert_eq!(mesh.max_elem_id(), 2);
}

#[test]
fn invalid_elements_are_rejected() {
    assert_eq!(
        Elem::new(ElemType::Tri3, vec![0, 1]),
        Err(Error::InvalidNode {
            elem_type: ElemType::Tri3,
            node: 2
        })
    );
    let mut mesh = Mesh::from_vertices(vec![Point3::<f64>::origin(), Point3::new(1.0, 0.0, 0.0)]);
    assert!(mesh.add_elem(ElemType::Edge2, vec![0, 2]).is_err());
    assert_eq!(mesh.n_elem(), 0);
    assert_eq!(mesh.refine_elem(3), Err(Error::InvalidElemId(3)));
}

#[test]
fn uniform_meshes_have_expected_sizes() {
    let quads = create_unit_square_uniform_quad_mesh::<f64>(3).unwrap();
    assert_eq!(quads.n_elem(), 9);
    assert_eq!(quads.vertices().len(), 16);
    assert_eq!(quads.find_boundary_sides().len(), 12);

    let tris = create_unit_square_uniform_tri_mesh::<f64>(2).unwrap();
    assert_eq!(tris.n_elem(), 8);
    assert_eq!(tris.find_boundary_sides().len(), 8);

    let hexes = create_unit_box_uniform_hex_mesh::<f64>(2).unwrap();
    assert_eq!(hexes.n_elem(), 8);
    assert_eq!(hexes.vertices().len(), 27);
    assert_eq!(hexes.find_boundary_sides().len(), 24);

    let quad9 = create_uniform_tensor_mesh::<f64>(ElemType::Quad9, [2, 2, 1], &Vector3::new(1.0, 1.0, 1.0)).unwrap();
    assert_eq!(quad9.vertices().len(), 25);
    assert_eq!(quad9.find_boundary_sides().len(), 8);

    assert!(create_uniform_tensor_mesh::<f64>(ElemType::Tri3, [1, 1, 1], &Vector3::repeat(1.0)).is_err());
}

#[test]
fn tensor_mesh_elements_follow_reference_node_order() {
    let mesh = create_uniform_tensor_mesh::<f64>(ElemType::Quad4, [2, 1, 1], &Vector3::new(2.0, 1.0, 1.0)).unwrap();
    for elem in mesh.elems() {
        let view = mesh.elem_view(elem.id().unwrap()).unwrap();
        assert!(!view.is_flipped());
        let p0 = view.point(0);
        let p2 = view.point(2);
        assert_scalar_eq!(p2.x - p0.x, 1.0, comp = abs, tol = 1e-12);
        assert_scalar_eq!(p2.y - p0.y, 1.0, comp = abs, tol = 1e-12);
    }
}

#[test]
fn refined_elements_inherit_neighbors_across_hanging_sides() {
    let mut mesh = create_uniform_tensor_mesh::<f64>(ElemType::Quad4, [2, 1, 1], &Vector3::new(2.0, 1.0, 1.0)).unwrap();
    let children = mesh.refine_elem(0).unwrap();
    mesh.find_neighbors();
    assert_eq!(children.len(), 4);
    assert!(!mesh.elem(0).unwrap().active());
    assert_eq!(mesh.n_active_elem(), 5);

    for (index, &child) in children.iter().enumerate() {
        let child = mesh.elem(child).unwrap();
        assert_eq!(child.parent(), Some(0));
        assert_eq!(child.level(), 1);
        // Children 1 and 3 touch side 1 of the parent
        let expected = if index % 2 == 1 { Some(1) } else { None };
        assert_eq!(child.neighbor(1).filter(|&n| n == 1), expected);
    }
    assert_eq!(mesh.elem(children[0]).unwrap().neighbor(1), Some(children[1]));
    assert_eq!(mesh.elem(children[0]).unwrap().neighbor(2), Some(children[2]));

    let coarse = mesh.elem(1).unwrap();
    assert_eq!(coarse.neighbor(3), Some(0));
    assert_eq!(coarse.which_neighbor_am_i(&mesh, children[3]), Some(3));

    let mut family = mesh.active_family_tree_by_neighbor(0, 1);
    family.sort_unstable();
    assert_eq!(family, vec![children[1], children[3]]);
    assert_eq!(mesh.active_family_tree_by_neighbor(1, 0), vec![1]);
}

#[test]
fn refined_children_cover_the_parent() {
    let mut mesh = create_unit_square_uniform_quad_mesh::<f64>(1).unwrap();
    let children = mesh.refine_elem(0).unwrap();
    // Child c has its lower left vertex at the offsets given by the bits of c
    for (c, &child) in children.iter().enumerate() {
        let p0 = mesh.elem_view(child).unwrap().point(0);
        assert_scalar_eq!(p0.x, 0.5 * (c & 1) as f64, comp = abs, tol = 1e-12);
        assert_scalar_eq!(p0.y, 0.5 * ((c >> 1) & 1) as f64, comp = abs, tol = 1e-12);
    }
    // Refining an inactive element returns its children
    assert_eq!(mesh.refine_elem(0).unwrap(), children);
}

#[test]
fn uniform_refinement_shares_new_vertices() {
    let mut quads = create_unit_square_uniform_quad_mesh::<f64>(2).unwrap();
    quads.refine_uniformly().unwrap();
    assert_eq!(quads.n_active_elem(), 16);
    assert_eq!(quads.n_elem(), 20);
    assert_eq!(quads.vertices().len(), 25);
    assert_eq!(quads.find_boundary_sides().len(), 16);

    let mut tris = create_unit_square_uniform_tri_mesh::<f64>(1).unwrap();
    tris.refine_uniformly().unwrap();
    assert_eq!(tris.n_active_elem(), 8);
    assert_eq!(tris.vertices().len(), 9);
    assert_eq!(tris.find_boundary_sides().len(), 8);

    let mut hexes = create_unit_box_uniform_hex_mesh::<f64>(1).unwrap();
    hexes.refine_uniformly().unwrap();
    assert_eq!(hexes.n_active_elem(), 8);
    assert_eq!(hexes.vertices().len(), 27);
    assert_eq!(hexes.find_boundary_sides().len(), 24);
}

#[test]
fn mesh_bounding_box() {
    let mesh = create_uniform_tensor_mesh::<f64>(ElemType::Hex8, [1, 2, 3], &Vector3::new(1.0, 2.0, 3.0)).unwrap();
    let bounds = mesh.bounding_box().unwrap();
    assert_eq!(bounds.min(), &Point3::origin());
    assert_eq!(bounds.max(), &Point3::new(1.0, 2.0, 3.0));
}

/// A unit square with an edge element on its bottom side whose interior parent is the square.
fn square_with_boundary_edge() -> (Mesh<f64>, usize) {
    let mut mesh = create_unit_square_uniform_quad_mesh::<f64>(1).unwrap();
    let side = mesh.elem(0).unwrap().build_side_ptr(0).unwrap();
    assert_eq!(side.interior_parent(), Some(0));
    let edge = mesh
        .add_elem(side.elem_type(), side.nodes().to_vec())
        .unwrap();
    mesh.elem_mut(edge)
        .unwrap()
        .set_interior_parent(Some(0));
    (mesh, edge)
}

#[test]
fn interior_neighbors_follow_refinement_of_the_interior_parent() {
    let (mut mesh, edge) = square_with_boundary_edge();
    assert_eq!(mesh.find_interior_neighbors(edge), vec![0]);
    assert!(mesh.find_interior_neighbors(0).is_empty());

    let children = mesh.refine_elem(0).unwrap();
    mesh.find_neighbors();
    // Only the two lower children touch the bottom side
    let mut neighbors = mesh.find_interior_neighbors(edge);
    neighbors.sort_unstable();
    assert_eq!(neighbors, vec![children[0], children[1]]);

    // A second level of refinement reaches the grandchildren along the side
    let grandchildren = mesh.refine_elem(children[1]).unwrap();
    mesh.find_neighbors();
    let mut neighbors = mesh.find_interior_neighbors(edge);
    neighbors.sort_unstable();
    let mut expected = vec![children[0], grandchildren[0], grandchildren[1]];
    expected.sort_unstable();
    assert_eq!(neighbors, expected);
}
