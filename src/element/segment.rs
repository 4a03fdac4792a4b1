use super::{ElemType, Topology};

const NO_NODES: &[&[usize]] = &[];
const NO_TYPES: &[ElemType] = &[];

pub const NODE_ELEM: Topology = Topology {
    dim: 0,
    n_nodes: 1,
    n_vertices: 1,
    n_edge_nodes: 0,
    n_face_nodes: 0,
    n_faces: 0,
    n_children: 1,
    default_order: 0,
    side_nodes: NO_NODES,
    side_types: NO_TYPES,
    edge_nodes: NO_NODES,
    edge_types: NO_TYPES,
    edge_sides: &[],
    master_points: &[[0.0, 0.0, 0.0]],
};

const EDGE_SIDES: &[&[usize]] = &[&[0], &[1]];
const EDGE_SIDE_TYPES: &[ElemType] = &[ElemType::NodeElem, ElemType::NodeElem];

pub const EDGE2: Topology = Topology {
    dim: 1,
    n_nodes: 2,
    n_vertices: 2,
    n_edge_nodes: 0,
    n_face_nodes: 0,
    n_faces: 0,
    n_children: 2,
    default_order: 1,
    side_nodes: EDGE_SIDES,
    side_types: EDGE_SIDE_TYPES,
    edge_nodes: NO_NODES,
    edge_types: NO_TYPES,
    edge_sides: &[],
    master_points: &[[-1.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
};

pub const EDGE3: Topology = Topology {
    n_nodes: 3,
    n_edge_nodes: 1,
    default_order: 2,
    master_points: &[[-1.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 0.0]],
    ..EDGE2
};

/// A semi-infinite edge: node 0 is the base, node 1 lies on the radial direction.
pub const INF_EDGE2: Topology = Topology {
    n_children: 1,
    side_nodes: &[&[0]],
    side_types: &[ElemType::NodeElem],
    master_points: &[[-1.0, 0.0, 0.0], [0.0, 0.0, 0.0]],
    ..EDGE2
};

pub fn is_child_on_side(child: usize, side: usize) -> bool {
    child == side
}
