//! An arena of elements connected through plain indices.
//!
//! Elements reference nodes by their index into the vertex array of the mesh, and reference
//! each other (neighbors, parent, children, interior parent) by element id, which is the index
//! of the element slot in the arena. Slots of deleted elements are reused, but every element
//! gets a fresh unique id that is never recycled.
use crate::element::{self, ElemQuality, ElemType};
use crate::error::{Error, Result};
use crate::geometry::{triple_product, BoundingBox};
use crate::hash::compute_key;
use crate::Real;
use itertools::Itertools;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Deref;

pub mod procedural;
pub mod refinement;

/// A single element: its type, nodes and family/neighbor relations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Elem {
    elem_type: ElemType,
    id: Option<usize>,
    unique_id: Option<u64>,
    nodes: Vec<usize>,
    neighbors: Vec<Option<usize>>,
    parent: Option<usize>,
    children: Vec<usize>,
    interior_parent: Option<usize>,
    level: usize,
    active: bool,
    subdomain_id: u16,
    processor_id: usize,
    spline_node: bool,
}

impl Elem {
    /// Creates a free-standing element that is not (yet) part of a mesh.
    pub fn new(elem_type: ElemType, nodes: Vec<usize>) -> Result<Self> {
        element::check_node_count(elem_type, &nodes)?;
        Ok(Self {
            elem_type,
            id: None,
            unique_id: None,
            nodes,
            neighbors: vec![None; elem_type.n_sides()],
            parent: None,
            children: Vec::new(),
            interior_parent: None,
            level: 0,
            active: true,
            subdomain_id: 0,
            processor_id: 0,
            spline_node: false,
        })
    }

    pub fn elem_type(&self) -> ElemType {
        self.elem_type
    }

    pub fn id(&self) -> Option<usize> {
        self.id
    }

    pub fn unique_id(&self) -> Option<u64> {
        self.unique_id
    }

    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    /// Global id of local node `i`.
    pub fn node_id(&self, i: usize) -> Result<usize> {
        self.nodes.get(i).copied().ok_or(Error::InvalidNode {
            elem_type: self.elem_type,
            node: i,
        })
    }

    pub fn dim(&self) -> usize {
        self.elem_type.dim()
    }

    pub fn n_sides(&self) -> usize {
        self.elem_type.n_sides()
    }

    pub fn neighbors(&self) -> &[Option<usize>] {
        &self.neighbors
    }

    pub fn neighbor(&self, side: usize) -> Option<usize> {
        self.neighbors.get(side).copied().flatten()
    }

    pub fn has_neighbor(&self, elem: usize) -> bool {
        self.neighbors.contains(&Some(elem))
    }

    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    pub fn children(&self) -> &[usize] {
        &self.children
    }

    pub fn interior_parent(&self) -> Option<usize> {
        self.interior_parent
    }

    pub fn set_interior_parent(&mut self, interior_parent: Option<usize>) {
        self.interior_parent = interior_parent;
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn active(&self) -> bool {
        self.active
    }

    pub fn subdomain_id(&self) -> u16 {
        self.subdomain_id
    }

    pub fn set_subdomain_id(&mut self, subdomain_id: u16) {
        self.subdomain_id = subdomain_id;
    }

    pub fn processor_id(&self) -> usize {
        self.processor_id
    }

    pub fn set_processor_id(&mut self, processor_id: usize) {
        self.processor_id = processor_id;
    }

    /// Whether this is a spline control node (only meaningful for `NodeElem`).
    pub fn is_spline_node(&self) -> bool {
        self.spline_node
    }

    pub fn set_spline_node(&mut self, spline_node: bool) {
        self.spline_node = spline_node;
    }

    /// Global ids of the nodes on side `side`.
    pub fn side_node_ids(&self, side: usize) -> Result<Vec<usize>> {
        Ok(self
            .elem_type
            .side_nodes(side)?
            .iter()
            .map(|&n| self.nodes[n])
            .collect())
    }

    /// Sorted global ids of the vertices on side `side`.
    fn sorted_side_vertices(&self, side: usize) -> Result<Vec<usize>> {
        let side_type = self.elem_type.side_type(side)?;
        let mut vertices = self.side_node_ids(side)?;
        vertices.truncate(side_type.n_vertices());
        vertices.sort_unstable();
        Ok(vertices)
    }

    /// Key identifying the element, identical for elements with the same vertices.
    pub fn key(&self) -> u64 {
        match self.elem_type.center_node() {
            Some(center) => compute_key(&[self.nodes[center]]),
            None => compute_key(&self.nodes[..self.elem_type.n_vertices()]),
        }
    }

    /// Key identifying side `side`, identical when computed from either element sharing it.
    pub fn side_key(&self, side: usize) -> Result<u64> {
        match self.elem_type.side_key_node(side)? {
            Some(node) => Ok(compute_key(&[self.nodes[node]])),
            None => self.low_order_key(side),
        }
    }

    /// Key of side `side` computed from its vertices only.
    pub fn low_order_key(&self, side: usize) -> Result<u64> {
        Ok(compute_key(&self.sorted_side_vertices(side)?))
    }

    /// Whether edge `edge` runs from the larger to the smaller global node id.
    pub fn positive_edge_orientation(&self, edge: usize) -> Result<bool> {
        let nodes = self.elem_type.edge_nodes(edge)?;
        Ok(self.nodes[nodes[0]] > self.nodes[nodes[1]])
    }

    /// Local index of the side shared with element `other`, which may be a descendant of
    /// the actual neighbor.
    pub fn which_neighbor_am_i<T: Real>(&self, mesh: &Mesh<T>, other: usize) -> Option<usize> {
        let mut candidate = mesh.elem(other)?;
        while candidate.level > self.level {
            candidate = mesh.elem(candidate.parent?)?;
        }
        let candidate_id = candidate.id?;
        self.neighbors.iter().position(|&n| n == Some(candidate_id))
    }

    fn build_side(&self, side: usize, side_type: ElemType) -> Result<Elem> {
        let nodes = self.side_node_ids(side)?[..side_type.n_nodes()].to_vec();
        Elem::new(side_type, nodes)
    }

    /// Builds a first order proxy element for side `side`.
    pub fn side_ptr(&self, side: usize) -> Result<Elem> {
        let side_type = self.elem_type.side_type(side)?.first_order_type();
        self.build_side(side, side_type)
    }

    /// Like [`Elem::side_ptr`], but reuses the element stored in `side_elem` if it already has
    /// the right type.
    pub fn side_ptr_into(&self, side_elem: &mut Option<Elem>, side: usize) -> Result<()> {
        let side_type = self.elem_type.side_type(side)?.first_order_type();
        self.rewire_side(side_elem, side, side_type)
    }

    /// Builds the full side element, with this element as its interior parent.
    pub fn build_side_ptr(&self, side: usize) -> Result<Elem> {
        let mut side_elem = self.build_side(side, self.elem_type.side_type(side)?)?;
        side_elem.interior_parent = self.id;
        side_elem.subdomain_id = self.subdomain_id;
        Ok(side_elem)
    }

    /// Like [`Elem::build_side_ptr`], but reuses the element stored in `side_elem` if it
    /// already has the right type.
    pub fn build_side_ptr_into(&self, side_elem: &mut Option<Elem>, side: usize) -> Result<()> {
        self.rewire_side(side_elem, side, self.elem_type.side_type(side)?)?;
        if let Some(side_elem) = side_elem {
            side_elem.interior_parent = self.id;
            side_elem.subdomain_id = self.subdomain_id;
        }
        Ok(())
    }

    fn rewire_side(&self, side_elem: &mut Option<Elem>, side: usize, side_type: ElemType) -> Result<()> {
        match side_elem {
            Some(existing) if existing.elem_type == side_type => {
                let nodes = self.side_node_ids(side)?;
                existing.nodes.copy_from_slice(&nodes[..side_type.n_nodes()]);
            }
            _ => *side_elem = Some(self.build_side(side, side_type)?),
        }
        Ok(())
    }

    /// Builds the element on edge `edge`. For faces, edges are sides.
    pub fn build_edge_ptr(&self, edge: usize) -> Result<Elem> {
        if self.dim() == 2 {
            return self.build_side_ptr(edge);
        }
        let edge_type = self.elem_type.edge_type(edge)?;
        let nodes = self
            .elem_type
            .edge_nodes(edge)?
            .iter()
            .map(|&n| self.nodes[n])
            .collect();
        let mut edge_elem = Elem::new(edge_type, nodes)?;
        edge_elem.interior_parent = self.id;
        edge_elem.subdomain_id = self.subdomain_id;
        Ok(edge_elem)
    }
}

/// An element together with the vertex coordinates of its mesh.
#[derive(Debug, Copy, Clone)]
pub struct ElemView<'a, T: Real> {
    elem: &'a Elem,
    vertices: &'a [Point3<T>],
}

impl<'a, T: Real> Deref for ElemView<'a, T> {
    type Target = Elem;

    fn deref(&self) -> &Self::Target {
        self.elem
    }
}

impl<'a, T: Real> ElemView<'a, T> {
    pub fn new(elem: &'a Elem, vertices: &'a [Point3<T>]) -> Self {
        Self { elem, vertices }
    }

    pub fn elem(&self) -> &'a Elem {
        self.elem
    }

    /// Coordinates of local node `i`.
    pub fn point(&self, i: usize) -> Point3<T> {
        self.vertices[self.elem.nodes[i]]
    }

    pub fn points(&self) -> Vec<Point3<T>> {
        self.elem.nodes.iter().map(|&n| self.vertices[n]).collect()
    }

    pub fn vertex_average(&self) -> Point3<T> {
        element::vertex_average(self.elem_type(), &self.points())
    }

    /// Distance between local nodes `a` and `b`.
    pub fn length(&self, a: usize, b: usize) -> T {
        nalgebra::distance(&self.point(a), &self.point(b))
    }

    fn vertex_distances(&self) -> impl Iterator<Item = T> + '_ {
        (0..self.elem_type().n_vertices())
            .tuple_combinations()
            .map(move |(a, b)| self.length(a, b))
    }

    /// Minimum distance between any two vertices.
    pub fn hmin(&self) -> T {
        self.vertex_distances()
            .reduce(|a, b| a.min(b))
            .unwrap_or_else(T::zero)
    }

    /// Maximum distance between any two vertices.
    pub fn hmax(&self) -> T {
        self.vertex_distances()
            .reduce(|a, b| a.max(b))
            .unwrap_or_else(T::zero)
    }

    /// Whether the element is inverted with respect to the orientation of its reference element.
    ///
    /// Faces are assumed to lie in the xy plane.
    pub fn is_flipped(&self) -> bool {
        use ElemType::*;
        let p = |i: usize| self.point(i);
        match self.dim() {
            0 => false,
            1 => p(1).x < p(0).x,
            2 => {
                let other = match self.elem_type().first_order_type() {
                    Tri3 | InfQuad4 => 2,
                    _ => 3,
                };
                (p(1) - p(0)).cross(&(p(other) - p(0))).z < T::zero()
            }
            _ => {
                let (a, b, c) = match self.elem_type().first_order_type() {
                    Hex8 | InfHex8 => (1, 3, 4),
                    _ => (1, 2, 3),
                };
                triple_product(&(p(a) - p(0)), &(p(b) - p(0)), &(p(c) - p(0))) < T::zero()
            }
        }
    }

    pub fn quality(&self, metric: ElemQuality) -> Result<T> {
        element::quality(self.elem_type(), &self.points(), metric)
    }

    pub fn qual_bounds(&self, metric: ElemQuality) -> Result<(T, T)> {
        element::qual_bounds(self.elem_type(), metric)
    }

    /// Whether `p` lies in the element, up to tolerance `tol`.
    pub fn contains_point(&self, p: &Point3<T>, tol: T) -> bool {
        element::contains_point(self.elem_type(), &self.points(), p, tol)
    }

    pub fn map_reference_coords(&self, xi: &Point3<T>) -> Result<Point3<T>> {
        element::map_reference_coords(self.elem_type(), &self.points(), xi)
    }

    pub fn bounding_box(&self) -> Option<BoundingBox<T>> {
        BoundingBox::from_points(self.elem.nodes.iter().map(|&n| &self.vertices[n]))
    }
}

/// Arena of elements sharing a common set of vertices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))]
pub struct Mesh<T: Real> {
    vertices: Vec<Point3<T>>,
    elems: Vec<Option<Elem>>,
    free_ids: Vec<usize>,
    next_unique_id: u64,
    /// Vertices created by refinement, keyed by the sorted parent vertices they average.
    refinement_vertices: BTreeMap<Vec<usize>, usize>,
}

impl<T: Real> Default for Mesh<T> {
    fn default() -> Self {
        Self::from_vertices(Vec::new())
    }
}

impl<T: Real> Mesh<T> {
    pub fn from_vertices(vertices: Vec<Point3<T>>) -> Self {
        Self {
            vertices,
            elems: Vec::new(),
            free_ids: Vec::new(),
            next_unique_id: 0,
            refinement_vertices: BTreeMap::new(),
        }
    }

    pub fn vertices(&self) -> &[Point3<T>] {
        &self.vertices
    }

    pub fn vertices_mut(&mut self) -> &mut [Point3<T>] {
        &mut self.vertices
    }

    pub fn add_vertex(&mut self, point: Point3<T>) -> usize {
        self.vertices.push(point);
        self.vertices.len() - 1
    }

    /// Adds an element with the given global node ids and returns its id.
    ///
    /// Ids of deleted elements are reused, unique ids never are.
    pub fn add_elem(&mut self, elem_type: ElemType, nodes: Vec<usize>) -> Result<usize> {
        if let Some(&node) = nodes.iter().find(|&&n| n >= self.vertices.len()) {
            return Err(Error::InvalidNode { elem_type, node });
        }
        let mut elem = Elem::new(elem_type, nodes)?;
        let id = self.free_ids.pop().unwrap_or(self.elems.len());
        elem.id = Some(id);
        elem.unique_id = Some(self.next_unique_id);
        self.next_unique_id += 1;
        if id == self.elems.len() {
            self.elems.push(Some(elem));
        } else {
            self.elems[id] = Some(elem);
        }
        Ok(id)
    }

    /// Removes an element. References to it from other elements are cleared.
    pub fn delete_elem(&mut self, id: usize) -> Option<Elem> {
        let elem = self.elems.get_mut(id)?.take()?;
        for other in self.elems.iter_mut().flatten() {
            for neighbor in other.neighbors.iter_mut() {
                if *neighbor == Some(id) {
                    *neighbor = None;
                }
            }
            other.children.retain(|&c| c != id);
            if other.parent == Some(id) {
                other.parent = None;
            }
            if other.interior_parent == Some(id) {
                other.interior_parent = None;
            }
        }
        self.free_ids.push(id);
        Some(elem)
    }

    pub fn elem(&self, id: usize) -> Option<&Elem> {
        self.elems.get(id).and_then(Option::as_ref)
    }

    pub fn elem_mut(&mut self, id: usize) -> Option<&mut Elem> {
        self.elems.get_mut(id).and_then(Option::as_mut)
    }

    pub fn elem_view(&self, id: usize) -> Option<ElemView<T>> {
        self.elem(id).map(|elem| ElemView::new(elem, &self.vertices))
    }

    /// One past the largest element id in use.
    pub fn max_elem_id(&self) -> usize {
        self.elems.len()
    }

    pub fn n_elem(&self) -> usize {
        self.elems.iter().flatten().count()
    }

    pub fn elems(&self) -> impl Iterator<Item = &Elem> {
        self.elems.iter().flatten()
    }

    pub fn elems_mut(&mut self) -> impl Iterator<Item = &mut Elem> {
        self.elems.iter_mut().flatten()
    }

    pub fn active_elems(&self) -> impl Iterator<Item = &Elem> {
        self.elems().filter(|elem| elem.active)
    }

    pub fn n_active_elem(&self) -> usize {
        self.active_elems().count()
    }

    pub fn bounding_box(&self) -> Option<BoundingBox<T>> {
        BoundingBox::from_points(&self.vertices)
    }

    /// Connects elements through their sides.
    ///
    /// Sides are matched by their sorted vertex ids among elements of the same refinement
    /// level. A side without a match at its own level inherits the neighbor of the parent on
    /// that side, if the element lies on it. This makes active elements next to a coarser
    /// neighbor point to that neighbor across the hanging side.
    pub fn find_neighbors(&mut self) {
        // Use a BTreeMap for deterministic matching
        let mut sides: BTreeMap<(usize, Vec<usize>), Vec<(usize, usize)>> = BTreeMap::new();
        for elem in self.elems() {
            let id = elem.id.unwrap_or_default();
            for s in 0..elem.n_sides() {
                if let Ok(vertices) = elem.sorted_side_vertices(s) {
                    sides.entry((elem.level, vertices)).or_default().push((id, s));
                }
            }
        }

        for elem in self.elems_mut() {
            elem.neighbors.iter_mut().for_each(|n| *n = None);
        }

        for matches in sides.values() {
            for &(id, s) in matches {
                let neighbor = matches
                    .iter()
                    .find(|&&(other, _)| other != id)
                    .map(|&(other, _)| other);
                if let Some(elem) = self.elem_mut(id) {
                    elem.neighbors[s] = neighbor;
                }
            }
        }

        // Inherit neighbors across hanging sides, coarse levels first
        let mut by_level: Vec<usize> = self.elems().filter_map(|e| e.id).collect();
        by_level.sort_by_key(|&id| (self.elems[id].as_ref().map_or(0, |e| e.level), id));
        for id in by_level {
            let Some(elem) = self.elem(id) else { continue };
            let Some(parent_id) = elem.parent else { continue };
            let Some(parent) = self.elem(parent_id) else { continue };
            let Some(child_index) = parent.children.iter().position(|&c| c == id) else {
                continue;
            };
            let inherited: Vec<(usize, usize)> = (0..elem.n_sides())
                .filter(|&s| elem.neighbors[s].is_none())
                .filter(|&s| parent.elem_type.is_child_on_side(child_index, s).unwrap_or(false))
                .filter_map(|s| parent.neighbor(s).map(|n| (s, n)))
                .collect();
            if let Some(elem) = self.elem_mut(id) {
                for (s, neighbor) in inherited {
                    elem.neighbors[s] = Some(neighbor);
                }
            }
        }
    }

    /// Sides of active elements without a neighbor, as `(element id, side)` pairs.
    pub fn find_boundary_sides(&self) -> Vec<(usize, usize)> {
        let mut boundary = Vec::new();
        for elem in self.active_elems() {
            for (s, neighbor) in elem.neighbors.iter().enumerate() {
                if neighbor.is_none() {
                    boundary.extend(elem.id.map(|id| (id, s)));
                }
            }
        }
        boundary
    }

    /// Active descendants of `elem` (or `elem` itself when active) that touch `neighbor`.
    pub fn active_family_tree_by_neighbor(&self, elem: usize, neighbor: usize) -> Vec<usize> {
        let mut family = Vec::new();
        let mut stack = vec![elem];
        while let Some(id) = stack.pop() {
            let Some(e) = self.elem(id) else { continue };
            if e.active {
                family.push(id);
            } else {
                stack.extend(
                    e.children
                        .iter()
                        .rev()
                        .copied()
                        .filter(|&c| self.elem(c).map_or(false, |child| child.has_neighbor(neighbor))),
                );
            }
        }
        family
    }

    /// Active elements that touch the lower dimensional element `elem` from the interior.
    ///
    /// When the interior parent of `elem` has been refined, this descends into the children
    /// that share a vertex position with `elem`.
    pub fn find_interior_neighbors(&self, elem: usize) -> Vec<usize> {
        let Some(side) = self.elem_view(elem) else { return Vec::new() };
        let Some(interior) = side.interior_parent() else { return Vec::new() };
        let tol = T::from_f64(element::TOLERANCE).expect("Literal must fit in T");
        let touches = |candidate: &ElemView<T>| {
            (0..side.elem_type().n_vertices()).any(|v| candidate.contains_point(&side.point(v), tol))
                || (0..candidate.elem_type().n_vertices()).any(|v| side.contains_point(&candidate.point(v), tol))
        };

        let mut neighbors = Vec::new();
        let mut stack = vec![interior];
        while let Some(id) = stack.pop() {
            let Some(candidate) = self.elem_view(id) else { continue };
            if candidate.active() {
                neighbors.push(id);
            } else {
                stack.extend(
                    candidate
                        .children()
                        .iter()
                        .rev()
                        .copied()
                        .filter(|&c| self.elem_view(c).map_or(false, |child| touches(&child))),
                );
            }
        }
        neighbors
    }
}
