//! Finite element bases, reference element topology and graph based mesh partitioning.
//!
//! The crate is organized around a closed set of reference element types ([`element::ElemType`])
//! whose adjacency tables are static, an arena of elements ([`mesh::Mesh`]) that connects
//! elements through plain indices, a collection of polynomial bases ([`fe`]) and a
//! partitioner ([`partitioner`]) that assigns processor ownership to elements.
use nalgebra::RealField;

pub mod element;
pub mod error;
pub mod fe;
pub mod geometry;
pub mod hash;
pub mod mesh;
pub mod partitioner;
pub mod quadrature;
pub mod reorder;

#[cfg(feature = "proptest")]
pub mod proptest;

pub extern crate nalgebra;

pub use error::{Error, Result};

/// Scalar type used throughout the crate.
pub trait Real: RealField + Copy {}

impl<T: RealField + Copy> Real for T {}
