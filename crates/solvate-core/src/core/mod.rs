//! # Core Module
//!
//! Geometry representation and the file formats exchanged with the external solver.
//!
//! - **Molecular Representation** ([`models`]) - Element symbols with Cartesian positions
//! - **File I/O** ([`io`]) - Geometry readers, input deck writer and energy extraction

pub mod io;
pub mod models;
