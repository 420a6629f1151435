//! Data models describing the molecules handled by the pipeline and the
//! conditions under which they are evaluated.

pub mod condition;
pub mod geometry;
