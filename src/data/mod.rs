//! Input handling for relation matrices

pub mod preprocessing;
pub mod relations;

pub use relations::{load_relations, RelationError, RelationMatrix};
