//! Domain layer: search tree, queries and layout
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod ancestry;
pub mod arena;
pub mod builder;
pub mod error;
pub mod layout;

pub use arena::{BstArena, BstNode, Key};
pub use builder::TreeBuilder;
pub use error::{DomainError, DomainResult};
pub use layout::{Bounds, Layout, Position};
