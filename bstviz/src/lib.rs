//! bstviz: binary search trees with a root-centered grid layout
//!
//! Layers, innermost first:
//! - `domain`: arena-backed tree, ancestry queries, layout, builder
//! - `application`: key sources and the tree service
//! - `infrastructure`: filesystem boundary and service wiring
//! - `cli`: argument parsing, rendering and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;
