//! Structural operations used while walking a graph.

mod list;

pub use list::List;
