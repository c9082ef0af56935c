pub mod block;
pub mod core;
pub mod eval;
pub mod graph;
pub mod reconcile;
