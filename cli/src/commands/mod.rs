pub mod breaks;
pub mod render;
