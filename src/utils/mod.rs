//! Utility modules

pub mod memory_sink;
pub mod memory_storage;

pub use memory_sink::*;
pub use memory_storage::*;
