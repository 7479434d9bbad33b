//! Storage layer for VibeOS.
//!
//! Manifests and their loop histories live in memory only.

mod memory;

pub use memory::MemoryStore;
