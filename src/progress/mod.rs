//! Persistent per-user, per-module progress.

mod backend;
mod store;

pub use backend::{JsonFileBackend, MemoryBackend, ProgressBackend};
pub use store::{ProgressData, ProgressStore, UserProgress, DEFAULT_USER};
