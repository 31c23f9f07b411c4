//! Local persistence adapters.

mod export;
mod file_store;

pub use export::TranscriptWriter;
pub use file_store::FileStateStore;
