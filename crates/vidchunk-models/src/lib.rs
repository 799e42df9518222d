//! Shared data models for vidchunk.
//!
//! This crate provides Serde-serializable types for:
//! - Quality tiers and stream descriptors
//! - Stream selection with downward quality fallback
//! - Chunk spans and destination filenames

pub mod chunk;
pub mod quality;

// Re-export common types
pub use chunk::{chunk_filename, ChunkSpan};
pub use quality::{select_stream, Quality, SelectError, StreamDescriptor};
