//! Report module - artifact export and run summaries

pub mod artifact;
pub mod summary;

pub use artifact::*;
pub use summary::*;
