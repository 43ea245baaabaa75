//! Pipeline module - data generation, loading, splitting, and preprocessing

pub mod generate;
pub mod loader;
pub mod preprocess;
pub mod schema;
pub mod split;

pub use generate::*;
pub use loader::*;
pub use preprocess::*;
pub use schema::*;
pub use split::*;
