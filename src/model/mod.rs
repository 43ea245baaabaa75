pub mod logistic;
pub mod metrics;
pub mod scorer;

pub use logistic::*;
pub use metrics::*;
pub use scorer::*;
