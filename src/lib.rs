//! Crisk: Credit Risk Scoring Library
//!
//! An end-to-end credit scoring demonstration: synthetic portfolio
//! generation, leak-free fit/transform preprocessing, logistic regression
//! trained by gradient descent, evaluation, and JSON model export.

pub mod cli;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod utils;
