//! Normalization pipeline: stage definitions, configuration and the engine
//! that runs them.

mod config;
mod engine;
mod operations;

pub use config::{ErrorPolicy, PipelineConfig};
pub use engine::TransformEngine;
pub use operations::{
    HeaderChange, RowAudit, RowFailure, TransformChange, TransformOperation, TransformResult,
};
