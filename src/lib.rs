//! Estimator - LLM-backed task time estimates as validated JSON
//!
//! Estimator reads a free-text task description, asks a hosted model for a
//! structured estimate and prints it as JSON. Any failure is printed as a
//! fallback error JSON instead, so stdout always carries one JSON document.
//!
//! # Architecture
//!
//! - **commands**: CLI driver (input, orchestration, output)
//! - **core**: Core functionality (schema, prompts, OpenAI client, validator, pipeline, config loading)
//! - **models**: Data structures (config, estimate, error kinds)
//! - **error**: Error types

pub mod commands;
pub mod core;
pub mod error;
pub mod models;

pub use error::{ApiError, EstimateError, Result};
