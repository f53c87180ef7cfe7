//! # Traffic Math
//!
//! Windowed statistics for daily traffic count series. This crate provides
//! the mean calculations used when reconstructing rolling features from
//! sparse trailing windows of counter observations.

use thiserror::Error;

pub mod rolling;

/// Errors that can occur in traffic-related calculations
#[derive(Error, Debug)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for traffic math operations
pub type Result<T> = std::result::Result<T, MathError>;
