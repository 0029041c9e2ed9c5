//! Hybrid lead scoring: a deterministic rule layer combined with an external
//! intent classifier, exposed through an axum router and a repository seam.

pub mod config;
pub mod error;
pub mod imports;
pub mod scoring;
pub mod telemetry;
