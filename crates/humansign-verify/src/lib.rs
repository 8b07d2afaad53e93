//! End-to-end verification of HumanSign document proofs.
//!
//! This crate provides:
//! - [`Verifier`], running envelope, hash binding, chain, feature and scoring
//!   stages in a fixed order
//! - [`VerificationReport`], the success output
//! - [`PipelineError`] with a flat, stable [`ErrorKind`]
//! - [`IntakePolicy`] for upload checks ahead of the pipeline
//!
#![deny(missing_docs)]

/// Verifier configuration.
pub mod config;
/// Pipeline error taxonomy.
pub mod error;
/// Upload intake checks.
pub mod intake;
/// Stage orchestration.
pub mod pipeline;
/// Success report.
pub mod report;

pub use config::VerifierConfig;
pub use error::{ErrorKind, PipelineError};
pub use intake::{IntakeError, IntakePolicy};
pub use pipeline::Verifier;
pub use report::{IntegrityReport, VerificationReport, VerificationStatus};
