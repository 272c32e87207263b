#![deny(clippy::unwrap_used)]
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

mod analysis;
mod error;
mod provider;
mod providers;

pub use analysis::*;
pub use error::AnalysisError;
pub use provider::{ImageAnalysisProvider, provider_from_settings};
pub use providers::*;
