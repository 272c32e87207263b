#![deny(clippy::unwrap_used)]
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]

//! # Derivative generation
//!
//! Produces the resized renditions of an uploaded photo.
//!
//! Every derivative is scaled to fit its [`ImageSize`](common_types::ImageSize) envelope
//! while keeping the aspect ratio. Images are never upscaled, an image smaller than an
//! envelope is re-encoded at its own dimensions. Transparency survives for formats that
//! can store it.
//!
//! ## Entry points
//!
//! - [`generate_derivatives`]: decode once, resize in parallel, encode every size in the
//!   source format.
//! - [`target_dimensions`]: the sizing rule on its own.

mod photo;

pub use photo::{Derivative, generate_derivatives, target_dimensions};
