#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::struct_excessive_bools
)]
mod database;
mod error;
mod image_size;
mod metadata;
mod privacy;
mod viewer;

pub use database::*;
pub use error::*;
pub use image_size::*;
pub use metadata::*;
pub use privacy::*;
pub use viewer::*;
