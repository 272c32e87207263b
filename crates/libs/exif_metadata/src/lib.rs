#![deny(clippy::unwrap_used)]
#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]

//! Best-effort camera metadata extraction from image bytes.
//!
//! [`extract_metadata`] never fails: anything that cannot be read is left out of
//! the returned [`CameraMetadata`](common_types::CameraMetadata).

mod convert;
mod extract;

pub use convert::{apex_to_f_number, dms_to_decimal, format_exposure_time, round_to};
pub use extract::{ExifError, extract_metadata, read_metadata};
