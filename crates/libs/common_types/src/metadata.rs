use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Camera and capture fields read from embedded image metadata.
/// Every field is optional, absence is normal.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CameraMetadata {
    /// Make and model, e.g. "Canon EOS R5".
    pub device: Option<String>,
    pub copyright: Option<String>,
    /// Signed decimal degrees, rounded to 8 places.
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// F-number, e.g. 2.8.
    pub aperture: Option<f64>,
    /// Focal length in millimetres.
    pub focal_length: Option<f64>,
    /// "2.0s" or "1/500s".
    pub exposure_time: Option<String>,
    pub iso: Option<u32>,
    pub flash: Option<bool>,
    #[schema(value_type = Option<String>)]
    pub captured_at: Option<NaiveDateTime>,
}

impl CameraMetadata {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
