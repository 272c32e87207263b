use common_types::{AlbumId, Photo, Tag};
use serde::Serialize;
use utoipa::ToSchema;

/// Bytes of one stored image, ready to be streamed.
#[derive(Debug)]
pub struct ServedPhoto {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub filename: String,
}

#[derive(Serialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PhotoDetails {
    pub photo: Photo,
    pub tags: Vec<Tag>,
    #[schema(value_type = Vec<String>)]
    pub album_ids: Vec<AlbumId>,
}
