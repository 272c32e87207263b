use crate::utils::nice_id;
use common_types::{ImageSize, slugify};
use image::ImageFormat;
use std::path::Path;

const ID_LENGTH: usize = 13;

/// The original file name reduced to a safe, bare file name.
fn sanitized(original_name: &str) -> String {
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name);
    sanitize_filename::sanitize(base)
}

/// The sanitized original name without its extension, if anything is left of it.
#[must_use]
pub fn display_name(original_name: &str) -> Option<String> {
    let sanitized = sanitized(original_name);
    Path::new(&sanitized)
        .file_stem()
        .map(|s| s.to_string_lossy().trim().to_owned())
        .filter(|s| !s.is_empty())
}

/// `{slug}-{random id}.{extension}`, the slug falling back to `photo`.
#[must_use]
pub fn storage_filename(original_name: &str, extension: &str) -> String {
    let slug = display_name(original_name)
        .map(|stem| slugify(&stem))
        .filter(|slug| !slug.is_empty())
        .unwrap_or_else(|| "photo".to_owned());
    format!("{slug}-{}.{extension}", nice_id(ID_LENGTH))
}

fn split_extension(filename: &str) -> (&str, Option<&str>) {
    match filename.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() => (stem, Some(extension)),
        _ => (filename, None),
    }
}

/// `{stem}_{suffix}.{extension}` next to the stored original.
#[must_use]
pub fn derivative_filename(storage_name: &str, size: ImageSize) -> String {
    match split_extension(storage_name) {
        (stem, Some(extension)) => format!("{stem}_{}.{extension}", size.suffix()),
        (stem, None) => format!("{stem}_{}", size.suffix()),
    }
}

/// Display name used when analysis gives none. Never empty.
#[must_use]
pub fn fallback_name(original_name: &str, storage_name: &str) -> String {
    display_name(original_name).unwrap_or_else(|| split_extension(storage_name).0.to_owned())
}

/// Image format and canonical extension, detected from the leading bytes.
#[must_use]
pub fn detect_image_type(bytes: &[u8]) -> Option<(ImageFormat, &'static str)> {
    let kind = infer::get(bytes)?;
    let format = ImageFormat::from_mime_type(kind.mime_type())?;
    let extension = format.extensions_str().first().copied()?;
    Some((format, extension))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Sunset at Sea.JPG", Some("Sunset at Sea"))]
    #[case("C:\\Users\\me\\IMG_0001.jpeg", Some("IMG_0001"))]
    #[case("../../etc/passwd.png", Some("passwd"))]
    #[case("  .jpg", None)]
    #[case("", None)]
    fn test_display_name(#[case] original: &str, #[case] expected: Option<&str>) {
        assert_eq!(display_name(original).as_deref(), expected);
    }

    #[test]
    fn test_storage_filename_shape() {
        let name = storage_filename("Sunset at Sea.JPG", "jpg");
        let (stem, extension) = name.rsplit_once('.').unwrap_or_default();
        assert_eq!(extension, "jpg");
        assert!(stem.starts_with("sunset-at-sea-"));
        assert_eq!(stem.len(), "sunset-at-sea-".len() + ID_LENGTH);

        assert!(storage_filename("___.png", "png").starts_with("photo-"));
        assert_ne!(
            storage_filename("a.png", "png"),
            storage_filename("a.png", "png")
        );
    }

    #[rstest]
    #[case("beach-abc.jpg", ImageSize::Thumbnail, "beach-abc_thumb.jpg")]
    #[case("beach-abc.webp", ImageSize::Tablet, "beach-abc_tablet.webp")]
    #[case("beach-abc", ImageSize::Desktop, "beach-abc_desktop")]
    fn test_derivative_filename(
        #[case] storage_name: &str,
        #[case] size: ImageSize,
        #[case] expected: &str,
    ) {
        assert_eq!(derivative_filename(storage_name, size), expected);
    }

    #[test]
    fn test_fallback_name_is_never_empty() {
        assert_eq!(fallback_name("Lake.png", "lake-x.png"), "Lake");
        assert_eq!(fallback_name("", "photo-x.png"), "photo-x");
    }

    #[test]
    fn test_detects_by_content_not_name() {
        let png = crate::test_utils::png_bytes(4, 4);
        assert_eq!(detect_image_type(&png), Some((ImageFormat::Png, "png")));
        let jpeg = crate::test_utils::jpeg_bytes(4, 4);
        assert_eq!(detect_image_type(&jpeg), Some((ImageFormat::Jpeg, "jpg")));
        assert_eq!(detect_image_type(b"%PDF-1.7 not an image"), None);
    }
}
