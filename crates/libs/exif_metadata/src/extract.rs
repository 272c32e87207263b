use crate::convert::{apex_to_f_number, dms_to_decimal, format_exposure_time, round_to};
use chrono::NaiveDateTime;
use common_types::CameraMetadata;
use exif::{Exif, Field, In, Reader, Tag, Value};
use std::io::Cursor;
use thiserror::Error;
use tracing::debug;

const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum ExifError {
    #[error("Could not read EXIF data: {0}")]
    Read(#[from] exif::Error),
}

/// Reads camera metadata from an encoded image. Never fails: missing or broken
/// metadata yields an empty result, and the reason is logged at debug level.
#[must_use]
pub fn extract_metadata(bytes: &[u8]) -> CameraMetadata {
    match read_metadata(bytes) {
        Ok(metadata) => metadata,
        Err(e) => {
            debug!("No usable EXIF metadata: {e}");
            CameraMetadata::default()
        }
    }
}

/// Like [`extract_metadata`] but reports why the container could not be parsed.
pub fn read_metadata(bytes: &[u8]) -> Result<CameraMetadata, ExifError> {
    let exif = Reader::new().read_from_container(&mut Cursor::new(bytes))?;

    Ok(CameraMetadata {
        device: device(&exif),
        copyright: copyright(&exif),
        latitude: gps_coordinate(&exif, Tag::GPSLatitude, Tag::GPSLatitudeRef),
        longitude: gps_coordinate(&exif, Tag::GPSLongitude, Tag::GPSLongitudeRef),
        aperture: aperture(&exif),
        focal_length: field(&exif, Tag::FocalLength)
            .and_then(first_f64)
            .map(|f| round_to(f, 1)),
        exposure_time: field(&exif, Tag::ExposureTime).and_then(exposure_time),
        iso: field(&exif, Tag::PhotographicSensitivity).and_then(|f| f.value.get_uint(0)),
        flash: field(&exif, Tag::Flash)
            .and_then(|f| f.value.get_uint(0))
            .map(|bits| bits & 1 == 1),
        captured_at: captured_at(&exif),
    })
}

fn field(exif: &Exif, tag: Tag) -> Option<&Field> {
    exif.get_field(tag, In::PRIMARY)
}

fn ascii(exif: &Exif, tag: Tag) -> Option<String> {
    let Value::Ascii(values) = &field(exif, tag)?.value else {
        return None;
    };
    let text = values
        .iter()
        .map(|v| String::from_utf8_lossy(v).trim_matches(['\0', ' ']).to_owned())
        .find(|s| !s.is_empty())?;
    Some(text)
}

fn first_f64(field: &Field) -> Option<f64> {
    let value = match &field.value {
        Value::Rational(v) => v.first().map(exif::Rational::to_f64),
        Value::SRational(v) => v.first().map(exif::SRational::to_f64),
        Value::Float(v) => v.first().map(|f| f64::from(*f)),
        Value::Double(v) => v.first().copied(),
        other => other.get_uint(0).map(f64::from),
    };
    value.filter(|v| v.is_finite())
}

fn device(exif: &Exif) -> Option<String> {
    let model = ascii(exif, Tag::Model)?;
    match ascii(exif, Tag::Make) {
        Some(make) => Some(format!("{make} {model}").trim().to_owned()),
        None => Some(model),
    }
}

fn copyright(exif: &Exif) -> Option<String> {
    ascii(exif, Tag::Copyright).or_else(|| ascii(exif, Tag::Artist).map(|a| format!("© {a}")))
}

fn aperture(exif: &Exif) -> Option<f64> {
    field(exif, Tag::FNumber)
        .and_then(first_f64)
        .or_else(|| {
            field(exif, Tag::ApertureValue)
                .and_then(first_f64)
                .map(apex_to_f_number)
        })
        .filter(|f| *f > 0.0)
        .map(|f| round_to(f, 1))
}

fn exposure_time(field: &Field) -> Option<String> {
    match &field.value {
        Value::Rational(v) => v.first().and_then(|r| format_exposure_time(r.num, r.denom)),
        other => other
            .get_uint(0)
            .and_then(|seconds| format_exposure_time(seconds, 1)),
    }
}

fn gps_coordinate(exif: &Exif, value_tag: Tag, ref_tag: Tag) -> Option<f64> {
    let hemisphere = ascii(exif, ref_tag)?;
    let Value::Rational(parts) = &field(exif, value_tag)?.value else {
        return None;
    };
    let [degrees, minutes, seconds] = parts.as_slice() else {
        return None;
    };
    let decimal = dms_to_decimal(
        degrees.to_f64(),
        minutes.to_f64(),
        seconds.to_f64(),
        &hemisphere,
    );
    decimal.is_finite().then_some(decimal)
}

fn captured_at(exif: &Exif) -> Option<NaiveDateTime> {
    [Tag::DateTimeOriginal, Tag::DateTime]
        .into_iter()
        .filter_map(|tag| ascii(exif, tag))
        .find_map(|s| NaiveDateTime::parse_from_str(&s, EXIF_DATETIME_FORMAT).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use color_eyre::Result;
    use exif::Rational;
    use exif::experimental::Writer;

    fn ascii_field(tag: Tag, text: &str) -> Field {
        Field {
            tag,
            ifd_num: In::PRIMARY,
            value: Value::Ascii(vec![text.as_bytes().to_vec()]),
        }
    }

    fn rational_field(tag: Tag, parts: &[(u32, u32)]) -> Field {
        Field {
            tag,
            ifd_num: In::PRIMARY,
            value: Value::Rational(
                parts
                    .iter()
                    .map(|&(num, denom)| Rational { num, denom })
                    .collect(),
            ),
        }
    }

    fn short_field(tag: Tag, value: u16) -> Field {
        Field {
            tag,
            ifd_num: In::PRIMARY,
            value: Value::Short(vec![value]),
        }
    }

    fn write_tiff(fields: &[Field]) -> Result<Vec<u8>> {
        let mut writer = Writer::new();
        for f in fields {
            writer.push_field(f);
        }
        let mut buf = Cursor::new(Vec::new());
        writer.write(&mut buf, false)?;
        Ok(buf.into_inner())
    }

    #[test]
    fn test_full_metadata() -> Result<()> {
        let fields = vec![
            ascii_field(Tag::Make, "Canon"),
            ascii_field(Tag::Model, "EOS R5"),
            ascii_field(Tag::Artist, "Jane Doe"),
            ascii_field(Tag::DateTime, "2020:01:01 00:00:00"),
            ascii_field(Tag::DateTimeOriginal, "2023:06:14 18:42:07"),
            rational_field(Tag::FNumber, &[(28, 10)]),
            rational_field(Tag::FocalLength, &[(50, 1)]),
            rational_field(Tag::ExposureTime, &[(1, 500)]),
            short_field(Tag::PhotographicSensitivity, 200),
            short_field(Tag::Flash, 0x19),
            ascii_field(Tag::GPSLatitudeRef, "S"),
            rational_field(Tag::GPSLatitude, &[(40, 1), (26, 1), (46, 1)]),
            ascii_field(Tag::GPSLongitudeRef, "E"),
            rational_field(Tag::GPSLongitude, &[(79, 1), (58, 1), (56, 1)]),
        ];
        let metadata = read_metadata(&write_tiff(&fields)?)?;

        assert_eq!(metadata.device.as_deref(), Some("Canon EOS R5"));
        assert_eq!(metadata.copyright.as_deref(), Some("© Jane Doe"));
        assert_eq!(metadata.aperture, Some(2.8));
        assert_eq!(metadata.focal_length, Some(50.0));
        assert_eq!(metadata.exposure_time.as_deref(), Some("1/500s"));
        assert_eq!(metadata.iso, Some(200));
        assert_eq!(metadata.flash, Some(true));
        assert_eq!(
            metadata.captured_at.map(|d| d.to_string()).as_deref(),
            Some("2023-06-14 18:42:07")
        );
        let latitude = metadata.latitude.unwrap_or_default();
        assert!((latitude + 40.446_111_11).abs() < 1e-9, "got {latitude}");
        assert!(metadata.longitude.unwrap_or_default() > 0.0);
        Ok(())
    }

    #[test]
    fn test_aperture_from_apex_and_long_exposure() -> Result<()> {
        let fields = vec![
            ascii_field(Tag::Model, "Pixel 8"),
            ascii_field(Tag::Copyright, "ACME"),
            ascii_field(Tag::Artist, "Ignored"),
            rational_field(Tag::ApertureValue, &[(4, 1)]),
            rational_field(Tag::ExposureTime, &[(2, 1)]),
            short_field(Tag::Flash, 0x10),
            ascii_field(Tag::DateTime, "2021:02:03 04:05:06"),
        ];
        let metadata = read_metadata(&write_tiff(&fields)?)?;

        assert_eq!(metadata.device.as_deref(), Some("Pixel 8"));
        assert_eq!(metadata.copyright.as_deref(), Some("ACME"));
        assert_eq!(metadata.aperture, Some(4.0));
        assert_eq!(metadata.exposure_time.as_deref(), Some("2.0s"));
        assert_eq!(metadata.flash, Some(false));
        assert_eq!(
            metadata.captured_at.map(|d| d.to_string()).as_deref(),
            Some("2021-02-03 04:05:06")
        );
        assert_eq!(metadata.latitude, None);
        Ok(())
    }

    #[test]
    fn test_garbage_yields_empty_metadata() {
        assert!(extract_metadata(b"definitely not an image").is_empty());
        assert!(extract_metadata(&[]).is_empty());
    }

    #[test]
    fn test_unparseable_date_is_skipped() -> Result<()> {
        let fields = vec![ascii_field(Tag::DateTimeOriginal, "sometime in june")];
        let metadata = extract_metadata(&write_tiff(&fields)?);
        assert_eq!(metadata.captured_at, None);
        Ok(())
    }
}
