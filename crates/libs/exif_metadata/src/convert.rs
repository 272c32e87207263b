/// Rounds `value` to `places` decimal places.
#[must_use]
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Degrees, minutes and seconds plus a hemisphere reference to signed decimal degrees,
/// rounded to 8 places. `S` and `W` are negative.
#[must_use]
pub fn dms_to_decimal(degrees: f64, minutes: f64, seconds: f64, hemisphere: &str) -> f64 {
    let decimal = degrees + minutes / 60.0 + seconds / 3600.0;
    let signed = match hemisphere.trim() {
        "S" | "W" => -decimal,
        _ => decimal,
    };
    round_to(signed, 8)
}

/// APEX aperture value to an f-number: `f = 2^(apex / 2)`.
#[must_use]
pub fn apex_to_f_number(apex: f64) -> f64 {
    2f64.powf(apex / 2.0)
}

/// Formats a rational exposure time in seconds.
///
/// One second or longer becomes `"2.0s"`, shorter exposures become a unit
/// fraction such as `"1/500s"`.
#[must_use]
pub fn format_exposure_time(num: u32, denom: u32) -> Option<String> {
    if num == 0 || denom == 0 {
        return None;
    }
    let seconds = f64::from(num) / f64::from(denom);
    if seconds >= 1.0 {
        return Some(format!("{:.1}s", round_to(seconds, 1)));
    }
    let reciprocal = if denom % num == 0 {
        u64::from(denom / num)
    } else {
        (1.0 / seconds).round() as u64
    };
    Some(format!("1/{reciprocal}s"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("S", -40.446_111_11)]
    #[case("N", 40.446_111_11)]
    fn test_dms_to_decimal(#[case] hemisphere: &str, #[case] expected: f64) {
        let decimal = dms_to_decimal(40.0, 26.0, 46.0, hemisphere);
        assert!((decimal - expected).abs() < 1e-9, "got {decimal}");
    }

    #[test]
    fn test_west_is_negative() {
        assert!(dms_to_decimal(3.0, 41.0, 0.0, "W") < 0.0);
        assert!(dms_to_decimal(3.0, 41.0, 0.0, "E") > 0.0);
    }

    #[rstest]
    #[case(1, 500, "1/500s")]
    #[case(10, 5000, "1/500s")]
    #[case(2, 1, "2.0s")]
    #[case(1, 1, "1.0s")]
    #[case(13, 10, "1.3s")]
    #[case(3, 10, "1/3s")]
    fn test_format_exposure_time(#[case] num: u32, #[case] denom: u32, #[case] expected: &str) {
        assert_eq!(format_exposure_time(num, denom).as_deref(), Some(expected));
    }

    #[test]
    fn test_format_exposure_time_rejects_zero() {
        assert_eq!(format_exposure_time(0, 500), None);
        assert_eq!(format_exposure_time(1, 0), None);
    }

    #[test]
    fn test_apex_to_f_number() {
        assert!((round_to(apex_to_f_number(4.0), 1) - 4.0).abs() < f64::EPSILON);
        assert!((round_to(apex_to_f_number(2.97), 1) - 2.8).abs() < f64::EPSILON);
    }
}
