// src/classifier/context.rs
// Human-readable time and location context for the prompt

use chrono::NaiveDateTime;

use super::types::Location;

/// Render the message timestamp, or an empty string when absent
pub fn format_time(timestamp: Option<&NaiveDateTime>) -> String {
    match timestamp {
        Some(ts) => format!("Time context: {}", ts.format("%Y-%m-%d %H:%M:%S")),
        None => String::new(),
    }
}

/// Coordinates worth reverse-geocoding: only when the coordinate form
/// will be rendered, i.e. there is no usable address.
pub fn coordinates_for_lookup(location: Option<&Location>) -> Option<(f64, f64)> {
    let location = location?;
    if location.address().is_some() {
        return None;
    }
    location.coordinates()
}

/// Render the location. Address form takes precedence; the coordinate form
/// gets `geocode_note` appended in parentheses when it is non-empty.
pub fn format_location(location: Option<&Location>, geocode_note: &str) -> String {
    let Some(location) = location else {
        return String::new();
    };

    if let Some(address) = location.address() {
        let mut rendered = format!("Location: {}", address);
        if let Some(city) = location.city() {
            rendered.push_str(", ");
            rendered.push_str(city);
        }
        if let Some(country) = location.country() {
            rendered.push_str(", ");
            rendered.push_str(country);
        }
        return rendered;
    }

    if let Some((lat, lon)) = location.coordinates() {
        let mut rendered = format!(
            "GPS Coordinates: {}, {}",
            format_coordinate(lat),
            format_coordinate(lon)
        );
        let note = geocode_note.trim();
        if !note.is_empty() {
            rendered.push_str(&format!(" ({})", note));
        }
        return rendered;
    }

    String::new()
}

/// Integral values keep one decimal place (`10.0`, not `10`)
fn format_coordinate(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn coords(lat: f64, lon: f64) -> Location {
        Location {
            latitude: Some(lat),
            longitude: Some(lon),
            ..Default::default()
        }
    }

    // ============================================================================
    // Time
    // ============================================================================

    #[test]
    fn test_time_absent() {
        assert_eq!(format_time(None), "");
    }

    #[test]
    fn test_time_rendering() {
        let ts = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(7, 5, 3)
            .unwrap();
        assert_eq!(format_time(Some(&ts)), "Time context: 2024-03-09 07:05:03");
    }

    // ============================================================================
    // Location
    // ============================================================================

    #[test]
    fn test_location_absent() {
        assert_eq!(format_location(None, ""), "");
        assert_eq!(format_location(Some(&Location::default()), ""), "");
    }

    #[test]
    fn test_address_with_city_only() {
        let loc = Location {
            address: Some("5th Ave".to_string()),
            city: Some("NYC".to_string()),
            ..Default::default()
        };
        assert_eq!(format_location(Some(&loc), ""), "Location: 5th Ave, NYC");
    }

    #[test]
    fn test_address_with_city_and_country() {
        let loc = Location {
            address: Some("10 Downing St".to_string()),
            city: Some("London".to_string()),
            country: Some("UK".to_string()),
            ..Default::default()
        };
        assert_eq!(
            format_location(Some(&loc), ""),
            "Location: 10 Downing St, London, UK"
        );
    }

    #[test]
    fn test_address_with_country_only() {
        let loc = Location {
            address: Some("Main St".to_string()),
            country: Some("Canada".to_string()),
            ..Default::default()
        };
        assert_eq!(format_location(Some(&loc), ""), "Location: Main St, Canada");
    }

    #[test]
    fn test_coordinates_render_with_decimal() {
        let rendered = format_location(Some(&coords(10.0, 20.0)), "");
        assert_eq!(rendered, "GPS Coordinates: 10.0, 20.0");
        assert!(rendered.starts_with("GPS Coordinates: 10.0, 20.0"));
    }

    #[test]
    fn test_coordinates_fractional() {
        assert_eq!(
            format_location(Some(&coords(40.7128, -74.006)), ""),
            "GPS Coordinates: 40.7128, -74.006"
        );
    }

    #[test]
    fn test_coordinates_with_geocode_note() {
        assert_eq!(
            format_location(Some(&coords(10.0, 20.0)), "Near Main Square"),
            "GPS Coordinates: 10.0, 20.0 (Near Main Square)"
        );
    }

    #[test]
    fn test_zero_coordinates_are_present() {
        assert_eq!(
            format_location(Some(&coords(0.0, 0.0)), ""),
            "GPS Coordinates: 0.0, 0.0"
        );
    }

    #[test]
    fn test_address_takes_precedence_over_coordinates() {
        let loc = Location {
            address: Some("1 Infinite Loop".to_string()),
            ..coords(37.3, -122.0)
        };
        assert_eq!(
            format_location(Some(&loc), "ignored"),
            "Location: 1 Infinite Loop"
        );
        assert_eq!(coordinates_for_lookup(Some(&loc)), None);
    }

    #[test]
    fn test_single_coordinate_is_not_rendered() {
        let loc = Location {
            latitude: Some(1.0),
            ..Default::default()
        };
        assert_eq!(format_location(Some(&loc), ""), "");
        assert_eq!(coordinates_for_lookup(Some(&loc)), None);
    }

    #[test]
    fn test_coordinates_for_lookup() {
        assert_eq!(coordinates_for_lookup(Some(&coords(1.0, 2.0))), Some((1.0, 2.0)));
        assert_eq!(coordinates_for_lookup(None), None);
    }
}
