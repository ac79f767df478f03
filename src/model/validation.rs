//! Client-side form validation shared with the backend.

/// Maximum number of photos attached to a single waste report.
pub const MAX_REPORT_IMAGES: usize = 5;

/// A draft failed validation before any network call was made.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// A required text field was empty or whitespace only.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// No GPS fix was captured for the draft.
    #[error("a GPS location is required")]
    MissingLocation,

    /// A cleanup was submitted without its verification photo.
    #[error("a verification photo is required")]
    MissingVerificationPhoto,

    /// A report was submitted without any photo.
    #[error("at least one photo is required")]
    MissingPhotos,

    /// More photos than the report form accepts.
    #[error("at most {max} images are allowed, got {actual}")]
    TooManyImages {
        /// Upper bound.
        max: usize,
        /// Number supplied.
        actual: usize,
    },

    /// Latitude or longitude outside the WGS84 range.
    #[error("coordinates out of range: ({latitude}, {longitude})")]
    InvalidCoordinates {
        /// Supplied latitude.
        latitude: f64,
        /// Supplied longitude.
        longitude: f64,
    },
}

/// Returns the trimmed value, or [`ValidationError::MissingField`] when
/// it is blank.
///
/// # Errors
///
/// Returns [`ValidationError::MissingField`] naming `field`.
pub fn require_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

/// Checks that a coordinate pair is finite and inside WGS84 bounds.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidCoordinates`] otherwise.
pub fn check_coordinates(latitude: f64, longitude: f64) -> Result<(), ValidationError> {
    let lat_ok = latitude.is_finite() && (-90.0..=90.0).contains(&latitude);
    let lng_ok = longitude.is_finite() && (-180.0..=180.0).contains(&longitude);
    if lat_ok && lng_ok {
        Ok(())
    } else {
        Err(ValidationError::InvalidCoordinates {
            latitude,
            longitude,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_rejected() {
        assert_eq!(
            require_text("description", "  \n"),
            Err(ValidationError::MissingField("description"))
        );
    }

    #[test]
    fn text_is_trimmed() {
        assert_eq!(require_text("name", "  Asha ").ok().as_deref(), Some("Asha"));
    }

    #[test]
    fn coordinates_bounds() {
        assert!(check_coordinates(18.52, 73.85).is_ok());
        assert!(check_coordinates(-90.0, 180.0).is_ok());
        assert!(check_coordinates(91.0, 0.0).is_err());
        assert!(check_coordinates(0.0, f64::NAN).is_err());
    }

    #[test]
    fn error_messages_are_readable() {
        let err = ValidationError::TooManyImages { max: 5, actual: 7 };
        assert_eq!(err.to_string(), "at most 5 images are allowed, got 7");
    }
}
