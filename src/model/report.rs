//! Waste reports and their status lifecycle.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::{MAX_REPORT_IMAGES, ValidationError, check_coordinates, require_text};

/// A geolocated point with a human-readable address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Location {
    /// WGS84 latitude.
    pub latitude: f64,
    /// WGS84 longitude.
    pub longitude: f64,
    /// Street address, or the formatted coordinates when none is known.
    #[serde(default)]
    pub address: String,
}

impl Location {
    /// Builds a location, using the formatted coordinates as the address
    /// when `address` is blank.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, address: &str) -> Self {
        let address = if address.trim().is_empty() {
            format!("{latitude:.6}, {longitude:.6}")
        } else {
            address.trim().to_string()
        };
        Self {
            latitude,
            longitude,
            address,
        }
    }
}

/// How much waste was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Small amount.
    Low,
    /// Moderate amount.
    Medium,
    /// Large amount.
    High,
    /// Hazardous waste.
    Critical,
}

/// Processing state of a report. Only moves forward.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// Reported, nobody assigned yet.
    Pending,
    /// A cleanup is under way.
    InProgress,
    /// The site has been cleaned.
    Completed,
}

impl ReportStatus {
    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// `true` when moving from `self` to `next` does not regress.
    /// Re-applying the current status is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        next >= self
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            other => Err(format!("unknown report status: {other}")),
        }
    }
}

/// A waste report as stored by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WasteReport {
    /// Server-assigned identifier.
    pub id: String,
    /// Reporting user.
    pub user_id: String,
    /// Reporting user's display name at submission time.
    pub user_name: String,
    /// Where the waste is.
    pub location: Location,
    /// Free-form waste category (e.g. `"Plastic Bottles"`).
    pub waste_type: String,
    /// How much waste.
    pub severity: Severity,
    /// Reporter's description.
    pub description: String,
    /// Ordered photo URLs.
    #[serde(default)]
    pub images: Vec<String>,
    /// Current processing state.
    pub status: ReportStatus,
    /// Submission timestamp.
    pub reported_at: DateTime<Utc>,
    /// Contact person on site.
    pub contact_name: String,
    /// Contact phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    /// When the report reached [`ReportStatus::Completed`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Request body for `POST /api/reports`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewReport {
    /// Where the waste is.
    pub location: Location,
    /// Waste category.
    pub waste_type: String,
    /// How much waste.
    pub severity: Severity,
    /// Reporter's description.
    pub description: String,
    /// Ordered photo URLs.
    #[serde(default)]
    pub images: Vec<String>,
    /// Contact person on site.
    pub contact_name: String,
    /// Contact phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
}

impl NewReport {
    /// Checks required fields, coordinates and the photo count (one to
    /// [`MAX_REPORT_IMAGES`]).
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_coordinates(self.location.latitude, self.location.longitude)?;
        require_text("wasteType", &self.waste_type)?;
        require_text("description", &self.description)?;
        require_text("contactName", &self.contact_name)?;
        if self.images.is_empty() {
            return Err(ValidationError::MissingPhotos);
        }
        if self.images.len() > MAX_REPORT_IMAGES {
            return Err(ValidationError::TooManyImages {
                max: MAX_REPORT_IMAGES,
                actual: self.images.len(),
            });
        }
        Ok(())
    }
}

/// A report form as the user fills it in. The GPS fix may be missing.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDraft {
    /// Captured GPS fix, if any.
    pub location: Option<Location>,
    /// Waste category.
    pub waste_type: String,
    /// How much waste.
    pub severity: Severity,
    /// Reporter's description.
    pub description: String,
    /// Attached photo URLs.
    pub images: Vec<String>,
    /// Contact person on site.
    pub contact_name: String,
    /// Contact phone number.
    pub contact_phone: Option<String>,
}

impl ReportDraft {
    /// Validates the draft and turns it into a request body.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingLocation`] without a GPS fix,
    /// otherwise whatever [`NewReport::validate`] reports.
    pub fn into_request(self) -> Result<NewReport, ValidationError> {
        let location = self.location.ok_or(ValidationError::MissingLocation)?;
        let request = NewReport {
            location,
            waste_type: self.waste_type.trim().to_string(),
            severity: self.severity,
            description: self.description.trim().to_string(),
            images: self.images,
            contact_name: self.contact_name.trim().to_string(),
            contact_phone: self
                .contact_phone
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
        };
        request.validate()?;
        Ok(request)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn draft() -> ReportDraft {
        ReportDraft {
            location: Some(Location::new(18.5204, 73.8567, "")),
            waste_type: "Plastic Bottles".to_string(),
            severity: Severity::Low,
            description: "Bottles piled near the bus stop".to_string(),
            images: vec!["https://img.example/1.jpg".to_string()],
            contact_name: "Asha".to_string(),
            contact_phone: Some(" ".to_string()),
        }
    }

    #[test]
    fn status_never_regresses() {
        assert!(ReportStatus::Pending.can_transition_to(ReportStatus::InProgress));
        assert!(ReportStatus::InProgress.can_transition_to(ReportStatus::Completed));
        assert!(ReportStatus::Completed.can_transition_to(ReportStatus::Completed));
        assert!(!ReportStatus::Completed.can_transition_to(ReportStatus::Pending));
        assert!(!ReportStatus::InProgress.can_transition_to(ReportStatus::Pending));
    }

    #[test]
    fn status_wire_names() {
        let json = serde_json::to_string(&ReportStatus::InProgress).unwrap_or_default();
        assert_eq!(json, "\"in_progress\"");
        assert_eq!("completed".parse::<ReportStatus>(), Ok(ReportStatus::Completed));
        assert!("done".parse::<ReportStatus>().is_err());
    }

    #[test]
    fn blank_address_uses_coordinates() {
        let loc = Location::new(18.5204, 73.8567, "  ");
        assert_eq!(loc.address, "18.520400, 73.856700");
    }

    #[test]
    fn draft_without_gps_is_rejected() {
        let mut d = draft();
        d.location = None;
        assert_eq!(d.into_request(), Err(ValidationError::MissingLocation));
    }

    #[test]
    fn draft_with_too_many_images_is_rejected() {
        let mut d = draft();
        d.images = vec!["x".to_string(); 6];
        assert_eq!(
            d.into_request(),
            Err(ValidationError::TooManyImages { max: 5, actual: 6 })
        );
    }

    #[test]
    fn draft_without_photos_is_rejected() {
        let mut d = draft();
        d.images.clear();
        assert_eq!(d.into_request(), Err(ValidationError::MissingPhotos));
    }

    #[test]
    fn valid_draft_drops_blank_phone() {
        let Ok(request) = draft().into_request() else {
            panic!("draft should be valid");
        };
        assert_eq!(request.contact_phone, None);
        assert_eq!(request.images.len(), 1);
    }
}
