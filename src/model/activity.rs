//! Cleanup activities, the feed filter and feed statistics.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::report::Location;
use super::validation::{ValidationError, check_coordinates, require_text};

/// A bare GPS fix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    /// WGS84 latitude.
    pub latitude: f64,
    /// WGS84 longitude.
    pub longitude: f64,
}

/// A verified record of a user cleaning a reported location.
///
/// Only `likes` changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CleanupActivity {
    /// Server-assigned identifier.
    pub id: String,
    /// User who did the cleanup.
    pub user_id: String,
    /// That user's display name.
    pub user_name: String,
    /// That user's avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_avatar: Option<String>,
    /// Report this cleanup resolves, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waste_report_id: Option<String>,
    /// Waste category.
    pub waste_type: String,
    /// Where the cleanup happened.
    pub location: Location,
    /// What was done.
    pub description: String,
    /// Photo before the cleanup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_image: Option<String>,
    /// Photo after the cleanup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_image: Option<String>,
    /// GPS-tagged verification photo.
    pub verification_image: String,
    /// Whether the verification was accepted.
    pub verified: bool,
    /// Points awarded at creation.
    pub points_earned: i64,
    /// Like counter.
    pub likes: u32,
    /// Comment counter.
    pub comments: u32,
    /// When the cleanup took place.
    pub cleaned_at: DateTime<Utc>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

/// Request body for `POST /api/cleanup-activities`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewCleanupActivity {
    /// Report this cleanup resolves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waste_report_id: Option<String>,
    /// Waste category.
    pub waste_type: String,
    /// GPS latitude at verification time.
    pub latitude: f64,
    /// GPS longitude at verification time.
    pub longitude: f64,
    /// Address of the cleaned site.
    #[serde(default)]
    pub address: String,
    /// What was done.
    pub description: String,
    /// Photo before the cleanup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_image: Option<String>,
    /// Photo after the cleanup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_image: Option<String>,
    /// GPS-tagged verification photo.
    pub verification_image: String,
}

impl NewCleanupActivity {
    /// Checks the verification photo, coordinates and description.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.verification_image.trim().is_empty() {
            return Err(ValidationError::MissingVerificationPhoto);
        }
        check_coordinates(self.latitude, self.longitude)?;
        require_text("description", &self.description)?;
        require_text("wasteType", &self.waste_type)?;
        Ok(())
    }
}

/// The cleanup verification form as the user fills it in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanupDraft {
    /// Report being resolved.
    pub waste_report_id: Option<String>,
    /// Waste category.
    pub waste_type: String,
    /// Current GPS fix, if captured.
    pub position: Option<GeoPoint>,
    /// Address of the reported site.
    pub address: String,
    /// What was done.
    pub description: String,
    /// Photo before the cleanup.
    pub before_image: Option<String>,
    /// Photo after the cleanup.
    pub after_image: Option<String>,
    /// GPS-tagged verification photo.
    pub verification_image: Option<String>,
}

impl CleanupDraft {
    /// Validates the draft in form order (photo, GPS, description) and
    /// turns it into a request body. Empty optional photos are dropped.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn into_request(self) -> Result<NewCleanupActivity, ValidationError> {
        let verification_image = self
            .verification_image
            .filter(|img| !img.trim().is_empty())
            .ok_or(ValidationError::MissingVerificationPhoto)?;
        let position = self.position.ok_or(ValidationError::MissingLocation)?;
        let description = require_text("description", &self.description)?;
        let non_empty = |img: Option<String>| img.filter(|i| !i.trim().is_empty());

        let request = NewCleanupActivity {
            waste_report_id: self.waste_report_id,
            waste_type: self.waste_type.trim().to_string(),
            latitude: position.latitude,
            longitude: position.longitude,
            address: self.address,
            description,
            before_image: non_empty(self.before_image),
            after_image: non_empty(self.after_image),
            verification_image,
        };
        request.validate()?;
        Ok(request)
    }
}

/// Which activities the feed shows.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum FeedFilter {
    /// Everything, newest first.
    #[default]
    All,
    /// Only verified cleanups.
    Verified,
    /// Cleanups from the last week.
    Recent,
}

impl FeedFilter {
    /// Query-string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Verified => "verified",
            Self::Recent => "recent",
        }
    }
}

impl fmt::Display for FeedFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate feed statistics, computed by the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedStats {
    /// Number of cleaned areas.
    #[serde(rename = "areascleaned")]
    pub areas_cleaned: u64,
    /// Photos attached to cleanups.
    pub photos_shared: u64,
    /// Share of verified cleanups, in percent.
    pub verification_rate: u32,
    /// Points awarded for cleanups.
    pub points_earned: i64,
}
