//! User account as seen by clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A registered EcoTrack user.
///
/// `points` is the eco-points balance. It only changes through profile
/// updates or server-side point awards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Server-assigned identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Login e-mail address.
    pub email: String,
    /// Avatar image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Contact phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Free-form home location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Eco-points balance.
    pub points: i64,
    /// Registration timestamp.
    pub joined_date: DateTime<Utc>,
}

/// Partial profile update. `None` fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    /// New display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New e-mail address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// New home location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl ProfileUpdate {
    /// Overlays the supplied fields on `current`, yielding a complete
    /// update. Blank names and e-mails fall back to the current value.
    #[must_use]
    pub fn merged_with(&self, current: &User) -> Self {
        let non_blank = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(ToString::to_string)
        };
        Self {
            name: non_blank(&self.name).or_else(|| Some(current.name.clone())),
            email: non_blank(&self.email).or_else(|| Some(current.email.clone())),
            phone: self.phone.clone().or_else(|| current.phone.clone()),
            location: self.location.clone().or_else(|| current.location.clone()),
        }
    }
}
