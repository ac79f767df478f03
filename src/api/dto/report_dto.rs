//! Waste report envelopes.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::{ReportStatus, WasteReport};

/// Response of `GET /api/reports` and `GET /api/reports/my`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportListResponse {
    /// Reports in submission order.
    pub reports: Vec<WasteReport>,
}

/// Response of `POST /api/reports` (201 Created).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportResponse {
    /// The stored report.
    pub report: WasteReport,
    /// Eco points credited for the report.
    pub points_earned: i64,
}

/// Request body for `PUT /api/reports/{id}/status`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    /// Target status.
    pub status: ReportStatus,
}

/// Response carrying a single report.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportResponse {
    /// The report after the update.
    pub report: WasteReport,
}
