//! Typed wrappers for every route of the EcoTrack REST surface.

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use super::error::ApiError;
use super::http::{ApiClient, RequestOptions};
use crate::api::dto::{
    ActivityListResponse, ActivityPageResponse, AuthResponse, CreateActivityResponse,
    CreateReportResponse, LeaderboardResponse, LikeResponse, LoginRequest, MessageResponse,
    PingResponse, ProfileResponse, RegisterRequest, ReportListResponse, ReportResponse,
    StatsResponse, UpdateStatusRequest,
};
use crate::model::{FeedFilter, NewCleanupActivity, NewReport, Note, NoteInput, ProfileUpdate, ReportStatus};

fn json_body<T: Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Encode(e.to_string()))
}

fn get() -> RequestOptions {
    RequestOptions::new(Method::GET)
}

fn with_json<T: Serialize>(method: Method, value: &T) -> Result<RequestOptions, ApiError> {
    Ok(RequestOptions::new(method).with_body(json_body(value)?))
}

impl ApiClient {
    // ── Authentication ──────────────────────────────────────────────────

    /// `POST /auth/register`.
    ///
    /// # Errors
    ///
    /// Propagates any [`ApiError`] from the call.
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.request("/auth/register", with_json(Method::POST, request)?)
            .await
    }

    /// `POST /auth/login`.
    ///
    /// # Errors
    ///
    /// Propagates any [`ApiError`] from the call.
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.request("/auth/login", with_json(Method::POST, request)?)
            .await
    }

    /// `GET /auth/profile`.
    ///
    /// # Errors
    ///
    /// Propagates any [`ApiError`]; a stale token yields status 401.
    pub async fn get_profile(&self) -> Result<ProfileResponse, ApiError> {
        self.request("/auth/profile", get()).await
    }

    /// `PUT /auth/profile`.
    ///
    /// # Errors
    ///
    /// Propagates any [`ApiError`] from the call.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<ProfileResponse, ApiError> {
        self.request("/auth/profile", with_json(Method::PUT, update)?)
            .await
    }

    // ── Waste reports ───────────────────────────────────────────────────

    /// `GET /reports`.
    ///
    /// # Errors
    ///
    /// Propagates any [`ApiError`] from the call.
    pub async fn get_all_reports(&self) -> Result<ReportListResponse, ApiError> {
        self.request("/reports", get()).await
    }

    /// `GET /reports/my`.
    ///
    /// # Errors
    ///
    /// Propagates any [`ApiError`] from the call.
    pub async fn get_user_reports(&self) -> Result<ReportListResponse, ApiError> {
        self.request("/reports/my", get()).await
    }

    /// `POST /reports`.
    ///
    /// # Errors
    ///
    /// Propagates any [`ApiError`] from the call.
    pub async fn create_report(&self, report: &NewReport) -> Result<CreateReportResponse, ApiError> {
        self.request("/reports", with_json(Method::POST, report)?)
            .await
    }

    /// `PUT /reports/{id}/status`.
    ///
    /// # Errors
    ///
    /// Propagates any [`ApiError`]; a regressing status yields 409.
    pub async fn update_report_status(
        &self,
        report_id: &str,
        status: ReportStatus,
    ) -> Result<ReportResponse, ApiError> {
        let body = UpdateStatusRequest { status };
        self.request(
            &format!("/reports/{report_id}/status"),
            with_json(Method::PUT, &body)?,
        )
        .await
    }

    // ── Feed / cleanup activities ───────────────────────────────────────

    /// `GET /cleanup-activities?page&limit&filter`.
    ///
    /// # Errors
    ///
    /// Propagates any [`ApiError`] from the call.
    pub async fn get_feed_activities(
        &self,
        page: u32,
        limit: u32,
        filter: FeedFilter,
    ) -> Result<ActivityPageResponse, ApiError> {
        self.request(
            &format!("/cleanup-activities?page={page}&limit={limit}&filter={filter}"),
            get(),
        )
        .await
    }

    /// `POST /cleanup-activities`.
    ///
    /// # Errors
    ///
    /// Propagates any [`ApiError`] from the call.
    pub async fn create_cleanup_activity(
        &self,
        activity: &NewCleanupActivity,
    ) -> Result<CreateActivityResponse, ApiError> {
        self.request("/cleanup-activities", with_json(Method::POST, activity)?)
            .await
    }

    /// `GET /cleanup-activities/my`.
    ///
    /// # Errors
    ///
    /// Propagates any [`ApiError`] from the call.
    pub async fn get_user_cleanup_activities(&self) -> Result<ActivityListResponse, ApiError> {
        self.request("/cleanup-activities/my", get()).await
    }

    /// `POST /cleanup-activities/{id}/like`.
    ///
    /// # Errors
    ///
    /// Propagates any [`ApiError`] from the call.
    pub async fn like_activity(&self, activity_id: &str) -> Result<LikeResponse, ApiError> {
        self.request(
            &format!("/cleanup-activities/{activity_id}/like"),
            RequestOptions::new(Method::POST),
        )
        .await
    }

    /// `GET /feed/stats`.
    ///
    /// # Errors
    ///
    /// Propagates any [`ApiError`] from the call.
    pub async fn get_feed_stats(&self) -> Result<StatsResponse, ApiError> {
        self.request("/feed/stats", get()).await
    }

    /// `GET /leaderboard?limit`.
    ///
    /// # Errors
    ///
    /// Propagates any [`ApiError`] from the call.
    pub async fn get_leaderboard(&self, limit: u32) -> Result<LeaderboardResponse, ApiError> {
        self.request(&format!("/leaderboard?limit={limit}"), get())
            .await
    }

    // ── Utility ─────────────────────────────────────────────────────────

    /// `GET /ping`.
    ///
    /// # Errors
    ///
    /// Propagates any [`ApiError`] from the call.
    pub async fn ping(&self) -> Result<PingResponse, ApiError> {
        self.request("/ping", get()).await
    }

    // ── Notes ───────────────────────────────────────────────────────────

    /// `GET /notes`.
    ///
    /// # Errors
    ///
    /// Propagates any [`ApiError`] from the call.
    pub async fn list_notes(&self) -> Result<Vec<Note>, ApiError> {
        self.request("/notes", get()).await
    }

    /// `POST /notes`.
    ///
    /// # Errors
    ///
    /// Propagates any [`ApiError`] from the call.
    pub async fn create_note(&self, note: &NoteInput) -> Result<Note, ApiError> {
        self.request("/notes", with_json(Method::POST, note)?).await
    }

    /// `PUT /notes/{id}`.
    ///
    /// # Errors
    ///
    /// Propagates any [`ApiError`]; blank title or content yields 400.
    pub async fn update_note(&self, note_id: &str, note: &NoteInput) -> Result<Note, ApiError> {
        self.request(&format!("/notes/{note_id}"), with_json(Method::PUT, note)?)
            .await
    }

    /// `DELETE /notes/{id}`.
    ///
    /// # Errors
    ///
    /// Propagates any [`ApiError`] from the call.
    pub async fn delete_note(&self, note_id: &str) -> Result<MessageResponse, ApiError> {
        self.request(&format!("/notes/{note_id}"), RequestOptions::new(Method::DELETE))
            .await
    }
}
