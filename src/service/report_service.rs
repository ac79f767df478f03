//! Waste reports: listing, submission and status transitions.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{Database, RewardPolicy};
use crate::error::ServerError;
use crate::model::{Location, NewReport, ReportStatus, User, WasteReport};

/// Report operations.
#[derive(Debug, Clone)]
pub struct ReportService {
    db: Arc<Database>,
    rewards: RewardPolicy,
}

impl ReportService {
    /// Creates the service.
    #[must_use]
    pub fn new(db: Arc<Database>, rewards: RewardPolicy) -> Self {
        Self { db, rewards }
    }

    /// Every report, newest first.
    pub async fn list(&self) -> Vec<WasteReport> {
        self.db.read().await.reports.iter().rev().cloned().collect()
    }

    /// Reports submitted by `user_id`, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> Vec<WasteReport> {
        self.db
            .read()
            .await
            .reports
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Stores a report as `pending` and credits the reporter.
    ///
    /// Returns the stored report and the points credited.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Validation`] when the request is invalid.
    pub async fn create(
        &self,
        reporter: &User,
        request: NewReport,
    ) -> Result<(WasteReport, i64), ServerError> {
        request.validate()?;

        let report = WasteReport {
            id: Uuid::new_v4().to_string(),
            user_id: reporter.id.clone(),
            user_name: reporter.name.clone(),
            location: Location::new(
                request.location.latitude,
                request.location.longitude,
                &request.location.address,
            ),
            waste_type: request.waste_type.trim().to_string(),
            severity: request.severity,
            description: request.description.trim().to_string(),
            images: request.images,
            status: ReportStatus::Pending,
            reported_at: Utc::now(),
            contact_name: request.contact_name.trim().to_string(),
            contact_phone: request.contact_phone,
            completed_at: None,
        };

        let points = self.rewards.report_points;
        {
            let mut tables = self.db.write().await;
            tables.credit_points(&reporter.id, points)?;
            tables.reports.push(report.clone());
        }

        tracing::info!(
            report_id = %report.id,
            user_id = %reporter.id,
            waste_type = %report.waste_type,
            points,
            "waste report created"
        );
        Ok((report, points))
    }

    /// Moves a report forward. Re-applying the current status is a no-op
    /// that returns the report unchanged; `completedAt` is stamped on the
    /// first transition to `completed`.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::ReportNotFound`] for an unknown ID and
    /// [`ServerError::StatusRegression`] when `status` precedes the
    /// current one.
    pub async fn update_status(
        &self,
        report_id: &str,
        status: ReportStatus,
    ) -> Result<WasteReport, ServerError> {
        let mut tables = self.db.write().await;
        let report = tables.report_mut(report_id)?;

        if !report.status.can_transition_to(status) {
            return Err(ServerError::StatusRegression {
                from: report.status,
                to: status,
            });
        }
        if report.status != status {
            tracing::info!(%report_id, from = %report.status, to = %status, "report status changed");
            report.status = status;
            if status == ReportStatus::Completed && report.completed_at.is_none() {
                report.completed_at = Some(Utc::now());
            }
        }
        Ok(report.clone())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::UserRecord;
    use crate::model::{Severity, ValidationError};

    async fn setup() -> (ReportService, User) {
        let db = Arc::new(Database::new());
        let user = User {
            id: "u1".to_string(),
            name: "Asha".to_string(),
            email: "asha@eco.org".to_string(),
            avatar: None,
            phone: None,
            location: None,
            points: 0,
            joined_date: Utc::now(),
        };
        db.write().await.users.insert(
            user.id.clone(),
            UserRecord {
                user: user.clone(),
                password_hash: String::new(),
            },
        );
        (ReportService::new(db, RewardPolicy::default()), user)
    }

    fn request() -> NewReport {
        NewReport {
            location: Location::new(18.5204, 73.8567, ""),
            waste_type: "Plastic Bottles".to_string(),
            severity: Severity::Low,
            description: "Bottles along the riverbank".to_string(),
            images: vec!["https://img.example/1.jpg".to_string()],
            contact_name: "Asha".to_string(),
            contact_phone: None,
        }
    }

    #[tokio::test]
    async fn create_credits_reporter() {
        let (svc, user) = setup().await;
        let Ok((report, points)) = svc.create(&user, request()).await else {
            panic!("create failed");
        };
        assert_eq!(points, 50);
        assert_eq!(report.status, ReportStatus::Pending);
        assert_eq!(report.location.address, "18.520400, 73.856700");

        let balance = svc.db.read().await.user("u1").map(|u| u.points).unwrap_or(-1);
        assert_eq!(balance, 50);
        assert_eq!(svc.list_for_user("u1").await.len(), 1);
        assert!(svc.list_for_user("u2").await.is_empty());
    }

    #[tokio::test]
    async fn invalid_report_is_rejected() {
        let (svc, user) = setup().await;
        let mut bad = request();
        bad.description = "  ".to_string();
        assert!(matches!(
            svc.create(&user, bad).await,
            Err(ServerError::Validation(_))
        ));
        assert!(svc.list().await.is_empty());
    }

    #[tokio::test]
    async fn report_without_photos_is_rejected() {
        let (svc, user) = setup().await;
        let mut bad = request();
        bad.images.clear();
        assert!(matches!(
            svc.create(&user, bad).await,
            Err(ServerError::Validation(ValidationError::MissingPhotos))
        ));
        assert!(svc.list().await.is_empty());
    }

    #[tokio::test]
    async fn status_moves_forward_only() {
        let (svc, user) = setup().await;
        let Ok((report, _)) = svc.create(&user, request()).await else {
            panic!("create failed");
        };

        let Ok(done) = svc.update_status(&report.id, ReportStatus::Completed).await else {
            panic!("update failed");
        };
        assert!(done.completed_at.is_some());

        let Ok(again) = svc.update_status(&report.id, ReportStatus::Completed).await else {
            panic!("idempotent update failed");
        };
        assert_eq!(again, done);

        assert!(matches!(
            svc.update_status(&report.id, ReportStatus::Pending).await,
            Err(ServerError::StatusRegression { .. })
        ));
    }

    #[tokio::test]
    async fn unknown_report_is_not_found() {
        let (svc, _) = setup().await;
        assert!(matches!(
            svc.update_status("missing", ReportStatus::InProgress).await,
            Err(ServerError::ReportNotFound(_))
        ));
    }
}
