//! Cache of waste reports.
//!
//! Every mutation applies the server's canonical record, never the
//! client draft: creation appends what the server returned, a status
//! update replaces the record by id with the server's answer.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Duration, Utc};
use tokio_util::sync::CancellationToken;

use super::{EventBus, StoreEvent, SubmitOutcome, read, until_cancelled, write};
use crate::client::ApiClient;
use crate::model::{ReportDraft, ReportStatus, WasteReport};

/// How long a completed report stays on the map.
pub const COMPLETED_VISIBILITY_HOURS: i64 = 24;

/// In-memory list of waste reports, refreshed explicitly.
#[derive(Debug)]
pub struct ReportStore {
    client: Arc<ApiClient>,
    reports: RwLock<Vec<WasteReport>>,
    events: EventBus,
    cancel: CancellationToken,
}

impl ReportStore {
    /// Creates an empty store without fetching.
    #[must_use]
    pub fn new(client: Arc<ApiClient>, events: EventBus, cancel: CancellationToken) -> Self {
        Self {
            client,
            reports: RwLock::new(Vec::new()),
            events,
            cancel,
        }
    }

    /// Creates a store and loads the full report list.
    pub async fn connect(
        client: Arc<ApiClient>,
        events: EventBus,
        cancel: CancellationToken,
    ) -> Self {
        let store = Self::new(client, events, cancel);
        store.refresh().await;
        store
    }

    /// Replaces the cache with the server's list and returns its length.
    ///
    /// A failed fetch empties the cache instead of keeping stale data.
    pub async fn refresh(&self) -> usize {
        let Some(result) = until_cancelled(&self.cancel, self.client.get_all_reports()).await
        else {
            return self.len();
        };

        let reports = match result {
            Ok(response) => response.reports,
            Err(e) => {
                tracing::error!(error = %e, "error loading reports");
                Vec::new()
            }
        };
        let count = reports.len();
        *write(&self.reports) = reports;

        tracing::debug!(count, "reports loaded");
        let _ = self.events.publish(StoreEvent::ReportsLoaded {
            count,
            timestamp: Utc::now(),
        });
        count
    }

    /// Snapshot of the cached reports.
    #[must_use]
    pub fn reports(&self) -> Vec<WasteReport> {
        read(&self.reports).clone()
    }

    /// Number of cached reports.
    #[must_use]
    pub fn len(&self) -> usize {
        read(&self.reports).len()
    }

    /// `true` when nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        read(&self.reports).is_empty()
    }

    /// Validates and submits a report, appending the stored version.
    ///
    /// Validation failures are rejected without a network call.
    pub async fn add_report(&self, draft: ReportDraft) -> SubmitOutcome {
        let request = match draft.into_request() {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(error = %e, "report draft rejected");
                return SubmitOutcome::failed();
            }
        };

        match until_cancelled(&self.cancel, self.client.create_report(&request)).await {
            Some(Ok(response)) => {
                let report_id = response.report.id.clone();
                write(&self.reports).push(response.report);

                tracing::info!(%report_id, points = response.points_earned, "report created");
                let _ = self.events.publish(StoreEvent::ReportAdded {
                    report_id,
                    points_earned: response.points_earned,
                    timestamp: Utc::now(),
                });
                SubmitOutcome::succeeded(response.points_earned)
            }
            Some(Err(e)) => {
                tracing::error!(error = %e, "error creating report");
                SubmitOutcome::failed()
            }
            None => SubmitOutcome::failed(),
        }
    }

    /// Sets a report's status and replaces the cached record with the
    /// server's answer.
    pub async fn update_report_status(&self, report_id: &str, status: ReportStatus) -> bool {
        let call = self.client.update_report_status(report_id, status);
        match until_cancelled(&self.cancel, call).await {
            Some(Ok(response)) => {
                let updated = response.report;
                let status = updated.status;
                {
                    let mut reports = write(&self.reports);
                    if let Some(slot) = reports.iter_mut().find(|r| r.id == report_id) {
                        *slot = updated;
                    }
                }

                tracing::info!(report_id, %status, "report status updated");
                let _ = self.events.publish(StoreEvent::ReportUpdated {
                    report_id: report_id.to_string(),
                    status,
                    timestamp: Utc::now(),
                });
                true
            }
            Some(Err(e)) => {
                tracing::error!(report_id, error = %e, "error updating report status");
                false
            }
            None => false,
        }
    }

    /// Cached reports submitted by `user_id`. No network call.
    #[must_use]
    pub fn user_reports(&self, user_id: &str) -> Vec<WasteReport> {
        read(&self.reports)
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Cached reports worth showing on the map at `now`: completed
    /// reports drop off [`COMPLETED_VISIBILITY_HOURS`] after completion.
    #[must_use]
    pub fn map_reports(&self, now: DateTime<Utc>) -> Vec<WasteReport> {
        let horizon = Duration::hours(COMPLETED_VISIBILITY_HOURS);
        read(&self.reports)
            .iter()
            .filter(|r| match (r.status, r.completed_at) {
                (ReportStatus::Completed, Some(done)) => now - done <= horizon,
                _ => true,
            })
            .cloned()
            .collect()
    }

    /// Stops applying results of outstanding calls.
    pub fn close(&self) {
        self.cancel.cancel();
    }
}
