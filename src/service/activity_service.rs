//! Cleanup activities: the paginated feed, likes and feed statistics.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::api::dto::{ActivityPageResponse, FeedPagination, FeedQuery};
use crate::domain::{Database, RewardPolicy};
use crate::error::ServerError;
use crate::model::{CleanupActivity, FeedFilter, FeedStats, Location, NewCleanupActivity, User};

/// How far back the `recent` filter looks.
pub const RECENT_WINDOW_DAYS: i64 = 7;

/// Whether `activity` passes `filter` at `now`.
#[must_use]
pub fn matches_filter(activity: &CleanupActivity, filter: FeedFilter, now: DateTime<Utc>) -> bool {
    match filter {
        FeedFilter::All => true,
        FeedFilter::Verified => activity.verified,
        FeedFilter::Recent => now - activity.cleaned_at <= Duration::days(RECENT_WINDOW_DAYS),
    }
}

/// Aggregates feed statistics over `activities`.
#[must_use]
pub fn compute_stats(activities: &[CleanupActivity]) -> FeedStats {
    let total = activities.len() as u64;
    let verified = activities.iter().filter(|a| a.verified).count() as u64;
    let photos_shared = activities
        .iter()
        .map(|a| {
            [
                Some(&a.verification_image),
                a.before_image.as_ref(),
                a.after_image.as_ref(),
            ]
            .into_iter()
            .flatten()
            .filter(|img| !img.is_empty())
            .count() as u64
        })
        .sum();
    let verification_rate = if total == 0 {
        0
    } else {
        u32::try_from((verified * 100 + total / 2) / total).unwrap_or(100)
    };

    FeedStats {
        areas_cleaned: total,
        photos_shared,
        verification_rate,
        points_earned: activities.iter().map(|a| a.points_earned).sum(),
    }
}

/// Activity operations.
#[derive(Debug, Clone)]
pub struct ActivityService {
    db: Arc<Database>,
    rewards: RewardPolicy,
}

impl ActivityService {
    /// Creates the service.
    #[must_use]
    pub fn new(db: Arc<Database>, rewards: RewardPolicy) -> Self {
        Self { db, rewards }
    }

    /// One feed page, newest first. `page` and `limit` are clamped.
    pub async fn page(&self, query: &FeedQuery) -> ActivityPageResponse {
        let query = query.clamped();
        let now = Utc::now();
        let tables = self.db.read().await;

        let matching: Vec<&CleanupActivity> = tables
            .activities
            .iter()
            .rev()
            .filter(|a| matches_filter(a, query.filter, now))
            .collect();

        let total = matching.len();
        let start = (query.page as usize - 1).saturating_mul(query.limit as usize);
        let activities: Vec<CleanupActivity> = matching
            .into_iter()
            .skip(start)
            .take(query.limit as usize)
            .cloned()
            .collect();
        let has_more = start.saturating_add(activities.len()) < total;

        ActivityPageResponse {
            activities,
            pagination: FeedPagination {
                page: query.page,
                limit: query.limit,
                total: u32::try_from(total).unwrap_or(u32::MAX),
                has_more,
            },
        }
    }

    /// Activities recorded by `user_id`, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> Vec<CleanupActivity> {
        self.db
            .read()
            .await
            .activities
            .iter()
            .rev()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Stores a verified cleanup and credits the user.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Validation`] when the request is invalid and
    /// [`ServerError::ReportNotFound`] when it names an unknown report.
    pub async fn create(
        &self,
        user: &User,
        request: NewCleanupActivity,
    ) -> Result<(CleanupActivity, i64), ServerError> {
        request.validate()?;

        let now = Utc::now();
        let verified = true;
        let points = self.rewards.for_cleanup(verified);
        let activity = CleanupActivity {
            id: Uuid::new_v4().to_string(),
            user_id: user.id.clone(),
            user_name: user.name.clone(),
            user_avatar: user.avatar.clone(),
            waste_report_id: request.waste_report_id,
            waste_type: request.waste_type.trim().to_string(),
            location: Location::new(request.latitude, request.longitude, &request.address),
            description: request.description.trim().to_string(),
            before_image: request.before_image,
            after_image: request.after_image,
            verification_image: request.verification_image,
            verified,
            points_earned: points,
            likes: 0,
            comments: 0,
            cleaned_at: now,
            created_at: now,
        };

        {
            let mut tables = self.db.write().await;
            if let Some(report_id) = &activity.waste_report_id {
                tables.report(report_id)?;
            }
            tables.credit_points(&user.id, points)?;
            tables.activities.push(activity.clone());
        }

        tracing::info!(activity_id = %activity.id, user_id = %user.id, points, "cleanup activity created");
        Ok((activity, points))
    }

    /// Records a like from `user_id` and returns the like count. A user
    /// who already liked the activity leaves the count unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::ActivityNotFound`] for an unknown ID.
    pub async fn like(&self, activity_id: &str, user_id: &str) -> Result<(u32, bool), ServerError> {
        let mut tables = self.db.write().await;
        tables.activity_mut(activity_id)?;

        let fresh = tables
            .likes
            .insert((activity_id.to_string(), user_id.to_string()));
        let activity = tables.activity_mut(activity_id)?;
        if fresh {
            activity.likes = activity.likes.saturating_add(1);
            tracing::debug!(%activity_id, %user_id, likes = activity.likes, "activity liked");
        }
        Ok((activity.likes, fresh))
    }

    /// Statistics over every stored activity.
    pub async fn stats(&self) -> FeedStats {
        compute_stats(&self.db.read().await.activities)
    }
}
