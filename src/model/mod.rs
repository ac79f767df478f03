//! Wire-level data model shared by the client stores and the reference
//! backend.
//!
//! Every type serializes to the camelCase JSON the EcoTrack REST surface
//! speaks, so the same structs travel both directions.

pub mod activity;
pub mod note;
pub mod report;
pub mod rewards;
pub mod user;
pub mod validation;

pub use activity::{
    CleanupActivity, CleanupDraft, FeedFilter, FeedStats, GeoPoint, NewCleanupActivity,
};
pub use note::{Note, NoteInput};
pub use report::{Location, NewReport, ReportDraft, ReportStatus, Severity, WasteReport};
pub use rewards::{Milestone, MilestoneProgress, MILESTONES};
pub use user::{ProfileUpdate, User};
pub use validation::ValidationError;
