//! Service layer of the reference backend.
//!
//! Each service is a stateless coordinator over the shared
//! [`crate::domain::Database`]: validate, lock, mutate, log, return.

pub mod activity_service;
pub mod note_service;
pub mod report_service;
pub mod user_service;

pub use activity_service::ActivityService;
pub use note_service::NoteService;
pub use report_service::ReportService;
pub use user_service::UserService;
