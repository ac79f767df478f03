//! Request and response envelopes of the REST surface.
//!
//! The reference backend serializes these and [`crate::client`]
//! deserializes the very same types, so both sides agree on the shape.

pub mod activity_dto;
pub mod auth_dto;
pub mod common_dto;
pub mod report_dto;

pub use activity_dto::*;
pub use auth_dto::*;
pub use common_dto::*;
pub use report_dto::*;
