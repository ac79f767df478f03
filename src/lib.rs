//! # ecotrack
//!
//! Client coordination layer for EcoTrack, a community waste-reporting
//! and cleanup-verification app, together with an in-memory reference
//! backend serving the same REST surface.
//!
//! The client side is an [`client::ApiClient`] that attaches bearer
//! tokens and collapses concurrent identical mutating requests into one
//! network call, plus three state stores (auth, waste reports, activity
//! feed) that cache server state and publish a [`store::StoreEvent`]
//! after every reconciliation.
//!
//! ## Architecture
//!
//! ```text
//! Caller (UI, CLI, tests)
//!     │
//!     ├── EcoTrack composition root (app)
//!     │     ├── AuthStore / ReportStore / FeedStore (store/)
//!     │     └── EventBus (store/)
//!     │
//!     ├── ApiClient + TokenStore (client/)
//!     │
//!     │   HTTP /api
//!     ▼
//! Reference backend
//!     ├── REST Handlers + OpenAPI (api/)
//!     ├── User / Report / Activity / Note services (service/)
//!     └── In-memory Database, argon2, sessions (domain/)
//! ```
//!
//! Wire types shared by both halves live in [`model`].

pub mod api;
pub mod app;
pub mod app_state;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod model;
pub mod service;
pub mod store;
