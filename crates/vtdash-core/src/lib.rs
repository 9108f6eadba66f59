//! # VTuber Dashboard Core
//!
//! Shared, I/O-free logic for the Thai VTuber dashboard: the channel data
//! model, the activity predicate, the list derivation pipeline
//! (filter → sort → paginate, plus subscriber ranks and aggregate stats),
//! the immutable UI state that drives it, and the channel store abstraction.
//!
//! This crate contains no tokio, reqwest, filesystem I/O, or other
//! native-only dependencies. Every pipeline stage is a pure function that
//! borrows its input and returns a fresh value.
//!
//! ## Data Flow
//!
//! ```text
//!                    ┌──────────────┐
//!  ChannelStore ───▶ │ ChannelSnap- │──▶ ranks (full list, computed once)
//!                    │     shot     │
//!                    └──────┬───────┘
//!                           ▼
//!                        filter ──▶ stats
//!                           │
//!                           ▼
//!                         sort ──▶ paginate ──▶ DashboardView
//! ```

pub mod activity;
pub mod filter;
pub mod models;
pub mod paginate;
pub mod pipeline;
pub mod rank;
pub mod sort;
pub mod state;
pub mod stats;
pub mod store;

pub use activity::{ActivityPredicate, RecencyActivity};
pub use models::{
    Channel, ChannelsResponse, DashboardFilters, PaginationState, SortField, SortOrder, SortState,
};
pub use pipeline::{derive_view, ChannelRow, ChannelSnapshot, DashboardView};
pub use rank::SubscriberRanks;
pub use state::DashboardState;
pub use stats::DashboardStats;
