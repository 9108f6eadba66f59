//! # Thai VTuber Dashboard
//!
//! Browse, rank, and summarize Thai VTuber YouTube channels.
//!
//! The pure list pipeline (filter, rank, sort, paginate, stats) lives in the
//! `vtdash-core` crate. This crate wires it to the outside world: the ranking
//! aggregation API, YouTube feeds, the channel submission endpoint, a CLI and
//! an HTTP server.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌────────────────┐
//! │ Channel API  │──▶│ SnapshotCache │──▶│ derive_view    │
//! │ (http/file)  │   │ (ranks once)  │   │ filter→sort→pg │
//! └──────────────┘   └──────────────┘   └───────┬────────┘
//!                                               │
//!                          ┌────────────────────┤
//!                          ▼                    ▼
//!                     ┌──────────┐        ┌──────────┐
//!                     │   CLI    │        │   HTTP   │
//!                     │ (vtdash) │        │  (axum)  │
//!                     └──────────┘        └──────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`channels`] | HTTP and file channel stores |
//! | [`refresh`] | Snapshot cache and background poller |
//! | [`dashboard`] | Query mapping, `list` and `stats` commands |
//! | [`feed`] | YouTube Atom feed client |
//! | [`lookup`] | Channel URL → channel id |
//! | [`register`] | Channel submission |
//! | [`format`] | Terminal formatting helpers |
//! | [`server`] | HTTP API |

pub mod channels;
pub mod config;
pub mod dashboard;
pub mod feed;
pub mod format;
pub mod lookup;
pub mod refresh;
pub mod register;
pub mod server;
