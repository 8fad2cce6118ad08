#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Incident feed synchronization engine.
//!
//! Composes three responsibilities linearly: a fetcher (any
//! [`crime_feed_source::IncidentSource`]) performs the round trip, the
//! pure [`filter`] module derives the visible subset and per-category
//! counts, and the [`scheduler`] drives fetches on a fixed interval and
//! on demand while owning the published
//! [`crime_feed_engine_models::ViewState`].

pub mod filter;
pub mod scheduler;

pub use scheduler::{FeedConfig, FeedHandle};
