//! Event Metrycs - synthesized metrics and reports for blockchain community events.
//!
//! # Overview
//!
//! Given an event's capacity and schedule, Event Metrycs derives a plausible
//! metrics snapshot (registrations, attendance, on-chain activity, social
//! reach, comparison with similar events) and turns it into a qualitative
//! report with highlights, lowlights and recommendations.
//!
//! ```text
//! Event --synthesize_metrics--> EventMetrics --generate_report--> EventReport
//! ```
//!
//! Both stages are pure: they take the current time and a random number
//! generator as arguments and never touch global state, so a seeded RNG gives
//! reproducible output.
//!
//! # Modules
//!
//! - [`model`]: Events, metrics snapshots, updates and reports
//! - [`synthesis`]: Metrics synthesis and live updates
//! - [`report`]: Report generation rules
//! - [`stats`]: Safe ratios and percentage formatting
//! - [`export`]: CSV and JSON export
//! - [`storage`]: In-memory event registry
//! - [`config`]: Environment configuration
//! - [`api`]: HTTP API handlers

pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod report;
pub mod stats;
pub mod storage;
pub mod synthesis;
