//! Data models for Event Metrycs.
//!
//! # Overview
//!
//! An [`Event`] is the only input. Everything else in this module is produced
//! from it: an [`EventMetrics`] snapshot (registration, attendance, on-chain,
//! social and comparison figures), an incremental [`MetricsUpdate`], and the
//! qualitative [`EventReport`].
//!
//! All JSON produced from these types uses camelCase field names.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The kind of event being tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Workshop,
    Meetup,
    Hackathon,
    Conference,
    Webinar,
    Networking,
}

impl EventType {
    /// All event types, in display order.
    pub const ALL: [EventType; 6] = [
        EventType::Workshop,
        EventType::Meetup,
        EventType::Hackathon,
        EventType::Conference,
        EventType::Webinar,
        EventType::Networking,
    ];

    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            EventType::Workshop => "Workshop",
            EventType::Meetup => "Meetup",
            EventType::Hackathon => "Hackathon",
            EventType::Conference => "Conference",
            EventType::Webinar => "Webinar",
            EventType::Networking => "Networking",
        }
    }

    /// Scale applied to capacity when synthesizing comparable events.
    ///
    /// Conferences draw the largest crowds, workshops the smallest.
    pub fn comparison_multiplier(&self) -> f64 {
        match self {
            EventType::Workshop => 0.8,
            EventType::Networking => 0.9,
            EventType::Meetup => 1.0,
            EventType::Webinar => 1.2,
            EventType::Hackathon => 1.5,
            EventType::Conference => 2.0,
        }
    }
}

/// Largest capacity an event may declare.
///
/// Synthesis clamps larger values, since attendance carries one timestamp per
/// check-in.
pub const MAX_EVENT_CAPACITY: u64 = 100_000;

/// A tracked event.
///
/// Events are owned by the [`EventStore`](crate::storage::EventStore) and are
/// never mutated by synthesis or reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub name: String,

    /// Short uppercase join code shown to attendees.
    pub code: String,

    pub event_type: EventType,
    pub max_capacity: u64,

    /// Registrations recorded outside of synthesis.
    ///
    /// Used as the attendee base for on-chain figures before the event starts.
    #[serde(default)]
    pub registered_count: u64,

    /// Known share count; when absent, shares are estimated from registrations.
    #[serde(default)]
    pub share_count: Option<u64>,

    pub created_at: DateTime<Utc>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl Event {
    /// Whole days elapsed between creation and `now`, never negative.
    pub fn days_since_created(&self, now: DateTime<Utc>) -> i64 {
        (now - self.created_at).num_days().max(0)
    }

    /// Hours until the event starts. Negative once the event has started.
    pub fn hours_until_start(&self, now: DateTime<Utc>) -> f64 {
        (self.start_date - now).num_milliseconds() as f64 / 3_600_000.0
    }

    /// Scheduled length of the event in minutes, never negative.
    pub fn duration_minutes(&self) -> i64 {
        (self.end_date - self.start_date).num_minutes().max(0)
    }

    /// Whether the event has started at `now`.
    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        now >= self.start_date
    }
}

/// Request body for `POST /events`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub name: String,

    /// Optional join code; derived from the name when omitted.
    #[serde(default)]
    pub code: Option<String>,

    pub event_type: EventType,
    pub max_capacity: u64,

    #[serde(default)]
    pub registered_count: u64,

    #[serde(default)]
    pub share_count: Option<u64>,

    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

// ============================================================================
// Metrics snapshot
// ============================================================================

/// A full metrics snapshot for one event at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMetrics {
    pub event_id: String,
    pub registration: RegistrationMetrics,
    pub attendance: AttendanceMetrics,
    pub onchain: OnChainMetrics,
    pub social: SocialMetrics,
    pub comparison_data: ComparisonMetrics,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationMetrics {
    pub total: u64,

    /// One entry per elapsed day since the event was created.
    pub daily: Vec<DailyRegistrations>,

    pub sources: RegistrationSources,

    /// Fraction of registrants expected to attend, in `[0, 1]`.
    pub conversion_rate: f64,

    /// Approximate breakdown; not an exact partition of `total`.
    pub geographic: Vec<CountryRegistrations>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRegistrations {
    pub date: NaiveDate,
    pub count: u64,
}

/// Percentage of registrations attributed to each channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegistrationSources {
    pub web: u64,
    pub social: u64,
    pub email: u64,
    pub referral: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryRegistrations {
    pub country: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceMetrics {
    pub checked_in: u64,

    /// Average minutes an attendee stayed.
    pub average_duration: u64,

    pub peak_attendance: u64,

    /// Fraction of registrants who never checked in, in `[0, 1]`.
    pub no_show_rate: f64,

    /// Sorted ascending.
    pub check_in_timestamps: Vec<DateTime<Utc>>,

    pub attendance_peaks: Vec<HourlyAttendance>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyAttendance {
    pub hour: DateTime<Utc>,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnChainMetrics {
    pub wallets: WalletMetrics,
    pub transactions: TransactionMetrics,
    pub nfts: NftMetrics,
    pub airdrops: AirdropMetrics,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletMetrics {
    pub new_wallets: u64,
    pub reactivated_wallets: u64,
    pub active_wallets: u64,

    /// Display sample of synthetic addresses, at most 50 entries.
    pub sample_addresses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionMetrics {
    pub total: u64,
    pub average_per_wallet: f64,
    pub total_volume: f64,
    pub gas_spent: f64,
    pub types: TransactionTypes,
}

/// Independent draws per type; they need not add up to the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransactionTypes {
    pub transfers: u64,
    pub swaps: u64,
    pub contracts: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftMetrics {
    pub minted: u64,
    pub poaps: u64,
    pub certificates: u64,
    pub collectibles: u64,
    pub claim_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirdropMetrics {
    pub distributed: u64,
    pub claimed: u64,
    pub claim_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialMetrics {
    pub mentions: u64,
    pub shares: u64,
    pub hashtag_usage: u64,
    pub sentiment: Sentiment,
    pub estimated_reach: u64,
    pub top_posts: Vec<SocialPost>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Sentiment {
    pub positive: u64,
    pub neutral: u64,
    pub negative: u64,
}

impl Sentiment {
    pub fn total(&self) -> u64 {
        self.positive + self.neutral + self.negative
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialPost {
    pub platform: String,
    pub author: String,
    pub content: String,
    pub likes: u64,
    pub reposts: u64,
    pub comments: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonMetrics {
    pub similar_events: Vec<SimilarEvent>,
    pub averages: ComparisonAverages,

    /// Percentile rank of this event among similar ones, in `[0, 100]`.
    pub percentile: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarEvent {
    pub name: String,
    pub registrations: u64,
    pub attendance: u64,
    pub on_chain_transactions: u64,
    pub engagement: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonAverages {
    pub registrations: f64,
    pub attendance: f64,
    pub on_chain_transactions: f64,
    pub engagement: f64,
}

// ============================================================================
// Live updates
// ============================================================================

/// A metric family that can receive live increments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricCategory {
    Registrations,
    Attendance,
    Onchain,
    Social,
}

impl MetricCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricCategory::Registrations => "registrations",
            MetricCategory::Attendance => "attendance",
            MetricCategory::Onchain => "onchain",
            MetricCategory::Social => "social",
        }
    }
}

impl FromStr for MetricCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "registrations" => Ok(MetricCategory::Registrations),
            "attendance" => Ok(MetricCategory::Attendance),
            "onchain" => Ok(MetricCategory::Onchain),
            "social" => Ok(MetricCategory::Social),
            _ => Err(Error::UnknownCategory(s.to_string())),
        }
    }
}

/// Incremental change for one metric category.
///
/// Each variant carries the increment and the resulting running total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricChanges {
    #[serde(rename_all = "camelCase")]
    Registrations { new_registrations: u64, total: u64 },

    #[serde(rename_all = "camelCase")]
    Attendance { new_check_ins: u64, checked_in: u64 },

    #[serde(rename_all = "camelCase")]
    Onchain {
        new_transactions: u64,
        transactions: u64,
    },

    #[serde(rename_all = "camelCase")]
    Social { new_mentions: u64, mentions: u64 },
}

/// A live-update delta produced by
/// [`generate_metrics_update`](crate::synthesis::generate_metrics_update).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsUpdate {
    pub category: MetricCategory,
    pub changes: MetricChanges,
    pub timestamp: DateTime<Utc>,
}

/// Query parameters for `GET /events/:id/metrics/update`.
#[derive(Debug, Deserialize)]
pub struct UpdateQuery {
    pub category: String,
}

/// Query parameters for `GET /events/:id/metrics/export`.
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    /// `csv` (default) or `json`.
    #[serde(default = "default_export_format")]
    pub format: String,
}

fn default_export_format() -> String {
    "csv".to_string()
}

// ============================================================================
// Report
// ============================================================================

/// Qualitative report built from a metrics snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventReport {
    pub event: EventSummary,
    pub summary: ReportSummary,

    /// At most 5 entries.
    pub highlights: Vec<String>,

    /// At most 5 entries.
    pub lowlights: Vec<String>,

    /// At most 6 entries.
    pub recommendations: Vec<String>,

    pub metrics: ReportMetrics,
    pub comparison: ReportComparison,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    pub id: String,
    pub name: String,
    pub code: String,
    pub event_type: EventType,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_registrations: u64,
    pub total_attendance: u64,
    pub conversion_rate: f64,
    pub no_show_rate: f64,
    pub average_duration: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetrics {
    pub registration_sources: RegistrationSources,
    pub geographic: Vec<CountryRegistrations>,
    pub attendance_peaks: Vec<HourlyAttendance>,
    pub new_wallets: u64,
    pub transactions: u64,
    pub nfts_minted: u64,
    pub airdrop_claim_rate: f64,
    pub mentions: u64,
    pub shares: u64,
    pub estimated_reach: u64,

    /// 0 (all negative) to 100 (all positive); 50 is neutral.
    pub sentiment_score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportComparison {
    pub percentile: u32,
    pub vs_average: VsAverage,
}

/// Signed percentage deltas against similar-event averages, e.g. `"+12.5%"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VsAverage {
    pub registrations: String,
    pub attendance: String,
    pub engagement: String,
}
