//! CSV and JSON export of metrics snapshots.
//!
//! The CSV layout is a title block followed by five labelled sections, each
//! introduced by an uppercase header line and a column header row:
//!
//! ```text
//! REGISTRATION METRICS
//! Metric,Value
//! Total Registrations,142
//! ...
//!
//! GEOGRAPHIC DISTRIBUTION
//! Country,Registrations
//! Colombia,38
//! ```
//!
//! Section order and header names are stable; downstream spreadsheets key on them.

use std::fmt::Write;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Error;
use crate::model::{Event, EventMetrics};

pub const REGISTRATION_SECTION: &str = "REGISTRATION METRICS";
pub const ATTENDANCE_SECTION: &str = "ATTENDANCE METRICS";
pub const ONCHAIN_SECTION: &str = "ON-CHAIN METRICS";
pub const SOCIAL_SECTION: &str = "SOCIAL MEDIA METRICS";
pub const GEOGRAPHIC_SECTION: &str = "GEOGRAPHIC DISTRIBUTION";

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Json => "application/json",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(Error::UnknownExportFormat(s.to_string())),
        }
    }
}

/// JSON export envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsExport<'a> {
    pub event: &'a Event,
    pub metrics: &'a EventMetrics,
    pub exported_at: DateTime<Utc>,
}

/// Serialize a snapshot as pretty-printed JSON.
pub fn metrics_to_json(
    event: &Event,
    metrics: &EventMetrics,
    exported_at: DateTime<Utc>,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&MetricsExport {
        event,
        metrics,
        exported_at,
    })
}

/// Render a snapshot as CSV text.
pub fn metrics_to_csv(event: &Event, metrics: &EventMetrics, exported_at: DateTime<Utc>) -> String {
    let mut csv = CsvWriter::default();

    csv.row("Event Metrics Export", "");
    csv.row("Event", &event.name);
    csv.row("Event Code", &event.code);
    csv.row("Event Type", event.event_type.label());
    csv.row("Exported At", &exported_at.to_rfc3339());

    let registration = &metrics.registration;
    csv.section(REGISTRATION_SECTION, "Metric", "Value");
    csv.row("Total Registrations", &registration.total.to_string());
    csv.row("Conversion Rate", &percent(registration.conversion_rate));
    csv.row("Web", &format!("{}%", registration.sources.web));
    csv.row("Social", &format!("{}%", registration.sources.social));
    csv.row("Email", &format!("{}%", registration.sources.email));
    csv.row("Referral", &format!("{}%", registration.sources.referral));

    let attendance = &metrics.attendance;
    csv.section(ATTENDANCE_SECTION, "Metric", "Value");
    csv.row("Checked In", &attendance.checked_in.to_string());
    csv.row(
        "Average Duration (minutes)",
        &attendance.average_duration.to_string(),
    );
    csv.row("Peak Attendance", &attendance.peak_attendance.to_string());
    csv.row("No-Show Rate", &percent(attendance.no_show_rate));

    let onchain = &metrics.onchain;
    csv.section(ONCHAIN_SECTION, "Metric", "Value");
    csv.row("New Wallets", &onchain.wallets.new_wallets.to_string());
    csv.row(
        "Reactivated Wallets",
        &onchain.wallets.reactivated_wallets.to_string(),
    );
    csv.row("Active Wallets", &onchain.wallets.active_wallets.to_string());
    csv.row("Total Transactions", &onchain.transactions.total.to_string());
    csv.row(
        "Average Transactions per Wallet",
        &format!("{:.2}", onchain.transactions.average_per_wallet),
    );
    csv.row(
        "Total Volume",
        &format!("{:.2}", onchain.transactions.total_volume),
    );
    csv.row("Gas Spent", &format!("{:.4}", onchain.transactions.gas_spent));
    csv.row("NFTs Minted", &onchain.nfts.minted.to_string());
    csv.row("POAPs", &onchain.nfts.poaps.to_string());
    csv.row("Certificates", &onchain.nfts.certificates.to_string());
    csv.row("Collectibles", &onchain.nfts.collectibles.to_string());
    csv.row("NFT Claim Rate", &percent(onchain.nfts.claim_rate));
    csv.row(
        "Airdrops Distributed",
        &onchain.airdrops.distributed.to_string(),
    );
    csv.row("Airdrops Claimed", &onchain.airdrops.claimed.to_string());
    csv.row("Airdrop Claim Rate", &percent(onchain.airdrops.claim_rate));

    let social = &metrics.social;
    csv.section(SOCIAL_SECTION, "Metric", "Value");
    csv.row("Mentions", &social.mentions.to_string());
    csv.row("Shares", &social.shares.to_string());
    csv.row("Hashtag Usage", &social.hashtag_usage.to_string());
    csv.row("Positive Sentiment", &social.sentiment.positive.to_string());
    csv.row("Neutral Sentiment", &social.sentiment.neutral.to_string());
    csv.row("Negative Sentiment", &social.sentiment.negative.to_string());
    csv.row("Estimated Reach", &social.estimated_reach.to_string());

    csv.section(GEOGRAPHIC_SECTION, "Country", "Registrations");
    for entry in &registration.geographic {
        csv.row(&entry.country, &entry.count.to_string());
    }

    csv.finish()
}

fn percent(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

#[derive(Default)]
struct CsvWriter {
    out: String,
}

impl CsvWriter {
    fn section(&mut self, title: &str, first_column: &str, second_column: &str) {
        self.out.push('\n');
        self.out.push_str(title);
        self.out.push('\n');
        self.row(first_column, second_column);
    }

    fn row(&mut self, label: &str, value: &str) {
        // Writing into a String cannot fail.
        let _ = writeln!(self.out, "{},{}", escape(label), escape(value));
    }

    fn finish(self) -> String {
        self.out
    }
}

/// Quote a field when it contains a delimiter, quote or line break.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
