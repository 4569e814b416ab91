//! Qualitative reports over a metrics snapshot.
//!
//! Turns an [`EventMetrics`] snapshot into highlights, lowlights and
//! recommendations by walking fixed rule tables in priority order. Rules that
//! compare a ratio only fire when the ratio's base is non-empty, so an
//! all-zero snapshot yields no highlights or lowlights.

use chrono::{DateTime, Utc};

use crate::model::{
    Event, EventMetrics, EventReport, EventSummary, EventType, ReportComparison, ReportMetrics,
    ReportSummary, VsAverage,
};
use crate::stats::{fraction, percent_delta, sentiment_score};

const MAX_HIGHLIGHTS: usize = 5;
const MAX_LOWLIGHTS: usize = 5;
const MAX_RECOMMENDATIONS: usize = 6;

/// A report rule: returns a message when its condition holds.
type Rule = fn(&Event, &EventMetrics) -> Option<String>;

/// Build a report for `event` from `metrics`.
///
/// Total over any well-formed snapshot; lists may come back empty.
pub fn generate_report(
    event: &Event,
    metrics: &EventMetrics,
    generated_at: DateTime<Utc>,
) -> EventReport {
    let registration = &metrics.registration;
    let attendance = &metrics.attendance;
    let social = &metrics.social;
    let averages = &metrics.comparison_data.averages;

    let engagement = (social.mentions + social.shares) as f64;

    EventReport {
        event: EventSummary {
            id: event.id.clone(),
            name: event.name.clone(),
            code: event.code.clone(),
            event_type: event.event_type,
            start_date: event.start_date,
            end_date: event.end_date,
        },
        summary: ReportSummary {
            total_registrations: registration.total,
            total_attendance: attendance.checked_in,
            conversion_rate: registration.conversion_rate,
            no_show_rate: attendance.no_show_rate,
            average_duration: attendance.average_duration,
        },
        highlights: apply_rules(HIGHLIGHT_RULES, event, metrics, MAX_HIGHLIGHTS),
        lowlights: apply_rules(LOWLIGHT_RULES, event, metrics, MAX_LOWLIGHTS),
        recommendations: apply_rules(RECOMMENDATION_RULES, event, metrics, MAX_RECOMMENDATIONS),
        metrics: ReportMetrics {
            registration_sources: registration.sources,
            geographic: registration.geographic.clone(),
            attendance_peaks: attendance.attendance_peaks.clone(),
            new_wallets: metrics.onchain.wallets.new_wallets,
            transactions: metrics.onchain.transactions.total,
            nfts_minted: metrics.onchain.nfts.minted,
            airdrop_claim_rate: metrics.onchain.airdrops.claim_rate,
            mentions: social.mentions,
            shares: social.shares,
            estimated_reach: social.estimated_reach,
            sentiment_score: sentiment_score(&social.sentiment),
        },
        comparison: ReportComparison {
            percentile: metrics.comparison_data.percentile,
            vs_average: VsAverage {
                registrations: percent_delta(registration.total as f64, averages.registrations),
                attendance: percent_delta(attendance.checked_in as f64, averages.attendance),
                engagement: percent_delta(engagement, averages.engagement),
            },
        },
        generated_at,
    }
}

fn apply_rules(rules: &[Rule], event: &Event, metrics: &EventMetrics, cap: usize) -> Vec<String> {
    rules
        .iter()
        .filter_map(|rule| rule(event, metrics))
        .take(cap)
        .collect()
}

fn pct(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

// ============================================================================
// Highlights
// ============================================================================

const HIGHLIGHT_RULES: &[Rule] = &[
    |_, m| {
        (m.registration.conversion_rate > 0.8).then(|| {
            format!(
                "Excellent conversion rate: {} of registrants attended",
                pct(m.registration.conversion_rate)
            )
        })
    },
    |_, m| {
        (m.registration.total > 100)
            .then(|| format!("Strong turnout with {} registrations", m.registration.total))
    },
    |_, m| {
        (m.attendance.checked_in > 0 && m.attendance.no_show_rate < 0.15).then(|| {
            format!(
                "Low no-show rate of {}",
                pct(m.attendance.no_show_rate)
            )
        })
    },
    |_, m| {
        (m.attendance.average_duration > 120).then(|| {
            format!(
                "High engagement: attendees stayed {} minutes on average",
                m.attendance.average_duration
            )
        })
    },
    |_, m| {
        (m.onchain.wallets.new_wallets > 10).then(|| {
            format!(
                "Onboarded {} new wallets to the ecosystem",
                m.onchain.wallets.new_wallets
            )
        })
    },
    |_, m| {
        (m.onchain.transactions.total > 200).then(|| {
            format!(
                "Active on-chain participation with {} transactions",
                m.onchain.transactions.total
            )
        })
    },
    |_, m| {
        (m.onchain.nfts.minted > 50)
            .then(|| format!("{} NFTs minted by attendees", m.onchain.nfts.minted))
    },
    |_, m| {
        (m.social.estimated_reach > 5000).then(|| {
            format!(
                "Wide social reach of an estimated {} people",
                m.social.estimated_reach
            )
        })
    },
    |_, m| {
        let sentiment = &m.social.sentiment;
        let positive = fraction(sentiment.positive, sentiment.total());
        (positive > 0.7).then(|| format!("Overwhelmingly positive sentiment ({})", pct(positive)))
    },
];

// ============================================================================
// Lowlights
// ============================================================================

const LOWLIGHT_RULES: &[Rule] = &[
    |_, m| {
        (m.registration.total > 0 && m.registration.conversion_rate < 0.6).then(|| {
            format!(
                "Low conversion rate: only {} of registrants attended",
                pct(m.registration.conversion_rate)
            )
        })
    },
    |_, m| {
        (m.attendance.no_show_rate > 0.25)
            .then(|| format!("High no-show rate of {}", pct(m.attendance.no_show_rate)))
    },
    |_, m| {
        (m.attendance.checked_in > 0 && m.attendance.average_duration < 60).then(|| {
            format!(
                "Short average attendance of {} minutes",
                m.attendance.average_duration
            )
        })
    },
    |_, m| {
        let airdrops = &m.onchain.airdrops;
        (airdrops.distributed > 0 && airdrops.claim_rate < 0.5).then(|| {
            format!(
                "Only {} of airdrops were claimed",
                pct(airdrops.claim_rate)
            )
        })
    },
    |_, m| {
        let sentiment = &m.social.sentiment;
        let negative = fraction(sentiment.negative, sentiment.total());
        (negative > 0.15).then(|| format!("Notable negative sentiment ({})", pct(negative)))
    },
    |_, m| {
        (m.registration.total > 0 && m.social.shares < 20)
            .then(|| format!("Limited sharing: the event was shared only {} times", m.social.shares))
    },
];

// ============================================================================
// Recommendations
// ============================================================================

const RECOMMENDATION_RULES: &[Rule] = &[
    event_type_recommendation,
    |_, m| {
        (m.registration.total > 0 && m.registration.sources.referral < 10).then(|| {
            "Launch a referral program so attendees can bring their peers".to_string()
        })
    },
    |_, m| {
        (m.onchain.airdrops.distributed > 0 && m.onchain.nfts.claim_rate < 0.7).then(|| {
            "Place QR codes or NFC tags at the venue to make NFT claiming easier".to_string()
        })
    },
    |_, m| {
        let attendance = &m.attendance;
        (attendance.checked_in > 0
            && (attendance.peak_attendance as f64) < attendance.checked_in as f64 * 0.8)
            .then(|| {
                "Reschedule key sessions to the hours with the highest attendance".to_string()
            })
    },
    |_, m| {
        let total = m.registration.total;
        m.registration
            .geographic
            .iter()
            .find(|entry| total > 0 && fraction(entry.count, total) > 0.5)
            .map(|entry| {
                format!(
                    "Most registrations came from {}; consider a regional follow-up event there",
                    entry.country
                )
            })
    },
    |_, m| {
        (m.social.estimated_reach < 3000).then(|| {
            "Partner with community influencers to extend the event's reach".to_string()
        })
    },
];

/// The recommendation specific to the event's type, if its condition holds.
fn event_type_recommendation(event: &Event, m: &EventMetrics) -> Option<String> {
    match event.event_type {
        EventType::Workshop => (m.attendance.checked_in > 0 && m.attendance.average_duration < 90)
            .then(|| "Add more hands-on activities to keep workshop attendees engaged".to_string()),
        EventType::Hackathon => (m.onchain.wallets.new_wallets < 20).then(|| {
            "Promote wallet creation during registration so hackers arrive ready to build"
                .to_string()
        }),
        EventType::Conference => (m.social.mentions < 100).then(|| {
            "Run an official hashtag campaign to amplify conference conversations".to_string()
        }),
        EventType::Meetup => (m.registration.total > 0 && m.registration.conversion_rate < 0.8)
            .then(|| "Send reminder messages the day before the meetup".to_string()),
        EventType::Webinar => (m.attendance.no_show_rate > 0.2).then(|| {
            "Share the webinar recording with registrants who could not attend".to_string()
        }),
        EventType::Networking => (m.onchain.wallets.active_wallets > 0
            && m.onchain.transactions.types.transfers < m.onchain.wallets.active_wallets)
            .then(|| "Include a wallet-to-wallet POAP exchange to spark connections".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        AttendanceMetrics, ComparisonMetrics, CountryRegistrations, OnChainMetrics,
        RegistrationMetrics, RegistrationSources, Sentiment, SocialMetrics,
    };
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
    }

    fn event(event_type: EventType) -> Event {
        Event {
            id: "evt-report".to_string(),
            name: "ETH Cali".to_string(),
            code: "ETHCALI".to_string(),
            event_type,
            max_capacity: 200,
            registered_count: 0,
            share_count: None,
            created_at: now() - Duration::days(60),
            start_date: now() - Duration::days(2),
            end_date: now() - Duration::days(2) + Duration::hours(4),
        }
    }

    fn zero_metrics() -> EventMetrics {
        EventMetrics {
            event_id: "evt-report".to_string(),
            registration: RegistrationMetrics {
                total: 0,
                daily: vec![],
                sources: RegistrationSources::default(),
                conversion_rate: 0.0,
                geographic: vec![],
            },
            attendance: AttendanceMetrics::default(),
            onchain: OnChainMetrics::default(),
            social: SocialMetrics::default(),
            comparison_data: ComparisonMetrics::default(),
            generated_at: now(),
        }
    }

    fn strong_metrics() -> EventMetrics {
        let mut m = zero_metrics();
        m.registration.total = 180;
        m.registration.conversion_rate = 0.9;
        m.registration.sources = RegistrationSources {
            web: 60,
            social: 20,
            email: 8,
            referral: 12,
        };
        m.attendance.checked_in = 162;
        m.attendance.no_show_rate = 0.1;
        m.attendance.average_duration = 150;
        m.attendance.peak_attendance = 150;
        m.onchain.wallets.new_wallets = 30;
        m.onchain.transactions.total = 500;
        m.onchain.nfts.minted = 120;
        m.onchain.nfts.claim_rate = 0.74;
        m.onchain.airdrops.distributed = 162;
        m.onchain.airdrops.claimed = 140;
        m.onchain.airdrops.claim_rate = 0.86;
        m.social.mentions = 150;
        m.social.shares = 60;
        m.social.estimated_reach = 9000;
        m.social.sentiment = Sentiment {
            positive: 120,
            neutral: 25,
            negative: 5,
        };
        m
    }

    #[test]
    fn test_zero_metrics_produce_no_highlights_or_lowlights() {
        let report = generate_report(&event(EventType::Meetup), &zero_metrics(), now());

        assert!(report.highlights.is_empty());
        assert!(report.lowlights.is_empty());
        assert_eq!(report.metrics.sentiment_score, 50);
        assert_eq!(report.comparison.vs_average.registrations, "0%");
        assert_eq!(report.comparison.vs_average.attendance, "0%");
        assert_eq!(report.comparison.vs_average.engagement, "0%");
    }

    #[test]
    fn test_highlights_capped_in_priority_order() {
        let report = generate_report(&event(EventType::Meetup), &strong_metrics(), now());

        assert_eq!(report.highlights.len(), 5);
        assert!(report.highlights[0].contains("conversion rate"));
        assert!(report.highlights[1].contains("180 registrations"));
        assert!(report.highlights[2].contains("no-show"));
        assert!(report.highlights[3].contains("150 minutes"));
        assert!(report.highlights[4].contains("30 new wallets"));
        assert!(report.lowlights.is_empty());
    }

    /// Modest figures: none of the first five highlight rules fire.
    fn modest_metrics() -> EventMetrics {
        let mut m = zero_metrics();
        m.registration.total = 80;
        m.registration.conversion_rate = 0.7;
        m.attendance.checked_in = 56;
        m.attendance.no_show_rate = 0.3;
        m.attendance.average_duration = 100;
        m.onchain.wallets.new_wallets = 8;
        m
    }

    #[test]
    fn test_later_highlights_fire_in_order() {
        let mut m = modest_metrics();
        m.onchain.transactions.total = 201;
        m.onchain.nfts.minted = 51;
        m.social.estimated_reach = 5001;
        m.social.sentiment = Sentiment {
            positive: 80,
            neutral: 15,
            negative: 5,
        };

        let report = generate_report(&event(EventType::Meetup), &m, now());

        assert_eq!(
            report.highlights,
            vec![
                "Active on-chain participation with 201 transactions".to_string(),
                "51 NFTs minted by attendees".to_string(),
                "Wide social reach of an estimated 5001 people".to_string(),
                "Overwhelmingly positive sentiment (80.0%)".to_string(),
            ]
        );
    }

    #[test]
    fn test_later_highlights_silent_at_thresholds() {
        let mut m = modest_metrics();
        m.onchain.transactions.total = 200;
        m.onchain.nfts.minted = 50;
        m.social.estimated_reach = 5000;
        m.social.sentiment = Sentiment {
            positive: 70,
            neutral: 20,
            negative: 10,
        };

        let report = generate_report(&event(EventType::Meetup), &m, now());

        assert!(report.highlights.is_empty());
    }

    #[test]
    fn test_conversion_highlight_without_registrations() {
        let mut m = zero_metrics();
        m.registration.conversion_rate = 0.9;

        let report = generate_report(&event(EventType::Meetup), &m, now());

        assert_eq!(report.highlights.len(), 1);
        assert!(report.highlights[0].contains("90.0%"));
    }

    #[test]
    fn test_lowlights_fire_on_weak_metrics() {
        let mut m = strong_metrics();
        m.registration.conversion_rate = 0.5;
        m.attendance.no_show_rate = 0.5;
        m.attendance.average_duration = 40;
        m.onchain.airdrops.claim_rate = 0.3;
        m.social.sentiment = Sentiment {
            positive: 50,
            neutral: 20,
            negative: 30,
        };
        m.social.shares = 5;

        let report = generate_report(&event(EventType::Meetup), &m, now());

        assert_eq!(report.lowlights.len(), 5);
        assert!(report.lowlights[0].contains("50.0%"));
        assert!(report.lowlights[4].contains("negative sentiment"));
    }

    #[test]
    fn test_workshop_recommendation() {
        let mut m = strong_metrics();
        m.attendance.average_duration = 75;

        let report = generate_report(&event(EventType::Workshop), &m, now());
        assert!(report.recommendations[0].contains("hands-on"));
    }

    #[test]
    fn test_hackathon_recommendation() {
        let mut m = strong_metrics();
        m.onchain.wallets.new_wallets = 5;

        let report = generate_report(&event(EventType::Hackathon), &m, now());
        assert!(report.recommendations[0].contains("wallet creation"));
    }

    #[test]
    fn test_conference_recommendation() {
        let mut m = strong_metrics();
        m.social.mentions = 40;

        let report = generate_report(&event(EventType::Conference), &m, now());
        assert!(report.recommendations[0].contains("hashtag"));
    }

    #[test]
    fn test_metric_recommendations() {
        let mut m = strong_metrics();
        m.registration.sources.referral = 4;
        m.onchain.nfts.claim_rate = 0.5;
        m.attendance.peak_attendance = 100;
        m.registration.geographic = vec![
            CountryRegistrations {
                country: "Colombia".to_string(),
                count: 120,
            },
            CountryRegistrations {
                country: "Mexico".to_string(),
                count: 30,
            },
        ];
        m.social.estimated_reach = 1200;

        let report = generate_report(&event(EventType::Meetup), &m, now());

        assert_eq!(report.recommendations.len(), 5);
        assert!(report.recommendations[0].contains("referral"));
        assert!(report.recommendations[1].contains("QR"));
        assert!(report.recommendations[2].contains("Reschedule"));
        assert!(report.recommendations[3].contains("Colombia"));
        assert!(report.recommendations[4].contains("influencers"));
    }

    #[test]
    fn test_recommendations_capped() {
        let mut m = strong_metrics();
        m.attendance.average_duration = 30;
        m.registration.sources.referral = 1;
        m.onchain.nfts.claim_rate = 0.2;
        m.attendance.peak_attendance = 10;
        m.registration.geographic = vec![CountryRegistrations {
            country: "Spain".to_string(),
            count: 170,
        }];
        m.social.estimated_reach = 10;

        let report = generate_report(&event(EventType::Workshop), &m, now());
        assert_eq!(report.recommendations.len(), 6);
    }

    #[test]
    fn test_comparison_deltas() {
        let mut m = strong_metrics();
        m.comparison_data.averages.registrations = 150.0;
        m.comparison_data.averages.attendance = 200.0;
        m.comparison_data.averages.engagement = 210.0;
        m.comparison_data.percentile = 88;

        let report = generate_report(&event(EventType::Meetup), &m, now());

        assert_eq!(report.comparison.percentile, 88);
        assert_eq!(report.comparison.vs_average.registrations, "+20.0%");
        assert_eq!(report.comparison.vs_average.attendance, "-19.0%");
        assert_eq!(report.comparison.vs_average.engagement, "+0.0%");
    }

    #[test]
    fn test_summary_mirrors_metrics() {
        let m = strong_metrics();
        let e = event(EventType::Conference);
        let report = generate_report(&e, &m, now());

        assert_eq!(report.event.code, "ETHCALI");
        assert_eq!(report.event.event_type, EventType::Conference);
        assert_eq!(report.summary.total_registrations, 180);
        assert_eq!(report.summary.total_attendance, 162);
        assert_eq!(report.summary.average_duration, 150);
        assert_eq!(report.metrics.sentiment_score, 88);
        assert_eq!(report.generated_at, now());
    }
}
