//! Metrics synthesis for events.
//!
//! Derives a complete [`EventMetrics`] snapshot from an [`Event`]'s capacity
//! and timing. Every figure is drawn at random within a documented range, so
//! two calls with the same inputs return the same shape but different values.
//! Callers that need reproducible output pass a seeded RNG.
//!
//! Dependency order within one snapshot:
//!
//! 1. registration (curve, sources, geography, conversion rate)
//! 2. attendance (zero until the event starts)
//! 3. on-chain activity (based on check-ins, or registered count before start)
//! 4. social activity (based on registrations)
//! 5. comparison against three synthetic similar events

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use tracing::debug;

use crate::model::{
    AirdropMetrics, AttendanceMetrics, ComparisonAverages, ComparisonMetrics,
    CountryRegistrations, DailyRegistrations, Event, EventMetrics, HourlyAttendance,
    MetricCategory, MetricChanges, MetricsUpdate, NftMetrics, OnChainMetrics,
    RegistrationMetrics, RegistrationSources, Sentiment, SimilarEvent, SocialMetrics, SocialPost,
    TransactionMetrics, TransactionTypes, WalletMetrics, MAX_EVENT_CAPACITY,
};
use crate::stats::{fraction, safe_ratio};

/// Longest registration history synthesized for an event that has started.
const MAX_HISTORY_DAYS: i64 = 90;

/// Registration phases as (days in phase, share of target).
const REGISTRATION_PHASES: [(i64, f64); 3] = [(14, 0.10), (46, 0.60), (30, 0.30)];

/// Cap on the registration progress ratio before an event starts.
const MAX_PRE_EVENT_PROGRESS: f64 = 0.95;

/// Geographic weight table, in display order.
const GEOGRAPHIC_WEIGHTS: [(&str, f64); 6] = [
    ("Colombia", 0.40),
    ("United States", 0.20),
    ("Mexico", 0.15),
    ("Argentina", 0.10),
    ("Spain", 0.08),
    ("Other", 0.07),
];

/// Base units that source attribution and geography are scaled against.
const BREAKDOWN_BASE: f64 = 100.0;

/// Display sample bound for synthetic wallet addresses.
const MAX_SAMPLE_ADDRESSES: u64 = 50;

const SOCIAL_PLATFORMS: [&str; 3] = ["Twitter", "LinkedIn", "Farcaster"];

const SIMILAR_EVENT_SUFFIXES: [&str; 3] = ["Alpha", "Beta", "Gamma"];

/// Share of registrations assumed to share the event when no count is known.
const DEFAULT_SHARE_RATIO: f64 = 0.15;

/// Synthesize a full metrics snapshot for `event` as seen at `now`.
///
/// Total over any well-formed event: zero capacity or a far-future start
/// produce zero or near-zero figures, never a panic.
pub fn synthesize_metrics<R: Rng + ?Sized>(
    event: &Event,
    now: DateTime<Utc>,
    rng: &mut R,
) -> EventMetrics {
    let registration = synthesize_registration(event, now, rng);
    let attendance = synthesize_attendance(event, &registration, now, rng);

    let attendee_base = if event.has_started(now) {
        attendance.checked_in
    } else {
        capped(event.registered_count)
    };
    let onchain = synthesize_onchain(attendee_base, rng);
    let social = synthesize_social(event, registration.total, rng);
    let comparison_data = synthesize_comparison(event, rng);

    debug!(
        event_id = %event.id,
        registrations = registration.total,
        checked_in = attendance.checked_in,
        transactions = onchain.transactions.total,
        mentions = social.mentions,
        "Metrics synthesized"
    );

    EventMetrics {
        event_id: event.id.clone(),
        registration,
        attendance,
        onchain,
        social,
        comparison_data,
        generated_at: now,
    }
}

/// Draw a small live increment for one metric category.
///
/// The returned update carries both the increment and the resulting total;
/// merging it into a snapshot is up to the caller (see [`MetricsUpdate::apply_to`]).
pub fn generate_metrics_update<R: Rng + ?Sized>(
    current: &EventMetrics,
    category: MetricCategory,
    now: DateTime<Utc>,
    rng: &mut R,
) -> MetricsUpdate {
    let changes = match category {
        MetricCategory::Registrations => {
            let n = rng.gen_range(0..5);
            MetricChanges::Registrations {
                new_registrations: n,
                total: current.registration.total.saturating_add(n),
            }
        }
        MetricCategory::Attendance => {
            let n = rng.gen_range(0..3);
            MetricChanges::Attendance {
                new_check_ins: n,
                checked_in: current.attendance.checked_in.saturating_add(n),
            }
        }
        MetricCategory::Onchain => {
            let n = rng.gen_range(0..10);
            MetricChanges::Onchain {
                new_transactions: n,
                transactions: current.onchain.transactions.total.saturating_add(n),
            }
        }
        MetricCategory::Social => {
            let n = rng.gen_range(0..15);
            MetricChanges::Social {
                new_mentions: n,
                mentions: current.social.mentions.saturating_add(n),
            }
        }
    };

    MetricsUpdate {
        category,
        changes,
        timestamp: now,
    }
}

impl MetricsUpdate {
    /// Merge this update into `metrics` by adding its increment.
    pub fn apply_to(&self, metrics: &mut EventMetrics) {
        match self.changes {
            MetricChanges::Registrations {
                new_registrations, ..
            } => {
                metrics.registration.total =
                    metrics.registration.total.saturating_add(new_registrations)
            }
            MetricChanges::Attendance { new_check_ins, .. } => {
                metrics.attendance.checked_in =
                    metrics.attendance.checked_in.saturating_add(new_check_ins)
            }
            MetricChanges::Onchain {
                new_transactions, ..
            } => {
                metrics.onchain.transactions.total =
                    metrics.onchain.transactions.total.saturating_add(new_transactions)
            }
            MetricChanges::Social { new_mentions, .. } => {
                metrics.social.mentions = metrics.social.mentions.saturating_add(new_mentions)
            }
        }
    }
}

/// Clamp a declared head count to [`MAX_EVENT_CAPACITY`].
fn capped(count: u64) -> u64 {
    count.min(MAX_EVENT_CAPACITY)
}

// ============================================================================
// Registration
// ============================================================================

fn synthesize_registration<R: Rng + ?Sized>(
    event: &Event,
    now: DateTime<Utc>,
    rng: &mut R,
) -> RegistrationMetrics {
    let days_since_created = event.days_since_created(now);
    let target = portion(rng, capped(event.max_capacity) as f64, 0.70, 0.95);

    // Same cut-over as attendance, so a snapshot never mixes the two curves.
    let (total, daily) = if event.has_started(now) {
        (target, historical_curve(event, target, days_since_created, rng))
    } else {
        let days_until_event = (event.hours_until_start(now) / 24.0).ceil() as i64;
        let progress = safe_ratio(
            days_since_created as f64,
            (days_since_created + days_until_event) as f64,
            0.0,
        );
        let total = (target as f64 * (progress * 1.2).min(MAX_PRE_EVENT_PROGRESS)).floor() as u64;
        (total, backfilled_curve(event, total, days_since_created, rng))
    };

    RegistrationMetrics {
        total,
        daily,
        sources: registration_sources(rng),
        conversion_rate: draw(rng, 0.75, 0.95),
        geographic: geographic_distribution(rng),
    }
}

/// Daily series for an event that has already started, split into phases.
fn historical_curve<R: Rng + ?Sized>(
    event: &Event,
    target: u64,
    days_since_created: i64,
    rng: &mut R,
) -> Vec<DailyRegistrations> {
    let days = days_since_created.min(MAX_HISTORY_DAYS);
    let first_day = event.created_at.date_naive();

    (0..days)
        .map(|day| {
            let per_day = phase_daily_base(target, day);
            DailyRegistrations {
                date: first_day + Duration::days(day),
                count: portion(rng, per_day, 0.5, 1.5),
            }
        })
        .collect()
}

/// Average registrations per day for the phase containing `day`.
fn phase_daily_base(target: u64, day: i64) -> f64 {
    let mut phase_start = 0;
    for (length, share) in REGISTRATION_PHASES {
        if day < phase_start + length {
            return target as f64 * share / length as f64;
        }
        phase_start += length;
    }
    0.0
}

/// Daily series for an upcoming event, averaging to `total`.
fn backfilled_curve<R: Rng + ?Sized>(
    event: &Event,
    total: u64,
    days_since_created: i64,
    rng: &mut R,
) -> Vec<DailyRegistrations> {
    let average = safe_ratio(total as f64, days_since_created as f64, 0.0);
    let first_day = event.created_at.date_naive();

    (0..days_since_created)
        .map(|day| DailyRegistrations {
            date: first_day + Duration::days(day),
            count: portion(rng, average, 0.3, 1.7),
        })
        .collect()
}

fn registration_sources<R: Rng + ?Sized>(rng: &mut R) -> RegistrationSources {
    let web = draw(rng, 50.0, 70.0);
    let social = draw(rng, 15.0, 30.0);
    // Email is capped so the referral remainder never goes negative.
    let email = draw(rng, 5.0, 15.0).min(BREAKDOWN_BASE - web - social);
    let referral = BREAKDOWN_BASE - web - social - email;

    RegistrationSources {
        web: web.floor() as u64,
        social: social.floor() as u64,
        email: email.max(0.0).floor() as u64,
        referral: referral.max(0.0).floor() as u64,
    }
}

fn geographic_distribution<R: Rng + ?Sized>(rng: &mut R) -> Vec<CountryRegistrations> {
    GEOGRAPHIC_WEIGHTS
        .iter()
        .map(|(country, weight)| CountryRegistrations {
            country: (*country).to_string(),
            count: portion(rng, BREAKDOWN_BASE * weight, 0.8, 1.2),
        })
        .collect()
}

// ============================================================================
// Attendance
// ============================================================================

fn synthesize_attendance<R: Rng + ?Sized>(
    event: &Event,
    registration: &RegistrationMetrics,
    now: DateTime<Utc>,
    rng: &mut R,
) -> AttendanceMetrics {
    if !event.has_started(now) {
        return AttendanceMetrics::default();
    }

    let conversion_rate = registration.conversion_rate;
    let checked_in = (registration.total as f64 * conversion_rate).floor() as u64;
    let duration_minutes = event.duration_minutes();

    let mut check_in_timestamps: Vec<DateTime<Utc>> = (0..checked_in)
        .map(|_| {
            // The product of two uniform draws skews arrivals towards the start.
            let skew = (rng.r#gen::<f64>() * rng.r#gen::<f64>()).abs();
            let offset_minutes = skew * duration_minutes as f64 * 0.3;
            event.start_date + Duration::seconds((offset_minutes * 60.0) as i64)
        })
        .collect();
    check_in_timestamps.sort();

    let attendance_peaks = hourly_peaks(event, checked_in, duration_minutes, rng);
    let peak_attendance = attendance_peaks.iter().map(|p| p.count).max().unwrap_or(0);

    AttendanceMetrics {
        checked_in,
        average_duration: portion(rng, duration_minutes as f64, 0.6, 0.9),
        peak_attendance,
        no_show_rate: 1.0 - conversion_rate,
        check_in_timestamps,
        attendance_peaks,
    }
}

/// One bucket per started hour; attendance holds in the first half, then declines.
fn hourly_peaks<R: Rng + ?Sized>(
    event: &Event,
    checked_in: u64,
    duration_minutes: i64,
    rng: &mut R,
) -> Vec<HourlyAttendance> {
    let slots = (duration_minutes as f64 / 60.0).ceil() as i64;

    (0..slots)
        .map(|slot| {
            let peak_factor = if (slot as f64) < slots as f64 / 2.0 {
                1.0
            } else {
                0.7
            };
            HourlyAttendance {
                hour: event.start_date + Duration::hours(slot),
                count: portion(rng, checked_in as f64 * peak_factor, 0.6, 1.0),
            }
        })
        .collect()
}

// ============================================================================
// On-chain
// ============================================================================

fn synthesize_onchain<R: Rng + ?Sized>(attendees: u64, rng: &mut R) -> OnChainMetrics {
    let base = attendees as f64;

    let active_wallets = portion(rng, base, 0.70, 0.90);
    let wallets = WalletMetrics {
        new_wallets: portion(rng, base, 0.15, 0.25),
        reactivated_wallets: portion(rng, base, 0.05, 0.15),
        active_wallets,
        sample_addresses: (0..active_wallets.min(MAX_SAMPLE_ADDRESSES))
            .map(|_| synthetic_address(rng))
            .collect(),
    };

    let total = portion(rng, base, 2.0, 5.0);
    let count = total as f64;
    let transactions = TransactionMetrics {
        total,
        average_per_wallet: safe_ratio(count, base, 0.0),
        total_volume: count * draw(rng, 0.5, 2.5),
        gas_spent: count * draw(rng, 0.001, 0.003),
        types: TransactionTypes {
            transfers: portion(rng, count, 0.40, 0.60),
            swaps: portion(rng, count, 0.30, 0.50),
            contracts: portion(rng, count, 0.20, 0.40),
        },
    };

    let poaps = portion(rng, base, 0.60, 0.80);
    let certificates = portion(rng, base, 0.20, 0.30);
    let collectibles = portion(rng, base, 0.10, 0.20);
    let minted = poaps + certificates + collectibles;
    let nfts = NftMetrics {
        minted,
        poaps,
        certificates,
        collectibles,
        claim_rate: fraction(minted, attendees),
    };

    let claimed = portion(rng, base, 0.70, 0.90);
    let airdrops = AirdropMetrics {
        distributed: attendees,
        claimed,
        claim_rate: fraction(claimed, attendees),
    };

    OnChainMetrics {
        wallets,
        transactions,
        nfts,
        airdrops,
    }
}

/// `0x` followed by 40 lowercase hex characters.
fn synthetic_address<R: Rng + ?Sized>(rng: &mut R) -> String {
    let bytes: [u8; 20] = rng.r#gen();
    let mut address = String::with_capacity(42);
    address.push_str("0x");
    for byte in bytes {
        address.push_str(&format!("{:02x}", byte));
    }
    address
}

// ============================================================================
// Social
// ============================================================================

fn synthesize_social<R: Rng + ?Sized>(
    event: &Event,
    registrations: u64,
    rng: &mut R,
) -> SocialMetrics {
    let base_engagement = registrations as f64 * draw(rng, 1.5, 2.5);

    let mentions = portion(rng, base_engagement, 0.30, 0.50);
    let shares = event
        .share_count
        .unwrap_or_else(|| (registrations as f64 * DEFAULT_SHARE_RATIO).floor() as u64);
    let hashtag_usage = portion(rng, mentions as f64, 0.60, 0.90);

    let positive = portion(rng, mentions as f64, 0.60, 0.80);
    let negative = portion(rng, mentions as f64, 0.05, 0.15);
    let sentiment = Sentiment {
        positive,
        negative,
        neutral: mentions.saturating_sub(positive + negative),
    };

    let post_count = mentions.min(SOCIAL_PLATFORMS.len() as u64) as usize;
    let top_posts = SOCIAL_PLATFORMS
        .iter()
        .take(post_count)
        .enumerate()
        .map(|(i, platform)| SocialPost {
            platform: (*platform).to_string(),
            author: format!("@attendee{}", rng.gen_range(100..1000)),
            content: top_post_content(i, &event.name),
            likes: rng.gen_range(10..=500),
            reposts: rng.gen_range(0..=100),
            comments: rng.gen_range(0..=50),
        })
        .collect();

    SocialMetrics {
        mentions,
        shares,
        hashtag_usage,
        sentiment,
        estimated_reach: portion(rng, base_engagement, 10.0, 30.0),
        top_posts,
    }
}

fn top_post_content(index: usize, event_name: &str) -> String {
    match index {
        0 => format!("Just checked in at {}! Great energy in the room", event_name),
        1 => format!("Key takeaways from {}: builders everywhere", event_name),
        _ => format!("Claimed my POAP from {}. See you at the next one", event_name),
    }
}

// ============================================================================
// Comparison
// ============================================================================

fn synthesize_comparison<R: Rng + ?Sized>(event: &Event, rng: &mut R) -> ComparisonMetrics {
    let scale = capped(event.max_capacity) as f64 * event.event_type.comparison_multiplier();

    let similar_events: Vec<SimilarEvent> = SIMILAR_EVENT_SUFFIXES
        .iter()
        .map(|suffix| {
            let registrations = portion(rng, scale, 0.5, 0.9);
            let attendance = portion(rng, registrations as f64, 0.60, 0.85);
            SimilarEvent {
                name: format!("{} {}", event.event_type.label(), suffix),
                registrations,
                attendance,
                on_chain_transactions: portion(rng, attendance as f64, 1.5, 4.0),
                engagement: portion(rng, registrations as f64, 0.5, 1.5),
            }
        })
        .collect();

    let averages = average_of(&similar_events);

    ComparisonMetrics {
        similar_events,
        averages,
        percentile: draw(rng, 50.0, 95.0).round() as u32,
    }
}

fn average_of(events: &[SimilarEvent]) -> ComparisonAverages {
    let n = events.len() as f64;
    let mean = |f: fn(&SimilarEvent) -> u64| {
        safe_ratio(events.iter().map(|e| f(e) as f64).sum(), n, 0.0)
    };

    ComparisonAverages {
        registrations: mean(|e| e.registrations),
        attendance: mean(|e| e.attendance),
        on_chain_transactions: mean(|e| e.on_chain_transactions),
        engagement: mean(|e| e.engagement),
    }
}

// ============================================================================
// Draw helpers
// ============================================================================

/// Uniform draw from `[low, high]`.
fn draw<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64) -> f64 {
    rng.gen_range(low..=high)
}

/// `floor(base * U[low, high])` as a non-negative count.
fn portion<R: Rng + ?Sized>(rng: &mut R, base: f64, low: f64, high: f64) -> u64 {
    let value = (base * draw(rng, low, high)).floor();
    if value.is_finite() && value > 0.0 {
        value as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EventType;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
    }

    fn event(
        capacity: u64,
        created_days_ago: i64,
        start_offset: Duration,
        duration: Duration,
    ) -> Event {
        let start = now() + start_offset;
        Event {
            id: "evt-test".to_string(),
            name: "Medellin Builders".to_string(),
            code: "MEDELLIN".to_string(),
            event_type: EventType::Meetup,
            max_capacity: capacity,
            registered_count: 0,
            share_count: None,
            created_at: now() - Duration::days(created_days_ago),
            start_date: start,
            end_date: start + duration,
        }
    }

    fn past_event() -> Event {
        event(100, 120, -Duration::days(5), Duration::hours(3))
    }

    fn upcoming_event() -> Event {
        event(50, 40, Duration::days(10), Duration::hours(2))
    }

    #[test]
    fn test_upcoming_event_has_no_attendance() {
        let mut rng = StdRng::seed_from_u64(7);
        let metrics = synthesize_metrics(&upcoming_event(), now(), &mut rng);

        assert_eq!(metrics.attendance.checked_in, 0);
        assert_eq!(metrics.attendance.peak_attendance, 0);
        assert_eq!(metrics.attendance.no_show_rate, 0.0);
        assert_eq!(metrics.attendance.average_duration, 0);
        assert!(metrics.attendance.check_in_timestamps.is_empty());
        assert!(metrics.attendance.attendance_peaks.is_empty());
    }

    #[test]
    fn test_upcoming_registration_bounds() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let metrics = synthesize_metrics(&upcoming_event(), now(), &mut rng);

            let upper = (50.0_f64 * 0.95 * 1.2).floor() as u64;
            assert!(metrics.registration.total <= upper);
            assert!(metrics.registration.total > 0);
            assert_eq!(metrics.registration.daily.len(), 40);
        }
    }

    #[test]
    fn test_past_event_checked_in_matches_conversion() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let metrics = synthesize_metrics(&past_event(), now(), &mut rng);

            let expected = (metrics.registration.total as f64
                * metrics.registration.conversion_rate)
                .floor() as u64;
            assert_eq!(metrics.attendance.checked_in, expected);
            assert_eq!(metrics.attendance.attendance_peaks.len(), 3);
            assert_eq!(
                metrics.attendance.check_in_timestamps.len() as u64,
                metrics.attendance.checked_in
            );
        }
    }

    #[test]
    fn test_no_show_complements_conversion() {
        let mut rng = StdRng::seed_from_u64(11);
        let metrics = synthesize_metrics(&past_event(), now(), &mut rng);

        let sum = metrics.attendance.no_show_rate + metrics.registration.conversion_rate;
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_past_event_registrations_hit_target_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let metrics = synthesize_metrics(&past_event(), now(), &mut rng);

        assert!((70..=95).contains(&metrics.registration.total));
        assert_eq!(metrics.registration.daily.len(), 90);
    }

    #[test]
    fn test_check_ins_sorted_and_early() {
        let mut rng = StdRng::seed_from_u64(5);
        let event = past_event();
        let metrics = synthesize_metrics(&event, now(), &mut rng);

        let stamps = &metrics.attendance.check_in_timestamps;
        assert!(stamps.windows(2).all(|w| w[0] <= w[1]));

        // Arrivals happen within the first 30% of the event.
        let latest = event.start_date + Duration::minutes(54);
        assert!(stamps.iter().all(|t| *t >= event.start_date && *t <= latest));
    }

    #[test]
    fn test_peak_is_max_bucket() {
        let mut rng = StdRng::seed_from_u64(9);
        let metrics = synthesize_metrics(&past_event(), now(), &mut rng);

        let max = metrics
            .attendance
            .attendance_peaks
            .iter()
            .map(|p| p.count)
            .max()
            .unwrap();
        assert_eq!(metrics.attendance.peak_attendance, max);
        assert!(metrics.attendance.peak_attendance <= metrics.attendance.checked_in);
    }

    #[test]
    fn test_zero_capacity_is_all_zero() {
        let mut rng = StdRng::seed_from_u64(1);
        let event = event(0, 30, -Duration::days(1), Duration::hours(2));
        let metrics = synthesize_metrics(&event, now(), &mut rng);

        assert_eq!(metrics.registration.total, 0);
        assert_eq!(metrics.attendance.checked_in, 0);
        assert_eq!(metrics.onchain.transactions.total, 0);
        assert_eq!(metrics.onchain.transactions.average_per_wallet, 0.0);
        assert_eq!(metrics.onchain.nfts.claim_rate, 0.0);
        assert_eq!(metrics.onchain.airdrops.claim_rate, 0.0);
        assert!(metrics.onchain.wallets.sample_addresses.is_empty());
        assert_eq!(metrics.social.mentions, 0);
        assert!(metrics.social.top_posts.is_empty());
        assert!(metrics.registration.daily.iter().all(|d| d.count == 0));
    }

    #[test]
    fn test_oversized_capacity_is_clamped() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut event = event(u64::MAX, 30, -Duration::days(2), Duration::hours(2));
        event.registered_count = u64::MAX;
        let metrics = synthesize_metrics(&event, now(), &mut rng);

        assert!(metrics.registration.total <= MAX_EVENT_CAPACITY);
        assert!(metrics.registration.total > 0);
        assert_eq!(
            metrics.attendance.check_in_timestamps.len() as u64,
            metrics.attendance.checked_in
        );
        assert!(
            metrics.comparison_data.averages.registrations <= MAX_EVENT_CAPACITY as f64 * 2.0
        );

        let upcoming = Event {
            start_date: now() + Duration::days(2),
            end_date: now() + Duration::days(2) + Duration::hours(2),
            ..event
        };
        let metrics = synthesize_metrics(&upcoming, now(), &mut rng);
        assert!(metrics.onchain.transactions.total <= MAX_EVENT_CAPACITY * 5);
    }

    #[test]
    fn test_registration_switches_curve_at_start_instant() {
        let mut rng = StdRng::seed_from_u64(4);
        let just_started = event(100, 120, -Duration::microseconds(500), Duration::hours(2));
        let metrics = synthesize_metrics(&just_started, now(), &mut rng);

        assert_eq!(metrics.registration.daily.len() as i64, MAX_HISTORY_DAYS);
        assert_eq!(
            metrics.attendance.checked_in,
            (metrics.registration.total as f64 * metrics.registration.conversion_rate).floor()
                as u64
        );

        let about_to_start = event(100, 120, Duration::microseconds(500), Duration::hours(2));
        let metrics = synthesize_metrics(&about_to_start, now(), &mut rng);

        assert_eq!(metrics.registration.daily.len(), 120);
        assert_eq!(metrics.attendance.checked_in, 0);
    }

    #[test]
    fn test_far_future_event() {
        let mut rng = StdRng::seed_from_u64(2);
        let event = event(500, 0, Duration::days(3650), Duration::hours(8));
        let metrics = synthesize_metrics(&event, now(), &mut rng);

        assert_eq!(metrics.registration.total, 0);
        assert!(metrics.registration.daily.is_empty());
        assert_eq!(metrics.attendance, AttendanceMetrics::default());
    }

    #[test]
    fn test_sources_sum_to_base() {
        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            let sources = registration_sources(&mut rng);
            let sum = sources.web + sources.social + sources.email + sources.referral;

            assert!((50..=70).contains(&sources.web));
            assert!((15..=30).contains(&sources.social));
            // Flooring each share loses at most one unit per field.
            assert!((96..=100).contains(&sum));
        }
    }

    #[test]
    fn test_geographic_table_order() {
        let mut rng = StdRng::seed_from_u64(4);
        let geo = geographic_distribution(&mut rng);

        let countries: Vec<&str> = geo.iter().map(|g| g.country.as_str()).collect();
        assert_eq!(
            countries,
            [
                "Colombia",
                "United States",
                "Mexico",
                "Argentina",
                "Spain",
                "Other"
            ]
        );
        assert!((32..=48).contains(&geo[0].count));
    }

    #[test]
    fn test_synthetic_address_format() {
        let mut rng = StdRng::seed_from_u64(8);
        let address = synthetic_address(&mut rng);

        assert_eq!(address.len(), 42);
        assert!(address.starts_with("0x"));
        assert!(address[2..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_onchain_ranges() {
        let mut rng = StdRng::seed_from_u64(21);
        let onchain = synthesize_onchain(1000, &mut rng);

        assert!((150..=250).contains(&onchain.wallets.new_wallets));
        assert!((50..=150).contains(&onchain.wallets.reactivated_wallets));
        assert!((700..=900).contains(&onchain.wallets.active_wallets));
        assert_eq!(onchain.wallets.sample_addresses.len(), 50);
        assert!((2000..=5000).contains(&onchain.transactions.total));
        assert_eq!(
            onchain.nfts.minted,
            onchain.nfts.poaps + onchain.nfts.certificates + onchain.nfts.collectibles
        );
        assert!(onchain.nfts.claim_rate <= 1.0);
        assert_eq!(onchain.airdrops.distributed, 1000);
        assert!((0.7..=0.9).contains(&onchain.airdrops.claim_rate));
    }

    #[test]
    fn test_social_uses_known_share_count() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut event = past_event();
        event.share_count = Some(42);

        let social = synthesize_social(&event, 200, &mut rng);
        assert_eq!(social.shares, 42);
        assert_eq!(social.sentiment.total(), social.mentions);
        assert_eq!(social.top_posts.len(), 3);
    }

    #[test]
    fn test_social_estimates_shares() {
        let mut rng = StdRng::seed_from_u64(13);
        let social = synthesize_social(&past_event(), 200, &mut rng);
        assert_eq!(social.shares, 30);
    }

    #[test]
    fn test_comparison_shape() {
        let mut rng = StdRng::seed_from_u64(17);
        let mut event = past_event();
        event.event_type = EventType::Conference;
        let comparison = synthesize_comparison(&event, &mut rng);

        let names: Vec<&str> = comparison
            .similar_events
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(
            names,
            ["Conference Alpha", "Conference Beta", "Conference Gamma"]
        );

        let sum: u64 = comparison
            .similar_events
            .iter()
            .map(|e| e.registrations)
            .sum();
        assert!((comparison.averages.registrations - sum as f64 / 3.0).abs() < 1e-9);
        assert!((50..=95).contains(&comparison.percentile));
    }

    #[test]
    fn test_social_update() {
        let mut rng = StdRng::seed_from_u64(23);
        let metrics = synthesize_metrics(&past_event(), now(), &mut rng);

        for _ in 0..100 {
            let update = generate_metrics_update(&metrics, MetricCategory::Social, now(), &mut rng);
            assert_eq!(update.category, MetricCategory::Social);
            assert_eq!(update.timestamp, now());
            match update.changes {
                MetricChanges::Social {
                    new_mentions,
                    mentions,
                } => {
                    assert!(new_mentions < 15);
                    assert_eq!(mentions, metrics.social.mentions + new_mentions);
                }
                other => panic!("unexpected changes: {:?}", other),
            }
        }
    }

    #[test]
    fn test_update_increment_bounds() {
        let mut rng = StdRng::seed_from_u64(29);
        let metrics = synthesize_metrics(&past_event(), now(), &mut rng);

        for _ in 0..100 {
            let registrations =
                generate_metrics_update(&metrics, MetricCategory::Registrations, now(), &mut rng);
            let attendance =
                generate_metrics_update(&metrics, MetricCategory::Attendance, now(), &mut rng);
            let onchain =
                generate_metrics_update(&metrics, MetricCategory::Onchain, now(), &mut rng);

            assert!(matches!(
                registrations.changes,
                MetricChanges::Registrations { new_registrations, .. } if new_registrations < 5
            ));
            assert!(matches!(
                attendance.changes,
                MetricChanges::Attendance { new_check_ins, .. } if new_check_ins < 3
            ));
            assert!(matches!(
                onchain.changes,
                MetricChanges::Onchain { new_transactions, .. } if new_transactions < 10
            ));
        }
    }

    #[test]
    fn test_apply_update_is_additive() {
        let mut rng = StdRng::seed_from_u64(31);
        let mut metrics = synthesize_metrics(&past_event(), now(), &mut rng);
        let before = metrics.onchain.transactions.total;

        let update = MetricsUpdate {
            category: MetricCategory::Onchain,
            changes: MetricChanges::Onchain {
                new_transactions: 7,
                transactions: before + 7,
            },
            timestamp: now(),
        };
        update.apply_to(&mut metrics);

        assert_eq!(metrics.onchain.transactions.total, before + 7);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let event = past_event();
        let a = synthesize_metrics(&event, now(), &mut StdRng::seed_from_u64(99));
        let b = synthesize_metrics(&event, now(), &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }
}
