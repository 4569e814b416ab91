//! In-memory event registry.
//!
//! Events live for the lifetime of the process only. The store is cheap to
//! clone; all clones share the same underlying map.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::{CreateEventRequest, Event, EventType, MAX_EVENT_CAPACITY};

/// Maximum length of a derived join code.
const MAX_CODE_LEN: usize = 8;

/// Shared event registry.
#[derive(Clone, Default)]
pub struct EventStore {
    events: Arc<RwLock<HashMap<String, Event>>>,
}

impl EventStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with a handful of demo events spread
    /// around `now`: some finished, one running, some upcoming.
    pub async fn with_demo_events(now: DateTime<Utc>) -> Self {
        let store = Self::new();
        for event in demo_events(now) {
            store.insert(event).await;
        }
        store
    }

    /// Insert or replace an event under its own id.
    pub async fn insert(&self, event: Event) {
        self.events.write().await.insert(event.id.clone(), event);
    }

    /// Validate a request and register a new event.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEvent`] when the name is blank, the event
    /// does not end after it starts, or the capacity exceeds
    /// [`MAX_EVENT_CAPACITY`].
    pub async fn create(&self, request: CreateEventRequest, now: DateTime<Utc>) -> Result<Event> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(Error::InvalidEvent("name must not be empty".to_string()));
        }
        if request.end_date <= request.start_date {
            return Err(Error::InvalidEvent(
                "endDate must be after startDate".to_string(),
            ));
        }
        if request.max_capacity > MAX_EVENT_CAPACITY {
            return Err(Error::InvalidEvent(format!(
                "maxCapacity must not exceed {}",
                MAX_EVENT_CAPACITY
            )));
        }

        let code = match request.code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => code.to_uppercase(),
            _ => derive_code(name),
        };

        let event = Event {
            id: Uuid::now_v7().to_string(),
            name: name.to_string(),
            code,
            event_type: request.event_type,
            max_capacity: request.max_capacity,
            registered_count: request.registered_count,
            share_count: request.share_count,
            created_at: now,
            start_date: request.start_date,
            end_date: request.end_date,
        };

        self.insert(event.clone()).await;
        Ok(event)
    }

    /// Look up an event by id.
    pub async fn get(&self, id: &str) -> Result<Event> {
        self.events
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| Error::EventNotFound(id.to_string()))
    }

    /// All events, earliest start first.
    pub async fn list(&self) -> Vec<Event> {
        let mut events: Vec<Event> = self.events.read().await.values().cloned().collect();
        events.sort_by(|a, b| {
            a.start_date
                .cmp(&b.start_date)
                .then_with(|| a.id.cmp(&b.id))
        });
        events
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

/// Uppercase alphanumeric prefix of the name, e.g. "ETH Bogota" -> "ETHBOGOT".
fn derive_code(name: &str) -> String {
    let code: String = name
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(MAX_CODE_LEN)
        .collect::<String>()
        .to_ascii_uppercase();

    if code.is_empty() {
        "EVENT".to_string()
    } else {
        code
    }
}

fn demo_events(now: DateTime<Utc>) -> Vec<Event> {
    let demo = |id: &str,
                name: &str,
                code: &str,
                event_type: EventType,
                max_capacity: u64,
                created_days_ago: i64,
                start_offset: Duration,
                duration: Duration| {
        let start_date = now + start_offset;
        Event {
            id: id.to_string(),
            name: name.to_string(),
            code: code.to_string(),
            event_type,
            max_capacity,
            registered_count: 0,
            share_count: None,
            created_at: now - Duration::days(created_days_ago),
            start_date,
            end_date: start_date + duration,
        }
    };

    vec![
        demo(
            "demo-eth-bogota",
            "ETH Bogota Conference",
            "ETHBOG",
            EventType::Conference,
            800,
            120,
            -Duration::days(14),
            Duration::hours(9),
        ),
        demo(
            "demo-solidity-workshop",
            "Solidity from Zero",
            "SOLZERO",
            EventType::Workshop,
            40,
            30,
            -Duration::days(3),
            Duration::hours(3),
        ),
        demo(
            "demo-medellin-meetup",
            "Medellin Web3 Meetup",
            "MDEWEB3",
            EventType::Meetup,
            120,
            20,
            -Duration::hours(1),
            Duration::hours(3),
        ),
        demo(
            "demo-zk-hackathon",
            "ZK Builders Hackathon",
            "ZKHACK",
            EventType::Hackathon,
            300,
            45,
            Duration::days(10),
            Duration::hours(48),
        ),
        demo(
            "demo-defi-webinar",
            "DeFi Risk Webinar",
            "DEFIRISK",
            EventType::Webinar,
            500,
            7,
            Duration::days(21),
            Duration::minutes(90),
        ),
        demo(
            "demo-founders-night",
            "Founders Night",
            "FOUNDERS",
            EventType::Networking,
            60,
            10,
            Duration::days(2),
            Duration::hours(4),
        ),
    ]
}
