use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use enum_iterator::all;
use enum_iterator::cardinality;
use enum_iterator::Sequence;
use rand::Rng;
use serde::Serialize;

use crate::error::EventsGenError;
use crate::error::Result;
use crate::events::AccountEvent;
use crate::events::EventCategory;
use crate::events::EventType;
use crate::events::OrderEvent;
use crate::events::ProductEvent;
use crate::ids::IdPools;

pub mod accounts;
pub mod orders;
pub mod products;

const NANOS_PER_MICRO: u32 = 1000;

/// Half-open `[start, end)` interval event timestamps are drawn from,
/// kept in whole microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: i64,
    end: i64,
}

impl TimeWindow {
    pub fn try_new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if end <= start {
            return Err(EventsGenError::Config(format!(
                "end date {end} should be after start date {start}"
            )));
        }

        let start = ceil_micros(&start);
        let end = ceil_micros(&end);
        if end <= start {
            return Err(EventsGenError::Config(
                "time window should span at least one microsecond".to_string(),
            ));
        }

        Ok(Self { start, end })
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        rng.gen_range(self.start..self.end)
    }

    pub fn contains(&self, ts: i64) -> bool {
        ts >= self.start && ts < self.end
    }
}

// rounds sub-microsecond instants up so every sample stays inside the original bounds
fn ceil_micros(ts: &DateTime<Utc>) -> i64 {
    let micros = ts.timestamp_micros();
    if ts.timestamp_subsec_nanos() % NANOS_PER_MICRO != 0 {
        micros + 1
    } else {
        micros
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventName {
    Product(ProductEvent),
    Order(OrderEvent),
    Account(AccountEvent),
}

impl EventName {
    pub fn category(&self) -> EventCategory {
        match self {
            EventName::Product(_) => EventCategory::Product,
            EventName::Order(_) => EventCategory::Order,
            EventName::Account(_) => EventCategory::Account,
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventName::Product(e) => fmt::Display::fmt(e, f),
            EventName::Order(e) => fmt::Display::fmt(e, f),
            EventName::Account(e) => fmt::Display::fmt(e, f),
        }
    }
}

/// Type specific payload, stored as JSON in the `event_value` column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EventValue {
    Product(products::ProductView),
    Order(orders::Order),
    Account(accounts::AccountValue),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub name: EventName,
    /// microseconds since epoch, UTC
    pub timestamp: i64,
    pub entity_id: String,
    pub value: EventValue,
}

impl Event {
    pub fn category(&self) -> EventCategory {
        self.name.category()
    }
}

/// Generates `count` events of the given type.
pub fn generate<R: Rng + ?Sized>(
    typ: EventType,
    count: usize,
    window: &TimeWindow,
    pools: &IdPools,
    rng: &mut R,
) -> Vec<Event> {
    (0..count)
        .map(|_| match typ {
            EventType::ProductView => products::generate_event(window, pools, rng),
            EventType::Order => orders::generate_event(window, pools, rng),
            EventType::Account => accounts::generate_event(window, rng),
        })
        .collect()
}

/// Picks an enum variant uniformly.
pub(crate) fn pick<T: Sequence, R: Rng + ?Sized>(rng: &mut R) -> T {
    let idx = rng.gen_range(0..cardinality::<T>());
    // idx < cardinality, so nth always yields a variant
    all::<T>()
        .nth(idx)
        .expect("index is below the enum cardinality")
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_window_validation() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert!(TimeWindow::try_new(start, start).is_err());
        assert!(TimeWindow::try_new(start, start - Duration::days(1)).is_err());
        assert!(TimeWindow::try_new(
            start + Duration::nanoseconds(1),
            start + Duration::nanoseconds(10)
        )
        .is_err());
        assert!(TimeWindow::try_new(start, start + Duration::microseconds(1)).is_ok());
    }

    #[test]
    fn test_window_sample() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::nanoseconds(1);
        let end = start + Duration::seconds(3);
        let window = TimeWindow::try_new(start, end).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..10_000 {
            let ts = window.sample(&mut rng);
            assert!(window.contains(ts));
            assert!(ts * 1000 >= start.timestamp_nanos_opt().unwrap());
            assert!(ts * 1000 < end.timestamp_nanos_opt().unwrap());
        }
    }

    #[test]
    fn test_pick_covers_variants() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            seen.insert(pick::<OrderEvent, _>(&mut rng));
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_generate_count_and_category() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let window = TimeWindow::try_new(start, start + Duration::days(30)).unwrap();
        let pools = IdPools::new().unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        for typ in all::<EventType>() {
            let events = generate(typ, 17, &window, &pools, &mut rng);
            assert_eq!(events.len(), 17);
            assert!(events.iter().all(|e| e.category() == typ.category()));
        }
    }
}
