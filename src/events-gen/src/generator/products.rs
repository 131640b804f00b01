use enum_iterator::Sequence;
use rand::Rng;
use rust_decimal::Decimal;
use serde::Serialize;
use strum_macros::Display;

use crate::events::ProductEvent;
use crate::generator::pick;
use crate::generator::Event;
use crate::generator::EventName;
use crate::generator::EventValue;
use crate::generator::TimeWindow;
use crate::ids::IdPools;

// view duration bounds in hundredths of a second
const MIN_VIEW_DURATION: i64 = 5_00;
const MAX_VIEW_DURATION: i64 = 300_00;

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy, Display, Sequence, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Electronics,
    Clothing,
    Home,
    Books,
    Toys,
}

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy, Display, Sequence, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SourcePage {
    Home,
    Search,
    Category,
    Recommendation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductView {
    pub product_id: String,
    pub category: ProductCategory,
    pub view_duration_seconds: Decimal,
    pub source_page: SourcePage,
}

pub fn generate_event<R: Rng + ?Sized>(
    window: &TimeWindow,
    pools: &IdPools,
    rng: &mut R,
) -> Event {
    let value = ProductView {
        product_id: pools.products.sample(rng).to_string(),
        category: pick(rng),
        view_duration_seconds: Decimal::new(
            rng.gen_range(MIN_VIEW_DURATION..=MAX_VIEW_DURATION),
            2,
        ),
        source_page: pick(rng),
    };

    Event {
        name: EventName::Product(ProductEvent::ProductView),
        timestamp: window.sample(rng),
        entity_id: pools.users.sample(rng).to_string(),
        value: EventValue::Product(value),
    }
}
