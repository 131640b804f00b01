use enum_iterator::Sequence;
use fake::faker::address::en::BuildingNumber;
use fake::faker::address::en::CityName;
use fake::faker::address::en::StateAbbr;
use fake::faker::address::en::StreetName;
use fake::faker::address::en::ZipCode;
use fake::Fake;
use rand::Rng;
use rust_decimal::Decimal;
use serde::Serialize;
use strum_macros::Display;

use crate::generator::pick;
use crate::generator::Event;
use crate::generator::EventName;
use crate::generator::EventValue;
use crate::generator::TimeWindow;
use crate::ids::generate_id;
use crate::ids::IdPools;

const MAX_ITEMS: usize = 5;
const MAX_QUANTITY: u32 = 3;
// item price bounds in cents
const MIN_PRICE: i64 = 10_00;
const MAX_PRICE: i64 = 200_00;
const MONEY_SCALE: u32 = 2;

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy, Display, Sequence, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    Paypal,
    BankTransfer,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderItem {
    pub product_id: String,
    pub price: Decimal,
    pub quantity: u32,
    pub item_total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub order_id: String,
    pub items: Vec<OrderItem>,
    pub total_amount: Decimal,
    pub payment_method: PaymentMethod,
    pub shipping_address: String,
}

impl Order {
    /// Sum of item totals before rounding.
    pub fn items_total(&self) -> Decimal {
        self.items.iter().map(|i| i.item_total).sum()
    }
}

fn generate_item<R: Rng + ?Sized>(pools: &IdPools, rng: &mut R) -> OrderItem {
    let price = Decimal::new(rng.gen_range(MIN_PRICE..=MAX_PRICE), MONEY_SCALE);
    let quantity = rng.gen_range(1..=MAX_QUANTITY);

    OrderItem {
        product_id: pools.products.sample(rng).to_string(),
        price,
        quantity,
        item_total: price * Decimal::from(quantity),
    }
}

fn shipping_address<R: Rng + ?Sized>(rng: &mut R) -> String {
    let building: String = BuildingNumber().fake_with_rng(rng);
    let street: String = StreetName().fake_with_rng(rng);
    let city: String = CityName().fake_with_rng(rng);
    let state: String = StateAbbr().fake_with_rng(rng);
    let zip: String = ZipCode().fake_with_rng(rng);

    format!("{building} {street}, {city}, {state} {zip}")
}

pub fn generate_event<R: Rng + ?Sized>(
    window: &TimeWindow,
    pools: &IdPools,
    rng: &mut R,
) -> Event {
    let num_items = rng.gen_range(1..=MAX_ITEMS);
    let items: Vec<OrderItem> = (0..num_items).map(|_| generate_item(pools, rng)).collect();
    let total_amount = items
        .iter()
        .map(|i| i.item_total)
        .sum::<Decimal>()
        .round_dp(MONEY_SCALE);

    let value = Order {
        order_id: generate_id(None),
        items,
        total_amount,
        payment_method: pick(rng),
        shipping_address: shipping_address(rng),
    };

    Event {
        name: EventName::Order(pick(rng)),
        timestamp: window.sample(rng),
        entity_id: pools.users.sample(rng).to_string(),
        value: EventValue::Order(value),
    }
}
