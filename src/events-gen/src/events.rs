use enum_iterator::Sequence;
use strum_macros::Display;
use strum_macros::EnumString;

/// Generated event types in processing order.
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy, Display, EnumString, Sequence)]
#[strum(serialize_all = "snake_case")]
pub enum EventType {
    ProductView,
    Order,
    Account,
}

impl EventType {
    pub fn category(self) -> EventCategory {
        match self {
            EventType::ProductView => EventCategory::Product,
            EventType::Order => EventCategory::Order,
            EventType::Account => EventCategory::Account,
        }
    }
}

/// Top level classification of an event, used as the partition key value.
#[derive(
    Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Display, EnumString, Sequence,
)]
#[strum(serialize_all = "snake_case")]
pub enum EventCategory {
    Product,
    Order,
    Account,
}

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy, Display, EnumString, Sequence)]
#[strum(serialize_all = "snake_case")]
pub enum ProductEvent {
    ProductView,
}

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy, Display, EnumString, Sequence)]
#[strum(serialize_all = "snake_case")]
pub enum OrderEvent {
    OrderPlaced,
    OrderConfirmed,
    OrderShipped,
    OrderDelivered,
}

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy, Display, EnumString, Sequence)]
#[strum(serialize_all = "snake_case")]
pub enum AccountEvent {
    AccountCreated,
    AccountUpdated,
    PasswordChanged,
    LoginSuccess,
    LoginFailed,
    Logout,
}
