use enum_iterator::Sequence;
use fake::faker::address::en::CityName;
use fake::faker::address::en::CountryName;
use fake::faker::internet::en::IPv4;
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::Word;
use fake::faker::name::en::Name;
use fake::Fake;
use rand::Rng;
use serde::Serialize;
use strum_macros::Display;

use crate::events::AccountEvent;
use crate::generator::pick;
use crate::generator::Event;
use crate::generator::EventName;
use crate::generator::EventValue;
use crate::generator::TimeWindow;
use crate::ids::generate_id;

const MAX_SESSION_DURATION_MINUTES: u32 = 120;

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy, Display, Sequence, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RegistrationSource {
    Web,
    MobileApp,
    SocialMedia,
}

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy, Display, Sequence, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UpdatedField {
    Name,
    Email,
    Address,
    Phone,
}

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy, Display, Sequence, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PasswordChangeSource {
    UserInitiated,
    ResetFlow,
}

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy, Display, Sequence, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy, Display, Sequence, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    Desktop,
    Mobile,
    Tablet,
}

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy, Display, Sequence, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Browser {
    Chrome,
    Firefox,
    Safari,
    Edge,
}

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy, Display, Sequence, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LoginFailureReason {
    IncorrectPassword,
    AccountLocked,
    SuspiciousLocation,
}

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy, Display, Sequence, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LogoutType {
    UserInitiated,
    SessionTimeout,
    ForcedBySystem,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountCreated {
    pub email: String,
    pub name: String,
    pub registration_source: RegistrationSource,
    pub marketing_opt_in: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountUpdated {
    pub field_updated: UpdatedField,
    pub previous_value: String,
    pub new_value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PasswordChanged {
    pub source: PasswordChangeSource,
    pub password_strength: PasswordStrength,
}

/// Shared by `login_success` and `login_failed`, only the latter carries a reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Login {
    pub device_type: DeviceType,
    pub browser: Browser,
    pub ip_address: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<LoginFailureReason>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Logout {
    pub session_duration_minutes: u32,
    pub logout_type: LogoutType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AccountValue {
    Created(AccountCreated),
    Updated(AccountUpdated),
    PasswordChanged(PasswordChanged),
    Login(Login),
    Logout(Logout),
}

fn login<R: Rng + ?Sized>(rng: &mut R, failed: bool) -> Login {
    let city: String = CityName().fake_with_rng(rng);
    let country: String = CountryName().fake_with_rng(rng);

    Login {
        device_type: pick(rng),
        browser: pick(rng),
        ip_address: IPv4().fake_with_rng(rng),
        location: format!("{city}, {country}"),
        reason: failed.then(|| pick(rng)),
    }
}

/// Builds the payload whose shape matches `event`.
pub fn generate_value<R: Rng + ?Sized>(event: AccountEvent, rng: &mut R) -> AccountValue {
    match event {
        AccountEvent::AccountCreated => AccountValue::Created(AccountCreated {
            email: SafeEmail().fake_with_rng(rng),
            name: Name().fake_with_rng(rng),
            registration_source: pick(rng),
            marketing_opt_in: rng.gen(),
        }),
        AccountEvent::AccountUpdated => AccountValue::Updated(AccountUpdated {
            field_updated: pick(rng),
            previous_value: Word().fake_with_rng(rng),
            new_value: Word().fake_with_rng(rng),
        }),
        AccountEvent::PasswordChanged => AccountValue::PasswordChanged(PasswordChanged {
            source: pick(rng),
            password_strength: pick(rng),
        }),
        AccountEvent::LoginSuccess => AccountValue::Login(login(rng, false)),
        AccountEvent::LoginFailed => AccountValue::Login(login(rng, true)),
        AccountEvent::Logout => AccountValue::Logout(Logout {
            session_duration_minutes: rng.gen_range(1..=MAX_SESSION_DURATION_MINUTES),
            logout_type: pick(rng),
        }),
    }
}

pub fn generate_event<R: Rng + ?Sized>(window: &TimeWindow, rng: &mut R) -> Event {
    let event: AccountEvent = pick(rng);

    Event {
        name: EventName::Account(event),
        timestamp: window.sample(rng),
        // account events never reuse an identity
        entity_id: generate_id(None),
        value: EventValue::Account(generate_value(event, rng)),
    }
}
