//! Maps between flat field-name/value pairs and the [`Subscriber`] entity.
//!
//! The edit path is deliberately forgiving: a malformed value never fails
//! the whole submission, it just leaves the previous value in place (or
//! falls back to a harmless default for prices). The descriptor table in
//! [`crate::fields`] carries the coercion rule applied per key.

use std::collections::BTreeMap;

use abo_format::{format_date_fr, format_postcode, format_price, parse_date_fr, parse_price};

use crate::fields::FieldKey;
use crate::subscriber::{Address, Subscriber};

/// Applies a flat field map onto a subscriber.
///
/// Text fields are assigned only when present and non-blank. Integer
/// fields are assigned only when the trimmed value is all digits and are
/// silently skipped otherwise. Prices fall back to `0.0` when unparsable.
/// A malformed subscription date keeps the entity's current value. Address
/// sub-fields are rebuilt from scratch, so an absent address field resets
/// to its default.
pub fn apply_fields(fields: &BTreeMap<String, String>, sub: &mut Subscriber) {
    apply_naming(fields, sub);
    apply_address(fields, sub);
    apply_issues(fields, sub);
    apply_pricing(fields, sub);
    apply_date(fields, sub);
    apply_misc(fields, sub);

    if let Some(id) = defined_int(fields, FieldKey::SubscriberId) {
        sub.id = Some(i64::from(id));
    }
}

fn apply_naming(fields: &BTreeMap<String, String>, sub: &mut Subscriber) {
    if let Some(value) = defined(fields, FieldKey::Lastname) {
        sub.lastname = value.to_owned();
    }
    if let Some(value) = defined(fields, FieldKey::Firstname) {
        sub.firstname = value.to_owned();
    }
    if let Some(value) = defined(fields, FieldKey::EmailAddress) {
        sub.email = value.to_owned();
    }
    if let Some(value) = defined(fields, FieldKey::Company) {
        sub.company = value.to_owned();
    }
    if let Some(value) = defined(fields, FieldKey::NameAddition) {
        sub.name_addition = value.to_owned();
    }
}

fn apply_address(fields: &BTreeMap<String, String>, sub: &mut Subscriber) {
    let mut address = Address::default();
    if let Some(value) = defined(fields, FieldKey::Address) {
        address.street = value.to_owned();
    }
    if let Some(value) = defined(fields, FieldKey::AddressAddition) {
        address.street_addition = value.to_owned();
    }
    if let Some(value) = defined_int(fields, FieldKey::PostCode) {
        address.post_code = value;
    }
    if let Some(value) = defined(fields, FieldKey::City) {
        address.city = value.to_owned();
    }
    sub.address = address;
}

fn apply_issues(fields: &BTreeMap<String, String>, sub: &mut Subscriber) {
    if let Some(value) = defined_int(fields, FieldKey::SubscriberSinceIssue) {
        sub.subscriber_since_issue = value;
    }
    if let Some(value) = defined_int(fields, FieldKey::IssuesToReceive) {
        sub.issues_to_receive = value;
    }
    if let Some(value) = defined_int(fields, FieldKey::SubsBeginningIssue) {
        sub.subs_beginning_issue = value;
    }
    if let Some(value) = defined_int(fields, FieldKey::HorsSerie1) {
        sub.hors_serie1 = value;
    }
}

fn apply_pricing(fields: &BTreeMap<String, String>, sub: &mut Subscriber) {
    sub.subscription_price =
        parse_price(defined(fields, FieldKey::SubscriptionPrice).unwrap_or("0"));
    sub.membership_price = parse_price(defined(fields, FieldKey::MembershipPrice).unwrap_or("0"));
}

fn apply_date(fields: &BTreeMap<String, String>, sub: &mut Subscriber) {
    if let Some(value) = defined(fields, FieldKey::SubscriptionDate)
        && let Ok(Some(date)) = parse_date_fr(value)
    {
        sub.subscription_date = Some(date);
    }
}

fn apply_misc(fields: &BTreeMap<String, String>, sub: &mut Subscriber) {
    if let Some(value) = defined(fields, FieldKey::OrderingType) {
        sub.ordering_type = value.to_owned();
    }
    if let Some(value) = defined(fields, FieldKey::Comment) {
        sub.comment = value.to_owned();
    }
}

/// Returns the trimmed value when the field is present and its
/// [`FieldKind`](crate::fields::FieldKind) accepts it.
fn defined(fields: &BTreeMap<String, String>, field: FieldKey) -> Option<&str> {
    let value = fields.get(field.key())?.trim();
    field.kind().accepts(value).then_some(value)
}

/// Parses an accepted all-digits field; out-of-range values are skipped.
fn defined_int(fields: &BTreeMap<String, String>, field: FieldKey) -> Option<u32> {
    defined(fields, field).and_then(|v| v.parse().ok())
}

/// Builds the flat field map for a subscriber, ready for display or edit.
///
/// The inverse of [`apply_fields`]: postcode renders as five digits ("" when
/// unset), prices as comma decimals, the date in `dd/mm/yyyy`.
pub fn to_fields(sub: &Subscriber) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();
    let mut put = |field: FieldKey, value: String| {
        fields.insert(field.key().to_owned(), value);
    };

    put(
        FieldKey::SubscriberId,
        sub.id.map(|id| id.to_string()).unwrap_or_default(),
    );
    put(FieldKey::Lastname, sub.lastname.clone());
    put(FieldKey::Firstname, sub.firstname.clone());
    put(FieldKey::EmailAddress, sub.email.clone());
    put(FieldKey::NameAddition, sub.name_addition.clone());
    put(FieldKey::Company, sub.company.clone());
    put(FieldKey::Address, sub.address.street.clone());
    put(FieldKey::AddressAddition, sub.address.street_addition.clone());
    put(FieldKey::PostCode, format_postcode(sub.address.post_code));
    put(FieldKey::City, sub.address.city.clone());
    put(
        FieldKey::SubscriptionDate,
        sub.subscription_date.map(format_date_fr).unwrap_or_default(),
    );
    put(FieldKey::IssuesToReceive, sub.issues_to_receive.to_string());
    put(
        FieldKey::SubsBeginningIssue,
        sub.subs_beginning_issue.to_string(),
    );
    put(
        FieldKey::SubscriptionPrice,
        format_price(sub.subscription_price),
    );
    put(FieldKey::MembershipPrice, format_price(sub.membership_price));
    put(FieldKey::HorsSerie1, sub.hors_serie1.to_string());
    put(FieldKey::OrderingType, sub.ordering_type.clone());
    put(FieldKey::Comment, sub.comment.clone());
    fields
}
