//! The subscriber entity and its nested address value object.

use chrono::{Local, NaiveDate};

/// Number of regular issues in one year of subscription.
pub const ISSUES_IN_A_YEAR: u32 = 6;

/// Postal address owned exclusively by a [`Subscriber`].
///
/// A `post_code` of `0` means "unset" and renders as an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    pub street: String,
    pub street_addition: String,
    pub post_code: u32,
    pub city: String,
}

/// One subscriber record.
///
/// `id` is `None` until the store assigns an identifier on first save.
#[derive(Debug, Clone, PartialEq)]
pub struct Subscriber {
    pub id: Option<i64>,
    pub lastname: String,
    pub firstname: String,
    pub company: String,
    pub name_addition: String,
    pub address: Address,
    pub email: String,
    pub subscriber_since_issue: u32,
    pub subscription_date: Option<NaiveDate>,
    pub issues_to_receive: u32,
    pub subs_beginning_issue: u32,
    pub member: bool,
    pub subscription_price: f64,
    pub membership_price: f64,
    pub hors_serie1: u32,
    /// Legacy special-issue counters, persisted but not exported.
    pub hors_serie2: u32,
    pub hors_serie3: u32,
    pub sticker_sent: u32,
    pub mail_sent: u32,
    pub comment: String,
    pub bank: String,
    pub ordering_type: String,
}

impl Default for Subscriber {
    fn default() -> Self {
        Self {
            id: None,
            lastname: String::new(),
            firstname: String::new(),
            company: String::new(),
            name_addition: String::new(),
            address: Address::default(),
            email: String::new(),
            subscriber_since_issue: 0,
            subscription_date: Some(Local::now().date_naive()),
            issues_to_receive: ISSUES_IN_A_YEAR,
            subs_beginning_issue: 0,
            member: false,
            subscription_price: 0.0,
            membership_price: 0.0,
            hors_serie1: 0,
            hors_serie2: 0,
            hors_serie3: 0,
            sticker_sent: 0,
            mail_sent: 0,
            comment: String::new(),
            bank: String::new(),
            ordering_type: String::new(),
        }
    }
}

impl Subscriber {
    /// Adds one year of subscription to this subscriber.
    pub fn order_new_subscription(&mut self) {
        self.issues_to_receive += ISSUES_IN_A_YEAR;
    }
}
