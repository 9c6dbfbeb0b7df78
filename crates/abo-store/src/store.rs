//! The subscriber repository.

use std::collections::BTreeMap;
use std::path::Path;

use rusqlite::{Connection, Row, params};
use tracing::{debug, info};

use abo_format::date_from_iso;
use abo_model::{Subscriber, apply_fields};

use crate::error::{Result, StoreError};
use crate::schema;

/// Column list shared by every query that hydrates a full [`Subscriber`].
const SUBSCRIBER_COLUMNS: &str = "id, lastname, firstname, company, \
    name_addition, address, address_addition, post_code, city, \
    email_address, subscriber_since_issue, subscription_date, \
    issues_to_receive, subs_beginning_issue, member, subscription_price, \
    membership_price, hors_serie1, hors_serie2, hors_serie3, sticker_sent, \
    mail_sent, comment, bank, ordering_type";

/// One row of the management CSV export.
///
/// The date is kept as the raw stored ISO text so that the writer can
/// apply its naive token reversal even to out-of-calendar values.
#[derive(Debug, Clone)]
pub struct CsvExportRow {
    pub firstname: String,
    pub lastname: String,
    pub company: String,
    pub city: String,
    pub issues_to_receive: u32,
    pub hors_serie1: u32,
    pub subscription_price: f64,
    pub membership_price: f64,
    pub subscription_date: Option<String>,
}

/// Repository over the `subscribers` table, autocommit per statement.
pub struct SubscriberStore {
    conn: Connection,
}

impl SubscriberStore {
    /// Opens (or creates) the database file and brings its schema up to
    /// date.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| StoreError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        schema::ensure_schema(&conn)?;
        debug!(path = %path.display(), "subscriber store opened");
        Ok(Self { conn })
    }

    /// In-memory store, mainly for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::ensure_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Inserts the subscriber when it has no id yet, updates it otherwise.
    /// On insert the generated id is written back into the entity.
    pub fn save(&self, sub: &mut Subscriber) -> Result<i64> {
        match sub.id {
            None => self.insert(sub),
            Some(id) => {
                self.update(sub, id)?;
                Ok(id)
            }
        }
    }

    fn insert(&self, sub: &mut Subscriber) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO subscribers (
                lastname, firstname, company, name_addition, address,
                address_addition, post_code, city, email_address,
                subscriber_since_issue, subscription_date, issues_to_receive,
                subs_beginning_issue, member, subscription_price,
                membership_price, hors_serie1, hors_serie2, hors_serie3,
                sticker_sent, mail_sent, comment, bank, ordering_type
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12,
                ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24)",
            params![
                sub.lastname,
                sub.firstname,
                sub.company,
                sub.name_addition,
                sub.address.street,
                sub.address.street_addition,
                sub.address.post_code,
                sub.address.city,
                sub.email,
                sub.subscriber_since_issue,
                sub.subscription_date.map(abo_format::date_to_iso),
                sub.issues_to_receive,
                sub.subs_beginning_issue,
                i64::from(sub.member),
                sub.subscription_price,
                sub.membership_price,
                sub.hors_serie1,
                sub.hors_serie2,
                sub.hors_serie3,
                sub.sticker_sent,
                sub.mail_sent,
                sub.comment,
                sub.bank,
                sub.ordering_type,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        sub.id = Some(id);
        Ok(id)
    }

    fn update(&self, sub: &Subscriber, id: i64) -> Result<()> {
        self.conn.execute(
            "UPDATE subscribers SET
                lastname = ?1, firstname = ?2, company = ?3,
                name_addition = ?4, address = ?5, address_addition = ?6,
                post_code = ?7, city = ?8, email_address = ?9,
                subscriber_since_issue = ?10, subscription_date = ?11,
                issues_to_receive = ?12, subs_beginning_issue = ?13,
                member = ?14, subscription_price = ?15,
                membership_price = ?16, hors_serie1 = ?17, hors_serie2 = ?18,
                hors_serie3 = ?19, sticker_sent = ?20, mail_sent = ?21,
                comment = ?22, bank = ?23, ordering_type = ?24
            WHERE id = ?25",
            params![
                sub.lastname,
                sub.firstname,
                sub.company,
                sub.name_addition,
                sub.address.street,
                sub.address.street_addition,
                sub.address.post_code,
                sub.address.city,
                sub.email,
                sub.subscriber_since_issue,
                sub.subscription_date.map(abo_format::date_to_iso),
                sub.issues_to_receive,
                sub.subs_beginning_issue,
                i64::from(sub.member),
                sub.subscription_price,
                sub.membership_price,
                sub.hors_serie1,
                sub.hors_serie2,
                sub.hors_serie3,
                sub.sticker_sent,
                sub.mail_sent,
                sub.comment,
                sub.bank,
                sub.ordering_type,
                id,
            ],
        )?;
        Ok(())
    }

    /// Applies a flat field map onto a fresh entity and saves it. The
    /// generated (or submitted) id is written back into the map under
    /// `subscriber_id`.
    pub fn save_form(&self, fields: &mut BTreeMap<String, String>) -> Result<i64> {
        let mut sub = Subscriber::default();
        apply_fields(fields, &mut sub);
        let id = self.save(&mut sub)?;
        fields.insert("subscriber_id".to_owned(), id.to_string());
        Ok(id)
    }

    pub fn find_by_lastname(&self, lastname: &str) -> Result<Vec<Subscriber>> {
        self.query_subscribers(
            "WHERE lower(lastname) = lower(?1) ORDER BY id",
            params![lastname],
        )
    }

    pub fn find_by_company(&self, company: &str) -> Result<Vec<Subscriber>> {
        self.query_subscribers(
            "WHERE lower(company) = lower(?1) ORDER BY id",
            params![company],
        )
    }

    /// Matches case-insensitively; results come back in rowid order so a
    /// caller taking the first match is deterministic.
    pub fn find_by_email(&self, email: &str) -> Result<Vec<Subscriber>> {
        self.query_subscribers(
            "WHERE lower(email_address) = lower(?1) ORDER BY id",
            params![email],
        )
    }

    /// Combined search over the three lookup fields, de-duplicated by id
    /// (a record matching both lastname and company appears once).
    pub fn search(
        &self,
        lastname: Option<&str>,
        company: Option<&str>,
        email: Option<&str>,
    ) -> Result<Vec<Subscriber>> {
        let mut found = Vec::new();
        if let Some(lastname) = lastname.filter(|s| !s.is_empty()) {
            found.extend(self.find_by_lastname(lastname)?);
        }
        if let Some(company) = company.filter(|s| !s.is_empty()) {
            found.extend(self.find_by_company(company)?);
        }
        if let Some(email) = email.filter(|s| !s.is_empty()) {
            found.extend(self.find_by_email(email)?);
        }

        let mut seen = Vec::new();
        found.retain(|sub| {
            if sub.id.is_some_and(|id| seen.contains(&id)) {
                false
            } else {
                seen.extend(sub.id);
                true
            }
        });
        Ok(found)
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM subscribers WHERE id = ?1", params![id])?;
        Ok(())
    }

    pub fn count(&self) -> Result<u64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM subscribers", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Removes every record. Used by the truncate import mode.
    pub fn truncate(&self) -> Result<()> {
        let removed = self.conn.execute("DELETE FROM subscribers", [])?;
        info!(removed, "subscriber table truncated");
        Ok(())
    }

    /// Takes one regular issue from every subscriber that still has some,
    /// never going below zero. Returns the number of rows touched.
    pub fn decrement_issues_to_receive(&self) -> Result<usize> {
        let touched = self.conn.execute(
            "UPDATE subscribers SET issues_to_receive = issues_to_receive - 1
             WHERE issues_to_receive > 0",
            [],
        )?;
        Ok(touched)
    }

    /// Same as [`Self::decrement_issues_to_receive`] for the special-issue
    /// counter.
    pub fn decrement_special_issues(&self) -> Result<usize> {
        let touched = self.conn.execute(
            "UPDATE subscribers SET hors_serie1 = hors_serie1 - 1
             WHERE hors_serie1 > 0",
            [],
        )?;
        Ok(touched)
    }

    /// Subscribers on their last issue or already lapsed.
    pub fn find_expiring(&self) -> Result<Vec<Subscriber>> {
        self.query_subscribers("WHERE issues_to_receive < 2 ORDER BY id", params![])
    }

    /// Subscribers still owed regular issues, for the routing export.
    pub fn find_receiving_regular(&self) -> Result<Vec<Subscriber>> {
        self.query_subscribers("WHERE issues_to_receive > 0 ORDER BY id", params![])
    }

    /// Subscribers still owed special issues.
    pub fn find_receiving_special(&self) -> Result<Vec<Subscriber>> {
        self.query_subscribers("WHERE hors_serie1 > 0 ORDER BY id", params![])
    }

    /// Subscribers whose regular subscription has run out, for the
    /// re-subscription mailing.
    pub fn find_lapsed(&self) -> Result<Vec<Subscriber>> {
        self.query_subscribers("WHERE issues_to_receive = 0 ORDER BY id", params![])
    }

    /// Email addresses of fully lapsed subscribers (no regular and no
    /// special issues left), in rowid order.
    pub fn lapsed_emails(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT email_address FROM subscribers
             WHERE email_address != ''
             AND issues_to_receive = 0
             AND hors_serie1 = 0
             ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut emails = Vec::new();
        for email in rows {
            emails.push(email?);
        }
        Ok(emails)
    }

    /// Every row, projected for the management CSV export. The stored ISO
    /// date text is passed through untouched.
    pub fn csv_rows(&self) -> Result<Vec<CsvExportRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT firstname, lastname, company, city, issues_to_receive,
                    hors_serie1, subscription_price, membership_price,
                    subscription_date
             FROM subscribers ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(CsvExportRow {
                firstname: row.get(0)?,
                lastname: row.get(1)?,
                company: row.get(2)?,
                city: row.get(3)?,
                issues_to_receive: row.get(4)?,
                hors_serie1: row.get(5)?,
                subscription_price: row.get(6)?,
                membership_price: row.get(7)?,
                subscription_date: row.get(8)?,
            })
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn query_subscribers(
        &self,
        tail: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<Subscriber>> {
        let sql = format!("SELECT {SUBSCRIBER_COLUMNS} FROM subscribers {tail}");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params, row_to_subscriber)?;
        let mut subs = Vec::new();
        for sub in rows {
            subs.push(sub?);
        }
        Ok(subs)
    }
}

fn row_to_subscriber(row: &Row<'_>) -> rusqlite::Result<Subscriber> {
    let iso_date: Option<String> = row.get(11)?;
    Ok(Subscriber {
        id: Some(row.get(0)?),
        lastname: row.get(1)?,
        firstname: row.get(2)?,
        company: row.get(3)?,
        name_addition: row.get(4)?,
        address: abo_model::Address {
            street: row.get(5)?,
            street_addition: row.get(6)?,
            post_code: row.get(7)?,
            city: row.get(8)?,
        },
        email: row.get(9)?,
        subscriber_since_issue: row.get(10)?,
        subscription_date: Some(date_from_iso(iso_date.as_deref())),
        issues_to_receive: row.get(12)?,
        subs_beginning_issue: row.get(13)?,
        member: row.get::<_, i64>(14)? != 0,
        subscription_price: row.get(15)?,
        membership_price: row.get(16)?,
        hors_serie1: row.get(17)?,
        hors_serie2: row.get(18)?,
        hors_serie3: row.get(19)?,
        sticker_sent: row.get(20)?,
        mail_sent: row.get::<_, Option<u32>>(21)?.unwrap_or(0),
        comment: row.get(22)?,
        bank: row.get(23)?,
        ordering_type: row.get(24)?,
    })
}
