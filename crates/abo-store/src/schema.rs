//! Table creation and the additive schema upgrade.

use rusqlite::Connection;
use tracing::debug;

use crate::error::Result;

const CREATE_SUBSCRIBERS: &str = "CREATE TABLE IF NOT EXISTS subscribers (
    id INTEGER PRIMARY KEY,
    lastname TEXT NOT NULL DEFAULT '',
    firstname TEXT NOT NULL DEFAULT '',
    company TEXT NOT NULL DEFAULT '',
    name_addition TEXT NOT NULL DEFAULT '',
    address TEXT NOT NULL DEFAULT '',
    address_addition TEXT NOT NULL DEFAULT '',
    post_code INTEGER NOT NULL DEFAULT 0,
    city TEXT NOT NULL DEFAULT '',
    email_address TEXT NOT NULL DEFAULT '',
    subscriber_since_issue INTEGER NOT NULL DEFAULT 0,
    subscription_date TEXT,
    issues_to_receive INTEGER NOT NULL DEFAULT 0,
    subs_beginning_issue INTEGER NOT NULL DEFAULT 0,
    member INTEGER NOT NULL DEFAULT 0,
    subscription_price REAL NOT NULL DEFAULT 0.0,
    membership_price REAL NOT NULL DEFAULT 0.0,
    hors_serie1 INTEGER NOT NULL DEFAULT 0,
    hors_serie2 INTEGER NOT NULL DEFAULT 0,
    hors_serie3 INTEGER NOT NULL DEFAULT 0,
    sticker_sent INTEGER NOT NULL DEFAULT 0,
    comment TEXT NOT NULL DEFAULT '',
    bank TEXT NOT NULL DEFAULT '',
    ordering_type TEXT NOT NULL DEFAULT ''
)";

/// Creates the `subscribers` table when absent and applies the additive
/// upgrades older database files may be missing.
pub(crate) fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute(CREATE_SUBSCRIBERS, [])?;
    add_mail_sent_column(conn)?;
    Ok(())
}

/// The `mail_sent` column arrived after the first production databases
/// were created. Probing with a never-matching SELECT tells us whether the
/// column exists without parsing the table definition.
fn add_mail_sent_column(conn: &Connection) -> Result<()> {
    if conn
        .prepare("SELECT mail_sent FROM subscribers WHERE 0 = 1")
        .is_err()
    {
        debug!("adding missing mail_sent column");
        conn.execute("ALTER TABLE subscribers ADD COLUMN mail_sent INTEGER", [])?;
    }
    conn.execute(
        "UPDATE subscribers SET mail_sent = 0 WHERE mail_sent IS NULL",
        [],
    )?;
    Ok(())
}
