//! Integration tests for the SQLite repository.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use abo_model::Subscriber;
use abo_store::SubscriberStore;

fn named(lastname: &str, email: &str) -> Subscriber {
    Subscriber {
        lastname: lastname.to_owned(),
        email: email.to_owned(),
        ..Subscriber::default()
    }
}

#[test]
fn insert_assigns_an_id_and_reads_back() {
    let store = SubscriberStore::open_in_memory().unwrap();
    let mut sub = named("Debelle", "toto@lala.com");
    sub.address.post_code = 1300;
    sub.subscription_price = 37.2;

    let id = store.save(&mut sub).unwrap();
    assert_eq!(sub.id, Some(id));

    let found = store.find_by_lastname("Debelle").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, Some(id));
    assert_eq!(found[0].address.post_code, 1300);
    assert!((found[0].subscription_price - 37.2).abs() < f64::EPSILON);
}

#[test]
fn save_with_id_updates_in_place() {
    let store = SubscriberStore::open_in_memory().unwrap();
    let mut sub = named("Debelle", "");
    store.save(&mut sub).unwrap();

    sub.lastname = "Dupont".to_owned();
    store.save(&mut sub).unwrap();

    assert!(store.find_by_lastname("Debelle").unwrap().is_empty());
    assert_eq!(store.find_by_lastname("Dupont").unwrap().len(), 1);
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn email_lookup_is_case_insensitive_and_ordered() {
    let store = SubscriberStore::open_in_memory().unwrap();
    let mut first = named("A", "Toto@Lala.com");
    let mut second = named("B", "toto@lala.com");
    store.save(&mut first).unwrap();
    store.save(&mut second).unwrap();

    let found = store.find_by_email("TOTO@LALA.COM").unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].id, first.id);
    assert_eq!(found[1].id, second.id);
}

#[test]
fn search_deduplicates_by_id() {
    let store = SubscriberStore::open_in_memory().unwrap();
    let mut sub = named("Debelle", "toto@lala.com");
    sub.company = "Apave".to_owned();
    store.save(&mut sub).unwrap();

    let found = store
        .search(Some("Debelle"), Some("Apave"), Some("toto@lala.com"))
        .unwrap();
    assert_eq!(found.len(), 1);
}

#[test]
fn decrement_is_floor_clamped() {
    let store = SubscriberStore::open_in_memory().unwrap();
    for issues in [0, 1, 3] {
        let mut sub = Subscriber {
            issues_to_receive: issues,
            ..Subscriber::default()
        };
        store.save(&mut sub).unwrap();
    }

    let touched = store.decrement_issues_to_receive().unwrap();
    assert_eq!(touched, 2);

    let mut counters: Vec<u32> = store
        .find_expiring()
        .unwrap()
        .iter()
        .map(|s| s.issues_to_receive)
        .collect();
    counters.sort_unstable();
    // 0 stays 0, 1 becomes 0; the 3 became 2 and is not expiring.
    assert_eq!(counters, vec![0, 0]);
}

#[test]
fn special_decrement_touches_only_special_counters() {
    let store = SubscriberStore::open_in_memory().unwrap();
    let mut sub = Subscriber {
        hors_serie1: 2,
        issues_to_receive: 4,
        ..Subscriber::default()
    };
    store.save(&mut sub).unwrap();

    store.decrement_special_issues().unwrap();
    let found = store.find_by_lastname("").unwrap();
    assert_eq!(found[0].hors_serie1, 1);
    assert_eq!(found[0].issues_to_receive, 4);
}

#[test]
fn truncate_empties_the_table() {
    let store = SubscriberStore::open_in_memory().unwrap();
    store.save(&mut named("A", "")).unwrap();
    store.save(&mut named("B", "")).unwrap();
    assert_eq!(store.count().unwrap(), 2);

    store.truncate().unwrap();
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn delete_removes_one_record() {
    let store = SubscriberStore::open_in_memory().unwrap();
    let mut keep = named("Keep", "");
    let mut gone = named("Gone", "");
    store.save(&mut keep).unwrap();
    let id = store.save(&mut gone).unwrap();

    store.delete(id).unwrap();
    assert_eq!(store.count().unwrap(), 1);
    assert!(store.find_by_lastname("Gone").unwrap().is_empty());
}

#[test]
fn out_of_range_stored_date_reads_back_as_fallback() {
    let store = SubscriberStore::open_in_memory().unwrap();
    let mut sub = named("Ancien", "");
    sub.subscription_date = NaiveDate::from_ymd_opt(211, 7, 12);
    store.save(&mut sub).unwrap();

    let found = store.find_by_lastname("Ancien").unwrap();
    assert_eq!(
        found[0].subscription_date,
        NaiveDate::from_ymd_opt(1900, 1, 1)
    );
}

#[test]
fn csv_rows_keep_the_raw_iso_date_text() {
    let store = SubscriberStore::open_in_memory().unwrap();
    let mut sub = named("Doe", "");
    sub.firstname = "John".to_owned();
    sub.subscription_date = NaiveDate::from_ymd_opt(2011, 7, 12);
    store.save(&mut sub).unwrap();

    let rows = store.csv_rows().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].subscription_date.as_deref(), Some("2011-07-12"));
}

#[test]
fn save_form_writes_the_id_back_into_the_map() {
    let store = SubscriberStore::open_in_memory().unwrap();
    let mut fields: BTreeMap<String, String> = [
        ("lastname", "Debelle"),
        ("firstname", "Anne"),
        ("subscription_price", "37,2"),
    ]
    .iter()
    .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
    .collect();

    let id = store.save_form(&mut fields).unwrap();
    assert_eq!(fields["subscriber_id"], id.to_string());

    let found = store.find_by_lastname("Debelle").unwrap();
    assert_eq!(found.len(), 1);
    assert!((found[0].subscription_price - 37.2).abs() < f64::EPSILON);
}

#[test]
fn old_schema_gains_mail_sent_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("abo.db");

    {
        let conn = rusqlite::Connection::open(&db_path).unwrap();
        conn.execute(
            "CREATE TABLE subscribers (
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
            )",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO subscribers (lastname) VALUES ('Legacy')",
            [],
        )
        .unwrap();
    }

    let store = SubscriberStore::open(&db_path).unwrap();
    let found = store.find_by_lastname("Legacy").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].mail_sent, 0);
}
