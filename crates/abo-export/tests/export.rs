//! Scenario tests for the four export writers, checked line by line.

use chrono::NaiveDate;

use abo_export::{csv, email, resubscribe, routing};
use abo_model::Subscriber;
use abo_store::SubscriberStore;

fn store() -> SubscriberStore {
    SubscriberStore::open_in_memory().unwrap()
}

fn out_path(dir: &tempfile::TempDir) -> std::path::PathBuf {
    dir.path().join("export.txt")
}

fn read(path: &std::path::Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

#[test]
fn routing_line_layout() {
    let store = store();
    let mut sub = Subscriber {
        lastname: "Debelle".to_owned(),
        firstname: "Anne".to_owned(),
        issues_to_receive: 1,
        ..Subscriber::default()
    };
    sub.address.street = "rue dupre 63".to_owned();
    sub.address.street_addition = "Bruxelles 1090".to_owned();
    sub.address.city = "belgique".to_owned();
    store.save(&mut sub).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = out_path(&dir);
    routing::export(&store, &path).unwrap();

    let content = read(&path);
    let line = content.lines().next().unwrap();
    let cols: Vec<&str> = line.split('\t').collect();
    assert_eq!(cols.len(), 16);
    assert_eq!(cols[0], "");
    assert_eq!(cols[1], "");
    assert_eq!(cols[2], "DEBELLE");
    assert_eq!(cols[3], "ANNE");
    assert_eq!(cols[4], "");
    assert_eq!(cols[5], "");
    assert_eq!(cols[6], "RUE DUPRE 63");
    assert_eq!(cols[7], "BRUXELLES 1090");
    assert_eq!(cols[8], "");
    assert_eq!(cols[9], "BELGIQUE");
    assert!(cols[10..].iter().all(|c| c.is_empty()));
}

#[test]
fn routing_skips_lapsed_subscribers() {
    let store = store();
    let mut active = Subscriber {
        lastname: "toto".to_owned(),
        issues_to_receive: 1,
        ..Subscriber::default()
    };
    let mut lapsed = Subscriber {
        lastname: "tata".to_owned(),
        issues_to_receive: 0,
        ..Subscriber::default()
    };
    store.save(&mut active).unwrap();
    store.save(&mut lapsed).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = out_path(&dir);
    routing::export(&store, &path).unwrap();

    let content = read(&path);
    assert!(content.contains("TOTO"));
    assert!(!content.contains("TATA"));
}

#[test]
fn special_routing_selects_on_the_special_counter() {
    let store = store();
    let mut special = Subscriber {
        lastname: "toto".to_owned(),
        issues_to_receive: 0,
        hors_serie1: 1,
        ..Subscriber::default()
    };
    let mut regular_only = Subscriber {
        lastname: "tata".to_owned(),
        issues_to_receive: 3,
        hors_serie1: 0,
        ..Subscriber::default()
    };
    store.save(&mut special).unwrap();
    store.save(&mut regular_only).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = out_path(&dir);
    routing::export_special(&store, &path).unwrap();

    let content = read(&path);
    assert!(content.contains("TOTO"));
    assert!(!content.contains("TATA"));
}

#[test]
fn routing_fields_respect_their_widths() {
    let store = store();
    let big = "b".repeat(39);
    let mut sub = Subscriber {
        lastname: big.clone(),
        firstname: big.clone(),
        company: big.clone(),
        issues_to_receive: 10,
        ..Subscriber::default()
    };
    sub.address.street = big.clone();
    sub.address.street_addition = big.clone();
    sub.address.post_code = 123_456;
    sub.address.city = big;
    store.save(&mut sub).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = out_path(&dir);
    routing::export(&store, &path).unwrap();

    let content = read(&path);
    let line = content.lines().next().unwrap();
    let cols: Vec<&str> = line.split('\t').collect();
    assert!(cols[2].len() <= 32);
    assert!(cols[3].len() <= 20);
    assert!(cols[4].len() <= 32);
    assert!(cols[5].len() <= 32);
    assert!(cols[6].len() <= 32);
    assert!(cols[7].len() <= 32);
    assert!(cols[8].len() <= 5);
    assert!(cols[9].len() <= 26);
}

#[test]
fn routing_pads_the_postcode_to_five_digits() {
    let store = store();
    let mut sub = Subscriber {
        issues_to_receive: 1,
        ..Subscriber::default()
    };
    sub.address.post_code = 1300;
    store.save(&mut sub).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = out_path(&dir);
    routing::export(&store, &path).unwrap();

    let content = read(&path);
    let cols: Vec<&str> = content.lines().next().unwrap().split('\t').collect();
    assert_eq!(cols[8], "01300");
}

#[test]
fn routing_puts_the_name_addition_in_the_first_address_slot() {
    let store = store();
    let mut sub = Subscriber {
        lastname: "Dupond".to_owned(),
        firstname: "Toto".to_owned(),
        name_addition: "Chez lulu".to_owned(),
        issues_to_receive: 1,
        ..Subscriber::default()
    };
    sub.address.street = "14 Rue lalala".to_owned();
    store.save(&mut sub).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = out_path(&dir);
    routing::export(&store, &path).unwrap();

    let content = read(&path);
    let cols: Vec<&str> = content.lines().next().unwrap().split('\t').collect();
    assert_eq!(cols[5], "CHEZ LULU");
    assert_eq!(cols[6], "14 RUE LALALA");
}

#[test]
fn csv_header_and_basic_line() {
    let store = store();
    let mut sub = Subscriber {
        lastname: "Doe".to_owned(),
        firstname: "John".to_owned(),
        company: "Apave".to_owned(),
        issues_to_receive: 5,
        hors_serie1: 6,
        subscription_price: 20.0,
        membership_price: 30.0,
        subscription_date: NaiveDate::from_ymd_opt(2011, 7, 12),
        ..Subscriber::default()
    };
    sub.address.city = "Rouen".to_owned();
    store.save(&mut sub).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = out_path(&dir);
    csv::export(&store, &path).unwrap();

    let content = read(&path);
    let mut lines = content.split("\r\n");
    assert_eq!(
        lines.next().unwrap(),
        "nom;société;ville/pays;numeros à recevoir;HS à recevoir;\
         prix abonnement;prix cottisation;date abonnement"
    );
    assert_eq!(
        lines.next().unwrap(),
        "John Doe;Apave;Rouen;5;6;20.0;30.0;12/07/2011"
    );
}

#[test]
fn csv_prints_out_of_range_dates_verbatim() {
    let store = store();
    let mut sub = Subscriber {
        lastname: "Doe".to_owned(),
        firstname: "John".to_owned(),
        subscription_date: NaiveDate::from_ymd_opt(211, 7, 12),
        ..Subscriber::default()
    };
    store.save(&mut sub).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = out_path(&dir);
    csv::export(&store, &path).unwrap();

    let content = read(&path);
    let line = content.split("\r\n").nth(1).unwrap();
    assert_eq!(line, "John Doe;;;6;0;0.0;0.0;12/07/0211");
}

#[test]
fn resubscribe_recipients_and_filter() {
    let store = store();
    let mut person = Subscriber {
        lastname: "Nom".to_owned(),
        firstname: "Prenom".to_owned(),
        issues_to_receive: 0,
        ..Subscriber::default()
    };
    person.address.street = "Adresse".to_owned();
    person.address.street_addition = "Addition".to_owned();
    person.address.post_code = 12345;
    person.address.city = "Ville".to_owned();
    store.save(&mut person).unwrap();

    let mut company = Subscriber {
        company: "Google".to_owned(),
        issues_to_receive: 0,
        ..Subscriber::default()
    };
    company.address.street = "Address".to_owned();
    company.address.city = "USA".to_owned();
    store.save(&mut company).unwrap();

    let mut company_contact = Subscriber {
        lastname: "Nom".to_owned(),
        firstname: "Prenom".to_owned(),
        company: "Capgemini".to_owned(),
        issues_to_receive: 0,
        ..Subscriber::default()
    };
    store.save(&mut company_contact).unwrap();

    let mut still_active = Subscriber {
        lastname: "Actif".to_owned(),
        issues_to_receive: 1,
        ..Subscriber::default()
    };
    store.save(&mut still_active).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = out_path(&dir);
    resubscribe::export(&store, &path).unwrap();

    let content = read(&path);
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines[0],
        "Destinataire;Adresse;Complement Adresse;Code Postal;Ville / Pays"
    );
    assert_eq!(lines[1], "PRENOM NOM;ADRESSE;ADDITION;12345;VILLE");
    assert_eq!(lines[2], "GOOGLE;ADDRESS;;;USA");
    assert_eq!(lines[3], "CAPGEMINI, POUR PRENOM NOM;;;;");
    assert_eq!(lines.len(), 4);
}

#[test]
fn email_export_joins_lapsed_addresses() {
    let store = store();
    for (email, issues) in [
        ("tOTo@exAmpLE.COm", 0),
        ("tata@example.com", 0),
        ("active@example.com", 1),
    ] {
        let mut sub = Subscriber {
            email: email.to_owned(),
            issues_to_receive: issues,
            ..Subscriber::default()
        };
        store.save(&mut sub).unwrap();
    }

    let dir = tempfile::tempdir().unwrap();
    let path = out_path(&dir);
    email::export(&store, &path).unwrap();

    assert_eq!(read(&path), "toto@example.com,tata@example.com\n");
}

#[test]
fn email_export_writes_nothing_when_empty() {
    let store = store();
    let mut active = Subscriber {
        email: "busy@example.com".to_owned(),
        issues_to_receive: 2,
        ..Subscriber::default()
    };
    store.save(&mut active).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = out_path(&dir);
    email::export(&store, &path).unwrap();

    assert_eq!(read(&path), "");
}

#[test]
fn unwritable_target_fails_with_the_file_path_in_context() {
    let store = store();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("export.txt");

    let err = routing::export(&store, &path).unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("cannot create routing file `{}`", path.display())
    );

    let err = csv::export(&store, &path).unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("cannot create CSV file `{}`", path.display())
    );
}
