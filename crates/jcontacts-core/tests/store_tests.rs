use jcontacts_core::models::render_birthday;
use jcontacts_core::{Birthday, Contact, ContactStore, SortBy, UserData, UserSettings};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn settings(sort_by: SortBy) -> UserSettings {
    UserSettings {
        sort_by,
        ..UserSettings::default()
    }
}

#[test]
fn refresh_seeds_missing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("JContacts.xml");

    let mut store = ContactStore::new(&path);
    store.refresh().unwrap();

    assert!(path.is_file());
    assert_eq!(store.data().contacts.len(), 1);
    assert_eq!(store.data().contacts[0].first_name, "Janorico");
    assert!(!store.data().license_agreed);
}

#[test]
fn load_of_missing_file_fails_without_seeding() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("import.xml");

    assert!(ContactStore::load(&path).is_err());
    assert!(!path.exists());
}

#[test]
fn two_contact_scenario_sorted_by_last_name() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.xml");

    let data = UserData {
        contacts: vec![
            Contact {
                job: Some("Pilot".to_string()),
                ..Contact::new("Bob", "Zin")
            },
            Contact {
                email: Some("a@x.com".to_string()),
                ..Contact::new("Ann", "Lee")
            },
        ],
        settings: settings(SortBy::LastName),
        license_agreed: true,
    };
    ContactStore::write_data(&data, &path).unwrap();

    let read = ContactStore::load(&path).unwrap();
    let names: Vec<_> = read.contacts.iter().map(Contact::full_name).collect();
    assert_eq!(names, vec!["Ann Lee", "Bob Zin"]);
    assert_eq!(read.contacts[0].job, None);
    assert_eq!(read.contacts[1].job.as_deref(), Some("Pilot"));
    assert!(read.license_agreed);
}

#[test]
fn unsorted_documents_keep_write_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.xml");

    let contacts: Vec<Contact> = ["delta", "Alpha", "charlie", "Bravo", "echo"]
        .iter()
        .map(|n| Contact::new(*n, "x"))
        .collect();
    let data = UserData {
        contacts: contacts.clone(),
        settings: settings(SortBy::None),
        license_agreed: false,
    };
    ContactStore::write_data(&data, &path).unwrap();

    assert_eq!(ContactStore::load(&path).unwrap().contacts, contacts);
}

#[test]
fn first_name_sort_is_case_insensitive_and_stable() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.xml");

    let data = UserData {
        contacts: vec![
            Contact::new("bob", "1"),
            Contact::new("Ann", "2"),
            Contact::new("Bob", "3"),
            Contact::new("ann", "4"),
        ],
        settings: settings(SortBy::FirstName),
        license_agreed: false,
    };
    ContactStore::write_data(&data, &path).unwrap();

    let read = ContactStore::load(&path).unwrap();
    let order: Vec<_> = read.contacts.iter().map(|c| c.last_name.as_str()).collect();
    assert_eq!(order, vec!["2", "4", "1", "3"]);
}

#[test]
fn edits_survive_write_and_refresh() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.xml");

    let mut store = ContactStore::new(&path);
    store.refresh().unwrap();
    store.accept_license();
    store.set_settings(settings(SortBy::None));
    store.add_contact(Contact {
        birthday: Some(Birthday::with_time(29, 2, 2024, 13, 5)),
        group: Some("  ".to_string()),
        ..Contact::new("Carl", "Ray")
    });
    store.write().unwrap();

    let mut reopened = ContactStore::new(&path);
    reopened.refresh().unwrap();
    let data = reopened.data();
    assert!(data.license_agreed);
    assert_eq!(data.contacts.len(), 2);

    let carl = &data.contacts[1];
    assert_eq!(carl.group, None);
    assert_eq!(render_birthday(carl.birthday.as_ref()), "29.2.2024 13:5");
}

#[test]
fn replace_and_remove_contacts() {
    let dir = TempDir::new().unwrap();
    let mut store = ContactStore::new(dir.path().join("data.xml"));
    store.refresh().unwrap();

    store
        .replace_contact(0, Contact::new("Jan", "Lion"))
        .unwrap();
    assert_eq!(store.data().contacts[0].full_name(), "Jan Lion");
    assert!(store.replace_contact(5, Contact::new("x", "y")).is_err());

    let removed = store.remove_contact(0).unwrap();
    assert_eq!(removed.first_name, "Jan");
    assert!(store.data().contacts.is_empty());
    assert!(store.remove_contact(0).is_err());
}

#[test]
fn import_appends_selected_contacts() {
    let dir = TempDir::new().unwrap();
    let export = dir.path().join("export.xml");

    let foreign = UserData {
        contacts: vec![
            Contact {
                group: Some("Club".to_string()),
                ..Contact::new("A", "")
            },
            Contact::new("B", ""),
            Contact {
                group: Some("Work".to_string()),
                ..Contact::new("C", "")
            },
        ],
        settings: settings(SortBy::Group),
        license_agreed: true,
    };
    ContactStore::write_data(&foreign, &export).unwrap();

    let mut store = ContactStore::new(dir.path().join("data.xml"));
    store.refresh().unwrap();
    let imported = ContactStore::load(&export).unwrap();
    store.import(imported, &[0, 2, 9], true);

    assert_eq!(store.data().contacts.len(), 3);
    assert_eq!(store.data().settings.sort_by, SortBy::Group);
    assert_eq!(store.groups(), vec!["Club".to_string(), "Work".to_string()]);
}

#[test]
fn write_to_exports_current_document() {
    let dir = TempDir::new().unwrap();
    let mut store = ContactStore::new(dir.path().join("data.xml"));
    store.refresh().unwrap();

    let export = dir.path().join("copy.xml");
    store.write_to(&export).unwrap();

    assert_eq!(ContactStore::load(&export).unwrap(), *store.data());
}

#[test]
fn malformed_import_propagates_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.xml");
    std::fs::write(&path, "<JContactsUserData><contacts>").unwrap();

    let err = ContactStore::load(&path).unwrap_err();
    assert!(err.to_string().contains("bad.xml"));
}
