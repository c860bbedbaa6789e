//! XML reading and writing of the user-data document.

use crate::error::{CodecError, CodecResult};
use crate::models::{non_blank, Birthday, Contact, SortBy, Theme, UserData, UserSettings};
use crate::ordering::sort_contacts;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::collections::HashMap;
use std::io::{BufRead, Write};

const ROOT: &str = "JContactsUserData";
const CONTACTS: &str = "contacts";
const CONTACT: &str = "contact";
const BIRTHDAY: &str = "birthday";
const SETTINGS: &str = "settings";

/// Work number attribute.
const NUMBER_WORK: &str = "number-work";
/// Name the work number was stored under by older writers.
const LEGACY_NUMBER_WORK: &str = "number-private";

/// Serialize `data` as XML into `out`.
pub fn write_document<W: Write>(data: &UserData, out: W) -> CodecResult<()> {
    let mut writer = Writer::new_with_indent(out, b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("no"))))?;

    let mut root = BytesStart::new(ROOT);
    if data.license_agreed {
        root.push_attribute(("license-agreed", "true"));
    }
    writer.write_event(Event::Start(root))?;

    writer.write_event(Event::Start(BytesStart::new(CONTACTS)))?;
    for contact in &data.contacts {
        write_contact(&mut writer, contact)?;
    }
    writer.write_event(Event::End(BytesEnd::new(CONTACTS)))?;

    let settings = &data.settings;
    let mut elem = BytesStart::new(SETTINGS);
    elem.push_attribute(("theme", settings.theme.as_key()));
    elem.push_attribute(("title-string", settings.title_template.as_str()));
    elem.push_attribute(("detail-string", settings.detail_template.as_str()));
    elem.push_attribute((
        "detail-string-enabled",
        if settings.detail_enabled { "true" } else { "false" },
    ));
    elem.push_attribute(("sort-by", settings.sort_by.as_key()));
    writer.write_event(Event::Empty(elem))?;

    writer.write_event(Event::End(BytesEnd::new(ROOT)))?;
    writer.into_inner().flush()?;
    Ok(())
}

fn write_contact<W: Write>(writer: &mut Writer<W>, contact: &Contact) -> CodecResult<()> {
    let mut elem = BytesStart::new(CONTACT);
    elem.push_attribute(("first-name", contact.first_name.as_str()));
    elem.push_attribute(("last-name", contact.last_name.as_str()));

    let optional = [
        ("job", &contact.job),
        ("handy-number", &contact.handy_number),
        ("number", &contact.number),
        (NUMBER_WORK, &contact.number_work),
        ("email", &contact.email),
        ("group", &contact.group),
    ];
    for (name, value) in optional {
        if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
            elem.push_attribute((name, value));
        }
    }

    let Some(birthday) = contact.birthday else {
        writer.write_event(Event::Empty(elem))?;
        return Ok(());
    };

    writer.write_event(Event::Start(elem))?;
    let mut bday = BytesStart::new(BIRTHDAY);
    bday.push_attribute(("day", birthday.day.to_string().as_str()));
    bday.push_attribute(("month", birthday.month.to_string().as_str()));
    bday.push_attribute(("year", birthday.year.to_string().as_str()));
    if let Some(time) = birthday.time {
        bday.push_attribute(("hour", time.hour.to_string().as_str()));
        bday.push_attribute(("minute", time.minute.to_string().as_str()));
    }
    writer.write_event(Event::Empty(bday))?;
    writer.write_event(Event::End(BytesEnd::new(CONTACT)))?;
    Ok(())
}

/// Serialize `data` to an XML string.
pub fn to_xml_string(data: &UserData) -> CodecResult<String> {
    let mut buf = Vec::new();
    write_document(data, &mut buf)?;
    // quick-xml only emits what it was given, which is all valid UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Where the reader currently is in the element tree.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Scope {
    Root,
    Contacts,
    Contact,
    Other,
}

/// Parse a user-data document.
///
/// Contacts come back sorted by the stored sort mode.
pub fn read_document<R: BufRead>(input: R) -> CodecResult<UserData> {
    let mut reader = Reader::from_reader(input);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut stack: Vec<Scope> = Vec::new();
    let mut seen_root = false;
    let mut contacts_done = false;
    let mut contacts: Option<Vec<Contact>> = None;
    let mut settings: Option<UserSettings> = None;
    let mut license_agreed = false;

    loop {
        buf.clear();
        let (elem, is_empty) = match reader.read_event_into(&mut buf)? {
            Event::Start(e) => (e.into_owned(), false),
            Event::Empty(e) => (e.into_owned(), true),
            Event::End(_) => {
                if stack.pop() == Some(Scope::Contacts) {
                    contacts_done = true;
                }
                continue;
            }
            Event::Eof if stack.is_empty() => break,
            Event::Eof => return Err(CodecError::UnclosedElement),
            _ => continue,
        };

        let name = String::from_utf8_lossy(elem.name().as_ref()).into_owned();
        if seen_root && stack.is_empty() {
            return Err(CodecError::TrailingElement(name));
        }
        let scope = match stack.last() {
            None if !seen_root => {
                seen_root = true;
                let attrs = attributes(&elem)?;
                license_agreed = attrs.get("license-agreed").is_some_and(|v| v == "true");
                Scope::Root
            }
            Some(Scope::Root) if name == CONTACTS && !contacts_done && contacts.is_none() => {
                contacts = Some(Vec::new());
                if is_empty {
                    contacts_done = true;
                }
                Scope::Contacts
            }
            Some(Scope::Root) if name == SETTINGS && settings.is_none() => {
                settings = Some(parse_settings(&attributes(&elem)?));
                Scope::Other
            }
            Some(Scope::Contacts) if !contacts_done => {
                let contact = parse_contact(&attributes(&elem)?);
                if let Some(list) = contacts.as_mut() {
                    list.push(contact);
                }
                Scope::Contact
            }
            Some(Scope::Contact) if name == BIRTHDAY => {
                let current = contacts.as_mut().and_then(|list| list.last_mut());
                if let Some(contact) = current.filter(|c| c.birthday.is_none()) {
                    contact.birthday = Some(parse_birthday(&attributes(&elem)?)?);
                }
                Scope::Other
            }
            _ => Scope::Other,
        };

        if !is_empty {
            stack.push(scope);
        }
    }

    if !seen_root {
        return Err(CodecError::MissingElement(ROOT));
    }
    let mut contacts = contacts.ok_or(CodecError::MissingElement(CONTACTS))?;
    let settings = settings.ok_or(CodecError::MissingElement(SETTINGS))?;

    if settings.sort_by != SortBy::None {
        sort_contacts(&mut contacts, settings.sort_by);
    }

    tracing::debug!("Parsed {} contacts", contacts.len());
    Ok(UserData {
        contacts,
        settings,
        license_agreed,
    })
}

/// Parse a user-data document held in a string.
pub fn from_xml_str(xml: &str) -> CodecResult<UserData> {
    read_document(xml.as_bytes())
}

fn attributes(elem: &BytesStart<'_>) -> CodecResult<HashMap<String, String>> {
    let mut map = HashMap::new();
    for attr in elem.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(quick_xml::Error::from)?;
        map.insert(key, value.into_owned());
    }
    Ok(map)
}

fn parse_contact(attrs: &HashMap<String, String>) -> Contact {
    let optional = |key: &str| attrs.get(key).and_then(|v| non_blank(v));

    Contact {
        first_name: attrs.get("first-name").cloned().unwrap_or_default(),
        last_name: attrs.get("last-name").cloned().unwrap_or_default(),
        birthday: None,
        job: optional("job"),
        handy_number: optional("handy-number"),
        number: optional("number"),
        number_work: optional(NUMBER_WORK).or_else(|| optional(LEGACY_NUMBER_WORK)),
        email: optional("email"),
        group: optional("group"),
    }
}

fn parse_birthday(attrs: &HashMap<String, String>) -> CodecResult<Birthday> {
    let day = required_number(attrs, "day")?;
    let month = required_number(attrs, "month")?;
    let year = required_number(attrs, "year")?;
    let hour = optional_number(attrs, "hour")?;
    let minute = optional_number(attrs, "minute")?;

    match (hour, minute) {
        (Some(hour), Some(minute)) => Ok(Birthday::with_time(day, month, year, hour, minute)),
        (None, None) => Ok(Birthday::new(day, month, year)),
        _ => {
            tracing::warn!(
                "Birthday {}.{}.{} has only one of hour/minute, dropping the time",
                day,
                month,
                year
            );
            Ok(Birthday::new(day, month, year))
        }
    }
}

fn required_number<T: std::str::FromStr>(
    attrs: &HashMap<String, String>,
    key: &str,
) -> CodecResult<T> {
    let value = attrs.get(key).map(String::as_str).unwrap_or_default();
    value.parse().map_err(|_| CodecError::InvalidNumber {
        attribute: key.to_string(),
        value: value.to_string(),
    })
}

fn optional_number<T: std::str::FromStr>(
    attrs: &HashMap<String, String>,
    key: &str,
) -> CodecResult<Option<T>> {
    match attrs.get(key).and_then(|v| non_blank(v)) {
        Some(_) => required_number(attrs, key).map(Some),
        None => Ok(None),
    }
}

fn parse_settings(attrs: &HashMap<String, String>) -> UserSettings {
    let text = |key: &str| attrs.get(key).cloned().unwrap_or_default();

    let theme = attrs.get("theme").and_then(|v| Theme::from_key(v.trim()));
    if theme.is_none() {
        tracing::debug!("Theme missing or unknown, using default");
    }
    let sort_by = attrs.get("sort-by").and_then(|v| SortBy::from_key(v.trim()));
    if sort_by.is_none() {
        tracing::debug!("Sort mode missing or unknown, using default");
    }

    UserSettings {
        theme: theme.unwrap_or_default(),
        title_template: text("title-string"),
        detail_template: text("detail-string"),
        detail_enabled: text("detail-string-enabled").eq_ignore_ascii_case("true"),
        sort_by: sort_by.unwrap_or_default(),
    }
}
