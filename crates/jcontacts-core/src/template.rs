//! Placeholder substitution for the list title and detail lines.

use crate::models::{display_or_none, render_birthday, Contact, UserSettings};

pub const FIRST_NAME: &str = "$fn";
pub const LAST_NAME: &str = "$ln";
pub const BIRTHDAY: &str = "$b";
pub const JOB: &str = "$j";
pub const HANDY_NUMBER: &str = "$hn";
pub const NUMBER: &str = "$n";
pub const NUMBER_WORK: &str = "$nw";
pub const EMAIL: &str = "$e";
pub const GROUP: &str = "$g";

/// Longest tokens first so `$nw` wins over `$n`.
const TOKENS: [&str; 9] = [
    FIRST_NAME,
    LAST_NAME,
    HANDY_NUMBER,
    NUMBER_WORK,
    BIRTHDAY,
    JOB,
    NUMBER,
    EMAIL,
    GROUP,
];

fn value_for(token: &str, contact: &Contact) -> String {
    let text = |v: &Option<String>| display_or_none(v.as_deref()).to_string();
    match token {
        FIRST_NAME => contact.first_name.clone(),
        LAST_NAME => contact.last_name.clone(),
        BIRTHDAY => render_birthday(contact.birthday.as_ref()),
        JOB => text(&contact.job),
        HANDY_NUMBER => text(&contact.handy_number),
        NUMBER => text(&contact.number),
        NUMBER_WORK => text(&contact.number_work),
        EMAIL => text(&contact.email),
        GROUP => text(&contact.group),
        _ => token.to_string(),
    }
}

/// Substitute every placeholder in `template` with the contact's values.
///
/// Substituted values are not scanned again, and unknown `$` sequences
/// are kept as written.
pub fn render(template: &str, contact: &Contact) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match TOKENS.iter().find(|t| rest.starts_with(**t)) {
            Some(token) => {
                out.push_str(&value_for(token, contact));
                rest = &rest[token.len()..];
            }
            None => {
                out.push('$');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

impl UserSettings {
    /// First line of a list cell.
    pub fn title_for(&self, contact: &Contact) -> String {
        render(&self.title_template, contact)
    }

    /// Second line of a list cell, if enabled.
    pub fn detail_for(&self, contact: &Contact) -> Option<String> {
        self.detail_enabled
            .then(|| render(&self.detail_template, contact))
    }
}
