//! Editable form for creating and changing a contact.

use jcontacts_core::models::non_blank;
use jcontacts_core::{jobs, Birthday, Contact, ParseBirthdayError};

pub const LABELS: [&str; 9] = [
    "First name",
    "Last name",
    "Birthday",
    "Job",
    "Handy number",
    "Number",
    "Number work",
    "Email",
    "Group",
];

const BIRTHDAY: usize = 2;
const JOB: usize = 3;
const GROUP: usize = 8;

/// Text state of the edit dialog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactForm {
    pub values: [String; 9],
    /// Field that receives typed characters.
    pub selected: usize,
    /// Store index of the contact being edited, `None` for a new one.
    pub editing: Option<usize>,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_contact(index: usize, contact: &Contact) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            values: [
                contact.first_name.clone(),
                contact.last_name.clone(),
                contact.birthday.map(|b| b.to_string()).unwrap_or_default(),
                text(&contact.job),
                text(&contact.handy_number),
                text(&contact.number),
                text(&contact.number_work),
                text(&contact.email),
                text(&contact.group),
            ],
            selected: 0,
            editing: Some(index),
        }
    }

    /// Build the contact, leaving blank optional fields absent.
    pub fn to_contact(&self) -> Result<Contact, ParseBirthdayError> {
        let birthday = match non_blank(&self.values[BIRTHDAY]) {
            Some(text) => Some(text.parse::<Birthday>()?),
            None => None,
        };
        let optional = |i: usize| non_blank(self.values[i].trim());

        Ok(Contact {
            first_name: self.values[0].trim().to_string(),
            last_name: self.values[1].trim().to_string(),
            birthday,
            job: optional(JOB),
            handy_number: optional(4),
            number: optional(5),
            number_work: optional(6),
            email: optional(7),
            group: optional(GROUP),
        })
    }

    pub fn next_field(&mut self) {
        self.selected = (self.selected + 1) % LABELS.len();
    }

    pub fn prev_field(&mut self) {
        self.selected = (self.selected + LABELS.len() - 1) % LABELS.len();
    }

    pub fn push(&mut self, c: char) {
        self.values[self.selected].push(c);
    }

    pub fn pop(&mut self) {
        self.values[self.selected].pop();
    }

    /// Completions for the selected field, from the job list or known groups.
    pub fn suggestions(&self, groups: &[String]) -> Vec<String> {
        let current = self.values[self.selected].trim();
        match self.selected {
            JOB => jobs::suggest(current).take(5).map(str::to_string).collect(),
            GROUP if !current.is_empty() => groups
                .iter()
                .filter(|g| g.to_lowercase().starts_with(&current.to_lowercase()))
                .take(5)
                .cloned()
                .collect(),
            GROUP => groups.iter().take(5).cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// Replace the selected field with its first suggestion.
    pub fn accept_suggestion(&mut self, groups: &[String]) {
        if let Some(first) = self.suggestions(groups).into_iter().next() {
            self.values[self.selected] = first;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_contact() {
        let contact = Contact {
            birthday: Some(Birthday::with_time(1, 2, 1990, 8, 30)),
            job: Some("Pilot".to_string()),
            group: Some("Work".to_string()),
            ..Contact::new("Ann", "Lee")
        };
        let form = ContactForm::from_contact(3, &contact);
        assert_eq!(form.editing, Some(3));
        assert_eq!(form.to_contact().unwrap(), contact);
    }

    #[test]
    fn blank_fields_become_absent() {
        let mut form = ContactForm::new();
        form.values[0] = "Bob".to_string();
        form.values[JOB] = "   ".to_string();
        let contact = form.to_contact().unwrap();
        assert_eq!(contact.job, None);
        assert_eq!(contact.birthday, None);
    }

    #[test]
    fn bad_birthday_is_rejected() {
        let mut form = ContactForm::new();
        form.values[BIRTHDAY] = "yesterday".to_string();
        assert!(form.to_contact().is_err());
    }

    #[test]
    fn typing_goes_to_selected_field() {
        let mut form = ContactForm::new();
        form.prev_field();
        assert_eq!(form.selected, GROUP);
        form.push('W');
        form.push('x');
        form.pop();
        form.next_field();
        assert_eq!(form.selected, 0);
        assert_eq!(form.values[GROUP], "W");
    }

    #[test]
    fn job_and_group_suggestions() {
        let groups = vec!["Work".to_string(), "Family".to_string()];
        let mut form = ContactForm::new();

        form.selected = JOB;
        form.values[JOB] = "pil".to_string();
        form.accept_suggestion(&groups);
        assert_eq!(form.values[JOB], "Pilot");

        form.selected = GROUP;
        form.values[GROUP] = "fa".to_string();
        assert_eq!(form.suggestions(&groups), vec!["Family".to_string()]);

        form.selected = 0;
        assert!(form.suggestions(&groups).is_empty());
    }
}
