//! Shared data types for the application.

use crate::error::ParseBirthdayError;
use std::fmt;
use std::str::FromStr;

/// Display form of an absent value.
pub const NONE_TEXT: &str = "none";

/// Represents one person's entry in the contact list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contact {
    pub first_name: String,
    pub last_name: String,
    pub birthday: Option<Birthday>,
    pub job: Option<String>,
    /// Mobile number.
    pub handy_number: Option<String>,
    /// Home or primary number.
    pub number: Option<String>,
    pub number_work: Option<String>,
    pub email: Option<String>,
    pub group: Option<String>,
}

impl Contact {
    /// Create a contact with only a name set.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            ..Self::default()
        }
    }

    /// Full display name, `first last`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Return a copy where every blank optional text field is absent.
    pub fn normalized(mut self) -> Self {
        for field in [
            &mut self.job,
            &mut self.handy_number,
            &mut self.number,
            &mut self.number_work,
            &mut self.email,
            &mut self.group,
        ] {
            *field = field.as_deref().and_then(non_blank);
        }
        self
    }
}

/// A birthday, optionally with a time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Birthday {
    pub day: u32,
    pub month: u32,
    pub year: i32,
    /// Hour and minute are only ever set together.
    pub time: Option<TimeOfDay>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDay {
    pub hour: u32,
    pub minute: u32,
}

impl Birthday {
    pub fn new(day: u32, month: u32, year: i32) -> Self {
        Self {
            day,
            month,
            year,
            time: None,
        }
    }

    pub fn with_time(day: u32, month: u32, year: i32, hour: u32, minute: u32) -> Self {
        Self {
            day,
            month,
            year,
            time: Some(TimeOfDay { hour, minute }),
        }
    }

    pub fn hour(&self) -> Option<u32> {
        self.time.map(|t| t.hour)
    }

    pub fn minute(&self) -> Option<u32> {
        self.time.map(|t| t.minute)
    }
}

impl fmt::Display for Birthday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.day, self.month, self.year)?;
        if let Some(time) = self.time {
            write!(f, " {}:{}", time.hour, time.minute)?;
        }
        Ok(())
    }
}

impl FromStr for Birthday {
    type Err = ParseBirthdayError;

    /// Parse the rendered form back, `D.M.Y` with an optional ` H:M`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseBirthdayError(s.to_string());
        let mut parts = s.split_whitespace();
        let date = parts.next().ok_or_else(err)?;
        let time = parts.next();
        if parts.next().is_some() {
            return Err(err());
        }

        let date: Vec<&str> = date.split('.').collect();
        let [day, month, year] = date.as_slice() else {
            return Err(err());
        };
        let day = day.parse().map_err(|_| err())?;
        let month = month.parse().map_err(|_| err())?;
        let year = year.parse().map_err(|_| err())?;

        match time {
            None => Ok(Birthday::new(day, month, year)),
            Some(time) => {
                let (hour, minute) = time.split_once(':').ok_or_else(err)?;
                let hour = hour.parse().map_err(|_| err())?;
                let minute = minute.parse().map_err(|_| err())?;
                Ok(Birthday::with_time(day, month, year, hour, minute))
            }
        }
    }
}

/// Render an optional birthday, `none` when absent.
pub fn render_birthday(birthday: Option<&Birthday>) -> String {
    birthday.map_or_else(|| NONE_TEXT.to_string(), Birthday::to_string)
}

/// Coerce blank text to absence.
pub fn non_blank(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Display form of an optional text value.
pub fn display_or_none(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => NONE_TEXT,
    }
}

/// Look-and-feel selection. Applied by the presentation layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Theme {
    JContactsLight,
    JContactsDark,
    Light,
    #[default]
    Dark,
    IntelliJ,
    Darcula,
    MacLight,
    MacDark,
}

impl Theme {
    pub const ALL: [Theme; 8] = [
        Theme::JContactsLight,
        Theme::JContactsDark,
        Theme::Light,
        Theme::Dark,
        Theme::IntelliJ,
        Theme::Darcula,
        Theme::MacLight,
        Theme::MacDark,
    ];

    /// Identifier stored in the document.
    pub fn as_key(&self) -> &'static str {
        match self {
            Theme::JContactsLight => "JCONTACTS_LIGHT",
            Theme::JContactsDark => "JCONTACTS_DARK",
            Theme::Light => "LIGHT",
            Theme::Dark => "DARK",
            Theme::IntelliJ => "INTELLIJ",
            Theme::Darcula => "DARCULA",
            Theme::MacLight => "MAC_LIGHT",
            Theme::MacDark => "MAC_DARK",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_key() == key)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Theme::JContactsLight => "JContacts Light",
            Theme::JContactsDark => "JContacts Dark",
            Theme::Light => "Light",
            Theme::Dark => "Dark",
            Theme::IntelliJ => "IntelliJ",
            Theme::Darcula => "Darcula",
            Theme::MacLight => "Mac Light",
            Theme::MacDark => "Mac Dark",
        }
    }

    /// The theme after this one, wrapping around.
    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

/// Strategy for the display order of the contact list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortBy {
    None,
    FirstName,
    #[default]
    LastName,
    Group,
}

impl SortBy {
    pub const ALL: [SortBy; 4] = [
        SortBy::None,
        SortBy::FirstName,
        SortBy::LastName,
        SortBy::Group,
    ];

    pub fn as_key(&self) -> &'static str {
        match self {
            SortBy::None => "NONE",
            SortBy::FirstName => "FIRST_NAME",
            SortBy::LastName => "LAST_NAME",
            SortBy::Group => "GROUP",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_key() == key)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortBy::None => "None",
            SortBy::FirstName => "First name",
            SortBy::LastName => "Last name",
            SortBy::Group => "Group",
        }
    }

    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|s| s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

/// Presentation and sort configuration stored alongside the contacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSettings {
    pub theme: Theme,
    /// Template for the first line of a list cell.
    pub title_template: String,
    /// Template for the optional second line of a list cell.
    pub detail_template: String,
    pub detail_enabled: bool,
    pub sort_by: SortBy,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            title_template: "$fn $ln".to_string(),
            detail_template: "Phone: $n  Handy: $hn".to_string(),
            detail_enabled: true,
            sort_by: SortBy::default(),
        }
    }
}

/// The whole persisted document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserData {
    /// Insertion order is authoritative when sorting is off.
    pub contacts: Vec<Contact>,
    pub settings: UserSettings,
    pub license_agreed: bool,
}

impl UserData {
    /// Document written on first run.
    pub fn seed() -> Self {
        Self {
            contacts: vec![Contact {
                email: Some("janorico@posteo.de".to_string()),
                ..Contact::new("Janorico", "")
            }],
            settings: UserSettings::default(),
            license_agreed: false,
        }
    }

    /// Distinct group labels in first-seen order.
    pub fn groups(&self) -> Vec<String> {
        let mut groups: Vec<String> = Vec::new();
        for group in self.contacts.iter().filter_map(|c| c.group.as_deref()) {
            if !groups.iter().any(|g| g == group) {
                groups.push(group.to_string());
            }
        }
        groups
    }
}
