//! Text layout of contact tables for printing.
//!
//! Pages are measured in character cells. Each page repeats the header line
//! and the column headings, and rows never straddle a page break.

use crate::error::PrintError;
use crate::models::{render_birthday, Contact};

/// A column that can be printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Name,
    FirstName,
    LastName,
    Birthday,
    Job,
    HandyNumber,
    Number,
    NumberWork,
    Email,
    Group,
}

impl Column {
    pub const ALL: [Column; 10] = [
        Column::Name,
        Column::FirstName,
        Column::LastName,
        Column::Birthday,
        Column::Job,
        Column::HandyNumber,
        Column::Number,
        Column::NumberWork,
        Column::Email,
        Column::Group,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Column::Name => "Name",
            Column::FirstName => "First name",
            Column::LastName => "Last name",
            Column::Birthday => "Birthday",
            Column::Job => "Job",
            Column::HandyNumber => "Handy number",
            Column::Number => "Number",
            Column::NumberWork => "Number work",
            Column::Email => "Email",
            Column::Group => "Group",
        }
    }

    /// Look up a column by its display name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.display_name().eq_ignore_ascii_case(name))
    }

    /// Cell text for `contact`, `None` for an empty cell.
    pub fn value(&self, contact: &Contact) -> Option<String> {
        match self {
            Column::Name => Some(format!("{} {}", contact.first_name, contact.last_name)),
            Column::FirstName => Some(contact.first_name.clone()),
            Column::LastName => Some(contact.last_name.clone()),
            Column::Birthday => contact
                .birthday
                .as_ref()
                .map(|b| render_birthday(Some(b))),
            Column::Job => contact.job.clone(),
            Column::HandyNumber => contact.handy_number.clone(),
            Column::Number => contact.number.clone(),
            Column::NumberWork => contact.number_work.clone(),
            Column::Email => contact.email.clone(),
            Column::Group => contact.group.clone(),
        }
    }
}

/// Printable area in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    pub width: usize,
    pub height: usize,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            width: 80,
            height: 60,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub lines: Vec<String>,
}

impl Page {
    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

/// Lay out `contacts` as a table over as many pages as needed.
pub fn paginate(
    contacts: &[Contact],
    columns: &[Column],
    layout: PageLayout,
    header: &str,
) -> Result<Vec<Page>, PrintError> {
    if columns.is_empty() {
        return Err(PrintError::NoColumns);
    }

    let count = columns.len();
    let cell_width = layout.width.saturating_sub(count + 1) / count;
    let headings: Vec<Vec<String>> = columns
        .iter()
        .map(|c| wrap(c.display_name(), cell_width.max(1)))
        .collect();
    let heading_height = headings.iter().map(Vec::len).max().unwrap_or(1);
    // header line, top rule, headings, rule under the headings
    let overhead = heading_height + 3;

    // A page must fit at least one single-line row and its rule.
    if cell_width == 0 || overhead + 2 > layout.height {
        return Err(PrintError::PageTooSmall {
            width: layout.width,
            height: layout.height,
            columns: count,
        });
    }

    let rule = table_rule(count, cell_width);
    let title: String = header.chars().take(layout.width).collect();
    let new_page = || {
        let mut lines = vec![format!("{:^w$}", title, w = layout.width), rule.clone()];
        lines.extend((0..heading_height).map(|i| table_row(&headings, i, cell_width)));
        lines.push(rule.clone());
        Page { lines }
    };

    let mut pages = Vec::new();
    let mut page = new_page();

    for contact in contacts {
        let cells: Vec<Vec<String>> = columns
            .iter()
            .map(|c| wrap(&c.value(contact).unwrap_or_default(), cell_width))
            .collect();
        let mut height = cells.iter().map(Vec::len).max().unwrap_or(1);

        if page.lines.len() + height + 1 > layout.height && page.lines.len() > overhead {
            pages.push(std::mem::replace(&mut page, new_page()));
        }

        let room = layout.height - page.lines.len() - 1;
        if height > room {
            tracing::warn!(
                "Row for {} is too tall for one page, truncating",
                contact.full_name()
            );
            height = room;
        }

        page.lines
            .extend((0..height).map(|i| table_row(&cells, i, cell_width)));
        page.lines.push(rule.clone());
    }

    pages.push(page);
    Ok(pages)
}

fn table_rule(count: usize, cell_width: usize) -> String {
    let mut rule = String::from("+");
    for _ in 0..count {
        rule.push_str(&"-".repeat(cell_width));
        rule.push('+');
    }
    rule
}

fn table_row(cells: &[Vec<String>], line: usize, cell_width: usize) -> String {
    let mut row = String::from("|");
    for cell in cells {
        let text = cell.get(line).map(String::as_str).unwrap_or("");
        row.push_str(&format!("{:^w$}", text, w = cell_width));
        row.push('|');
    }
    row
}

/// Word-wrap `text` to `width` characters, breaking words that don't fit.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();
        while chars.len() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            lines.push(chars.drain(..width).collect());
        }
        if chars.is_empty() {
            continue;
        }

        let current_len = current.chars().count();
        if current_len == 0 {
            current = chars.into_iter().collect();
        } else if current_len + 1 + chars.len() <= width {
            current.push(' ');
            current.extend(chars);
        } else {
            lines.push(std::mem::replace(&mut current, chars.into_iter().collect()));
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contacts(n: usize) -> Vec<Contact> {
        (0..n)
            .map(|i| Contact {
                email: Some(format!("p{}@x.com", i)),
                ..Contact::new(format!("P{}", i), "Doe")
            })
            .collect()
    }

    #[test]
    fn no_columns_is_an_error() {
        let result = paginate(&contacts(1), &[], PageLayout::default(), "h");
        assert_eq!(result, Err(PrintError::NoColumns));
    }

    #[test]
    fn tiny_page_is_rejected() {
        let layout = PageLayout {
            width: 30,
            height: 5,
        };
        let result = paginate(&contacts(1), &[Column::Name], layout, "h");
        assert!(matches!(result, Err(PrintError::PageTooSmall { .. })));
    }

    #[test]
    fn rows_flow_onto_new_pages() {
        let layout = PageLayout {
            width: 30,
            height: 8,
        };
        let pages = paginate(&contacts(5), &[Column::Name, Column::Email], layout, "Header").unwrap();

        assert_eq!(pages.len(), 3);
        for page in &pages {
            assert!(page.lines.len() <= layout.height);
            assert_eq!(page.lines[0].trim(), "Header");
            assert!(page.lines[2].contains("Name"));
            assert!(page.lines.iter().all(|l| l.chars().count() <= layout.width));
        }
        assert!(pages[2].render().contains("P4 Doe"));
    }

    #[test]
    fn empty_values_are_blank_cells() {
        let pages = paginate(
            &[Contact::new("Ann", "Lee")],
            &[Column::FirstName, Column::Job],
            PageLayout::default(),
            "",
        )
        .unwrap();
        let row = &pages[0].lines[4];
        assert!(row.contains("Ann"));
        assert!(!row.contains("none"));
    }

    #[test]
    fn tall_rows_are_truncated() {
        let layout = PageLayout {
            width: 12,
            height: 7,
        };
        let long = Contact {
            job: Some("aaaa bbbb cccc dddd eeee".to_string()),
            ..Contact::new("X", "")
        };
        let pages = paginate(&[long], &[Column::Job], layout, "").unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].lines.len(), layout.height);
    }

    #[test]
    fn columns_by_name() {
        assert_eq!(Column::from_name(" email "), Some(Column::Email));
        assert_eq!(Column::from_name("number WORK"), Some(Column::NumberWork));
        assert_eq!(Column::from_name("phone"), None);
    }

    #[test]
    fn wrap_breaks_words_and_long_tokens() {
        assert_eq!(wrap("hello big world", 9), vec!["hello big", "world"]);
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap("", 4), vec![String::new()]);
    }
}
