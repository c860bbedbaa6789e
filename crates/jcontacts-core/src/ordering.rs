//! Contact ordering.
//!
//! The sort mode is always passed in by the caller.

use crate::models::{Contact, SortBy};
use std::cmp::Ordering;

/// Compare two contacts under the given sort mode.
///
/// In [`SortBy::Group`] mode a contact without a group compares equal to
/// every other contact, so the relation is not a total order.
pub fn compare(a: &Contact, b: &Contact, sort_by: SortBy) -> Ordering {
    match sort_by {
        SortBy::FirstName => cmp_ignore_case(&a.first_name, &b.first_name),
        SortBy::LastName => cmp_ignore_case(&a.last_name, &b.last_name),
        SortBy::Group => match (a.group.as_deref(), b.group.as_deref()) {
            (Some(a), Some(b)) => a.cmp(b),
            _ => Ordering::Equal,
        },
        SortBy::None => Ordering::Equal,
    }
}

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// Stable in-place sort of `contacts` by `sort_by`.
pub fn sort_contacts(contacts: &mut [Contact], sort_by: SortBy) {
    match sort_by {
        SortBy::None => {}
        SortBy::FirstName | SortBy::LastName => {
            contacts.sort_by(|a, b| compare(a, b, sort_by));
        }
        // `slice::sort_by` may panic on a comparator that is not a total
        // order, so group mode uses a plain insertion sort.
        SortBy::Group => insertion_sort(contacts, |a, b| compare(a, b, sort_by)),
    }
}

fn insertion_sort<T, F>(items: &mut [T], mut cmp: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && cmp(&items[j - 1], &items[j]) == Ordering::Greater {
            items.swap(j - 1, j);
            j -= 1;
        }
    }
}

const ALPHABET: [char; 26] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S',
    'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

fn alphabet_index(c: char) -> i32 {
    ALPHABET
        .iter()
        .position(|&a| a == c)
        .map_or(-1, |i| i as i32)
}

/// Letter-index comparison over `A..=Z`.
///
/// Known defects, kept as-is: the last shared position is never inspected,
/// and any character outside `A..=Z` (lowercase, digits, accents) gets index
/// `-1`, so results for such input do not follow any sensible order.
/// Positive means `s1` sorts after `s2`.
pub fn alphabetical_cmp(s1: &str, s2: &str) -> i32 {
    let c1: Vec<char> = s1.chars().collect();
    let c2: Vec<char> = s2.chars().collect();
    let shared = c1.len().min(c2.len()).saturating_sub(1);

    for i in 0..shared {
        if c1[i] != c2[i] {
            return alphabet_index(c1[i]) - alphabet_index(c2[i]);
        }
    }
    c1.len() as i32 - c2.len() as i32
}

/// Comparator built from a key extractor and [`alphabetical_cmp`].
pub struct AlphabeticalComparator<F> {
    key: F,
}

impl<F> AlphabeticalComparator<F> {
    pub fn new(key: F) -> Self {
        Self { key }
    }

    pub fn compare<T>(&self, a: &T, b: &T) -> Ordering
    where
        F: Fn(&T) -> String,
    {
        alphabetical_cmp(&(self.key)(a), &(self.key)(b)).cmp(&0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(contacts: &[Contact]) -> Vec<&str> {
        contacts.iter().map(|c| c.first_name.as_str()).collect()
    }

    fn grouped(name: &str, group: Option<&str>) -> Contact {
        Contact {
            group: group.map(str::to_string),
            ..Contact::new(name, "")
        }
    }

    #[test]
    fn first_name_ignores_case() {
        let mut contacts = vec![
            Contact::new("bob", ""),
            Contact::new("Ann", ""),
            Contact::new("carl", ""),
        ];
        sort_contacts(&mut contacts, SortBy::FirstName);
        assert_eq!(names(&contacts), vec!["Ann", "bob", "carl"]);
    }

    #[test]
    fn last_name_sort_is_stable() {
        let mut contacts = vec![
            Contact::new("first", "smith"),
            Contact::new("second", "Adams"),
            Contact::new("third", "Smith"),
        ];
        sort_contacts(&mut contacts, SortBy::LastName);
        assert_eq!(names(&contacts), vec!["second", "first", "third"]);
    }

    #[test]
    fn none_keeps_insertion_order() {
        let mut contacts = vec![Contact::new("z", "z"), Contact::new("a", "a")];
        sort_contacts(&mut contacts, SortBy::None);
        assert_eq!(names(&contacts), vec!["z", "a"]);
    }

    #[test]
    fn group_sort_orders_present_groups() {
        let mut contacts = vec![
            grouped("w", Some("Work")),
            grouped("f", Some("Family")),
            grouped("c", Some("Club")),
        ];
        sort_contacts(&mut contacts, SortBy::Group);
        assert_eq!(names(&contacts), vec!["c", "f", "w"]);
    }

    #[test]
    fn absent_group_blocks_movement() {
        let mut contacts = vec![
            grouped("w", Some("Work")),
            grouped("n", None),
            grouped("f", Some("Family")),
        ];
        sort_contacts(&mut contacts, SortBy::Group);
        // "f" cannot pass "n", and "w" never compares against "f".
        assert_eq!(names(&contacts), vec!["w", "n", "f"]);
    }

    #[test]
    fn absent_group_compares_equal() {
        let a = grouped("a", None);
        let b = grouped("b", Some("Work"));
        assert_eq!(compare(&a, &b, SortBy::Group), Ordering::Equal);
        assert_eq!(compare(&b, &a, SortBy::Group), Ordering::Equal);
        assert_eq!(compare(&a, &a, SortBy::Group), Ordering::Equal);
    }

    #[test]
    fn alphabetical_compares_letters() {
        assert!(alphabetical_cmp("ABC", "BBC") < 0);
        assert!(alphabetical_cmp("CAT", "BAT") > 0);
        assert_eq!(alphabetical_cmp("AB", "ABCD"), -2);
    }

    #[test]
    fn alphabetical_skips_last_shared_position() {
        // Only index 0 is inspected for two-character strings.
        assert_eq!(alphabetical_cmp("AB", "AZ"), 0);
    }

    #[test]
    fn alphabetical_mishandles_non_letters() {
        // '1' is not in the alphabet and scores -1, below 'A' at 0.
        assert_eq!(alphabetical_cmp("1XX", "AXX"), -1);
        // lowercase letters are not found either
        assert_eq!(alphabetical_cmp("aXX", "bXX"), 0);
    }

    #[test]
    fn comparator_uses_key() {
        let cmp = AlphabeticalComparator::new(|c: &Contact| c.last_name.clone());
        let a = Contact::new("x", "ADAMS");
        let b = Contact::new("x", "BAKER");
        assert_eq!(cmp.compare(&a, &b), Ordering::Less);
    }
}
