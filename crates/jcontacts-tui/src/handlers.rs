//! Keyboard event handling.

use crate::app::{App, AppState, Focus, InputMode, PromptKind};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle a key event. Returns true if the app should quit.
pub fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    // Ctrl+C quits from anywhere
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.state = AppState::Quit;
        return true;
    }

    if app.state == AppState::LicenseGate {
        return handle_license_key(app, key);
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_key(app, key),
        InputMode::Search => handle_search_key(app, key),
        InputMode::Edit => handle_edit_key(app, key),
        InputMode::Prompt(_) => handle_prompt_key(app, key),
        InputMode::ConfirmDelete => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_delete(),
                _ => app.input_mode = InputMode::Normal,
            }
            false
        }
        InputMode::Groups => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('g')) {
                app.input_mode = InputMode::Normal;
            }
            false
        }
        InputMode::ImportSelect => handle_import_key(app, key),
    }
}

fn handle_import_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => app.cancel_import(),
        KeyCode::Enter => app.confirm_import(),
        _ => {
            let Some(pending) = app.import.as_mut() else {
                return false;
            };
            match key.code {
                KeyCode::Char('j') | KeyCode::Down => pending.move_down(),
                KeyCode::Char('k') | KeyCode::Up => pending.move_up(),
                KeyCode::Char(' ') => pending.toggle(),
                KeyCode::Char('a') => pending.toggle_all(),
                _ => {}
            }
        }
    }
    false
}

fn handle_license_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('a') | KeyCode::Enter => {
            app.accept_license();
            false
        }
        KeyCode::Char('q') | KeyCode::Esc => {
            app.state = AppState::Quit;
            true
        }
        _ => false,
    }
}

fn handle_normal_key(app: &mut App, key: KeyEvent) -> bool {
    // Ctrl+P to search
    if key.code == KeyCode::Char('p') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.start_search();
        return false;
    }

    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::Quit;
            return true;
        }
        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Tab => {
            app.focus = match app.focus {
                Focus::List => Focus::Detail,
                Focus::Detail => Focus::List,
            };
        }
        KeyCode::Esc => {
            if app.focus == Focus::Detail {
                app.focus = Focus::List;
            } else if !app.search_query.is_empty() {
                app.exit_search();
            }
        }
        KeyCode::Char('/') => app.start_search(),
        KeyCode::Char('n') => app.new_contact(),
        KeyCode::Enter | KeyCode::Char('e') => app.edit_selected(),
        KeyCode::Char('d') | KeyCode::Delete => app.request_delete(),
        KeyCode::Char('r') => app.refresh(),
        KeyCode::Char('g') => app.show_groups(),
        KeyCode::Char('t') => app.cycle_theme(),
        KeyCode::Char('s') => app.cycle_sort(),
        KeyCode::Char('D') => app.toggle_detail(),
        KeyCode::Char('T') => app.start_prompt(PromptKind::TitleTemplate),
        KeyCode::Char('B') => app.start_prompt(PromptKind::DetailTemplate),
        KeyCode::Char('x') => app.start_prompt(PromptKind::Export),
        KeyCode::Char('i') => app.start_prompt(PromptKind::Import {
            replace_settings: false,
        }),
        KeyCode::Char('I') => app.start_prompt(PromptKind::Import {
            replace_settings: true,
        }),
        KeyCode::Char('p') => app.start_prompt(PromptKind::PrintColumns),
        KeyCode::Char('u') => app.check_for_updates(),
        KeyCode::Char('U') => app.download_update(),
        _ => {}
    }
    false
}

fn handle_search_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => app.exit_search(),
        KeyCode::Enter => app.finish_search(),
        KeyCode::Up => app.move_up(),
        KeyCode::Down => app.move_down(),
        KeyCode::Char(c) => {
            app.search_query.push(c);
            app.perform_search();
        }
        KeyCode::Backspace => {
            app.search_query.pop();
            app.perform_search();
        }
        _ => {}
    }
    false
}

fn handle_edit_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => app.cancel_edit(),
        KeyCode::Enter => app.save_form(),
        _ => {
            let groups = app.store.groups();
            let Some(form) = app.form.as_mut() else {
                return false;
            };
            match key.code {
                KeyCode::Tab | KeyCode::Down => form.next_field(),
                KeyCode::BackTab | KeyCode::Up => form.prev_field(),
                KeyCode::Right => form.accept_suggestion(&groups),
                KeyCode::Backspace => form.pop(),
                KeyCode::Char(c) => form.push(c),
                _ => {}
            }
        }
    }
    false
}

fn handle_prompt_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => app.cancel_prompt(),
        KeyCode::Enter => app.submit_prompt(),
        KeyCode::Backspace => {
            app.prompt_input.pop();
        }
        KeyCode::Char(c) => app.prompt_input.push(c),
        _ => {}
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use jcontacts_core::{Contact, ContactStore, UserData};
    use tempfile::TempDir;

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn app(dir: &TempDir) -> App {
        let mut store = ContactStore::new(dir.path().join("data.xml"));
        store.refresh().unwrap();
        App::new(store)
    }

    #[test]
    fn license_gate_only_accepts_agree_or_quit() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.state, AppState::LicenseGate);

        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.state, AppState::Browsing);
    }

    #[test]
    fn typing_in_the_form_and_saving() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        app.accept_license();

        press(&mut app, KeyCode::Char('n'));
        for c in "Eve".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app
            .store
            .data()
            .contacts
            .iter()
            .any(|c| c.first_name == "Eve"));
    }

    #[test]
    fn delete_needs_confirmation() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        app.accept_license();

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.store.data().contacts.len(), 1);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert!(app.store.data().contacts.is_empty());
    }

    #[test]
    fn import_merges_only_chosen_contacts() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        app.accept_license();

        let mut other = UserData::default();
        for (first, last) in [("Ann", "Lee"), ("Bob", "Zin"), ("Cid", "Moe")] {
            other.contacts.push(Contact::new(first, last));
        }
        let source = dir.path().join("other.xml");
        ContactStore::write_data(&other, &source).unwrap();

        press(&mut app, KeyCode::Char('i'));
        for c in source.display().to_string().chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::ImportSelect);
        assert_eq!(app.import.as_ref().unwrap().chosen, vec![true; 3]);

        // deselect the second contact
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.import.is_none());
        let names: Vec<String> = app.store.data().contacts.iter().map(Contact::full_name).collect();
        assert_eq!(names.len(), 3);
        assert!(names.contains(&"Ann Lee".to_string()));
        assert!(names.contains(&"Cid Moe".to_string()));
        assert!(!names.contains(&"Bob Zin".to_string()));
    }

    #[test]
    fn cancelled_import_changes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        app.accept_license();
        let source = dir.path().join("other.xml");
        ContactStore::write_data(&UserData::seed(), &source).unwrap();

        app.start_prompt(PromptKind::Import {
            replace_settings: false,
        });
        app.prompt_input = source.display().to_string();
        app.submit_prompt();
        press(&mut app, KeyCode::Esc);

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.store.data().contacts.len(), 1);
    }

    #[test]
    fn quit_keys() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        app.accept_license();
        assert!(press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.state, AppState::Quit);
    }
}
