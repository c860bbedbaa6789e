//! Application state management.

use crate::form::ContactForm;
use crate::theme::{self, Palette};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use jcontacts_core::print::{self, Column, PageLayout};
use jcontacts_core::updates::{self, UpdateChecker, UpdateInfo, UpdateStatus};
use jcontacts_core::{Contact, ContactStore, UserData};
use ratatui::widgets::ListState;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};

/// Application state.
#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    /// The license has not been agreed to yet.
    LicenseGate,
    /// Normal use.
    Browsing,
    /// Application should quit.
    Quit,
}

/// Input mode for the application.
#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    Search,
    /// Contact edit dialog is open.
    Edit,
    /// Single-line text prompt.
    Prompt(PromptKind),
    ConfirmDelete,
    /// Group list popup.
    Groups,
    /// Choosing which contacts of an imported document to merge.
    ImportSelect,
}

/// What a text prompt is asking for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PromptKind {
    Import { replace_settings: bool },
    Export,
    PrintColumns,
    PrintPath,
    TitleTemplate,
    DetailTemplate,
}

impl PromptKind {
    pub fn title(&self) -> &'static str {
        match self {
            PromptKind::Import { replace_settings: false } => "Import from",
            PromptKind::Import { replace_settings: true } => "Import (replace settings) from",
            PromptKind::Export => "Export to",
            PromptKind::PrintColumns => "Columns (comma separated)",
            PromptKind::PrintPath => "Print to file",
            PromptKind::TitleTemplate => "Title template",
            PromptKind::DetailTemplate => "Detail template",
        }
    }
}

/// Focus area within the browsing view.
#[derive(Debug, Clone, PartialEq)]
pub enum Focus {
    List,
    Detail,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

/// Results sent back from worker threads.
#[derive(Debug)]
pub enum Background {
    Status(StatusMessage),
    UpdateAvailable(UpdateInfo),
    Progress { done: u64, total: Option<u64> },
    ProgressDone,
}

/// A loaded import file waiting for the user's selection.
#[derive(Debug, Clone)]
pub struct PendingImport {
    pub data: UserData,
    /// One flag per imported contact, all set initially.
    pub chosen: Vec<bool>,
    pub cursor: usize,
    pub replace_settings: bool,
}

impl PendingImport {
    pub fn new(data: UserData, replace_settings: bool) -> Self {
        Self {
            chosen: vec![true; data.contacts.len()],
            data,
            cursor: 0,
            replace_settings,
        }
    }

    pub fn toggle(&mut self) {
        if let Some(flag) = self.chosen.get_mut(self.cursor) {
            *flag = !*flag;
        }
    }

    /// Select everything, or nothing if everything is already selected.
    pub fn toggle_all(&mut self) {
        let all = self.chosen.iter().all(|&c| c);
        self.chosen.iter_mut().for_each(|c| *c = !all);
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.chosen.len() {
            self.cursor += 1;
        }
    }

    /// Indices of the contacts to merge.
    pub fn selection(&self) -> Vec<usize> {
        self.chosen
            .iter()
            .enumerate()
            .filter_map(|(i, &c)| c.then_some(i))
            .collect()
    }
}

const DEFAULT_PRINT_COLUMNS: &str = "Name, Birthday, Handy number, Number, Email";

/// Main application model.
pub struct App {
    pub state: AppState,
    pub input_mode: InputMode,
    pub focus: Focus,
    pub store: ContactStore,
    pub palette: Palette,

    // List state
    /// Store indices of the contacts shown, in display order.
    pub visible: Vec<usize>,
    /// Index into `visible`.
    pub selected: usize,
    pub search_query: String,
    /// Scroll position of the contact list.
    pub list_state: ListState,

    // Dialog state
    pub form: Option<ContactForm>,
    pub prompt_input: String,
    pub print_columns: Vec<Column>,
    pub import: Option<PendingImport>,

    // Status bar
    pub status: Option<StatusMessage>,
    pub pending_update: Option<UpdateInfo>,
    pub progress: Option<(u64, Option<u64>)>,

    tx: Sender<Background>,
    rx: Receiver<Background>,
}

impl App {
    /// Create the application around an already loaded store.
    pub fn new(store: ContactStore) -> Self {
        let (tx, rx) = mpsc::channel();
        let state = if store.data().license_agreed {
            AppState::Browsing
        } else {
            AppState::LicenseGate
        };

        let mut app = Self {
            state,
            input_mode: InputMode::Normal,
            focus: Focus::List,
            palette: theme::palette(store.data().settings.theme),
            store,
            visible: Vec::new(),
            selected: 0,
            search_query: String::new(),
            list_state: ListState::default(),
            form: None,
            prompt_input: String::new(),
            print_columns: Vec::new(),
            import: None,
            status: None,
            pending_update: None,
            progress: None,
            tx,
            rx,
        };
        app.rebuild_list();
        app
    }

    /// Apply the stored theme to the renderer.
    pub fn apply_theme(&mut self) {
        self.palette = theme::palette(self.store.data().settings.theme);
    }

    pub fn show_message(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: false,
        });
    }

    pub fn show_error(&mut self, text: impl Into<String>) {
        let text = text.into();
        tracing::error!("{}", text);
        self.status = Some(StatusMessage {
            text,
            is_error: true,
        });
    }

    /// Recompute the visible list from the store and the search query.
    pub fn rebuild_list(&mut self) {
        let contacts = &self.store.data().contacts;
        let query = self.search_query.trim();

        if query.is_empty() {
            self.visible = (0..contacts.len()).collect();
        } else {
            let matcher = SkimMatcherV2::default();
            let mut scored: Vec<(i64, usize)> = contacts
                .iter()
                .enumerate()
                .filter_map(|(i, c)| matcher.fuzzy_match(&c.full_name(), query).map(|s| (s, i)))
                .collect();
            scored.sort_by(|a, b| b.0.cmp(&a.0));
            self.visible = scored.into_iter().map(|(_, i)| i).collect();
        }

        if self.selected >= self.visible.len() {
            self.selected = self.visible.len().saturating_sub(1);
        }
    }

    /// Store index of the selected contact.
    pub fn selected_index(&self) -> Option<usize> {
        self.visible.get(self.selected).copied()
    }

    pub fn selected_contact(&self) -> Option<&Contact> {
        self.selected_index()
            .and_then(|i| self.store.data().contacts.get(i))
    }

    pub fn move_up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.visible.len() {
            self.selected += 1;
        }
    }

    /// Move the selection onto `contact` if it is visible.
    pub fn select_contact(&mut self, contact: &Contact) {
        let contacts = &self.store.data().contacts;
        if let Some(pos) = self
            .visible
            .iter()
            .position(|&i| contacts.get(i) == Some(contact))
        {
            self.selected = pos;
        }
    }

    /// Write the document, then reload it so ordering and theme are re-applied.
    ///
    /// The selected contact stays selected if it survived the reload.
    fn commit(&mut self, done: &str) -> bool {
        let previous = self.selected_contact().cloned();
        match self.store.write().and_then(|_| self.store.refresh()) {
            Ok(()) => {
                self.apply_theme();
                self.rebuild_list();
                if let Some(contact) = previous {
                    self.select_contact(&contact);
                }
                if !done.is_empty() {
                    self.show_message(done);
                }
                true
            }
            Err(e) => {
                self.show_error(format!("Can't save contacts: {:#}", e));
                false
            }
        }
    }

    /// Reload the document from disk, discarding unsaved changes.
    pub fn refresh(&mut self) {
        match self.store.refresh() {
            Ok(()) => {
                self.apply_theme();
                self.rebuild_list();
                self.show_message("Contacts reloaded");
            }
            Err(e) => self.show_error(format!("Can't load contacts: {:#}", e)),
        }
    }

    pub fn accept_license(&mut self) {
        self.store.accept_license();
        if self.commit("") {
            self.state = AppState::Browsing;
        }
    }

    // Search

    pub fn start_search(&mut self) {
        self.input_mode = InputMode::Search;
        self.search_query.clear();
        self.selected = 0;
    }

    pub fn exit_search(&mut self) {
        self.input_mode = InputMode::Normal;
        self.search_query.clear();
        self.rebuild_list();
    }

    /// Keep the filtered list and go back to normal navigation.
    pub fn finish_search(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn perform_search(&mut self) {
        self.selected = 0;
        self.rebuild_list();
    }

    // Editing

    pub fn new_contact(&mut self) {
        self.form = Some(ContactForm::new());
        self.input_mode = InputMode::Edit;
    }

    pub fn edit_selected(&mut self) {
        let Some(index) = self.selected_index() else {
            self.show_message("No contact selected!");
            return;
        };
        if let Some(contact) = self.store.data().contacts.get(index) {
            self.form = Some(ContactForm::from_contact(index, contact));
            self.input_mode = InputMode::Edit;
        }
    }

    pub fn cancel_edit(&mut self) {
        self.form = None;
        self.input_mode = InputMode::Normal;
    }

    pub fn save_form(&mut self) {
        let Some(form) = self.form.as_ref() else {
            return;
        };
        let editing = form.editing;
        let contact = match form.to_contact() {
            Ok(contact) => contact,
            Err(e) => {
                self.show_error(e.to_string());
                return;
            }
        };

        let name = contact.full_name();
        let saved = contact.clone().normalized();
        match editing {
            Some(index) => {
                if let Err(e) = self.store.replace_contact(index, contact) {
                    self.show_error(format!("{:#}", e));
                    return;
                }
            }
            None => self.store.add_contact(contact),
        }

        self.form = None;
        self.input_mode = InputMode::Normal;
        if self.commit(&format!("Saved {}", name)) {
            self.select_contact(&saved);
        }
    }

    pub fn request_delete(&mut self) {
        if self.selected_index().is_some() {
            self.input_mode = InputMode::ConfirmDelete;
        } else {
            self.show_message("No contact selected!");
        }
    }

    pub fn confirm_delete(&mut self) {
        self.input_mode = InputMode::Normal;
        let Some(index) = self.selected_index() else {
            return;
        };
        match self.store.remove_contact(index) {
            Ok(removed) => {
                self.commit(&format!("Deleted {}", removed.full_name()));
            }
            Err(e) => self.show_error(format!("{:#}", e)),
        }
    }

    // Settings

    pub fn cycle_theme(&mut self) {
        let mut settings = self.store.data().settings.clone();
        settings.theme = settings.theme.next();
        let name = settings.theme.display_name();
        self.store.set_settings(settings);
        self.commit(&format!("Theme: {}", name));
    }

    pub fn cycle_sort(&mut self) {
        let mut settings = self.store.data().settings.clone();
        settings.sort_by = settings.sort_by.next();
        let name = settings.sort_by.display_name();
        self.store.set_settings(settings);
        self.commit(&format!("Sort by: {}", name));
    }

    pub fn toggle_detail(&mut self) {
        let mut settings = self.store.data().settings.clone();
        settings.detail_enabled = !settings.detail_enabled;
        self.store.set_settings(settings);
        self.commit("");
    }

    pub fn show_groups(&mut self) {
        self.input_mode = InputMode::Groups;
    }

    // Prompts

    pub fn start_prompt(&mut self, kind: PromptKind) {
        let settings = &self.store.data().settings;
        self.prompt_input = match kind {
            PromptKind::TitleTemplate => settings.title_template.clone(),
            PromptKind::DetailTemplate => settings.detail_template.clone(),
            PromptKind::PrintColumns => DEFAULT_PRINT_COLUMNS.to_string(),
            _ => String::new(),
        };
        self.input_mode = InputMode::Prompt(kind);
    }

    pub fn cancel_prompt(&mut self) {
        self.prompt_input.clear();
        self.input_mode = InputMode::Normal;
    }

    pub fn submit_prompt(&mut self) {
        let InputMode::Prompt(kind) = self.input_mode.clone() else {
            return;
        };
        let input = std::mem::take(&mut self.prompt_input);
        let input = input.trim();
        self.input_mode = InputMode::Normal;

        match kind {
            PromptKind::Import { replace_settings } => self.import(input, replace_settings),
            PromptKind::Export => self.export(input),
            PromptKind::PrintColumns => match parse_columns(input) {
                Ok(columns) => {
                    self.print_columns = columns;
                    self.prompt_input.clear();
                    self.input_mode = InputMode::Prompt(PromptKind::PrintPath);
                }
                Err(e) => self.show_error(e),
            },
            PromptKind::PrintPath => self.print(input),
            PromptKind::TitleTemplate | PromptKind::DetailTemplate => {
                let mut settings = self.store.data().settings.clone();
                if kind == PromptKind::TitleTemplate {
                    settings.title_template = input.to_string();
                } else {
                    settings.detail_template = input.to_string();
                }
                self.store.set_settings(settings);
                self.commit("Templates updated");
            }
        }
    }

    fn import(&mut self, path: &str, replace_settings: bool) {
        if path.is_empty() {
            return;
        }
        match ContactStore::load(path) {
            Ok(imported) => {
                self.import = Some(PendingImport::new(imported, replace_settings));
                self.input_mode = InputMode::ImportSelect;
            }
            Err(e) => self.show_error(format!("Can't import: {:#}", e)),
        }
    }

    /// Merge the chosen contacts of the pending import.
    pub fn confirm_import(&mut self) {
        self.input_mode = InputMode::Normal;
        let Some(pending) = self.import.take() else {
            return;
        };
        let selection = pending.selection();
        let count = selection.len();
        self.store
            .import(pending.data, &selection, pending.replace_settings);
        self.commit(&format!("Imported {} contacts", count));
    }

    pub fn cancel_import(&mut self) {
        self.import = None;
        self.input_mode = InputMode::Normal;
    }

    fn export(&mut self, path: &str) {
        if path.is_empty() {
            return;
        }
        let path = with_xml_extension(path);
        match self.store.write_to(&path) {
            Ok(()) => self.show_message(format!("Exported to {}", path.display())),
            Err(e) => self.show_error(format!("Can't export: {:#}", e)),
        }
    }

    fn print(&mut self, path: &str) {
        if path.is_empty() {
            return;
        }
        let contacts: Vec<Contact> = self
            .visible
            .iter()
            .filter_map(|&i| self.store.data().contacts.get(i).cloned())
            .collect();
        let header = format!(
            "Printed with JContacts at {}",
            chrono::Local::now().format("%A, %-m/%-d/%Y")
        );

        let pages = match print::paginate(&contacts, &self.print_columns, PageLayout::default(), &header) {
            Ok(pages) => pages,
            Err(e) => {
                self.show_error(e.to_string());
                return;
            }
        };
        let text: Vec<String> = pages.iter().map(|p| p.render()).collect();
        match std::fs::write(path, text.join("\n\u{c}\n")) {
            Ok(()) => self.show_message(format!("Printed {} pages to {}", pages.len(), path)),
            Err(e) => self.show_error(format!("Can't print: {}", e)),
        }
    }

    // Updates

    /// Check for a newer version on a worker thread.
    pub fn check_for_updates(&mut self) {
        let tx = self.tx.clone();
        self.show_message("Receiving update info...");
        std::thread::spawn(move || {
            let msg = match UpdateChecker::default().check() {
                Ok(UpdateStatus::Available(info)) => Background::UpdateAvailable(info),
                Ok(UpdateStatus::UpToDate) => Background::Status(StatusMessage {
                    text: "You are running the newest version of JContacts.".to_string(),
                    is_error: false,
                }),
                Err(e) => Background::Status(StatusMessage {
                    text: format!("Can't check for updates: {}", e),
                    is_error: true,
                }),
            };
            // the receiver is gone only when the app has quit
            let _ = tx.send(msg);
        });
    }

    /// Download the installer of a pending update.
    pub fn download_update(&mut self) {
        let Some(info) = self.pending_update.clone() else {
            self.show_message("No update available");
            return;
        };
        let Some(url) = info.windows_installer.clone() else {
            self.show_error("Can't get newest version installer URL!");
            return;
        };
        let dest = match updates::installer_path(&info) {
            Ok(dest) => dest,
            Err(e) => {
                self.show_error(format!("Can't download update: {}", e));
                return;
            }
        };

        let tx = self.tx.clone();
        std::thread::spawn(move || {
            let progress_tx = tx.clone();
            let result = updates::download(&url, &dest, |done, total| {
                let _ = progress_tx.send(Background::Progress { done, total });
            });
            let _ = tx.send(Background::ProgressDone);
            let status = match result {
                Ok(_) => StatusMessage {
                    text: format!("Update downloaded! To install, exit and run {}", dest.display()),
                    is_error: false,
                },
                Err(e) => StatusMessage {
                    text: format!("Error while downloading: {}", e),
                    is_error: true,
                },
            };
            let _ = tx.send(Background::Status(status));
        });
    }

    /// Drain results from worker threads.
    pub fn poll_background(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                Background::Status(status) => self.status = Some(status),
                Background::UpdateAvailable(info) => {
                    self.show_message(format!(
                        "{} is available! Press U to download.",
                        info.display_name
                    ));
                    self.pending_update = Some(info);
                }
                Background::Progress { done, total } => self.progress = Some((done, total)),
                Background::ProgressDone => self.progress = None,
            }
        }
    }
}

/// Append `.xml` unless the path already ends with it.
pub fn with_xml_extension(path: &str) -> PathBuf {
    if path.ends_with(".xml") {
        PathBuf::from(path)
    } else {
        PathBuf::from(format!("{}.xml", path))
    }
}

/// Parse a comma separated list of column names.
pub fn parse_columns(input: &str) -> Result<Vec<Column>, String> {
    let mut columns = Vec::new();
    for name in input.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        match Column::from_name(name) {
            Some(column) => columns.push(column),
            None => return Err(format!("Unknown column: {}", name)),
        }
    }
    if columns.is_empty() {
        return Err("No columns selected!".to_string());
    }
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jcontacts_core::SortBy;
    use tempfile::TempDir;

    fn app(dir: &TempDir) -> App {
        let mut store = ContactStore::new(dir.path().join("data.xml"));
        store.refresh().unwrap();
        App::new(store)
    }

    #[test]
    fn starts_at_license_gate_until_agreed() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        assert_eq!(app.state, AppState::LicenseGate);

        app.accept_license();
        assert_eq!(app.state, AppState::Browsing);

        let reopened = self::app(&dir);
        assert_eq!(reopened.state, AppState::Browsing);
    }

    #[test]
    fn new_contact_is_saved_and_sorted() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);

        app.new_contact();
        let form = app.form.as_mut().unwrap();
        form.values[0] = "Ann".to_string();
        form.values[1] = "Able".to_string();
        app.save_form();

        assert_eq!(app.input_mode, InputMode::Normal);
        let loaded = ContactStore::load(app.store.path()).unwrap();
        // default sort is by last name, and "" sorts first
        let names: Vec<_> = loaded.contacts.iter().map(|c| c.first_name.as_str()).collect();
        assert_eq!(names, vec!["Janorico", "Ann"]);
    }

    #[test]
    fn invalid_birthday_keeps_the_dialog_open() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);

        app.new_contact();
        app.form.as_mut().unwrap().values[2] = "soon".to_string();
        app.save_form();

        assert_eq!(app.input_mode, InputMode::Edit);
        assert!(app.status.as_ref().unwrap().is_error);
        assert_eq!(app.store.data().contacts.len(), 1);
    }

    #[test]
    fn delete_removes_selected_contact() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);

        app.request_delete();
        assert_eq!(app.input_mode, InputMode::ConfirmDelete);
        app.confirm_delete();

        assert!(app.store.data().contacts.is_empty());
        assert_eq!(app.selected_index(), None);
    }

    #[test]
    fn search_filters_by_name() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        app.store.add_contact(Contact::new("Bob", "Zin"));
        app.rebuild_list();

        app.start_search();
        app.search_query = "bzin".to_string();
        app.perform_search();
        assert_eq!(app.visible.len(), 1);
        assert_eq!(app.selected_contact().unwrap().first_name, "Bob");

        app.exit_search();
        assert_eq!(app.visible.len(), 2);
    }

    #[test]
    fn cycling_sort_persists() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        app.cycle_sort();
        assert_eq!(app.store.data().settings.sort_by, SortBy::Group);

        let loaded = ContactStore::load(app.store.path()).unwrap();
        assert_eq!(loaded.settings.sort_by, SortBy::Group);
    }

    #[test]
    fn export_adds_extension() {
        assert_eq!(with_xml_extension("out"), PathBuf::from("out.xml"));
        assert_eq!(with_xml_extension("out.xml"), PathBuf::from("out.xml"));

        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        let target = dir.path().join("backup");
        app.start_prompt(PromptKind::Export);
        app.prompt_input = target.display().to_string();
        app.submit_prompt();

        assert!(dir.path().join("backup.xml").is_file());
    }

    #[test]
    fn print_writes_pages() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        let target = dir.path().join("print.txt");

        app.start_prompt(PromptKind::PrintColumns);
        app.submit_prompt();
        assert_eq!(app.input_mode, InputMode::Prompt(PromptKind::PrintPath));
        app.prompt_input = target.display().to_string();
        app.submit_prompt();

        let text = std::fs::read_to_string(target).unwrap();
        assert!(text.contains("Printed with JContacts"));
        assert!(text.contains("Janorico"));
    }

    #[test]
    fn renamed_contact_stays_selected_after_resort() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        app.store.add_contact(Contact::new("Ann", "Able"));
        app.store.add_contact(Contact::new("Bob", "Cole"));
        assert!(app.commit(""));

        app.selected = 1;
        assert_eq!(app.selected_contact().unwrap().first_name, "Ann");
        app.edit_selected();
        app.form.as_mut().unwrap().values[1] = "Zed".to_string();
        app.save_form();

        let selected = app.selected_contact().unwrap();
        assert_eq!(selected.full_name(), "Ann Zed");
        assert_eq!(app.selected, 2);
    }

    #[test]
    fn pending_import_selection() {
        let mut data = UserData::seed();
        data.contacts.push(Contact::new("Ann", "Lee"));
        data.contacts.push(Contact::new("Bob", "Zin"));
        let mut pending = PendingImport::new(data, false);
        assert_eq!(pending.selection(), vec![0, 1, 2]);

        pending.move_down();
        pending.toggle();
        assert_eq!(pending.selection(), vec![0, 2]);

        pending.toggle_all();
        assert_eq!(pending.selection(), vec![0, 1, 2]);
        pending.toggle_all();
        assert!(pending.selection().is_empty());
    }

    #[test]
    fn column_list_parsing() {
        assert_eq!(
            parse_columns("name, email").unwrap(),
            vec![Column::Name, Column::Email]
        );
        assert!(parse_columns("name, phone").is_err());
        assert!(parse_columns(" , ").is_err());
    }
}
