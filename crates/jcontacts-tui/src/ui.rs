//! UI rendering with Ratatui.

use crate::app::{App, AppState, Focus, InputMode};
use crate::form::LABELS;
use crate::theme::Palette;
use jcontacts_core::models::{display_or_none, render_birthday};
use jcontacts_core::Contact;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    prelude::*,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

const LICENSE_TEXT: &str = "JContacts is free software: you can redistribute it and/or modify \
it under the terms of the GNU General Public License as published by the Free Software \
Foundation, either version 3 of the License, or (at your option) any later version.\n\n\
This program is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; \
without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. \
See the GNU General Public License for more details.";

/// Main render function.
pub fn render(frame: &mut Frame, app: &mut App) {
    match app.state {
        AppState::LicenseGate => render_license(frame, app),
        AppState::Browsing => render_browsing(frame, app),
        AppState::Quit => {}
    }
}

fn render_license(frame: &mut Frame, app: &App) {
    let p = &app.palette;
    let dialog_area = centered_rect(70, 14, frame.area());
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .title(" JContacts - License agreement ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(p.accent));
    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(3), Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let text = Paragraph::new(LICENSE_TEXT)
        .style(Style::default().fg(p.text))
        .wrap(Wrap { trim: true });
    frame.render_widget(text, chunks[0]);

    let keys = Paragraph::new("a: I agree | q: quit").style(Style::default().fg(p.muted));
    frame.render_widget(keys, chunks[1]);

    if let Some(ref status) = app.status {
        let msg = Paragraph::new(status.text.as_str()).style(Style::default().fg(p.error));
        frame.render_widget(msg, chunks[2]);
    }
}

fn render_browsing(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[0]);

    render_list(frame, app, chunks[0]);
    render_detail(frame, app, chunks[1]);
    render_status(frame, app, rows[1]);

    match &app.input_mode {
        InputMode::Edit => render_form(frame, app, area),
        InputMode::Prompt(kind) => render_prompt(frame, app, kind.title(), area),
        InputMode::ConfirmDelete => render_confirm(frame, app, area),
        InputMode::Groups => render_groups(frame, app, area),
        InputMode::ImportSelect => render_import(frame, app, area),
        InputMode::Normal | InputMode::Search => {}
    }
}

fn render_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let p = &app.palette;
    let is_focused = app.focus == Focus::List && app.input_mode == InputMode::Normal;
    let searching = app.input_mode == InputMode::Search || !app.search_query.is_empty();

    let title = if searching {
        format!(" Search: {}_ ", app.search_query)
    } else {
        format!(" Contacts ({}) ", app.visible.len())
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if is_focused { p.accent } else { p.border }));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let settings = &app.store.data().settings;
    let contacts = &app.store.data().contacts;
    let items: Vec<ListItem> = app
        .visible
        .iter()
        .filter_map(|&idx| contacts.get(idx))
        .map(|contact| {
            let mut lines = vec![Line::from(Span::styled(
                settings.title_for(contact),
                Style::default().fg(p.text).add_modifier(Modifier::BOLD),
            ))];
            if let Some(detail) = settings.detail_for(contact) {
                lines.push(Line::from(Span::styled(
                    format!("  {}", detail),
                    Style::default().fg(p.muted),
                )));
            }
            ListItem::new(lines)
        })
        .collect();

    if items.is_empty() {
        let message = Paragraph::new(if searching { "No results found" } else { "No contacts" })
            .style(Style::default().fg(p.muted))
            .alignment(Alignment::Center);
        frame.render_widget(message, centered_rect(30, 1, inner));
        return;
    }

    let list = List::new(items)
        .highlight_style(Style::default().bg(p.selection_bg).fg(p.selection_fg));
    app.list_state.select(Some(app.selected));
    frame.render_stateful_widget(list, inner, &mut app.list_state);
}

fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
    let p = &app.palette;
    let is_focused = app.focus == Focus::Detail && app.input_mode == InputMode::Normal;

    let block = Block::default()
        .title(" Details ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if is_focused { p.accent } else { p.border }));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(contact) = app.selected_contact() else {
        let message = Paragraph::new("Select a contact from the list")
            .style(Style::default().fg(p.muted))
            .alignment(Alignment::Center);
        frame.render_widget(message, centered_rect(40, 1, inner));
        return;
    };

    let fields = detail_fields(contact);
    let mut constraints: Vec<Constraint> = fields.iter().map(|_| Constraint::Length(1)).collect();
    constraints.push(Constraint::Min(0));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(constraints)
        .split(inner);

    for (i, (label, value)) in fields.iter().enumerate() {
        let color = if i < 2 { p.accent } else { p.text };
        render_field(frame, label, value, chunks[i], p, color);
    }
}

/// Label and display value of every field, `none` standing in for absence.
pub fn detail_fields(contact: &Contact) -> Vec<(&'static str, String)> {
    let text = |v: &Option<String>| display_or_none(v.as_deref()).to_string();
    vec![
        (LABELS[0], contact.first_name.clone()),
        (LABELS[1], contact.last_name.clone()),
        (LABELS[2], render_birthday(contact.birthday.as_ref())),
        (LABELS[3], text(&contact.job)),
        (LABELS[4], text(&contact.handy_number)),
        (LABELS[5], text(&contact.number)),
        (LABELS[6], text(&contact.number_work)),
        (LABELS[7], text(&contact.email)),
        (LABELS[8], text(&contact.group)),
    ]
}

fn render_field(frame: &mut Frame, label: &str, value: &str, area: Rect, p: &Palette, color: Color) {
    let line = Line::from(vec![
        Span::styled(format!("{}: ", label), Style::default().fg(p.muted)),
        Span::styled(value, Style::default().fg(color)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let p = &app.palette;

    let line = if let Some((done, total)) = app.progress {
        let text = match total {
            Some(total) if total > 0 => format!("Downloading... {}%", done * 100 / total),
            _ => format!("Downloading... {} bytes", done),
        };
        Line::from(Span::styled(text, Style::default().fg(p.accent)))
    } else if let Some(ref status) = app.status {
        let color = if status.is_error { p.error } else { p.text };
        Line::from(Span::styled(status.text.as_str(), Style::default().fg(color)))
    } else {
        let settings = &app.store.data().settings;
        Line::from(Span::styled(
            format!(
                "n: new | Enter: edit | d: delete | /: search | x/i: export/import | p: print | t: theme ({}) | s: sort ({}) | q: quit",
                settings.theme.display_name(),
                settings.sort_by.display_name()
            ),
            Style::default().fg(p.muted),
        ))
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let Some(form) = app.form.as_ref() else {
        return;
    };
    let p = &app.palette;

    let dialog_area = centered_rect(60.min(area.width.saturating_sub(4)), 17, area);
    frame.render_widget(Clear, dialog_area);

    let title = if form.editing.is_some() { " Edit contact " } else { " New contact " };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(p.accent));
    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let mut constraints: Vec<Constraint> = LABELS.iter().map(|_| Constraint::Length(1)).collect();
    constraints.extend([Constraint::Length(1), Constraint::Length(1), Constraint::Length(1)]);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(constraints)
        .split(inner);

    for (i, label) in LABELS.iter().enumerate() {
        let selected = i == form.selected;
        let marker = if selected { "▸ " } else { "  " };
        let value_style = if selected {
            Style::default().fg(p.selection_fg).bg(p.selection_bg)
        } else {
            Style::default().fg(p.text)
        };
        let cursor = if selected { "_" } else { "" };
        let line = Line::from(vec![
            Span::styled(format!("{}{:<13}", marker, label), Style::default().fg(p.muted)),
            Span::styled(format!("{}{}", form.values[i], cursor), value_style),
        ]);
        frame.render_widget(Paragraph::new(line), chunks[i]);
    }

    let suggestions = form.suggestions(&app.store.groups());
    if !suggestions.is_empty() {
        let hint = Paragraph::new(format!("Suggestions: {}", suggestions.join(", ")))
            .style(Style::default().fg(p.accent));
        frame.render_widget(hint, chunks[LABELS.len() + 1]);
    }

    let help = Paragraph::new("Tab/↑↓: field | →: take suggestion | Enter: save | Esc: cancel")
        .style(Style::default().fg(p.muted));
    frame.render_widget(help, chunks[LABELS.len() + 2]);
}

fn render_prompt(frame: &mut Frame, app: &App, title: &str, area: Rect) {
    let p = &app.palette;
    let dialog_area = centered_rect(60.min(area.width.saturating_sub(4)), 3, area);
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(p.accent));
    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let input = Paragraph::new(format!("▸ {}_", app.prompt_input)).style(Style::default().fg(p.text));
    frame.render_widget(input, inner);
}

fn render_confirm(frame: &mut Frame, app: &App, area: Rect) {
    let p = &app.palette;
    let name = app.selected_contact().map(Contact::full_name).unwrap_or_default();
    let dialog_area = centered_rect(50, 3, area);
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .title(" Delete contact ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(p.error));
    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let text = Paragraph::new(format!("Delete {}? (y/n)", name)).style(Style::default().fg(p.text));
    frame.render_widget(text, inner);
}

fn render_groups(frame: &mut Frame, app: &App, area: Rect) {
    let p = &app.palette;
    let groups = app.store.groups();
    let height = (groups.len() as u16 + 2).clamp(3, area.height.saturating_sub(4).max(3));
    let dialog_area = centered_rect(40, height, area);
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .title(" Groups ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(p.accent));
    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    if groups.is_empty() {
        let message = Paragraph::new("No groups").style(Style::default().fg(p.muted));
        frame.render_widget(message, inner);
        return;
    }

    let items: Vec<ListItem> = groups
        .into_iter()
        .map(|g| ListItem::new(g).style(Style::default().fg(p.text)))
        .collect();
    frame.render_widget(List::new(items), inner);
}

fn render_import(frame: &mut Frame, app: &App, area: Rect) {
    let Some(pending) = app.import.as_ref() else {
        return;
    };
    let p = &app.palette;

    let height = (pending.chosen.len() as u16 + 4).clamp(5, area.height.saturating_sub(4).max(5));
    let dialog_area = centered_rect(50.min(area.width.saturating_sub(4)), height, area);
    frame.render_widget(Clear, dialog_area);

    let title = if pending.replace_settings {
        " Import contacts (replaces settings) "
    } else {
        " Import contacts "
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(p.accent));
    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    let items: Vec<ListItem> = pending
        .data
        .contacts
        .iter()
        .zip(&pending.chosen)
        .map(|(contact, &chosen)| {
            let mark = if chosen { "[x]" } else { "[ ]" };
            ListItem::new(format!("{} {}", mark, contact.full_name()))
                .style(Style::default().fg(p.text))
        })
        .collect();
    let list = List::new(items)
        .highlight_style(Style::default().bg(p.selection_bg).fg(p.selection_fg));
    let mut state = ListState::default().with_selected(Some(pending.cursor));
    frame.render_stateful_widget(list, chunks[0], &mut state);

    let help = Paragraph::new("Space: toggle | a: all | Enter: import | Esc: cancel")
        .style(Style::default().fg(p.muted));
    frame.render_widget(help, chunks[1]);
}

/// Helper to create a centered rectangle.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
