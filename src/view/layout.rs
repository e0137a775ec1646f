//! Layout rendering (search bar, playlist list, status bar)

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph},
    Frame,
};

use crate::model::{ActiveSection, CommandState, UiState};

fn border_style(ui_state: &UiState, section: ActiveSection) -> Style {
    if ui_state.active_section == section {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    }
}

pub fn render_search_bar(frame: &mut Frame, area: Rect, ui_state: &UiState) {
    let searching = ui_state.search_state == CommandState::Running;

    let search_style = if searching {
        Style::default().fg(Color::DarkGray)
    } else if ui_state.active_section == ActiveSection::Search {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::White)
    };

    let search_text = if ui_state.search_query.is_empty() {
        "Type a playlist name, Enter to search..."
    } else {
        &ui_state.search_query
    };

    let title = if searching { " Searching... " } else { " Search " };

    let search = Paragraph::new(search_text).style(search_style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .padding(Padding::horizontal(1))
            .border_style(border_style(ui_state, ActiveSection::Search)),
    );
    frame.render_widget(search, area);
}

pub fn render_playlists(frame: &mut Frame, area: Rect, ui_state: &UiState) {
    let focused = ui_state.active_section == ActiveSection::Playlists;

    let items: Vec<ListItem> = ui_state
        .entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let style = if i == ui_state.selected && focused {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else if i == ui_state.selected {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(entry.name.as_str()).style(style)
        })
        .collect();

    let title = format!(" Playlists ({}) ", ui_state.entries.len());

    let playlists = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .padding(Padding::horizontal(1))
                .border_style(border_style(ui_state, ActiveSection::Playlists)),
        )
        .highlight_style(Style::default()); // Highlight handled by item styles

    let mut list_state = ListState::default();
    if !ui_state.entries.is_empty() {
        list_state.select(Some(ui_state.selected));
    }

    frame.render_stateful_widget(playlists, area, &mut list_state);
}

pub fn render_status_bar(frame: &mut Frame, area: Rect, ui_state: &UiState) {
    let (text, style) = match (&ui_state.status_message, ui_state.shuffle_state) {
        (Some(message), CommandState::Running) => (message.clone(), Style::default().fg(Color::Yellow)),
        (None, CommandState::Running) => ("Shuffling...".to_string(), Style::default().fg(Color::Yellow)),
        (Some(message), CommandState::Idle) => (message.clone(), Style::default().fg(Color::Cyan)),
        (None, CommandState::Idle) => (
            "Tab switch focus · ↑↓ select · Enter shuffle & play · q quit".to_string(),
            Style::default().fg(Color::DarkGray),
        ),
    };

    let status = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(" Status "));
    frame.render_widget(status, area);
}
