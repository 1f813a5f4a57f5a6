//! Sidebar rendering

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph},
    Frame,
};

use crate::model::LibrarySnapshot;

pub fn render_sidebar(frame: &mut Frame, area: Rect, library: &LibrarySnapshot) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Playlists ")
        .padding(Padding::horizontal(1));

    let Some(playlists) = &library.playlists else {
        let placeholder = Paragraph::new("Loading playlists...")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    };

    let items: Vec<ListItem> = playlists
        .iter()
        .enumerate()
        .map(|(i, playlist)| {
            let selected = library.selected_playlist_id.as_deref() == Some(playlist.id.as_str());
            let style = if i == library.cursor {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else if selected {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            let marker = if selected { "● " } else { "  " };
            ListItem::new(format!("{marker}{}", playlist.name)).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default()); // Highlight handled by item styles

    let mut list_state = ListState::default();
    list_state.select(Some(library.cursor));

    frame.render_stateful_widget(list, area, &mut list_state);
}
