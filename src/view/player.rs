//! Now-playing bar rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::model::PlaybackSnapshot;

pub fn render_player_bar(frame: &mut Frame, area: Rect, playback: &PlaybackSnapshot) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Track info
            Constraint::Length(24), // Volume
        ])
        .split(area);

    let glyph = if playback.is_playing { "▶" } else { "⏸ " };

    // Metadata may still be in flight; render empty fields until it lands
    let (title, artist, artwork) = match (&playback.track, &playback.current_track_id) {
        (Some(track), _) => (
            track.name.as_str(),
            track.primary_artist().unwrap_or_default(),
            track.artwork_url().unwrap_or_default(),
        ),
        (None, Some(_)) => ("Loading track", "", ""),
        (None, None) => ("Nothing playing", "", ""),
    };

    let info = Paragraph::new(vec![
        Line::from(format!("{glyph} {title}")),
        Line::from(artist.to_string()).style(Style::default().fg(Color::Gray)),
        Line::from(artwork.to_string()).style(Style::default().fg(Color::DarkGray)),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Now playing ")
            .title_bottom(Line::from(" space play/pause · n/p skip · q quit ").right_aligned()),
    );
    frame.render_widget(info, chunks[0]);

    let volume = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Volume ")
                .title_bottom(Line::from(" -/+ [/] ").right_aligned()),
        )
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(f64::from(playback.volume.min(100)) / 100.0)
        .label(format!("{}%", playback.volume));
    frame.render_widget(volume, chunks[1]);
}
