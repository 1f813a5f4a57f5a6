//! View module - UI rendering
//!
//! - `layout`: Sidebar with the playlist collection
//! - `player`: Now-playing bar with transport state and volume

mod layout;
mod player;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::model::{LibrarySnapshot, PlaybackSnapshot};

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, playback: &PlaybackSnapshot, library: &LibrarySnapshot) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),    // Sidebar
                Constraint::Length(5), // Player bar
            ])
            .split(frame.area());

        layout::render_sidebar(frame, chunks[0], library);
        player::render_player_bar(frame, chunks[1], playback);
    }
}
