//! Key event handling

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use super::AppController;

impl AppController {
    /// Map a key press to an action. Remote calls run as detached tasks so
    /// the render loop keeps going while they are in flight.
    pub fn handle_key_event(&self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                tracing::debug!("Quit requested");
                self.ctx.store.should_quit.set(true);
            }
            KeyCode::Char(' ') => {
                let controller = self.clone();
                tokio::spawn(async move { controller.toggle_play_pause().await });
            }
            KeyCode::Char('n') | KeyCode::Char('N') => {
                let controller = self.clone();
                tokio::spawn(async move { controller.skip_next().await });
            }
            KeyCode::Char('p') | KeyCode::Char('P') => {
                let controller = self.clone();
                tokio::spawn(async move { controller.skip_previous().await });
            }
            KeyCode::Char('-') => self.volume_down(),
            KeyCode::Char('+') | KeyCode::Char('=') => self.volume_up(),
            KeyCode::Char('[') => self.nudge_volume(-1),
            KeyCode::Char(']') => self.nudge_volume(1),
            KeyCode::Up => self.move_cursor_up(),
            KeyCode::Down => self.move_cursor_down(),
            KeyCode::Enter => self.select_highlighted(),
            _ => {}
        }
    }
}
