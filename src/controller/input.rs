//! Key event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::model::ActiveSection;
use super::AppController;

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        let model = self.model.lock().await;

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            model.set_should_quit(true).await;
            return Ok(());
        }

        // Handle error message first (blocks all other interactions)
        if model.has_error().await {
            return match key.code {
                KeyCode::Esc | KeyCode::Enter => {
                    model.clear_error().await;
                    Ok(())
                }
                _ => Ok(()),
            };
        }

        let ui_state = model.get_ui_state().await;

        match ui_state.active_section {
            ActiveSection::Search => match key.code {
                KeyCode::Enter => {
                    drop(model);
                    self.submit_search().await;
                }
                KeyCode::Tab | KeyCode::BackTab | KeyCode::Down => {
                    model.set_active_section(ActiveSection::Playlists).await;
                }
                KeyCode::Esc => {
                    model.clear_search().await;
                }
                KeyCode::Backspace => {
                    model.backspace_search().await;
                }
                KeyCode::Char(c) => {
                    model.append_to_search(c).await;
                }
                _ => {}
            },
            ActiveSection::Playlists => match key.code {
                KeyCode::Up => {
                    if ui_state.selected == 0 {
                        model.set_active_section(ActiveSection::Search).await;
                    } else {
                        model.move_selection_up().await;
                    }
                }
                KeyCode::Down => {
                    model.move_selection_down().await;
                }
                KeyCode::Enter => {
                    let selected = model.get_selected_entry().await;
                    drop(model);
                    if let Some(entry) = selected {
                        self.activate(entry).await;
                    }
                }
                KeyCode::Tab | KeyCode::BackTab => {
                    model.toggle_section().await;
                }
                KeyCode::Char('/') | KeyCode::Char('g') | KeyCode::Char('G') | KeyCode::Esc => {
                    model.set_active_section(ActiveSection::Search).await;
                }
                KeyCode::Char('q') | KeyCode::Char('Q') => {
                    model.set_should_quit(true).await;
                }
                _ => {}
            },
        }

        Ok(())
    }
}
