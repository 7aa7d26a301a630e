use crate::models::theme::{ThemeMode, ThemeState};

#[derive(Debug, Clone, Copy, Default)]
pub struct ThemeStore {
    state: ThemeState,
}

impl ThemeStore {
    pub fn new(mode: ThemeMode) -> Self {
        Self {
            state: ThemeState { mode },
        }
    }

    pub fn toggle_theme(&mut self) {
        self.state.mode = self.state.mode.toggled();
    }

    pub fn set_theme(&mut self, mode: ThemeMode) {
        self.state.mode = mode;
    }

    pub fn mode(&self) -> ThemeMode {
        self.state.mode
    }
}
