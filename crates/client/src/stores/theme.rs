//! Light/dark theme preference persisted under `theme-storage`.

use dioxus::prelude::*;
use serde::{Deserialize, Serialize};

use crate::storage;

pub const THEME_STORAGE_KEY: &str = "theme-storage";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Light, Theme::Dark, Theme::System];

    pub fn label(self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
            Theme::System => "System",
        }
    }

    /// Whether the dark palette applies.
    pub fn is_dark(self, system_prefers_dark: bool) -> bool {
        match self {
            Theme::Light => false,
            Theme::Dark => true,
            Theme::System => system_prefers_dark,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ThemeState {
    theme: Theme,
}

/// Same envelope the web build has always written: `{"state": {...}, "version": 0}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Persisted {
    state: ThemeState,
    #[serde(default)]
    version: u32,
}

pub static THEME: GlobalSignal<Theme> = Signal::global(load);

fn load() -> Theme {
    storage::load::<Persisted>(THEME_STORAGE_KEY)
        .map(|p| p.state.theme)
        .unwrap_or_default()
}

pub fn set_theme(theme: Theme) {
    *THEME.write() = theme;
    let persisted = Persisted {
        state: ThemeState { theme },
        version: 0,
    };
    if let Err(e) = storage::save(THEME_STORAGE_KEY, &persisted) {
        crate::log_warn!("Failed to persist theme: {}", e);
    }
}

#[cfg(target_arch = "wasm32")]
pub fn system_prefers_dark() -> bool {
    web_sys::window()
        .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
        .is_some_and(|m| m.matches())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn system_prefers_dark() -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_persisted_envelope() {
        let p: Persisted = serde_json::from_str(r#"{"state":{"theme":"dark"},"version":0}"#).unwrap();
        assert_eq!(p.state.theme, Theme::Dark);
    }

    #[test]
    fn system_follows_platform() {
        assert!(Theme::System.is_dark(true));
        assert!(!Theme::System.is_dark(false));
        assert!(Theme::Dark.is_dark(false));
        assert!(!Theme::Light.is_dark(true));
    }
}
