use crate::db::kv_store::KeyValueStore;
use crate::error::TrackerResult;
use std::fmt;
use tracing::info;

pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn parse(input: &str) -> Option<Theme> {
        match input.trim().trim_matches('"').to_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn get_theme(store: &dyn KeyValueStore) -> TrackerResult<Theme> {
    Ok(store
        .get(THEME_KEY)?
        .and_then(|raw| Theme::parse(&raw))
        .unwrap_or_default())
}

pub fn set_theme(store: &dyn KeyValueStore, theme: Theme) -> TrackerResult<()> {
    info!(%theme, "setting theme");
    store.set(THEME_KEY, theme.as_str())
}

pub fn toggle_theme(store: &dyn KeyValueStore) -> TrackerResult<Theme> {
    let next = get_theme(store)?.toggled();
    set_theme(store, next)?;
    Ok(next)
}
