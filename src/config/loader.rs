use std::fs;
use std::path::PathBuf;

use color_eyre::Result;

use crate::config::AppConfig;

const CONFIG_DIR: &str = "lazybook";
const CONFIG_FILE: &str = "config.toml";

pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(CONFIG_DIR))
}

pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join(CONFIG_FILE))
}

pub fn load() -> Result<AppConfig> {
    let Some(path) = config_path() else {
        tracing::debug!("No config directory found, using defaults");
        return Ok(AppConfig::default());
    };

    if !path.exists() {
        tracing::debug!("Config file not found at {:?}, using defaults", path);
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(&path)?;
    let config = parse(&content)?;
    tracing::debug!("Loaded config from {:?}", path);
    Ok(config)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    Ok(toml::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::*;
    use crate::booking::PickerStyle;
    use crate::config::ApiConfig;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config.api, ApiConfig::default());
        assert_eq!(config.api.base_url, "http://localhost:3333");
        assert_eq!(config.booking.date_picker, PickerStyle::AutoDismiss);
        assert!(config.booking.default_provider.is_none());
        assert!(config.session.name.is_none());
    }

    #[test]
    fn test_partial_sections() {
        let config = parse(
            r#"
            [api]
            base_url = "https://booking.example.com/api"

            [session]
            name = "Diego"

            [booking]
            default_provider = "p1"
            date_picker = "explicit"

            [keybindings.booking]
            toggle_date_picker = "ctrl+d"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "https://booking.example.com/api");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.session.name.as_deref(), Some("Diego"));
        assert_eq!(config.booking.default_provider.as_deref(), Some("p1"));
        assert_eq!(config.booking.date_picker, PickerStyle::Explicit);

        let toggle = &config.keybindings.booking.toggle_date_picker;
        assert!(toggle.matches(&KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL)));
        // Untouched sections keep their defaults
        let select = &config.keybindings.navigation.select;
        assert!(select.matches(&KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));
    }

    #[test]
    fn test_invalid_picker_style() {
        assert!(parse("[booking]\ndate_picker = \"sideways\"").is_err());
    }
}
