//! Current user's display data for the header.

use crate::config::SessionConfig;

const FALLBACK_NAME: &str = "guest";

/// Read-only identity of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub name: String,
    pub avatar_url: Option<String>,
}

impl Session {
    /// Build the session from config, falling back to the OS user name.
    pub fn from_config(config: &SessionConfig) -> Self {
        let name = config
            .name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .or_else(|| std::env::var("USER").ok())
            .unwrap_or_else(|| FALLBACK_NAME.to_string());

        Self {
            name,
            avatar_url: config.avatar_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let session = Session::from_config(&SessionConfig {
            name: Some("Diego".to_string()),
            avatar_url: Some("http://avatars/diego.png".to_string()),
        });
        assert_eq!(session.name, "Diego");
        assert_eq!(session.avatar_url.as_deref(), Some("http://avatars/diego.png"));
    }

    #[test]
    fn test_blank_name_falls_back() {
        let session = Session::from_config(&SessionConfig {
            name: Some("  ".to_string()),
            avatar_url: None,
        });
        assert!(!session.name.trim().is_empty());
    }
}
