use chrono::NaiveDate;
use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;

use crate::booking::PickerStyle;
use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "lazybook", version, about = "TUI for booking service appointments")]
pub struct Args {
    /// Provider to book with (e.g., "p1"), overrides `booking.default_provider`
    #[arg(short, long)]
    pub provider: Option<String>,

    /// Day to open on, as YYYY-MM-DD (defaults to today)
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    /// Booking API base URL, overrides `api.base_url`
    #[arg(long)]
    pub api_url: Option<String>,

    /// Date picker behaviour, overrides `booking.date_picker`
    #[arg(long, value_enum)]
    pub picker: Option<PickerStyle>,
}

impl Args {
    /// Fold command line overrides into the loaded config.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(provider) = &self.provider {
            config.booking.default_provider = Some(provider.clone());
        }
        if let Some(url) = &self.api_url {
            config.api.base_url.clone_from(url);
        }
        if let Some(picker) = self.picker {
            config.booking.date_picker = picker;
        }
    }
}

/// The provider the booking screen opens with.
pub fn initial_provider(config: &AppConfig) -> Result<String> {
    config
        .booking
        .default_provider
        .clone()
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| {
            eyre!("No provider selected: pass --provider or set booking.default_provider")
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides() {
        let args = Args::try_parse_from([
            "lazybook",
            "--provider",
            "p2",
            "--date",
            "2024-05-10",
            "--api-url",
            "http://booking.test",
            "--picker",
            "explicit",
        ])
        .unwrap();
        assert_eq!(args.date, NaiveDate::from_ymd_opt(2024, 5, 10));

        let mut config = AppConfig::default();
        config.booking.default_provider = Some("p1".to_string());
        args.apply(&mut config);

        assert_eq!(initial_provider(&config).unwrap(), "p2");
        assert_eq!(config.api.base_url, "http://booking.test");
        assert_eq!(config.booking.date_picker, PickerStyle::Explicit);
    }

    #[test]
    fn test_config_provider_is_fallback() {
        let args = Args::try_parse_from(["lazybook"]).unwrap();
        let mut config = AppConfig::default();
        config.booking.default_provider = Some("p1".to_string());
        args.apply(&mut config);

        assert_eq!(initial_provider(&config).unwrap(), "p1");
        assert_eq!(config.booking.date_picker, PickerStyle::AutoDismiss);
    }

    #[test]
    fn test_missing_provider() {
        assert!(initial_provider(&AppConfig::default()).is_err());
    }

    #[test]
    fn test_invalid_date_rejected() {
        assert!(Args::try_parse_from(["lazybook", "--date", "10/05/2024"]).is_err());
    }
}
