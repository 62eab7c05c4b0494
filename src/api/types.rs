use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// A bookable service professional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub id: String,
    pub name: String,
    pub avatar_url: String,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// One whole hour of a provider's day and whether it can be booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    #[serde(deserialize_with = "deserialize_hour")]
    pub hour: u8,
    pub available: bool,
}

/// Last hour of the day a slot can start at.
const LAST_HOUR: u8 = 23;

fn deserialize_hour<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let hour = u8::deserialize(deserializer)?;
    if hour > LAST_HOUR {
        return Err(de::Error::custom(format!(
            "hour {hour} is outside 0-{LAST_HOUR}"
        )));
    }
    Ok(hour)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_deserialize() {
        let provider: Provider = serde_json::from_str(
            r#"{"id":"p1","name":"Ana","avatar_url":"http://img/ana.png","email":"x@y"}"#,
        )
        .unwrap();
        assert_eq!(provider.id, "p1");
        assert_eq!(provider.name, "Ana");
        assert_eq!(provider.to_string(), "Ana");
    }

    #[test]
    fn test_slot_deserialize() {
        let slots: Vec<AvailabilitySlot> =
            serde_json::from_str(r#"[{"hour":8,"available":true},{"hour":17,"available":false}]"#)
                .unwrap();
        assert_eq!(
            slots,
            vec![
                AvailabilitySlot { hour: 8, available: true },
                AvailabilitySlot { hour: 17, available: false },
            ]
        );
    }

    #[test]
    fn test_slot_hour_out_of_range() {
        let error = serde_json::from_str::<AvailabilitySlot>(r#"{"hour":24,"available":true}"#)
            .unwrap_err();
        assert!(error.to_string().contains("hour 24"));

        let midnight: AvailabilitySlot =
            serde_json::from_str(r#"{"hour":0,"available":true}"#).unwrap();
        assert_eq!(midnight.hour, 0);
    }
}
