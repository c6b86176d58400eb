//! Persisted configuration entries.

use serde::{Deserialize, Serialize};

use crate::RoutingOptions;

/// Integration identifier used in device identifiers and log targets.
pub const DOMAIN: &str = "tomtom_travel_time";

/// Display name offered when the user does not pick one.
pub const DEFAULT_NAME: &str = "TomTom Travel Time";

/// Attribution shown alongside every published value.
pub const ATTRIBUTION: &str = "Powered by TomTom";

/// The user-supplied data validated by the setup flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryData {
    /// Display name, also used as the entry title.
    pub name: String,
    /// Secret key for the routing and geocoding services.
    pub api_key: String,
    /// Location inputs in travel order.
    pub locations: Vec<String>,
}

impl EntryData {
    /// Build entry data with the default display name.
    #[must_use]
    pub fn new(api_key: impl Into<String>, locations: Vec<String>) -> Self {
        Self {
            name: DEFAULT_NAME.to_owned(),
            api_key: api_key.into(),
            locations,
        }
    }

    /// Replace the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// A stored config entry: identity, validated data and editable options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    /// Stable identifier assigned when the entry is created.
    pub entry_id: String,
    /// Title shown to users; the display name at creation time.
    pub title: String,
    /// Validated configuration data.
    pub data: EntryData,
    /// Routing options; defaults apply to missing fields.
    #[serde(default)]
    pub options: RoutingOptions,
}

impl ConfigEntry {
    /// Create an entry from freshly validated data with default options.
    #[must_use]
    pub fn new(entry_id: impl Into<String>, data: EntryData) -> Self {
        Self {
            entry_id: entry_id.into(),
            title: data.name.clone(),
            data,
            options: RoutingOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TravelMode;
    use rstest::rstest;

    #[rstest]
    fn new_entries_use_the_name_as_title_and_default_options() {
        let data = EntryData::new("secret", vec!["1,2".to_owned(), "3,4".to_owned()])
            .with_name("Commute");
        let entry = ConfigEntry::new("abc", data);
        assert_eq!(entry.title, "Commute");
        assert_eq!(entry.options, RoutingOptions::default());
    }

    #[rstest]
    fn entries_without_options_load_with_defaults() {
        let entry: ConfigEntry = serde_json::from_str(
            r#"{
                "entry_id": "abc",
                "title": "Commute",
                "data": {"name": "Commute", "api_key": "k", "locations": ["1,2", "3,4"]}
            }"#,
        )
        .expect("entry should deserialise");
        assert_eq!(entry.options.vehicle_type, TravelMode::Car);
    }
}
