//! Game settings and preferences
//!
//! Read-only at startup; edit the JSON by hand to switch rule sets.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, StorageKey};
use crate::sim::{Rules, Variant};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Preset rule set
    #[serde(default)]
    pub variant: Variant,
    /// Full rules override; replaces the preset when present and valid
    #[serde(default)]
    pub rules: Option<Rules>,
}

impl Settings {
    const STORAGE_KEY: StorageKey = StorageKey {
        local_storage: "fruit_frenzy_settings",
        file_name: "fruit-frenzy-settings.json",
    };

    pub fn from_variant(variant: Variant) -> Self {
        Self {
            variant,
            rules: None,
        }
    }

    /// Rules to play with. An invalid override falls back to the preset.
    pub fn rules(&self) -> Rules {
        match &self.rules {
            Some(rules) => match rules.validate() {
                Ok(()) => rules.clone(),
                Err(e) => {
                    log::warn!(
                        "Ignoring custom rules ({}), using {} preset",
                        e,
                        self.variant.as_str()
                    );
                    self.variant.rules()
                }
            },
            None => self.variant.rules(),
        }
    }

    /// Load stored settings, or defaults
    pub fn load() -> Self {
        match persistence::load_json::<Settings>(&Self::STORAGE_KEY) {
            Some(settings) => {
                log::info!("Loaded settings ({} rules)", settings.variant.as_str());
                settings
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_arcade() {
        let settings = Settings::default();
        assert_eq!(settings.variant, Variant::Arcade);
        assert_eq!(settings.rules(), Rules::arcade());
    }

    #[test]
    fn test_variant_only_json() {
        let settings: Settings = serde_json::from_str(r#"{"variant":"Classic"}"#).unwrap();
        assert_eq!(settings, Settings::from_variant(Variant::Classic));
        assert_eq!(settings.rules().starting_lives, 3);
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_valid_override_wins() {
        let custom = Rules {
            starting_lives: 9,
            ..Rules::classic()
        };
        let settings = Settings {
            variant: Variant::Arcade,
            rules: Some(custom.clone()),
        };
        assert_eq!(settings.rules(), custom);
    }

    #[test]
    fn test_invalid_override_falls_back() {
        let settings = Settings {
            variant: Variant::Classic,
            rules: Some(Rules {
                palette: Vec::new(),
                ..Rules::arcade()
            }),
        };
        assert_eq!(settings.rules(), Rules::classic());
    }
}
