use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::acts::ActProfile;
use crate::exclusions::ExcludedVenue;
use crate::queries::CompiledTemplate;
use crate::venue::{normalize_key, DEFAULT_STATE};
use crate::ConfigError;

const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

fn default_state() -> String {
    DEFAULT_STATE.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// State code recorded on venues whose text names none.
    #[serde(default = "default_state")]
    pub state: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            state: default_state(),
        }
    }
}

/// A named group of cities searched together. Lower priority runs first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionConfig {
    pub name: String,
    pub priority: u32,
    pub cities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryTemplate {
    pub category: String,
    pub template: String,
}

/// Keyword lists for the opportunity detector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertConfig {
    #[serde(default)]
    pub seeking_artists_keywords: Vec<String>,
    #[serde(default)]
    pub fee_mention_keywords: Vec<String>,
}

impl AlertConfig {
    /// Both lists, seeking-artists keywords first.
    pub fn all_keywords(&self) -> impl Iterator<Item = &str> {
        self.seeking_artists_keywords
            .iter()
            .chain(&self.fee_mention_keywords)
            .map(String::as_str)
    }
}

/// Domain configuration read from `scout.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoutConfig {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub acts: Vec<ActProfile>,
    #[serde(default)]
    pub regions: Vec<RegionConfig>,
    #[serde(default)]
    pub search_templates: Vec<QueryTemplate>,
    #[serde(default)]
    pub alerts: AlertConfig,
    #[serde(default)]
    pub excluded: Vec<ExcludedVenue>,
}

impl ScoutConfig {
    /// Region whose city list contains `city` (case-insensitive).
    #[must_use]
    pub fn region_for_city(&self, city: &str) -> Option<&RegionConfig> {
        let wanted = normalize_key(city);
        self.regions
            .iter()
            .find(|r| r.cities.iter().any(|c| normalize_key(c) == wanted))
    }
}

/// Load and validate the scout configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_scout_config(path: &Path) -> Result<ScoutConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ConfigFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_scout_config(&content)
}

/// Parse and validate scout configuration from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` if the text cannot be parsed or fails validation.
pub fn parse_scout_config(content: &str) -> Result<ScoutConfig, ConfigError> {
    let config: ScoutConfig = serde_yaml::from_str(content)?;
    validate_scout_config(&config)?;
    Ok(config)
}

/// Check cross-field rules serde cannot express.
///
/// # Errors
///
/// Returns the first rule violation found.
pub fn validate_scout_config(config: &ScoutConfig) -> Result<(), ConfigError> {
    if config.settings.state.trim().is_empty() {
        return Err(ConfigError::Validation(
            "settings.state must be non-empty".to_string(),
        ));
    }
    validate_acts(&config.acts)?;
    validate_regions(&config.regions)?;

    for template in &config.search_templates {
        if template.category.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "template '{}' has an empty category",
                template.template
            )));
        }
        CompiledTemplate::parse(&template.template)?;
    }

    for entry in &config.excluded {
        if entry.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "excluded venue name must be non-empty".to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_acts(acts: &[ActProfile]) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for act in acts {
        if act.id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "act id must be non-empty".to_string(),
            ));
        }

        if !seen_ids.insert(act.id.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate act id: '{}'",
                act.id
            )));
        }

        if !(act.min_capacity <= act.ideal_capacity && act.ideal_capacity <= act.max_capacity) {
            return Err(ConfigError::Validation(format!(
                "act '{}' capacity must satisfy min <= ideal <= max (got {} / {} / {})",
                act.id, act.min_capacity, act.ideal_capacity, act.max_capacity
            )));
        }

        if act.min_fee > act.max_fee {
            return Err(ConfigError::Validation(format!(
                "act '{}' has min_fee {} above max_fee {}",
                act.id, act.min_fee, act.max_fee
            )));
        }

        if act.genres.is_empty() {
            return Err(ConfigError::Validation(format!(
                "act '{}' must list at least one genre",
                act.id
            )));
        }

        if act.venue_types.is_empty() {
            return Err(ConfigError::Validation(format!(
                "act '{}' must list at least one venue type",
                act.id
            )));
        }

        if let Some(day) = act
            .available_days
            .iter()
            .find(|d| !WEEKDAYS.contains(&d.to_lowercase().as_str()))
        {
            return Err(ConfigError::Validation(format!(
                "act '{}' has unknown available day '{day}'",
                act.id
            )));
        }
    }

    Ok(())
}

fn validate_regions(regions: &[RegionConfig]) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();

    for region in regions {
        if region.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "region name must be non-empty".to_string(),
            ));
        }

        if !seen_names.insert(normalize_key(&region.name)) {
            return Err(ConfigError::Validation(format!(
                "duplicate region name: '{}'",
                region.name
            )));
        }

        if region.cities.iter().any(|c| c.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "region '{}' lists an empty city",
                region.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "scout_config_test.rs"]
mod tests;
