use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Names of the input action map and the two channels the controller reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionNames {
    pub map: String,
    pub move_action: String,
    pub vertical_action: String,
}

impl Default for ActionNames {
    fn default() -> Self {
        Self {
            map: "Player".to_string(),
            move_action: "Move".to_string(),
            vertical_action: "VerticalMove".to_string(),
        }
    }
}

/// Locomotion tunables. Set before the first tick and left alone afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Horizontal speed (units/sec)
    pub horizontal_speed: f32,
    /// Vertical speed relative to horizontal speed
    pub vertical_speed_multiplier: f32,
    /// Horizontal acceleration (units/sec^2)
    pub acceleration: f32,
    /// Horizontal deceleration (units/sec^2)
    pub deceleration: f32,
    pub actions: ActionNames,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            horizontal_speed: 8.0,
            vertical_speed_multiplier: 0.6,
            acceleration: 30.0,
            deceleration: 40.0,
            actions: ActionNames::default(),
        }
    }
}

impl MotionConfig {
    /// Speed of climbing/descending at full stick deflection
    pub fn vertical_speed(&self) -> f32 {
        self.horizontal_speed * self.vertical_speed_multiplier
    }

    /// Parse a JSON document; missing fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("horizontal_speed", self.horizontal_speed),
            ("acceleration", self.acceleration),
            ("deceleration", self.deceleration),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        let multiplier = self.vertical_speed_multiplier;
        if !(multiplier.is_finite() && multiplier >= 0.0) {
            return Err(ConfigError::Negative {
                field: "vertical_speed_multiplier",
                value: multiplier,
            });
        }

        let names = [
            ("map", &self.actions.map),
            ("move_action", &self.actions.move_action),
            ("vertical_action", &self.actions.vertical_action),
        ];
        for (field, name) in names {
            if name.trim().is_empty() {
                return Err(ConfigError::EmptyActionName(field));
            }
        }
        Ok(())
    }
}
