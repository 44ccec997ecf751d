use std::path::Path;

use anyhow::{Context, Result};
use flock_shared::SimulationSettings;

/// Reads a JSON settings file. Fields left out keep their defaults.
pub fn load_settings(path: &Path) -> Result<SimulationSettings> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Invalid settings in {}", path.display()))
}

/// Command-line values that take precedence over the settings file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub max_speed: Option<f32>,
    pub max_force: Option<f32>,
    pub alignment_weight: Option<f32>,
    pub cohesion_weight: Option<f32>,
    pub separation_weight: Option<f32>,
}

impl Overrides {
    pub fn apply(&self, mut settings: SimulationSettings) -> SimulationSettings {
        let fields = [
            (self.width, &mut settings.boundary_width),
            (self.height, &mut settings.boundary_height),
            (self.max_speed, &mut settings.max_speed),
            (self.max_force, &mut settings.max_force),
            (self.alignment_weight, &mut settings.alignment_weight),
            (self.cohesion_weight, &mut settings.cohesion_weight),
            (self.separation_weight, &mut settings.separation_weight),
        ];
        for (value, field) in fields {
            if let Some(value) = value {
                *field = value;
            }
        }
        settings
    }
}
