#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::vec::Vec;

use flock_core::{Agent, Boundary, FlockConfig, Radii, Vector2D, Weights};
use serde::{Deserialize, Serialize};

/// A 2D point or direction in simulation coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<Vector2D> for Position {
    fn from(v: Vector2D) -> Self {
        Self::new(v.x, v.y)
    }
}

/// Tunable parameters, as read from a settings file or a control panel.
/// Missing fields fall back to the simulation defaults.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationSettings {
    pub alignment_radius: f32,
    pub cohesion_radius: f32,
    pub separation_radius: f32,
    pub max_speed: f32,
    pub max_force: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    pub separation_weight: f32,
    pub boundary_width: f32,
    pub boundary_height: f32,
    pub boundary_margin: f32,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        FlockConfig::default().into()
    }
}

impl From<FlockConfig> for SimulationSettings {
    fn from(config: FlockConfig) -> Self {
        Self {
            alignment_radius: config.radii.alignment,
            cohesion_radius: config.radii.cohesion,
            separation_radius: config.radii.separation,
            max_speed: config.max_speed,
            max_force: config.max_force,
            alignment_weight: config.weights.alignment,
            cohesion_weight: config.weights.cohesion,
            separation_weight: config.weights.separation,
            boundary_width: config.boundary.width,
            boundary_height: config.boundary.height,
            boundary_margin: config.boundary.margin,
        }
    }
}

impl From<SimulationSettings> for FlockConfig {
    fn from(settings: SimulationSettings) -> Self {
        Self {
            max_speed: settings.max_speed,
            max_force: settings.max_force,
            radii: Radii {
                alignment: settings.alignment_radius,
                cohesion: settings.cohesion_radius,
                separation: settings.separation_radius,
            },
            weights: Weights {
                alignment: settings.alignment_weight,
                cohesion: settings.cohesion_weight,
                separation: settings.separation_weight,
            },
            boundary: Boundary {
                width: settings.boundary_width,
                height: settings.boundary_height,
                margin: settings.boundary_margin,
            },
        }
    }
}

/// What the renderer needs to draw one agent
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AgentFrame {
    pub position: Position,
    pub heading: Position,
}

impl From<&Agent> for AgentFrame {
    fn from(agent: &Agent) -> Self {
        Self {
            position: agent.position.into(),
            heading: agent.heading().into(),
        }
    }
}

/// The whole population at the end of a tick
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Frame {
    pub tick: u64,
    pub agents: Vec<AgentFrame>,
}

impl Frame {
    pub fn capture(tick: u64, agents: &[Agent]) -> Self {
        Self {
            tick,
            agents: agents.iter().map(AgentFrame::from).collect(),
        }
    }

    /// Single-line JSON, one frame per line.
    #[cfg(feature = "std")]
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// End-of-run statistics
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    pub population: usize,
    pub ticks: u64,
    pub mean_speed: f32,
    pub max_speed_observed: f32,
}

impl RunSummary {
    pub fn from_population(ticks: u64, agents: &[Agent]) -> Self {
        let speeds = agents.iter().map(|agent| agent.velocity.magnitude());
        let max_speed_observed = speeds.clone().fold(0.0, f32::max);
        let mean_speed = if agents.is_empty() {
            0.0
        } else {
            speeds.sum::<f32>() / agents.len() as f32
        };

        Self {
            population: agents.len(),
            ticks,
            mean_speed,
            max_speed_observed,
        }
    }
}
