use crate::error::{ConfigError, Result, Rule};

/// Perception radii for the three steering rules
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Radii {
    pub alignment: f32,
    pub cohesion: f32,
    pub separation: f32,
}

impl Default for Radii {
    fn default() -> Self {
        Self {
            alignment: 50.0,
            cohesion: 250.0,
            separation: 50.0,
        }
    }
}

/// Rule weights, applied before each steering force is clamped
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub alignment: f32,
    pub cohesion: f32,
    pub separation: f32,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            alignment: 1.0,
            cohesion: 1.0,
            separation: 1.5,
        }
    }
}

/// Simulation area. Agents that drift more than `margin` past an edge
/// reappear `margin` beyond the opposite edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl Boundary {
    pub const DEFAULT_MARGIN: f32 = 10.0;

    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            margin: Self::DEFAULT_MARGIN,
        }
    }
}

impl Default for Boundary {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// Configuration for the flock simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlockConfig {
    pub max_speed: f32,
    pub max_force: f32,
    pub radii: Radii,
    pub weights: Weights,
    pub boundary: Boundary,
}

impl Default for FlockConfig {
    fn default() -> Self {
        Self {
            max_speed: 3.0,
            max_force: 0.1,
            radii: Radii::default(),
            weights: Weights::default(),
            boundary: Boundary::default(),
        }
    }
}

impl FlockConfig {
    pub fn with_boundary(mut self, width: f32, height: f32) -> Self {
        self.boundary.width = width;
        self.boundary.height = height;
        self
    }

    pub fn with_weights(mut self, weights: Weights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_radii(mut self, radii: Radii) -> Self {
        self.radii = radii;
        self
    }

    /// Rejects parameter sets that would misbehave mid-run.
    pub fn validate(&self) -> Result<()> {
        let scalars = [
            ("max_speed", self.max_speed),
            ("max_force", self.max_force),
            ("alignment_radius", self.radii.alignment),
            ("cohesion_radius", self.radii.cohesion),
            ("separation_radius", self.radii.separation),
            ("alignment_weight", self.weights.alignment),
            ("cohesion_weight", self.weights.cohesion),
            ("separation_weight", self.weights.separation),
            ("boundary_width", self.boundary.width),
            ("boundary_height", self.boundary.height),
            ("boundary_margin", self.boundary.margin),
        ];
        if let Some((name, _)) = scalars.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ConfigError::NonFinite(*name));
        }

        if self.max_speed <= 0.0 {
            return Err(ConfigError::NonPositiveMaxSpeed(self.max_speed));
        }
        if self.max_force < 0.0 {
            return Err(ConfigError::NegativeMaxForce(self.max_force));
        }

        let radii = [
            (Rule::Alignment, self.radii.alignment),
            (Rule::Cohesion, self.radii.cohesion),
            (Rule::Separation, self.radii.separation),
        ];
        for (rule, value) in radii {
            if value < 0.0 {
                return Err(ConfigError::NegativeRadius { rule, value });
            }
        }

        let Boundary {
            width,
            height,
            margin,
        } = self.boundary;
        if margin < 0.0 {
            return Err(ConfigError::NegativeMargin(margin));
        }
        if width <= 2.0 * margin || height <= 2.0 * margin {
            return Err(ConfigError::BoundaryTooSmall {
                width,
                height,
                margin,
            });
        }

        Ok(())
    }
}
