use rand::Rng;

use crate::config::{Boundary, FlockConfig, Weights};
use crate::vector::{sample_random_velocity, Vector2D};

/// Handle of an agent inside its flock. Two agents are the same agent only
/// when their ids match, regardless of where they are or how they move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(pub usize);

impl AgentId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A single boid
#[derive(Debug, Clone, Copy)]
pub struct Agent {
    pub position: Vector2D,
    pub velocity: Vector2D,
}

impl Agent {
    pub fn new(position: Vector2D, velocity: Vector2D) -> Self {
        Self { position, velocity }
    }

    /// Places an agent uniformly inside the boundary minus its margin, with a
    /// velocity from [`sample_random_velocity`].
    pub fn random<R: Rng + ?Sized>(boundary: &Boundary, max_speed: f32, rng: &mut R) -> Self {
        let margin = boundary.margin;
        let position = Vector2D::new(
            rng.gen_range(margin..boundary.width - margin),
            rng.gen_range(margin..boundary.height - margin),
        );
        let velocity = sample_random_velocity(max_speed, rng);
        Self::new(position, velocity)
    }

    /// Direction of travel, as handed to the renderer.
    pub fn heading(&self) -> Vector2D {
        self.velocity
    }

    /// Raw output of the three steering rules, before weights and clamping.
    pub fn steering(&self, id: AgentId, flock: FlockView<'_>, config: &FlockConfig) -> Steering {
        Steering {
            alignment: behavior::alignment(self, flock.others(id), config),
            cohesion: behavior::cohesion(self, flock.others(id), config),
            separation: behavior::separation(self, flock.others(id), config),
        }
    }

    /// Computes this agent's state for the next tick.
    ///
    /// `flock` must be the previous tick's snapshot; the agent itself is
    /// found in it through `id` and skipped by every rule.
    pub fn update(&self, id: AgentId, flock: FlockView<'_>, config: &FlockConfig) -> Agent {
        let steering = self
            .steering(id, flock, config)
            .weighted(&config.weights)
            .limited(config.max_force);

        let position = behavior::wrap_edges(self.position, &config.boundary);

        let velocity = (self.velocity + steering.total()).limit(config.max_speed);

        Agent {
            position: position + velocity,
            velocity,
        }
    }
}

/// Read-only view of every agent's state at the start of a tick
#[derive(Debug, Clone, Copy)]
pub struct FlockView<'a> {
    agents: &'a [Agent],
}

impl<'a> FlockView<'a> {
    pub fn new(agents: &'a [Agent]) -> Self {
        Self { agents }
    }

    /// Every agent except `id`.
    pub fn others(self, id: AgentId) -> impl Iterator<Item = &'a Agent> {
        self.agents
            .iter()
            .enumerate()
            .filter(move |(index, _)| *index != id.0)
            .map(|(_, agent)| agent)
    }
}

/// Steering contributions of the three flocking rules
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Steering {
    pub alignment: Vector2D,
    pub cohesion: Vector2D,
    pub separation: Vector2D,
}

impl Steering {
    pub fn weighted(self, weights: &Weights) -> Self {
        Self {
            alignment: self.alignment * weights.alignment,
            cohesion: self.cohesion * weights.cohesion,
            separation: self.separation * weights.separation,
        }
    }

    /// Clamps each contribution to `max_force` on its own.
    pub fn limited(self, max_force: f32) -> Self {
        Self {
            alignment: self.alignment.limit(max_force),
            cohesion: self.cohesion.limit(max_force),
            separation: self.separation.limit(max_force),
        }
    }

    pub fn total(&self) -> Vector2D {
        self.alignment + self.cohesion + self.separation
    }
}

/// The individual flocking rules.
///
/// Each rule takes the agents other than `agent` and returns a desired
/// velocity change. Degenerate cases (no neighbor in range, or a net vector
/// with no direction) yield zero.
pub mod behavior {
    use super::*;

    /// Steer towards the average heading of neighbors within the alignment
    /// radius.
    pub fn alignment<'a, I>(agent: &Agent, others: I, config: &FlockConfig) -> Vector2D
    where
        I: Iterator<Item = &'a Agent>,
    {
        let mut sum = Vector2D::zero();
        let mut count = 0;

        for other in others {
            if agent.position.distance(&other.position) < config.radii.alignment {
                sum += other.velocity;
                count += 1;
            }
        }

        if count == 0 {
            return Vector2D::zero();
        }

        let average = sum / count as f32;
        desired_change(agent, average, config.max_speed)
    }

    /// Steer towards the average position of neighbors within the cohesion
    /// radius.
    pub fn cohesion<'a, I>(agent: &Agent, others: I, config: &FlockConfig) -> Vector2D
    where
        I: Iterator<Item = &'a Agent>,
    {
        let mut sum = Vector2D::zero();
        let mut count = 0;

        for other in others {
            if agent.position.distance(&other.position) < config.radii.cohesion {
                sum += other.position;
                count += 1;
            }
        }

        if count == 0 {
            return Vector2D::zero();
        }

        let center = sum / count as f32;
        desired_change(agent, center - agent.position, config.max_speed)
    }

    /// Steer away from neighbors within the separation radius, each one
    /// weighted by the inverse of its distance.
    pub fn separation<'a, I>(agent: &Agent, others: I, config: &FlockConfig) -> Vector2D
    where
        I: Iterator<Item = &'a Agent>,
    {
        let mut sum = Vector2D::zero();
        let mut count = 0;

        for other in others {
            let distance = agent.position.distance(&other.position);
            if distance < config.radii.separation {
                // A neighbor sitting exactly on top of us has no "away".
                if let Some(away) = (agent.position - other.position).try_normalize() {
                    sum += away / distance;
                }
                count += 1;
            }
        }

        if count == 0 {
            return Vector2D::zero();
        }

        let average = sum / count as f32;
        desired_change(agent, average, config.max_speed)
    }

    /// `normalize(direction) * max_speed - velocity`, or zero when
    /// `direction` has no direction.
    fn desired_change(agent: &Agent, direction: Vector2D, max_speed: f32) -> Vector2D {
        match direction.try_normalize() {
            Some(unit) => unit * max_speed - agent.velocity,
            None => Vector2D::zero(),
        }
    }

    /// Toroidal wrap: a position more than `margin` past an edge is moved to
    /// `margin` beyond the opposite edge.
    pub fn wrap_edges(position: Vector2D, boundary: &Boundary) -> Vector2D {
        let Boundary {
            width,
            height,
            margin,
        } = *boundary;
        Vector2D::new(
            wrap_axis(position.x, width, margin),
            wrap_axis(position.y, height, margin),
        )
    }

    fn wrap_axis(value: f32, extent: f32, margin: f32) -> f32 {
        if value < -margin {
            extent + margin
        } else if value > extent + margin {
            -margin
        } else {
            value
        }
    }
}
