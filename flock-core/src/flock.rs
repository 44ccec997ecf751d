use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::agent::{Agent, AgentId, FlockView};
use crate::config::{FlockConfig, Weights};
use crate::error::{ConfigError, Result};

/// Root seed for a simulation run.
///
/// Every agent gets its own ChaCha stream derived from the seed and its
/// index, so agents can be constructed in any order (or in parallel) and
/// still come out identical between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Seed(pub u64);

impl Seed {
    /// Draws a fresh seed from the operating system.
    #[cfg(feature = "std")]
    pub fn from_entropy() -> core::result::Result<Self, getrandom::Error> {
        let mut bytes = [0u8; 8];
        getrandom::getrandom(&mut bytes)?;
        Ok(Self(u64::from_le_bytes(bytes)))
    }

    pub fn agent_rng(&self, id: AgentId) -> ChaCha8Rng {
        let mut rng = ChaCha8Rng::seed_from_u64(self.0);
        rng.set_stream(id.index() as u64);
        rng
    }
}

/// Completion signal of one [`Flock::advance`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Number of ticks completed so far, including this one.
    pub tick: u64,
}

/// A fixed-size population of agents with a capacity of `N`.
///
/// Agent state is double buffered: a tick reads only `current` and writes
/// only `next`, then the two are swapped. No agent ever observes another
/// agent's state from the tick in progress.
#[derive(Debug, Clone)]
pub struct Flock<const N: usize> {
    current: heapless::Vec<Agent, N>,
    next: heapless::Vec<Agent, N>,
    config: FlockConfig,
    pending: Option<FlockConfig>,
    tick: u64,
}

impl<const N: usize> Flock<N> {
    /// Spawns `count` agents at random positions inside the boundary.
    pub fn seeded(count: usize, config: FlockConfig, seed: Seed) -> Result<Self> {
        config.validate()?;
        if count > N {
            return Err(ConfigError::CapacityExceeded {
                requested: count,
                capacity: N,
            });
        }

        log::info!(
            "Seeding flock of {} agents in {}x{} (seed {})",
            count,
            config.boundary.width,
            config.boundary.height,
            seed.0
        );

        let agents = (0..count).map(|index| {
            let mut rng = seed.agent_rng(AgentId(index));
            Agent::random(&config.boundary, config.max_speed, &mut rng)
        });
        Self::from_agents(agents, config)
    }

    /// Builds a flock from explicitly placed agents. Ids follow iteration
    /// order.
    pub fn from_agents<I>(agents: I, config: FlockConfig) -> Result<Self>
    where
        I: IntoIterator<Item = Agent>,
    {
        config.validate()?;

        let mut current = heapless::Vec::new();
        let mut agents = agents.into_iter();
        while let Some(agent) = agents.next() {
            if current.push(agent).is_err() {
                return Err(ConfigError::CapacityExceeded {
                    requested: N + 1 + agents.count(),
                    capacity: N,
                });
            }
        }

        Ok(Self {
            next: current.clone(),
            current,
            config,
            pending: None,
            tick: 0,
        })
    }

    /// Advances every agent by one tick against the previous tick's state.
    pub fn advance(&mut self) -> TickReport {
        self.apply_pending();

        let view = FlockView::new(&self.current);
        for (index, (agent, slot)) in self.current.iter().zip(self.next.iter_mut()).enumerate() {
            *slot = agent.update(AgentId(index), view, &self.config);
        }

        self.publish()
    }

    /// Same result as [`Flock::advance`], with agents updated on the rayon
    /// pool.
    #[cfg(feature = "parallel")]
    pub fn advance_parallel(&mut self) -> TickReport {
        use rayon::prelude::*;

        self.apply_pending();

        let view = FlockView::new(&self.current);
        let config = &self.config;
        self.next
            .as_mut_slice()
            .par_iter_mut()
            .zip(self.current.as_slice().par_iter())
            .enumerate()
            .for_each(|(index, (slot, agent))| {
                *slot = agent.update(AgentId(index), view, config);
            });

        self.publish()
    }

    fn apply_pending(&mut self) {
        if let Some(config) = self.pending.take() {
            log::debug!("Applying staged configuration at tick {}", self.tick);
            self.config = config;
        }
    }

    fn publish(&mut self) -> TickReport {
        core::mem::swap(&mut self.current, &mut self.next);
        self.tick += 1;
        log::trace!("Tick {} complete for {} agents", self.tick, self.current.len());
        TickReport { tick: self.tick }
    }

    /// Stages a new configuration; it takes effect on the next tick.
    pub fn configure(&mut self, config: FlockConfig) -> Result<()> {
        config.validate()?;
        log::debug!("Staged configuration: {:?}", config);
        self.pending = Some(config);
        Ok(())
    }

    /// Stages new rule weights on top of the latest configuration.
    pub fn set_weights(&mut self, weights: Weights) -> Result<()> {
        self.configure(self.latest_config().with_weights(weights))
    }

    /// Stages new boundary dimensions on top of the latest configuration.
    pub fn resize(&mut self, width: f32, height: f32) -> Result<()> {
        self.configure(self.latest_config().with_boundary(width, height))
    }

    fn latest_config(&self) -> FlockConfig {
        self.pending.unwrap_or(self.config)
    }

    /// Configuration used by the most recent tick.
    pub fn config(&self) -> &FlockConfig {
        &self.config
    }

    /// Configuration waiting for the next tick boundary, if any.
    pub fn pending_config(&self) -> Option<&FlockConfig> {
        self.pending.as_ref()
    }

    /// Agent state as of the last completed tick, in id order.
    pub fn population(&self) -> &[Agent] {
        &self.current
    }

    pub fn view(&self) -> FlockView<'_> {
        FlockView::new(&self.current)
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }
}
