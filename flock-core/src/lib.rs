#![cfg_attr(not(feature = "std"), no_std)]

//! Reynolds flocking: alignment, cohesion and separation over a fixed
//! population, advanced one tick at a time against a snapshot of the
//! previous tick.

pub mod agent;
pub mod config;
pub mod error;
pub mod flock;
pub mod vector;

pub use agent::{behavior, Agent, AgentId, FlockView, Steering};
pub use config::{Boundary, FlockConfig, Radii, Weights};
pub use error::{ConfigError, Rule};
pub use flock::{Flock, Seed, TickReport};
pub use vector::{sample_random_velocity, Vector2D};
