pub mod driver;
pub mod settings;

/// Largest population the command-line host can simulate.
pub const MAX_POPULATION: usize = 4096;

/// Agent population used when none is requested.
pub const DEFAULT_POPULATION: usize = 1000;
