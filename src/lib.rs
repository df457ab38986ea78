//! # Flappy Evo - Neuroevolution for a Flappy Bird clone
//!
//! A side-scrolling game where birds fall under gravity and must fly through
//! gaps in scrolling pipe pairs, together with a genetic algorithm that evolves
//! the feed-forward networks flying them.
//!
//! ## Features
//!
//! - Deterministic, seedable game loop with optional parallel bird updates
//! - Two-layer sigmoid networks (ndarray) with JSON persistence
//! - Truncation selection, Gaussian mutation and elitism
//! - Headless training, live visual training, human play and model replay
//!
//! ## Core Modules
//!
//! - [`simulation::game`] - The tick loop, scoring and snapshots
//! - [`simulation::bird`] - Bird physics and decisions
//! - [`simulation::gate`] - Scrolling pipe pairs
//! - [`simulation::brain`] - Neural network implementation
//! - [`simulation::evolution`] - Generational trainer

/// Core simulation logic and data structures.
pub mod simulation {
    /// Bird physics, brain-driven jumps and collision tests.
    pub mod bird;
    /// Two-layer feed-forward network used as a bird brain.
    pub mod brain;
    /// Crate error type.
    pub mod error;
    /// Bounded log of recent game events for display.
    pub mod event_log;
    /// Fitness scoring, selection and breeding of brains.
    pub mod evolution;
    /// Feature extraction from the bird's surroundings.
    pub mod features;
    /// Game state and the per-tick update.
    pub mod game;
    /// Scrolling pipe pairs with a gap.
    pub mod gate;
    /// Trait for entities that have a position and advance every tick.
    ///
    /// The [`locatable::Locatable`] trait is implemented by [`bird::Bird`]
    /// and [`gate::Gate`].
    pub mod locatable;
    /// Game, evolution and file configuration.
    pub mod params;
    /// Read-only frame views for renderers.
    pub mod snapshot;
}

pub use simulation::error::{Error, Result};
