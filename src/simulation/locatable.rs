//! Trait for entities that have a position and advance once per tick.
//!
//! Birds and gates both implement it; the game loop advances them through
//! this interface.

/// Trait for entities with a position that are updated every tick.
pub trait Locatable {
    /// Reference point of the entity in screen coordinates.
    fn pos(&self) -> (f32, f32);

    /// Advances the entity by one tick.
    ///
    /// # Returns
    ///
    /// `false` once the entity has left the region it is tracked in.
    fn update(&mut self) -> bool;
}
