//! Aggregate trait for command-driven state machines.

/// Aggregate execution semantics (pure, deterministic).
///
/// - **Decision logic**: `handle(&self, cmd)` returns events.
/// - **State mutation**: `apply(&mut self, event)` evolves state.
///
/// Aggregates must not perform IO. Callers own the side effects (HTTP calls,
/// notifications) and feed their results back in as commands.
pub trait Aggregate {
    type Command: Clone + core::fmt::Debug;
    type Event: Clone + core::fmt::Debug;
    type Error: core::fmt::Debug;

    /// Number of events applied so far.
    fn version(&self) -> u64;

    /// Evolve in-memory state from a single event.
    ///
    /// Implementations bump `version()` by one per applied event.
    fn apply(&mut self, event: &Self::Event);

    /// Decide which events to emit given the current state and a command.
    ///
    /// This must not mutate state. State evolution is done through `apply`.
    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error>;

    /// Handle a command and apply the resulting events in order.
    ///
    /// On error nothing is applied.
    fn execute(&mut self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        let events = self.handle(command)?;
        for event in &events {
            self.apply(event);
        }
        Ok(events)
    }
}
