/// Infinite-loop detection strategies
pub mod cycle;
/// Seeded search for the longest finite path
pub mod search;
/// Token stepping and run state machine
pub mod simulator;
/// Junction state for dual-arrow cells
pub mod switches;
