//! Arrow-path puzzle engine
//!
//! A token walks from a start cell to a goal cell following player-placed arrows.
//! Cells holding two arrows act as junctions that switch every time the token
//! leaves them. The engine decides, for any arrow layout, whether the token
//! reaches the goal, gets stuck, or loops forever, and proves loops in bounded
//! time from the finite `(position, junction flags)` state space.

#![forbid(unsafe_code)]

/// Junction automaton, run simulation, cycle detection and path search
pub mod algorithm;
/// Input/output, configuration, logging and error handling
pub mod io;
/// Edit/run session control and replay
pub mod session;
/// Board geometry, levels and arrow placement rules
pub mod spatial;

pub use io::error::{GameError, Result};
