//! Board geometry and placement rules
//!
//! This module contains spatial-related functionality including:
//! - Cell coordinates and directions
//! - The editable board and its arrow slots
//! - Statically defined levels

/// Cell coordinates and cardinal directions
pub mod direction;
/// Board state and arrow placement
pub mod grid;
/// Level layouts
pub mod level;

pub use grid::Board;
