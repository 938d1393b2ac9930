//! Overworld: walkability, player movement and the follow camera.

pub mod camera;
pub mod movement;
pub mod walkability;

pub use camera::Camera;
pub use movement::{Facing, HeldDirections, MoveOutcome, Player};
pub use walkability::{CellRect, WalkabilityIndex};
