//! Core types for swerve module control
//!
//! This crate provides:
//! - Bounded planar rotations and the module state/position value types
//! - Drive mechanics constants and encoder count conversion
//! - Capability traits for motors, sensors and feedback controllers
//! - The hardware fault type shared by every hardware layer

pub mod angle;
pub mod constants;
pub mod error;
pub mod state;
pub mod traits;

pub use angle::*;
pub use constants::*;
pub use error::*;
pub use state::*;
pub use traits::*;
