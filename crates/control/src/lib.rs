//! Control systems for a swerve module
//!
//! This crate provides:
//! - PIDF controllers with continuous input for closed-loop control
//! - The swerve module controller tying drive and turning loops together
//! - Module configuration and validation

pub mod config;
pub mod pidf;
pub mod swerve_module;

pub use config::*;
pub use pidf::*;
pub use swerve_module::*;
