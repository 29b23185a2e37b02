//! Headless driver for the ROAM terrain engine.
//!
//! Builds a landscape from configuration, flies an orbiting camera over it
//! for a fixed number of frames, and can export the last frame as OBJ.

pub mod driver;
mod error;
pub mod obj;
pub mod platform;

pub use error::AppError;
