//! Core data models for channel analytics.

mod channel;
mod video;

pub use channel::*;
pub use video::*;
