//! Collaborator traits
//!
//! These traits define the interface between the bridge logic and the
//! display implementation.

pub mod render;

pub use render::{Icon, MenuSnapshot, RenderSink};
