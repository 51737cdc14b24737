//! Session boundary.
//!
//! The multiworld session itself lives outside this crate. Inbound facts
//! arrive as [`SessionEvent`]s; outbound notices go through [`SessionLink`].

mod events;
mod link;
mod local;
mod log;
#[cfg(test)]
pub mod recording;

pub use events::*;
pub use link::*;
pub use local::*;
pub use log::*;
#[cfg(test)]
pub use recording::RecordingSession;
