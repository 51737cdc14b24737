mod checklist;
mod reconciler;
mod status;
mod wake;

pub use checklist::*;
pub use reconciler::*;
pub use status::*;
pub use wake::*;
