pub mod layout;
mod adapter;
mod backend;
mod dolphin;

#[cfg(test)]
pub mod mock;

pub use adapter::*;
pub use backend::*;
pub use dolphin::DolphinBackend;

#[cfg(test)]
pub use mock::MockBackend;
