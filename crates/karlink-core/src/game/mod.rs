mod clock;
mod probe;

pub use clock::*;
pub use probe::*;
