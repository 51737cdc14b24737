mod location;
mod options;
mod pool;
mod region;
mod slot;

pub use location::*;
pub use options::*;
pub use pool::*;
pub use region::*;
pub use slot::*;
