mod apply;
mod stat;
mod table;

pub use apply::*;
pub use stat::*;
pub use table::*;
