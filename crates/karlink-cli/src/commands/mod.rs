//! CLI command implementations.

pub mod generate;
pub mod hexdump;
pub mod items;
pub mod probe;
pub mod run;
