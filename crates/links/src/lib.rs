#![forbid(unsafe_code)]

mod generator;
mod linker;
mod resolver;

pub use generator::*;
pub use linker::*;
pub use resolver::*;
