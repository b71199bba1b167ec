#![forbid(unsafe_code)]

mod category;
mod commits;
mod link;

pub use category::*;
pub use commits::*;
pub use link::*;
