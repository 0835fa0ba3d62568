mod client;
mod handle;

pub use client::*;
pub use handle::*;
