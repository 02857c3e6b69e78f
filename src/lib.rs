//documentation
#![doc = include_str!("../README.md")]

//module tree
mod bootstrap;
mod config;
mod errors;
mod player;
mod protocol;
mod rate_limiter;
mod runner;
mod transport;

//API exports
pub use crate::bootstrap::*;
pub use crate::config::*;
pub use crate::errors::*;
pub use crate::player::*;
pub use crate::protocol::*;
pub use crate::rate_limiter::*;
pub use crate::runner::*;
pub use crate::transport::*;
