//module tree
mod airport;
mod backpack;
mod observer;
mod strategy;

//API exports
pub use airport::*;
pub use backpack::*;
pub use observer::*;
pub use strategy::*;
