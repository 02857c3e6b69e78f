//module tree
mod talent_api;
mod users;

//API exports
pub use talent_api::*;
pub use users::*;
