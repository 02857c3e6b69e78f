//module tree
mod connection;
mod websocket;

//API exports
pub use connection::*;
pub use websocket::*;
