//module tree
mod engine;
mod envelope;
mod events;
mod heartbeat;
mod outbound;
mod session_handle;

//API exports
pub use engine::*;
pub use envelope::*;
pub use events::*;
pub use heartbeat::*;
pub use outbound::*;
pub use session_handle::*;
