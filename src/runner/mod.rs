//module tree
mod orchestrator;
mod session_runner;
mod statistics;
mod task_result;

//API exports
pub use orchestrator::*;
pub use session_runner::*;
pub use statistics::*;
pub use task_result::*;
