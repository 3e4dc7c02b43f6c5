mod controller;
mod session;

pub use controller::{CountdownController, RunState};
pub use session::Session;
