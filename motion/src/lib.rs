pub mod motion;
pub mod sequence;
pub mod sim;
pub mod states;

pub use motion::{Drive, DriveOutcome, Motor};
pub use sequence::{Params, Sequence};
pub use states::{LineAction, RunPhase, RunState, SharedRunState, Step};
