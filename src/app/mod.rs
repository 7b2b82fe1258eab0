//! Selection pipeline: state machine plus the session that runs its effects

pub mod session;
pub mod shared;
pub mod state;

pub use session::Session;
pub use shared::SharedSession;
pub use state::{Action, AppState, Effect, Phase};
