//! Timeline core: pure control-surface state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{parse_delay, AppState, RunId, RunResultKind, SessionState, DEFAULT_DELAY_MS};
pub use update::update;
pub use view_model::AppViewModel;
