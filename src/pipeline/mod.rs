pub mod desk;
pub mod event;
pub mod factory;
pub mod state;
pub mod transcript;

pub use desk::TriageDesk;
pub use event::{Event, StateDelta};
pub use state::{DashboardState, View};
