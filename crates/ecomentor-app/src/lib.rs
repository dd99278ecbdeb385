//! Application layer: screen controls, notification dispatch, session and
//! deep-link routing on top of `ecomentor-api`.

mod context;
pub mod control;
mod guard;
pub mod notify;
pub mod router;

pub use context::{AppContext, AppSettings, Session};
pub use guard::MountGuard;
pub use notify::{DispatchOutcome, Dispatcher, PushRegistry};
pub use router::{NavigationEvent, Navigator, Route, Router};
