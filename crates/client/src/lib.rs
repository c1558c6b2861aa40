//! Headless battle client.
//!
//! ```text
//! main (composition root)
//!   ├─→ Runtime    battle worker + clock
//!   ├─→ Commander  answers turn selections through RuntimeHandle
//!   └─→ Presenter  renders bus events to the log or stdout
//! ```
//!
//! Commander and presenter only ever talk to the runtime through
//! [`runtime::RuntimeHandle`], the same way an interactive frontend would.

pub mod commander;
pub mod config;
pub mod presenter;
pub mod roster;

pub use commander::{Commander, plan_turn};
pub use config::{AnimationMode, ClientConfig, EventFormat};
pub use presenter::Presenter;
pub use roster::{RosterFile, builtin_roster, load_roster};
