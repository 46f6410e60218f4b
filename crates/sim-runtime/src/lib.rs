#![deny(warnings)]

//! Game session runtime.
//!
//! [`GameSession`] owns the whole game state and is the only thing that
//! mutates it. A UI drives it by ticking the clock and submitting commands;
//! each command either applies completely or is rejected with a
//! [`CommandError`] and leaves the state untouched.

pub mod alliances;
pub mod clock;
pub mod commands;
pub mod events;
pub mod lifecycle;
pub mod rankings;
pub mod session;

pub use clock::{Clock, GameSpeed};
pub use commands::CommandError;
pub use events::EventBoard;
pub use rankings::Ranking;
pub use session::{GameSession, GameState, Notice, RouteStatus};
