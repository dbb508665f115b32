//! Accounts and browser sessions for the paddock site.
//!
//! Sessions are opaque random tokens held by the client. The server only
//! stores the SHA-256 digest of a token, so a leaked `session` table cannot be
//! replayed as cookies. Validation slides the expiry forward once a session
//! has used up half of its lifetime.

pub mod clock;
mod command;
pub mod password;
mod session;
mod store;
pub mod token;
mod types;

pub use clock::{Clock, SystemClock};
pub use command::*;
pub use session::*;
pub use store::*;
pub use types::*;

pub use paddock_shared::user::Role;
