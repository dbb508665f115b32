mod error;
pub mod user;

pub use error::*;
