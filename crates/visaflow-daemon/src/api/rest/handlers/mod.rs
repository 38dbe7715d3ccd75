//! API request handlers

mod checks;
mod flows;
mod health;
mod packet;
mod scenarios;
mod sessions;

pub use checks::*;
pub use flows::*;
pub use health::*;
pub use packet::*;
pub use scenarios::*;
pub use sessions::*;
