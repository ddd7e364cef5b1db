mod audit;
mod auth;
mod screens;
mod tickets;

pub use audit::*;
pub use auth::*;
pub use screens::*;
pub use tickets::*;
