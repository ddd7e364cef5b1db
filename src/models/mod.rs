mod audit_log;
mod ticket;
mod user;

pub use audit_log::*;
pub use ticket::*;
pub use user::*;
