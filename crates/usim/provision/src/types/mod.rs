mod auth;
mod status;

pub use auth::AuthVectors;
pub use status::{FirmwareVersion, SimState, SimStatus};
