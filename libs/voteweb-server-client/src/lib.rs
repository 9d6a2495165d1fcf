mod client;
mod result;

pub use client::{Client, ControlServer, CONTROL_INTEGRITY_PATH, CONTROL_PRESENCE_PATH};
pub use result::{Error, Result};
