pub mod client;
pub mod config;
pub mod error;
pub mod protocol;
pub mod proxy;

pub use error::{Error, Result};
