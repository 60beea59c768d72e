pub mod auth;
pub mod board;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod discovery;
pub mod error;
pub mod event_log;
pub mod gate;
pub mod scenario;
pub mod simulation;
pub mod timeline;
pub mod types;

pub use error::{Result, SimError};
