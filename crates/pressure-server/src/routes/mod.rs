pub mod admin;
pub mod crisis;
pub mod discovery;
pub mod event_log;
pub mod events;
pub mod news;
pub mod pages;
pub mod state;
pub mod teams;
