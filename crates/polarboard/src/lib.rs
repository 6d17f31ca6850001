pub mod config;
pub mod events;
pub mod protocol;
pub mod render;
pub mod sys;
