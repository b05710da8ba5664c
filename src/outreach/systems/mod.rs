// src/outreach/systems/mod.rs
// Systems bridging Bevy events to the gateway. Remote calls run on the tokio
// runtime; their results come back as events on the main thread.

pub mod config;
pub mod dispatch;
pub mod fetch;
pub mod preview;
pub mod upload;
