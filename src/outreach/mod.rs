// src/outreach/mod.rs

pub mod batch;
pub mod definitions;
pub mod events;
pub mod plugin;
pub mod resources;
pub mod selection;

pub(crate) mod systems;

pub use plugin::OutreachPlugin;

