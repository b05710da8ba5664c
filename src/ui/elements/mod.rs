// src/ui/elements/mod.rs

pub mod contact_table;
pub mod main_window;
pub mod popups;
pub mod state;
pub mod top_panel;
