// src/ui/elements/popups.rs
pub mod alert_popup;
pub mod preview_popup;
pub mod send_confirm_popup;
pub mod settings_popup;

pub use alert_popup::show_alert_popup;
pub use preview_popup::show_preview_popup;
pub use send_confirm_popup::show_send_confirm_popup;
pub use settings_popup::{open_settings_popup, show_settings_popup};
