// src/ui/systems.rs
use bevy::prelude::*;
use std::any;

use crate::outreach::events::{OutreachFeedback, PreviewFetched};
use crate::ui::elements::state::{MailerWindowState, PreviewDisplay};
use crate::ui::UiFeedbackState;

pub const PREVIEW_FAILED_MESSAGE: &str = "Failed to preview";

/// Status-line writes are last-wins; an empty message hides the line.
pub fn handle_ui_feedback(
    mut feedback_events: EventReader<OutreachFeedback>,
    mut ui_feedback_state: ResMut<UiFeedbackState>,
) {
    let Some(last) = feedback_events.read().last() else {
        return;
    };
    ui_feedback_state.last_message = last.message.clone();
    ui_feedback_state.is_error = last.is_error;
    if last.message.is_empty() {
        return;
    }
    if last.is_error {
        warn!("UI Feedback (Error): {}", last.message);
    } else {
        info!("UI Feedback: {}", last.message);
    }
}

/// Shows a fetched preview, or a blocking alert when the backend refused.
pub fn handle_preview_results(
    mut events: EventReader<PreviewFetched>,
    mut state: ResMut<MailerWindowState>,
) {
    for event in events.read() {
        match &event.result {
            Ok(preview) => {
                state.preview = Some(PreviewDisplay {
                    row_index: event.row_index,
                    preview: preview.clone(),
                });
            }
            Err(e) => {
                warn!("Preview for row {} failed: {}", event.row_index, e);
                state.alert_message = Some(PREVIEW_FAILED_MESSAGE.to_string());
            }
        }
    }
}

/// Carrier for an event produced off the main thread; `forward_events`
/// turns it back into a regular Bevy event.
#[derive(Component)]
pub struct SendEvent<E: Event> {
    pub event: E,
}

pub fn forward_events<E: Event + Clone>(
    mut commands: Commands,
    mut writer: EventWriter<E>,
    carriers: Query<(Entity, &SendEvent<E>)>,
) {
    let mut forwarded = 0usize;
    for (entity, carrier) in &carriers {
        writer.write(carrier.event.clone());
        commands.entity(entity).despawn();
        forwarded += 1;
    }
    if forwarded > 0 {
        let short_name = any::type_name::<E>().rsplit("::").next().unwrap_or("event");
        debug!("Delivered {} background {} result(s).", forwarded, short_name);
    }
}
