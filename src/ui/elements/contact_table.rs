// src/ui/elements/contact_table.rs
use bevy_egui::egui;
use egui_extras::{Column, TableBuilder};

use crate::outreach::selection::RowSelection;

const ROW_HEIGHT: f32 = 24.0;
const DISPLAY_FIELDS: [(&str, &str); 3] = [("Name", "name"), ("Email", "email"), ("Channel", "channel")];

/// What the user clicked in the table this frame. Applied after the table is
/// drawn so rendering only needs shared access to the rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableAction {
    Toggle(i64),
    ToggleAll,
    Preview(i64),
}

/// Applies selection actions and returns the row indices to preview. A
/// locked selection ignores toggles; previews still go through.
pub fn apply_table_actions(selection: &mut RowSelection, actions: &[TableAction], locked: bool) -> Vec<i64> {
    let mut previews = Vec::new();
    for action in actions {
        match *action {
            TableAction::Preview(row_index) => previews.push(row_index),
            _ if locked => {}
            TableAction::Toggle(row_index) => {
                selection.toggle(row_index);
            }
            TableAction::ToggleAll => selection.toggle_all(),
        }
    }
    previews
}

pub fn contact_table(ui: &mut egui::Ui, selection: &RowSelection) -> Vec<TableAction> {
    let mut actions = Vec::new();
    let rows = selection.rows();

    let mut builder = TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::exact(32.0));
    for _ in DISPLAY_FIELDS {
        builder = builder.column(Column::auto().at_least(140.0).clip(true));
    }
    builder
        .column(Column::remainder().at_least(80.0))
        .header(ROW_HEIGHT, |mut header| {
            header.col(|ui| {
                let mut all = selection.all_selected();
                if ui.checkbox(&mut all, "").on_hover_text("Select all / none").clicked() {
                    actions.push(TableAction::ToggleAll);
                }
            });
            for (title, _) in DISPLAY_FIELDS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
            header.col(|ui| {
                ui.strong("Actions");
            });
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, rows.len(), |mut table_row| {
                let row = &rows[table_row.index()];
                let row_index = row.row_index;
                let selected = selection.is_selected(row_index);
                table_row.set_selected(selected);
                table_row.col(|ui| {
                    let mut checked = selected;
                    if ui.checkbox(&mut checked, "").clicked() {
                        actions.push(TableAction::Toggle(row_index));
                    }
                });
                for (_, field) in DISPLAY_FIELDS {
                    table_row.col(|ui| {
                        ui.label(row.display_field(field));
                    });
                }
                table_row.col(|ui| {
                    if ui.small_button("Preview").on_hover_text("Preview Email").clicked() {
                        actions.push(TableAction::Preview(row_index));
                    }
                });
            });
        });

    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::stub::row;

    #[test]
    fn actions_update_selection_and_collect_previews() {
        let mut selection = RowSelection::new(vec![row(0, "A", "a@x"), row(1, "B", "b@x")]);
        let previews = apply_table_actions(
            &mut selection,
            &[TableAction::Toggle(1), TableAction::Preview(0), TableAction::Preview(0)],
            false,
        );
        assert_eq!(previews, vec![0, 0]);
        assert_eq!(selection.selected_indices(), vec![1]);

        apply_table_actions(&mut selection, &[TableAction::ToggleAll], false);
        assert!(selection.all_selected());
        apply_table_actions(&mut selection, &[TableAction::ToggleAll], false);
        assert!(selection.is_empty());
    }

    #[test]
    fn locked_selection_only_lets_previews_through() {
        let mut selection = RowSelection::new(vec![row(0, "A", "a@x"), row(1, "B", "b@x")]);
        selection.toggle(0);
        let previews = apply_table_actions(
            &mut selection,
            &[TableAction::ToggleAll, TableAction::Toggle(1), TableAction::Preview(1)],
            true,
        );
        assert_eq!(previews, vec![1]);
        assert_eq!(selection.selected_indices(), vec![0]);
    }
}
