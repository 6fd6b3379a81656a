//! Control Panel Widget
//! Left side panel with the three upload slots, options and the generate button.

use crate::data::{NameMatching, TableKind};
use crate::pipeline::Uploads;
use crate::report::ReportSettings;
use egui::{Color32, RichText};

const UPLOAD_SLOTS: [(TableKind, &str); 3] = [
    (TableKind::Students, "Upload Student Data (CSV/Excel)"),
    (TableKind::Feedback, "Upload Teacher Feedback (CSV/Excel)"),
    (TableKind::Grades, "Upload Grade Data (CSV/Excel)"),
];

/// Severity of a status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Warning,
    Error,
}

impl StatusKind {
    fn color(self) -> Color32 {
        match self {
            StatusKind::Info => Color32::GRAY,
            StatusKind::Warning => Color32::from_rgb(230, 160, 30),
            StatusKind::Error => Color32::from_rgb(220, 53, 69),
        }
    }
}

/// Left side control panel with upload selection and generation controls.
pub struct ControlPanel {
    pub uploads: Uploads,
    pub settings: ReportSettings,
    pub status: Vec<(StatusKind, String)>,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            uploads: Uploads::default(),
            settings: ReportSettings::default(),
            status: vec![(StatusKind::Info, "Ready".to_string())],
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all status lines with a single message
    pub fn set_status(&mut self, kind: StatusKind, message: impl Into<String>) {
        self.status = vec![(kind, message.into())];
    }

    /// Empty one upload slot and drop status lines from the previous run
    pub fn clear_upload(&mut self, kind: TableKind) {
        *self.uploads.slot_mut(kind) = None;
        self.set_status(StatusKind::Info, "Ready");
    }

    pub fn push_status(&mut self, kind: StatusKind, message: impl Into<String>) {
        self.status.push((kind, message.into()));
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("EHCP Review Report Generator")
                    .size(20.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Upload Section =====
        for (kind, label) in UPLOAD_SLOTS {
            ui.label(RichText::new(label).size(13.0).strong());
            ui.add_space(3.0);

            egui::Frame::none()
                .fill(ui.visuals().widgets.noninteractive.bg_fill)
                .rounding(5.0)
                .inner_margin(8.0)
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        let selected = self.uploads.slot(kind);
                        let path_text = selected
                            .and_then(|p| p.file_name())
                            .map(|n| n.to_string_lossy().to_string())
                            .unwrap_or_else(|| "No file selected".to_string());

                        ui.label(RichText::new(&path_text).size(12.0).color(
                            if selected.is_some() {
                                Color32::WHITE
                            } else {
                                Color32::GRAY
                            },
                        ));

                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Browse").clicked() {
                                action = ControlPanelAction::Browse(kind);
                            }
                            if selected.is_some() && ui.small_button("Clear").clicked() {
                                action = ControlPanelAction::Clear(kind);
                            }
                        });
                    });
                });

            ui.add_space(8.0);
        }

        ui.separator();
        ui.add_space(10.0);

        // ===== Options Section =====
        ui.label(RichText::new("Options").size(14.0).strong());
        ui.add_space(5.0);

        let mut normalize = self.settings.name_matching == NameMatching::Normalized;
        if ui
            .checkbox(&mut normalize, "Normalize names (trim, ignore case)")
            .changed()
        {
            self.settings.name_matching = if normalize {
                NameMatching::Normalized
            } else {
                NameMatching::Exact
            };
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Button =====
        ui.vertical_centered(|ui| {
            let button = egui::Button::new(RichText::new("Generate Report").size(16.0))
                .min_size(egui::vec2(200.0, 35.0));
            if ui.add(button).clicked() {
                action = ControlPanelAction::Generate;
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        for (kind, message) in &self.status {
            ui.label(RichText::new(message).size(11.0).color(kind.color()));
        }

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlPanelAction {
    None,
    Browse(TableKind),
    Clear(TableKind),
    Generate,
}
