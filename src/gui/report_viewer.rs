//! Report Viewer Widget
//! Central scrollable panel listing one read-only text area per student report.

use egui::{RichText, ScrollArea};

const REPORT_ROWS: usize = 18;
const REPORT_HEIGHT: f32 = 300.0;
const REPORT_SPACING: f32 = 15.0;

/// Scrollable list of generated reports.
#[derive(Default)]
pub struct ReportViewer {
    pub reports: Vec<String>,
}

impl ReportViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.reports.clear();
    }

    pub fn set_reports(&mut self, reports: Vec<String>) {
        self.reports = reports;
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        if self.reports.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new("Upload all three files and press Generate Report")
                        .size(16.0)
                        .weak(),
                );
            });
            return;
        }

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for (idx, report) in self.reports.iter().enumerate() {
                    ui.label(RichText::new("Generated Report").size(14.0).strong());
                    ui.add_space(4.0);

                    ScrollArea::vertical()
                        .id_salt(("report_scroll", idx))
                        .max_height(REPORT_HEIGHT)
                        .show(ui, |ui| {
                            // A `&str` buffer keeps the text area read-only.
                            let mut text = report.as_str();
                            ui.add(
                                egui::TextEdit::multiline(&mut text)
                                    .id_salt(("report", idx))
                                    .desired_rows(REPORT_ROWS)
                                    .desired_width(f32::INFINITY)
                                    .font(egui::TextStyle::Monospace),
                            );
                        });

                    ui.add_space(REPORT_SPACING);
                }
            });
    }
}
