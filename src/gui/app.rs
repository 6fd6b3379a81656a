//! EHCP Report Main Application
//! Main window with control panel and report viewer.

use crate::data::{TableKind, UPLOAD_EXTENSIONS};
use crate::gui::{ControlPanel, ControlPanelAction, ReportViewer, StatusKind};
use crate::pipeline::{self, GenerateOutcome, MISSING_UPLOADS};
use egui::SidePanel;
use tracing::info;

/// Main application window.
pub struct ReportApp {
    control_panel: ControlPanel,
    report_viewer: ReportViewer,
}

impl ReportApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            control_panel: ControlPanel::new(),
            report_viewer: ReportViewer::new(),
        }
    }

    /// Pick a file for one upload slot
    fn handle_browse(&mut self, kind: TableKind) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV/Excel Files", UPLOAD_EXTENSIONS)
            .pick_file()
        {
            info!("{} selected: {}", kind.label(), path.display());
            *self.control_panel.uploads.slot_mut(kind) = Some(path);
            self.report_viewer.clear();
            self.control_panel.set_status(StatusKind::Info, "Ready");
        }
    }

    fn handle_clear(&mut self, kind: TableKind) {
        self.control_panel.clear_upload(kind);
        self.report_viewer.clear();
    }

    /// Run the load-and-generate sequence for the current uploads
    fn handle_generate(&mut self) {
        self.report_viewer.clear();

        let outcome =
            pipeline::run_today(&self.control_panel.uploads, &self.control_panel.settings);

        match outcome {
            GenerateOutcome::MissingUploads => {
                self.control_panel
                    .set_status(StatusKind::Error, MISSING_UPLOADS);
            }
            GenerateOutcome::LoadFailed(errors) => {
                self.control_panel.status.clear();
                for error in errors {
                    self.control_panel.push_status(StatusKind::Error, error);
                }
            }
            GenerateOutcome::Generated { reports, warnings } => {
                self.control_panel.set_status(
                    StatusKind::Info,
                    format!("Generated {} reports", reports.len()),
                );
                for warning in warnings {
                    self.control_panel.push_status(StatusKind::Warning, warning);
                }
                self.report_viewer.set_reports(reports);
            }
        }
    }
}

impl eframe::App for ReportApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::Browse(kind) => self.handle_browse(kind),
                        ControlPanelAction::Clear(kind) => self.handle_clear(kind),
                        ControlPanelAction::Generate => self.handle_generate(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Report Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.report_viewer.show(ui);
        });
    }
}
