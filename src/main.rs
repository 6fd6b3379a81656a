//! EHCP Review Report Generator - desktop entry point

use anyhow::anyhow;
use eframe::egui;
use ehcp_report::gui::ReportApp;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> anyhow::Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("EHCP Review Report Generator"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "EHCP Review Report Generator",
        options,
        Box::new(|cc| Ok(Box::new(ReportApp::new(cc)))),
    )
    .map_err(|e| anyhow!("failed to start UI: {}", e))
}
