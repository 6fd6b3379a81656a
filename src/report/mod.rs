//! Report module - joining uploads into per-student review text

mod averages;
mod generator;

pub use averages::SchoolAverages;
pub use generator::{
    build_reports, generate_report, report_date, ReportSettings, StudentReport,
    NO_CHALLENGES, NO_FEEDBACK, NO_GRADES, NO_SUGGESTED_TARGETS, NO_TARGETS,
};
