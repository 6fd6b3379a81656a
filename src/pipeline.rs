//! Generation Pipeline
//! One "Generate Report" run: check uploads, load tables, build reports.

use crate::data::{load_data, schema, TableKind};
use crate::report::{generate_report, report_date, ReportSettings};
use chrono::NaiveDate;
use polars::prelude::DataFrame;
use std::path::PathBuf;
use tracing::{info, warn};

pub const MISSING_UPLOADS: &str = "Please upload all required files.";

/// Paths chosen for the three uploads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Uploads {
    pub students: Option<PathBuf>,
    pub feedback: Option<PathBuf>,
    pub grades: Option<PathBuf>,
}

impl Uploads {
    pub fn is_complete(&self) -> bool {
        self.students.is_some() && self.feedback.is_some() && self.grades.is_some()
    }

    pub fn slot(&self, kind: TableKind) -> Option<&PathBuf> {
        match kind {
            TableKind::Students => self.students.as_ref(),
            TableKind::Feedback => self.feedback.as_ref(),
            TableKind::Grades => self.grades.as_ref(),
        }
    }

    pub fn slot_mut(&mut self, kind: TableKind) -> &mut Option<PathBuf> {
        match kind {
            TableKind::Students => &mut self.students,
            TableKind::Feedback => &mut self.feedback,
            TableKind::Grades => &mut self.grades,
        }
    }
}

/// Result of a run, handed to the UI for display.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerateOutcome {
    /// At least one upload slot is empty; nothing was loaded.
    MissingUploads,
    /// One message per file that failed to parse.
    LoadFailed(Vec<String>),
    Generated {
        reports: Vec<String>,
        warnings: Vec<String>,
    },
}

/// Run for today's local date, as the UI does on each click.
pub fn run_today(uploads: &Uploads, settings: &ReportSettings) -> GenerateOutcome {
    run(uploads, settings, report_date())
}

/// Run the whole load-and-generate sequence synchronously.
pub fn run(uploads: &Uploads, settings: &ReportSettings, date: NaiveDate) -> GenerateOutcome {
    if !uploads.is_complete() {
        warn!("generation requested with missing uploads");
        return GenerateOutcome::MissingUploads;
    }

    let mut errors = Vec::new();
    let mut load = |kind: TableKind| -> Option<DataFrame> {
        match load_data(uploads.slot(kind).map(PathBuf::as_path)) {
            Ok(df) => df,
            Err(e) => {
                errors.push(e.user_message());
                None
            }
        }
    };

    // Every file is attempted so all load errors show together.
    let students = load(TableKind::Students);
    let feedback = load(TableKind::Feedback);
    let grades = load(TableKind::Grades);

    let (Some(students), Some(feedback), Some(grades)) = (students, feedback, grades) else {
        return GenerateOutcome::LoadFailed(errors);
    };

    let warnings: Vec<String> = [
        (TableKind::Students, &students),
        (TableKind::Feedback, &feedback),
        (TableKind::Grades, &grades),
    ]
    .into_iter()
    .flat_map(|(kind, df)| schema::validate(kind, df))
    .map(|w| {
        warn!("{}", w);
        w.to_string()
    })
    .collect();

    let reports = generate_report(&students, &feedback, &grades, settings, date);
    info!(
        "run complete: {} reports, {} warnings",
        reports.len(),
        warnings.len()
    );

    GenerateOutcome::Generated { reports, warnings }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_uploads_are_rejected_before_loading() {
        let uploads = Uploads {
            students: Some(PathBuf::from("does_not_exist.csv")),
            feedback: None,
            grades: Some(PathBuf::from("does_not_exist.csv")),
        };

        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(
            run(&uploads, &ReportSettings::default(), date),
            GenerateOutcome::MissingUploads
        );
    }

    #[test]
    fn run_today_checks_uploads_first() {
        assert_eq!(
            run_today(&Uploads::default(), &ReportSettings::default()),
            GenerateOutcome::MissingUploads
        );
    }

    #[test]
    fn slots_are_addressed_by_table_kind() {
        let mut uploads = Uploads::default();
        *uploads.slot_mut(TableKind::Grades) = Some(PathBuf::from("g.csv"));

        assert_eq!(
            uploads.slot(TableKind::Grades),
            Some(&PathBuf::from("g.csv"))
        );
        assert!(!uploads.is_complete());
    }
}
