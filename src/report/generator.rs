//! Report Generator Module
//! Joins feedback and grade rows onto each student and renders the review text.

use super::averages::SchoolAverages;
use crate::data::schema::{
    NameMatching, CHALLENGES, EHCP_TARGETS, FEEDBACK, NAME, SUGGESTED_TARGETS,
};
use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info};

pub const NO_TARGETS: &str = "No targets provided";
pub const NO_FEEDBACK: &str = "No feedback available.";
pub const NO_CHALLENGES: &str = "No key challenges noted.";
pub const NO_SUGGESTED_TARGETS: &str = "No targets suggested.";
pub const NO_GRADES: &str = "No grade data available.";

/// Shown for a missing score or an average that cannot be computed.
const NOT_AVAILABLE: &str = "N/A";

/// Options for a generation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSettings {
    pub name_matching: NameMatching,
}

/// Collected values for one student, rendered through `Display`.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentReport {
    pub date: NaiveDate,
    pub student_name: String,
    pub ehcp_targets: String,
    pub teacher_feedback: String,
    pub key_challenges: String,
    pub suggested_targets: String,
    pub grade_comparison: String,
}

impl fmt::Display for StudentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "**EHCP Review Meeting – {}**",
            self.date.format("%Y-%m-%d")
        )?;
        writeln!(f)?;
        writeln!(f, "**Student Name:** {}", self.student_name)?;
        writeln!(f)?;
        writeln!(f, "**EHCP Targets:**\n{}", self.ehcp_targets)?;
        writeln!(f)?;
        writeln!(f, "**Teacher Feedback:**\n{}", self.teacher_feedback)?;
        writeln!(f)?;
        writeln!(f, "**Key Challenges:**\n{}", self.key_challenges)?;
        writeln!(f)?;
        writeln!(f, "**Suggested Future Targets:**\n{}", self.suggested_targets)?;
        writeln!(f)?;
        write!(f, "**Grade Comparison:**\n{}", self.grade_comparison)
    }
}

/// Build one report per student row, in row order.
pub fn build_reports(
    students: &DataFrame,
    feedback: &DataFrame,
    grades: &DataFrame,
    settings: &ReportSettings,
    date: NaiveDate,
) -> Vec<StudentReport> {
    let matching = settings.name_matching;
    let feedback_keys = name_keys(feedback, matching);
    let grade_keys = name_keys(grades, matching);
    let averages = SchoolAverages::from_grades(grades);

    let reports: Vec<StudentReport> = (0..students.height())
        .map(|row| {
            let name = cell_text(students, NAME, row);
            let key = name.as_deref().map(|n| matching.key(n).into_owned());

            let feedback_rows = matching_rows(&feedback_keys, key.as_deref());
            let grade_row = matching_rows(&grade_keys, key.as_deref()).first().copied();
            debug!(
                "student {:?}: {} feedback rows, grade row {:?}",
                name,
                feedback_rows.len(),
                grade_row
            );

            StudentReport {
                date,
                student_name: name.unwrap_or_default(),
                ehcp_targets: cell_text(students, EHCP_TARGETS, row)
                    .unwrap_or_else(|| NO_TARGETS.to_string()),
                teacher_feedback: summarize_feedback(feedback, &feedback_rows),
                key_challenges: join_distinct(feedback, CHALLENGES, &feedback_rows)
                    .unwrap_or_else(|| NO_CHALLENGES.to_string()),
                suggested_targets: join_distinct(feedback, SUGGESTED_TARGETS, &feedback_rows)
                    .unwrap_or_else(|| NO_SUGGESTED_TARGETS.to_string()),
                grade_comparison: grade_row
                    .map(|r| compare_grades(grades, r, &averages))
                    .unwrap_or_else(|| NO_GRADES.to_string()),
            }
        })
        .collect();

    info!("generated {} reports for {}", reports.len(), date);
    reports
}

/// Render the review text for every student row.
pub fn generate_report(
    students: &DataFrame,
    feedback: &DataFrame,
    grades: &DataFrame,
    settings: &ReportSettings,
    date: NaiveDate,
) -> Vec<String> {
    build_reports(students, feedback, grades, settings, date)
        .iter()
        .map(ToString::to_string)
        .collect()
}

/// Date stamped on reports: the local calendar day.
pub fn report_date() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Feedback notes in row order, one per line. Repeated notes are kept.
fn summarize_feedback(feedback: &DataFrame, rows: &[usize]) -> String {
    let notes: Vec<String> = rows
        .iter()
        .filter_map(|&row| cell_text(feedback, FEEDBACK, row))
        .collect();

    if notes.is_empty() {
        NO_FEEDBACK.to_string()
    } else {
        notes.join("\n")
    }
}

/// Distinct non-empty values of a column in first-seen order, comma-joined.
fn join_distinct(df: &DataFrame, column: &str, rows: &[usize]) -> Option<String> {
    let mut seen = HashSet::new();
    let values: Vec<String> = rows
        .iter()
        .filter_map(|&row| cell_text(df, column, row))
        .filter(|value| !value.is_empty())
        .filter(|value| seen.insert(value.clone()))
        .collect();

    if values.is_empty() {
        None
    } else {
        Some(values.join(", "))
    }
}

/// One line per subject column. The first column holds the name and is skipped.
fn compare_grades(grades: &DataFrame, row: usize, averages: &SchoolAverages) -> String {
    grades
        .get_columns()
        .iter()
        .skip(1)
        .map(|col| {
            let score = col
                .get(row)
                .ok()
                .and_then(|value| format_value(&value))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string());
            let average = averages
                .get(col.name().as_str())
                .map(|mean| format!("{:.2}", mean))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string());
            format!("{}: {} (School Avg: {})", col.name(), score, average)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Join key of every row, `None` where the name is missing.
fn name_keys(df: &DataFrame, matching: NameMatching) -> Vec<Option<String>> {
    (0..df.height())
        .map(|row| cell_text(df, NAME, row).map(|name| matching.key(&name).into_owned()))
        .collect()
}

fn matching_rows(keys: &[Option<String>], key: Option<&str>) -> Vec<usize> {
    let Some(key) = key else {
        return Vec::new();
    };

    keys.iter()
        .enumerate()
        .filter(|(_, k)| k.as_deref() == Some(key))
        .map(|(i, _)| i)
        .collect()
}

fn cell_text(df: &DataFrame, column: &str, row: usize) -> Option<String> {
    let value = df.column(column).ok()?.get(row).ok()?;
    format_value(&value)
}

/// Display text for a cell. Nulls and NaNs have none.
fn format_value(value: &AnyValue<'_>) -> Option<String> {
    match value {
        AnyValue::Null => None,
        AnyValue::String(s) => Some(s.to_string()),
        AnyValue::StringOwned(s) => Some(s.to_string()),
        AnyValue::Float32(v) => format_float(*v as f64),
        AnyValue::Float64(v) => format_float(*v),
        other => Some(other.to_string()),
    }
}

/// Whole floats keep one decimal place, as they appear in spreadsheet exports.
fn format_float(v: f64) -> Option<String> {
    if v.is_nan() {
        None
    } else if v.is_finite() && v.fract() == 0.0 {
        Some(format!("{:.1}", v))
    } else {
        Some(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn grades() -> DataFrame {
        df!(
            "Name" => ["Alice", "Bob"],
            "Math" => [80i64, 60],
            "Reading" => [90i64, 70]
        )
        .unwrap()
    }

    fn empty_feedback() -> DataFrame {
        df!(
            "Name" => Vec::<String>::new(),
            "Feedback" => Vec::<String>::new(),
            "Challenges" => Vec::<String>::new(),
            "Suggested Targets" => Vec::<String>::new()
        )
        .unwrap()
    }

    #[test]
    fn one_report_per_student_in_row_order() {
        let students = df!(
            "Name" => ["Cara", "Alice", "Bob"],
            "EHCP Targets" => ["A", "B", "C"]
        )
        .unwrap();

        let reports = build_reports(
            &students,
            &empty_feedback(),
            &grades(),
            &ReportSettings::default(),
            date(),
        );

        let names: Vec<&str> = reports.iter().map(|r| r.student_name.as_str()).collect();
        assert_eq!(names, vec!["Cara", "Alice", "Bob"]);
    }

    #[test]
    fn grade_lines_compare_against_school_average() {
        let students = df!("Name" => ["Alice"], "EHCP Targets" => ["Read more"]).unwrap();

        let reports = build_reports(
            &students,
            &empty_feedback(),
            &grades(),
            &ReportSettings::default(),
            date(),
        );

        assert_eq!(
            reports[0].grade_comparison,
            "Math: 80 (School Avg: 70.00)\nReading: 90 (School Avg: 80.00)"
        );
    }

    #[test]
    fn unmatched_student_gets_placeholders() {
        let students = df!("Name" => ["Sam"], "EHCP Targets" => ["Improve reading"]).unwrap();

        let text = generate_report(
            &students,
            &empty_feedback(),
            &grades(),
            &ReportSettings::default(),
            date(),
        );

        assert_eq!(text.len(), 1);
        for expected in [
            "Improve reading",
            NO_FEEDBACK,
            NO_CHALLENGES,
            NO_SUGGESTED_TARGETS,
            NO_GRADES,
        ] {
            assert!(text[0].contains(expected), "missing {:?}", expected);
        }
    }

    #[test]
    fn feedback_is_concatenated_and_challenges_deduplicated() {
        let students = df!("Name" => ["Alice"]).unwrap();
        let feedback = df!(
            "Name" => ["Alice", "Bob", "Alice", "Alice"],
            "Feedback" => ["Works hard", "Quiet", "Works hard", "Asks questions"],
            "Challenges" => [Some("Focus"), Some("Noise"), None, Some("Focus")],
            "Suggested Targets" => [Some("Read daily"), None, Some("Spelling"), Some("Read daily")]
        )
        .unwrap();

        let report = &build_reports(
            &students,
            &feedback,
            &grades(),
            &ReportSettings::default(),
            date(),
        )[0];

        assert_eq!(
            report.teacher_feedback,
            "Works hard\nWorks hard\nAsks questions"
        );
        assert_eq!(report.key_challenges, "Focus");
        assert_eq!(report.suggested_targets, "Read daily, Spelling");
        assert_eq!(report.ehcp_targets, NO_TARGETS);
    }

    #[test]
    fn header_carries_iso_date() {
        let students = df!("Name" => ["Alice"]).unwrap();
        let text = generate_report(
            &students,
            &empty_feedback(),
            &grades(),
            &ReportSettings::default(),
            date(),
        );

        let header = text[0].lines().next().unwrap();
        assert!(header.contains("2024-03-01"));
        assert!(header.starts_with("**EHCP Review Meeting"));
    }

    #[test]
    fn sections_appear_in_template_order() {
        let students = df!("Name" => ["Alice"]).unwrap();
        let text = &generate_report(
            &students,
            &empty_feedback(),
            &grades(),
            &ReportSettings::default(),
            date(),
        )[0];

        let positions: Vec<usize> = [
            "**Student Name:** Alice",
            "**EHCP Targets:**",
            "**Teacher Feedback:**",
            "**Key Challenges:**",
            "**Suggested Future Targets:**",
            "**Grade Comparison:**",
        ]
        .iter()
        .map(|heading| text.find(heading).unwrap())
        .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn exact_matching_is_whitespace_and_case_sensitive() {
        let students = df!("Name" => [" alice"]).unwrap();

        let exact = build_reports(
            &students,
            &empty_feedback(),
            &grades(),
            &ReportSettings::default(),
            date(),
        );
        assert_eq!(exact[0].grade_comparison, NO_GRADES);

        let settings = ReportSettings {
            name_matching: NameMatching::Normalized,
        };
        let normalized =
            build_reports(&students, &empty_feedback(), &grades(), &settings, date());
        assert!(normalized[0].grade_comparison.starts_with("Math: 80"));
    }

    #[test]
    fn only_first_grade_row_is_used() {
        let students = df!("Name" => ["Alice"]).unwrap();
        let grades = df!(
            "Name" => ["Alice", "Alice"],
            "Math" => [50i64, 100]
        )
        .unwrap();

        let report = &build_reports(
            &students,
            &empty_feedback(),
            &grades,
            &ReportSettings::default(),
            date(),
        )[0];

        assert_eq!(report.grade_comparison, "Math: 50 (School Avg: 75.00)");
    }

    #[test]
    fn non_numeric_subjects_have_no_average() {
        let students = df!("Name" => ["Alice"]).unwrap();
        let grades = df!(
            "Name" => ["Alice", "Bob"],
            "Level" => ["B", "C"],
            "Science" => [Some(72.5), None]
        )
        .unwrap();

        let report = &build_reports(
            &students,
            &empty_feedback(),
            &grades,
            &ReportSettings::default(),
            date(),
        )[0];

        assert_eq!(
            report.grade_comparison,
            "Level: B (School Avg: N/A)\nScience: 72.5 (School Avg: 72.50)"
        );
    }

    #[test]
    fn missing_name_column_still_reports_every_row() {
        let students = df!("Student" => ["Alice", "Bob"]).unwrap();

        let reports = build_reports(
            &students,
            &empty_feedback(),
            &grades(),
            &ReportSettings::default(),
            date(),
        );

        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|r| r.grade_comparison == NO_GRADES));
    }

    #[test]
    fn report_date_is_the_local_day() {
        let before = chrono::Local::now().date_naive();
        let date = report_date();
        let after = chrono::Local::now().date_naive();
        assert!(before <= date && date <= after);
    }

    #[test]
    fn whole_floats_keep_a_decimal() {
        assert_eq!(format_float(80.0).as_deref(), Some("80.0"));
        assert_eq!(format_float(72.5).as_deref(), Some("72.5"));
        assert_eq!(format_float(f64::NAN), None);
    }
}
