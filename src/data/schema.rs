//! Table Schema Module
//! Expected column names for the three uploads and the name-matching policy.

use polars::prelude::*;
use std::borrow::Cow;
use std::fmt;

pub const NAME: &str = "Name";
pub const EHCP_TARGETS: &str = "EHCP Targets";
pub const FEEDBACK: &str = "Feedback";
pub const CHALLENGES: &str = "Challenges";
pub const SUGGESTED_TARGETS: &str = "Suggested Targets";

/// Which of the three uploads a table came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Students,
    Feedback,
    Grades,
}

impl TableKind {
    /// Columns the report generator reads from this table.
    pub fn expected_columns(self) -> &'static [&'static str] {
        match self {
            TableKind::Students => &[NAME, EHCP_TARGETS],
            TableKind::Feedback => &[NAME, FEEDBACK, CHALLENGES, SUGGESTED_TARGETS],
            TableKind::Grades => &[NAME],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TableKind::Students => "Student data",
            TableKind::Feedback => "Teacher feedback",
            TableKind::Grades => "Grade data",
        }
    }
}

/// Non-blocking schema problem found in an uploaded table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaWarning {
    MissingColumn { table: TableKind, column: &'static str },
    NoNumericSubjects,
}

impl fmt::Display for SchemaWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaWarning::MissingColumn { table, column } => {
                write!(f, "{} has no '{}' column", table.label(), column)
            }
            SchemaWarning::NoNumericSubjects => {
                write!(f, "Grade data has no numeric subject columns")
            }
        }
    }
}

/// Returns true for the dtypes that take part in the school average.
pub fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Flag expected columns that are absent. Generation still proceeds.
pub fn validate(kind: TableKind, df: &DataFrame) -> Vec<SchemaWarning> {
    let mut warnings: Vec<SchemaWarning> = kind
        .expected_columns()
        .iter()
        .copied()
        .filter(|column| df.column(column).is_err())
        .map(|column| SchemaWarning::MissingColumn {
            table: kind,
            column,
        })
        .collect();

    if kind == TableKind::Grades {
        let has_numeric = df
            .get_columns()
            .iter()
            .skip(1)
            .any(|col| is_numeric(col.dtype()));
        if !has_numeric {
            warnings.push(SchemaWarning::NoNumericSubjects);
        }
    }

    warnings
}

/// How student names are compared when joining tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameMatching {
    /// Byte-for-byte equality.
    #[default]
    Exact,
    /// Trimmed and case-folded before comparing.
    Normalized,
}

impl NameMatching {
    pub fn key<'a>(self, name: &'a str) -> Cow<'a, str> {
        match self {
            NameMatching::Exact => Cow::Borrowed(name),
            NameMatching::Normalized => Cow::Owned(name.trim().to_lowercase()),
        }
    }
}
