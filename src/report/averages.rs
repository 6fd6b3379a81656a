//! School Averages Module
//! Per-subject means over every row of the grade table.

use crate::data::schema::is_numeric;
use polars::prelude::*;
use rayon::prelude::*;
use statrs::statistics::Statistics;
use std::collections::HashMap;

/// Mean score of each numeric column across all students.
#[derive(Debug, Clone, Default)]
pub struct SchoolAverages {
    means: HashMap<String, f64>,
}

impl SchoolAverages {
    /// Non-numeric columns are left out; nulls and NaNs are skipped.
    pub fn from_grades(grades: &DataFrame) -> Self {
        let means = grades
            .get_columns()
            .par_iter()
            .filter(|col| is_numeric(col.dtype()))
            .map(|col| (col.name().to_string(), Self::column_values(col).iter().mean()))
            .collect();

        Self { means }
    }

    /// Average for a subject, or `None` when it is non-numeric or has no scores.
    pub fn get(&self, subject: &str) -> Option<f64> {
        self.means.get(subject).copied().filter(|mean| !mean.is_nan())
    }

    fn column_values(col: &Column) -> Vec<f64> {
        col.cast(&DataType::Float64)
            .ok()
            .and_then(|values| {
                values
                    .f64()
                    .ok()
                    .map(|ca| ca.into_iter().flatten().filter(|v| !v.is_nan()).collect())
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_cover_every_row() {
        let grades = df!(
            "Name" => ["Alice", "Bob"],
            "Math" => [80i64, 60],
            "Reading" => [90i64, 70]
        )
        .unwrap();

        let averages = SchoolAverages::from_grades(&grades);

        assert_eq!(averages.get("Math"), Some(70.0));
        assert_eq!(averages.get("Reading"), Some(80.0));
        assert_eq!(averages.get("Name"), None);
    }

    #[test]
    fn nulls_are_skipped() {
        let grades = df!(
            "Name" => ["Alice", "Bob", "Cara"],
            "Science" => [Some(50.0), None, Some(75.0)]
        )
        .unwrap();

        let averages = SchoolAverages::from_grades(&grades);
        assert_eq!(averages.get("Science"), Some(62.5));
    }

    #[test]
    fn column_without_scores_has_no_average() {
        let grades = df!(
            "Name" => ["Alice"],
            "Art" => [None::<f64>]
        )
        .unwrap();

        assert_eq!(SchoolAverages::from_grades(&grades).get("Art"), None);
    }
}
