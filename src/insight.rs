//! Dispatch over the three mutually exclusive insight views.

use std::{fmt, str::FromStr};

use clap::ValueEnum;
use serde::Serialize;

use crate::{
    dataset::Table,
    error::InsightError,
    fields::{self, FieldTypeReport},
    frequency::{self, Distribution},
    stats::{self, SummaryReport},
};

pub const NOT_APPLICABLE_MESSAGE: &str = "No text fields available for value distribution";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize)]
#[value(rename_all = "kebab-case")]
#[serde(rename_all = "snake_case")]
pub enum InsightView {
    #[default]
    #[value(alias = "field-data-types")]
    Types,
    #[value(alias = "data-summary")]
    Summary,
    #[value(alias = "value-distribution")]
    Distribution,
}

impl InsightView {
    pub fn title(&self) -> &'static str {
        match self {
            InsightView::Types => "Field Data Types",
            InsightView::Summary => "Data Summary",
            InsightView::Distribution => "Value Distribution",
        }
    }
}

impl fmt::Display for InsightView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for InsightView {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        <InsightView as ValueEnum>::from_str(value.trim(), true)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", content = "report", rename_all = "snake_case")]
pub enum InsightOutput {
    FieldTypes(FieldTypeReport),
    Summary(SummaryReport),
    Distribution(Distribution),
}

impl InsightOutput {
    pub fn view(&self) -> InsightView {
        match self {
            InsightOutput::FieldTypes(_) => InsightView::Types,
            InsightOutput::Summary(_) => InsightView::Summary,
            InsightOutput::Distribution(_) => InsightView::Distribution,
        }
    }

    /// Renders the report as headers plus string rows for tabular display.
    pub fn to_rows(&self) -> (Vec<String>, Vec<Vec<String>>) {
        match self {
            InsightOutput::FieldTypes(report) => (
                vec!["Field Name".to_string(), "Field Type".to_string()],
                report.render_rows(),
            ),
            InsightOutput::Summary(report) => (report.headers(), report.render_rows()),
            InsightOutput::Distribution(Distribution::Counts(counts)) => (
                vec![
                    "Value".to_string(),
                    "Count".to_string(),
                    "Percent".to_string(),
                ],
                counts.render_rows(),
            ),
            InsightOutput::Distribution(Distribution::NotApplicable) => (
                vec!["Value Distribution".to_string()],
                vec![vec![NOT_APPLICABLE_MESSAGE.to_string()]],
            ),
        }
    }
}

/// Derives the selected view from a normalized table. `field` only matters
/// for the value distribution.
pub fn derive(
    table: &Table,
    view: InsightView,
    field: Option<&str>,
) -> Result<InsightOutput, InsightError> {
    Ok(match view {
        InsightView::Types => InsightOutput::FieldTypes(fields::field_types(table)),
        InsightView::Summary => InsightOutput::Summary(stats::summarize(table)),
        InsightView::Distribution => {
            InsightOutput::Distribution(frequency::value_distribution(table, field)?)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn views_parse_from_short_and_long_names() {
        assert_eq!("types".parse::<InsightView>().unwrap(), InsightView::Types);
        assert_eq!(
            "Data-Summary".parse::<InsightView>().unwrap(),
            InsightView::Summary
        );
        assert_eq!(
            "value-distribution".parse::<InsightView>().unwrap(),
            InsightView::Distribution
        );
        assert!("chart".parse::<InsightView>().is_err());
    }

    #[test]
    fn empty_table_yields_well_formed_reports() {
        let table = Table::empty();
        for view in [
            InsightView::Types,
            InsightView::Summary,
            InsightView::Distribution,
        ] {
            let output = derive(&table, view, None).expect("derive on empty table");
            assert_eq!(output.view(), view);
            let (headers, _) = output.to_rows();
            assert!(!headers.is_empty());
        }
    }

    #[test]
    fn not_applicable_renders_a_message_row() {
        let output = InsightOutput::Distribution(Distribution::NotApplicable);
        let (_, rows) = output.to_rows();
        assert_eq!(rows, vec![vec![NOT_APPLICABLE_MESSAGE.to_string()]]);
    }
}
