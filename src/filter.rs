use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::FileRecord;

/// MIME category offered by the dashboard's type selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileTypeFilter {
    #[default]
    All,
    Pdf,
    Image,
    Csv,
    Json,
    Sheet,
}

impl FileTypeFilter {
    pub const ALL: [FileTypeFilter; 6] = [
        FileTypeFilter::All,
        FileTypeFilter::Pdf,
        FileTypeFilter::Image,
        FileTypeFilter::Csv,
        FileTypeFilter::Json,
        FileTypeFilter::Sheet,
    ];

    pub fn value(self) -> &'static str {
        match self {
            FileTypeFilter::All => "all",
            FileTypeFilter::Pdf => "pdf",
            FileTypeFilter::Image => "image",
            FileTypeFilter::Csv => "csv",
            FileTypeFilter::Json => "json",
            FileTypeFilter::Sheet => "sheet",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FileTypeFilter::All => "All Types",
            FileTypeFilter::Pdf => "PDF",
            FileTypeFilter::Image => "Image",
            FileTypeFilter::Csv => "CSV",
            FileTypeFilter::Json => "JSON",
            FileTypeFilter::Sheet => "Excel",
        }
    }

    pub fn matches(self, mimetype: &str) -> bool {
        match self {
            FileTypeFilter::All => true,
            other => mimetype.contains(other.value()),
        }
    }
}

impl fmt::Display for FileTypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

#[derive(Debug, Error)]
#[error("unknown file type filter: {0}")]
pub struct UnknownFileType(String);

impl FromStr for FileTypeFilter {
    type Err = UnknownFileType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FileTypeFilter::ALL
            .into_iter()
            .find(|filter| filter.value() == s)
            .ok_or_else(|| UnknownFileType(s.to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub search_term: String,
    pub selected_type: FileTypeFilter,
}

impl FilterState {
    pub fn matches(&self, record: &FileRecord) -> bool {
        record
            .name
            .to_lowercase()
            .contains(&self.search_term.to_lowercase())
            && self.selected_type.matches(&record.mimetype)
    }
}

/// Records matching `state`, in their original order.
pub fn filter<'a>(records: &'a [FileRecord], state: &FilterState) -> Vec<&'a FileRecord> {
    records.iter().filter(|record| state.matches(record)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::record;

    fn sample() -> Vec<FileRecord> {
        vec![
            record("1", "Quarterly Report.pdf", "application/pdf"),
            record("2", "team-photo.png", "image/png"),
            record("3", "sensors.csv", "text/csv"),
            record(
                "4",
                "budget.xlsx",
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            ),
            record("5", "report-config.json", "application/json"),
        ]
    }

    fn ids(records: &[&FileRecord]) -> Vec<String> {
        records.iter().map(|r| r.id.to_string()).collect()
    }

    #[test]
    fn empty_state_keeps_everything_in_order() {
        let records = sample();
        let kept = filter(&records, &FilterState::default());
        assert_eq!(ids(&kept), vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let records = sample();
        let state = FilterState {
            search_term: "REPORT".into(),
            ..FilterState::default()
        };
        assert_eq!(ids(&filter(&records, &state)), vec!["1", "5"]);
    }

    #[test]
    fn type_and_search_combine() {
        let records = sample();
        let state = FilterState {
            search_term: "report".into(),
            selected_type: FileTypeFilter::Json,
        };
        assert_eq!(ids(&filter(&records, &state)), vec!["5"]);

        let sheets = FilterState {
            search_term: String::new(),
            selected_type: FileTypeFilter::Sheet,
        };
        assert_eq!(ids(&filter(&records, &sheets)), vec!["4"]);
    }

    #[test]
    fn output_is_an_ordered_subset_satisfying_the_predicate() {
        let records = sample();
        let states = FileTypeFilter::ALL.into_iter().flat_map(|selected_type| {
            ["", "re", "o", "zzz"].into_iter().map(move |term| FilterState {
                search_term: term.to_string(),
                selected_type,
            })
        });

        for state in states {
            let kept = filter(&records, &state);
            assert!(kept.iter().all(|r| state.matches(r)));

            let mut positions = kept
                .iter()
                .map(|r| records.iter().position(|orig| orig.id == r.id).unwrap());
            let mut last = None;
            for pos in &mut positions {
                assert!(last.map_or(true, |prev| pos > prev), "order broken for {:?}", state);
                last = Some(pos);
            }
        }
        assert_eq!(records, sample());
    }

    #[test]
    fn filter_values_round_trip_through_select_options() {
        for filter in FileTypeFilter::ALL {
            assert_eq!(filter.value().parse::<FileTypeFilter>().unwrap(), filter);
        }
        assert!("docx".parse::<FileTypeFilter>().is_err());
    }
}
