//! Batch report export over a caller-supplied list of records.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::analysis::analyzer::AnalysisRecord;

pub const JSON_EXPORT_FILENAME: &str = "batch_resume_analysis.json";
pub const CSV_EXPORT_FILENAME: &str = "batch_resume_analysis.csv";
const NO_SUGGESTIONS: &str = "No suggestions";

/// Pretty-printed JSON array. Key order follows the struct definitions, so
/// the output is stable across runs.
pub fn export_json(records: &[AnalysisRecord]) -> Result<String> {
    serde_json::to_string_pretty(records).context("Failed to serialize analysis records")
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Filename")]
    filename: &'a str,
    #[serde(rename = "JD Match (%)")]
    jd_match: String,
    #[serde(rename = "Missing Keywords")]
    missing_keywords: String,
    #[serde(rename = "Profile Summary")]
    profile_summary: String,
    #[serde(rename = "Improvement Suggestions")]
    improvement_suggestions: &'a str,
}

/// One row per structured record; fallback records have nothing to tabulate
/// and are skipped. The header is always written.
pub fn export_csv(records: &[AnalysisRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let mut rows = 0usize;

    for record in records {
        let Some(report) = record.analysis.as_structured() else {
            continue;
        };
        writer.serialize(CsvRow {
            filename: &record.filename,
            jd_match: format!("{:.1}", report.match_percentage()),
            missing_keywords: report.missing_keywords.join(", "),
            profile_summary: report.profile_summary.replace('\n', " ").trim().to_string(),
            improvement_suggestions: record
                .improvement_suggestions
                .as_deref()
                .unwrap_or(NO_SUGGESTIONS),
        })?;
        rows += 1;
    }

    if rows == 0 {
        writer.write_record([
            "Filename",
            "JD Match (%)",
            "Missing Keywords",
            "Profile Summary",
            "Improvement Suggestions",
        ])?;
    }

    tracing::debug!("Exported {rows} of {} records to CSV", records.len());
    let bytes = writer.into_inner().context("Failed to flush CSV writer")?;
    String::from_utf8(bytes).context("CSV output was not valid UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::interpreter::{interpret, AnalysisResult};

    fn structured(filename: &str, raw: &str, suggestions: Option<&str>) -> AnalysisRecord {
        AnalysisRecord {
            filename: filename.to_string(),
            analysis: interpret(raw),
            improvement_suggestions: suggestions.map(str::to_string),
        }
    }

    #[test]
    fn test_csv_formats_one_row_per_structured_record() {
        let records = vec![
            structured(
                "jane.pdf",
                r#"{"JD Match":"72%","MissingKeywords":["Docker","Kubernetes"],"Profile Summary":"Backend engineer.\nLoves Rust."}"#,
                Some("Add metrics"),
            ),
            AnalysisRecord {
                filename: "broken.docx".to_string(),
                analysis: AnalysisResult::fallback("I cannot process this request."),
                improvement_suggestions: None,
            },
            structured("joe.docx", r#"{"JD Match": 64}"#, None),
        ];

        let csv = export_csv(&records).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "Filename,JD Match (%),Missing Keywords,Profile Summary,Improvement Suggestions"
        );
        assert_eq!(
            lines[1],
            "jane.pdf,72.0,\"Docker, Kubernetes\",Backend engineer. Loves Rust.,Add metrics"
        );
        assert_eq!(lines[2], "joe.docx,64.0,,No summary provided.,No suggestions");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_csv_with_only_fallbacks_still_has_header() {
        let records = vec![AnalysisRecord {
            filename: "x.pdf".to_string(),
            analysis: AnalysisResult::fallback("nope"),
            improvement_suggestions: None,
        }];
        let csv = export_csv(&records).unwrap();
        assert_eq!(
            csv,
            "Filename,JD Match (%),Missing Keywords,Profile Summary,Improvement Suggestions\n"
        );
    }

    #[test]
    fn test_json_export_keeps_both_states_and_key_order() {
        let records = vec![
            structured(
                "jane.pdf",
                r#"{"Profile Summary":"s","JD Match":"50%"}"#,
                None,
            ),
            AnalysisRecord {
                filename: "b.pdf".to_string(),
                analysis: AnalysisResult::fallback("raw"),
                improvement_suggestions: Some("tips".to_string()),
            },
        ];

        let json = export_json(&records).unwrap();
        let match_at = json.find("\"JD Match\"").unwrap();
        let keywords_at = json.find("\"MissingKeywords\"").unwrap();
        let summary_at = json.find("\"Profile Summary\"").unwrap();
        assert!(match_at < keywords_at && keywords_at < summary_at);

        let back: Vec<AnalysisRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, records);
    }
}
