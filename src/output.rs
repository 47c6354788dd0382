//! 照合結果のファイル出力（バッチモード）

use crate::error::Result;
use serde::Serialize;
use std::path::Path;
use text_proof_common::{Comparison, Outcome, Report, ReportView};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    match_rate: f64,
    comparison: &'a Comparison,
    report: &'a Report,
}

/// レポート本文を生成
pub fn render_output(outcome: &Outcome, view: ReportView, format: OutputFormat) -> Result<String> {
    let report = outcome.report(view);
    match format {
        OutputFormat::Text => Ok(report.to_plain_text()),
        OutputFormat::Json => {
            let json = JsonReport {
                match_rate: outcome.comparison.match_rate(),
                comparison: &outcome.comparison,
                report,
            };
            Ok(serde_json::to_string_pretty(&json)?)
        }
    }
}

/// レポートをUTF-8で書き出す（既存ファイルは上書き）
pub fn write_report(
    path: &Path,
    outcome: &Outcome,
    view: ReportView,
    format: OutputFormat,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let content = render_output(outcome, view, format)?;
    std::fs::write(path, content)?;
    tracing::debug!(path = %path.display(), %format, %view, "report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use text_proof_common::{run_comparison, CorpusBuilder, Document, MatchMode};

    fn outcome() -> Outcome {
        let doc = Document::from_text("apple banana apple cherry");
        let mut builder = CorpusBuilder::new(MatchMode::Contains);
        builder.push_cell("banana");
        builder.push_cell("cherry");
        run_comparison(&doc, &builder.build()).unwrap()
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("TXT".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_write_text_report() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("results.txt");
        write_report(&path, &outcome(), ReportView::Summary, OutputFormat::Text).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("照合結果：\n"));
        assert!(content.contains("一致（2件）：\n1. banana\n2. cherry\n"));
        assert!(content.contains("不一致（1件）：\n1. apple\n"));
    }

    #[test]
    fn test_json_report() {
        let json = render_output(&outcome(), ReportView::Inline, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["comparison"]["not_found"][0], "apple");
        assert_eq!(value["comparison"]["duplicates"][0], "apple");
        assert_eq!(value["report"]["view"], "inline");
        assert_eq!(value["report"]["lines"][1]["spans"][0]["style"], "duplicate");
    }
}
