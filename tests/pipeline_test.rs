//! バッチ照合の統合テスト
//!
//! 実ファイルから読み込み、レポートファイルの内容まで検証

use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};
use tempfile::tempdir;
use text_proof::error::{InputRole, ProofError};
use text_proof::extractor::{FailurePolicy, ReferenceOptions};
use text_proof::output::OutputFormat;
use text_proof::pipeline::{self, BatchRequest};
use text_proof_common::{MatchMode, Phase, ReportView};

fn write_xlsx(path: &Path, rows: &[&[&str]]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            sheet.write_string(r as u32, c as u16, *value).unwrap();
        }
    }
    workbook.save(path).unwrap();
}

fn request(primary: PathBuf, references: Vec<PathBuf>, output: PathBuf) -> BatchRequest {
    BatchRequest {
        primary,
        references,
        options: ReferenceOptions {
            mode: MatchMode::Exact,
            ..Default::default()
        },
        output,
        view: ReportView::Summary,
        format: OutputFormat::Text,
    }
}

/// 基本シナリオ: apple banana apple cherry vs {banana, cherry}
#[tokio::test]
async fn test_batch_report() {
    let dir = tempdir().unwrap();
    let primary = dir.path().join("main.txt");
    std::fs::write(&primary, "apple banana apple cherry\n").unwrap();
    let list = dir.path().join("list.xlsx");
    write_xlsx(&list, &[&["banana"], &["cherry"]]);
    let output = dir.path().join("results.txt");

    let summary = pipeline::run_batch(request(primary, vec![list], output.clone()))
        .await
        .unwrap();

    let comparison = &summary.outcome.comparison;
    assert_eq!(comparison.found, vec!["banana", "cherry"]);
    assert_eq!(comparison.not_found, vec!["apple"]);
    assert!(comparison.duplicates.contains("apple"));
    assert_eq!(summary.files_read, 1);
    assert_eq!(summary.report_path, output);

    let content = std::fs::read_to_string(&output).unwrap();
    assert_eq!(
        content,
        "照合結果：\n\n一致（2件）：\n1. banana\n2. cherry\n\n不一致（1件）：\n1. apple\n"
    );
}

/// 不一致が0件でも両セクションを出力
#[tokio::test]
async fn test_batch_report_all_found() {
    let dir = tempdir().unwrap();
    let primary = dir.path().join("main.txt");
    std::fs::write(&primary, "a b").unwrap();
    let list = dir.path().join("list.xlsx");
    write_xlsx(&list, &[&["a", "b"]]);
    let output = dir.path().join("results.txt");

    pipeline::run_batch(request(primary, vec![list], output.clone()))
        .await
        .unwrap();

    let content = std::fs::read_to_string(&output).unwrap();
    assert!(content.contains("一致（2件）："));
    assert!(content.contains("不一致（0件）："));
}

/// 部分一致モードでは連結文字列の部分文字列なら一致
#[tokio::test]
async fn test_batch_contains_mode() {
    let dir = tempdir().unwrap();
    let primary = dir.path().join("main.txt");
    std::fs::write(&primary, "pie crust").unwrap();
    let list = dir.path().join("list.xlsx");
    write_xlsx(&list, &[&["apple pie"]]);
    let output = dir.path().join("results.json");

    let mut req = request(primary, vec![list], output.clone());
    req.options.mode = MatchMode::Contains;
    req.format = OutputFormat::Json;
    let summary = pipeline::run_batch(req).await.unwrap();
    assert_eq!(summary.outcome.comparison.found, vec!["pie"]);
    assert_eq!(summary.outcome.comparison.not_found, vec!["crust"]);

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(value["comparison"]["not_found"][0], "crust");
}

/// 空の本文は情報扱いでレポートを出力しない
#[tokio::test]
async fn test_batch_empty_primary() {
    let dir = tempdir().unwrap();
    let primary = dir.path().join("main.txt");
    std::fs::write(&primary, "  \n\n").unwrap();
    let list = dir.path().join("list.xlsx");
    write_xlsx(&list, &[&["a"]]);
    let output = dir.path().join("results.txt");

    let err = pipeline::run_batch(request(primary, vec![list], output.clone()))
        .await
        .unwrap_err();
    assert!(err.is_informational());
    assert!(!output.exists());
}

/// 未対応形式は読み込み前に拒否
#[tokio::test]
async fn test_unsupported_reference_rejected() {
    let dir = tempdir().unwrap();
    let primary = dir.path().join("main.txt");
    std::fs::write(&primary, "a").unwrap();
    let csv = dir.path().join("list.csv");
    std::fs::write(&csv, "a").unwrap();

    let result = pipeline::load_inputs(primary, vec![csv], ReferenceOptions::default()).await;
    assert!(matches!(
        result,
        Err(ProofError::UnsupportedFormat { role: InputRole::Reference, .. })
    ));
}

/// 存在しないファイルでも形式の誤りを先に報告
#[tokio::test]
async fn test_missing_unsupported_reference_rejected() {
    let dir = tempdir().unwrap();
    let primary = dir.path().join("main.txt");
    std::fs::write(&primary, "a").unwrap();

    let result = pipeline::load_inputs(
        primary,
        vec![dir.path().join("missing.csv")],
        ReferenceOptions::default(),
    )
    .await;
    assert!(matches!(
        result,
        Err(ProofError::UnsupportedFormat { role: InputRole::Reference, .. })
    ));
}

#[tokio::test]
async fn test_unsupported_primary_rejected() {
    let dir = tempdir().unwrap();
    let list = dir.path().join("list.xlsx");
    write_xlsx(&list, &[&["a"]]);

    let result = pipeline::load_inputs(
        dir.path().join("report.docx"),
        vec![list],
        ReferenceOptions::default(),
    )
    .await;
    assert!(matches!(
        result,
        Err(ProofError::UnsupportedFormat { role: InputRole::Primary, .. })
    ));
}

/// スキップ指定時は壊れた校正ファイルを飛ばして続行
#[tokio::test]
async fn test_skip_unreadable_reference() {
    let dir = tempdir().unwrap();
    let primary = dir.path().join("main.txt");
    std::fs::write(&primary, "a z").unwrap();
    let good = dir.path().join("good.xlsx");
    write_xlsx(&good, &[&["a"]]);
    let broken = dir.path().join("broken.xlsx");
    std::fs::write(&broken, b"garbage").unwrap();

    let options = ReferenceOptions {
        mode: MatchMode::Exact,
        on_error: FailurePolicy::Skip,
        all_sheets: false,
    };
    let inputs = pipeline::load_inputs(primary, vec![good, broken], options)
        .await
        .unwrap();
    assert_eq!(inputs.reference.files_read, 1);
    assert_eq!(inputs.reference.skipped.len(), 1);

    let mut session = inputs.into_session();
    assert_eq!(session.phase(), Phase::Ready);
    let outcome = session.compare().unwrap();
    assert_eq!(outcome.comparison.not_found, vec!["z"]);
}
