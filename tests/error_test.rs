//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use std::path::{Path, PathBuf};
use tempfile::tempdir;
use text_proof::error::{InputRole, ProofError};
use text_proof::extractor::{self, ReferenceOptions};

/// 存在しない本文ファイル
#[test]
fn test_missing_primary_is_read_error() {
    let result = extractor::extract_primary(Path::new("/nonexistent/path/12345/main.txt"));
    assert!(matches!(result, Err(ProofError::Read { .. })));
}

/// 存在しない校正ファイル
#[test]
fn test_missing_reference_path() {
    let result = extractor::collect_reference_paths(&[PathBuf::from("/nonexistent/list.xlsx")]);
    assert!(matches!(result, Err(ProofError::Read { .. })));
}

/// Excelのないフォルダ
#[test]
fn test_folder_without_spreadsheets() {
    let dir = tempdir().expect("Failed to create temp dir");

    // テキストファイルのみ作成
    std::fs::write(dir.path().join("memo.txt"), "hello").unwrap();
    std::fs::write(dir.path().join("data.csv"), "a,b").unwrap();

    let result = extractor::collect_reference_paths(&[dir.path().to_path_buf()]);
    assert!(matches!(result, Err(ProofError::MissingInput(_))));
}

/// 未対応形式の本文
#[test]
fn test_docx_primary_rejected() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("report.docx");
    std::fs::write(&path, "dummy").unwrap();

    let err = extractor::extract_primary(&path).unwrap_err();
    match err {
        ProofError::UnsupportedFormat { path: got, role } => {
            assert_eq!(got, path);
            assert_eq!(role, InputRole::Primary);
        }
        other => panic!("unexpected error: {other}"),
    }
}

/// 未対応形式の校正ファイル
#[test]
fn test_csv_reference_rejected() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("list.csv");
    std::fs::write(&path, "a").unwrap();

    let result = extractor::extract_reference(&[path], ReferenceOptions::default());
    assert!(matches!(
        result,
        Err(ProofError::UnsupportedFormat { role: InputRole::Reference, .. })
    ));
}

/// ProofErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        ProofError::UnsupportedFormat {
            path: PathBuf::from("a.docx"),
            role: InputRole::Primary,
        },
        ProofError::read(Path::new("list.xlsx"), "壊れています"),
        ProofError::MissingInput("校正ファイル".to_string()),
        ProofError::Prompt("中断".to_string()),
        ProofError::Config("テスト設定エラー".to_string()),
        ProofError::from(text_proof_common::Error::EmptyInput),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// 空入力だけが情報扱い
#[test]
fn test_informational_errors() {
    assert!(ProofError::from(text_proof_common::Error::EmptyInput).is_informational());
    assert!(!ProofError::from(text_proof_common::Error::NotReady("x".into())).is_informational());
    assert!(!ProofError::MissingInput("x".into()).is_informational());
    assert!(!ProofError::read(Path::new("a.txt"), "x").is_informational());
}

/// UnsupportedFormatのメッセージに対応形式が含まれる
#[test]
fn test_unsupported_message_lists_formats() {
    let err = ProofError::UnsupportedFormat {
        path: PathBuf::from("a.docx"),
        role: InputRole::Primary,
    };
    let message = err.to_string();
    assert!(message.contains("a.docx"));
    assert!(message.contains(".pdf"));
}
