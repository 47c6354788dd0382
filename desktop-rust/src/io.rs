use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use text_proof::extractor::collect_reference_paths;
use text_proof::output::{write_report, OutputFormat};
use text_proof_common::{Outcome, ReportView};

pub fn pick_primary() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("本文ファイルを選択")
        .add_filter("本文 (TXT / PDF)", &["txt", "pdf", "TXT", "PDF"])
        .pick_file()
}

pub fn pick_references() -> Option<Vec<PathBuf>> {
    rfd::FileDialog::new()
        .set_title("校正ファイルを選択")
        .add_filter("Excel", &["xlsx", "xls", "XLSX", "XLS"])
        .pick_files()
}

pub fn pick_reference_folder() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("校正ファイルのフォルダを選択")
        .pick_folder()
}

/// フォルダを直下のExcelファイルに展開
pub fn expand_references(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    collect_reference_paths(inputs).context("校正ファイルの一覧を作成できません")
}

/// レポートを名前を付けて保存。キャンセル時は None。
pub fn save_report(outcome: &Outcome, view: ReportView) -> Result<Option<PathBuf>> {
    let Some(path) = rfd::FileDialog::new()
        .set_file_name("results.txt")
        .add_filter("Text", &["txt"])
        .save_file()
    else {
        return Ok(None);
    };
    write_text_report(&path, outcome, view)?;
    Ok(Some(path))
}

pub fn write_text_report(path: &Path, outcome: &Outcome, view: ReportView) -> Result<()> {
    write_report(path, outcome, view, OutputFormat::Text)
        .with_context(|| format!("write {}", path.display()))
}
