//! 入力ファイルの抽出モジュール
//!
//! - 本文（.txt / .pdf）→ `Document`
//! - 校正ファイル（.xlsx / .xls）→ `ReferenceCorpus`
//!
//! 拡張子の判定は大文字小文字を区別しない。

mod primary;
mod reference;

pub use primary::{extract_primary, PrimaryFormat};
pub use reference::{
    extract_reference, is_reference_path, FailurePolicy, ReferenceLoad, ReferenceOptions,
    SkippedFile,
};

use crate::error::{InputRole, ProofError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 小文字化した拡張子
fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}

/// 校正ファイルの入力リストを展開する
///
/// フォルダが指定された場合は直下の .xlsx / .xls をファイル名順に追加する。
/// ファイルは拡張子を確認してから存在を確認する。
pub fn collect_reference_paths(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(input)
                .max_depth(1)  // 直下のみ（再帰しない）
                .into_iter()
                .filter_map(|e| e.ok())
                .map(|e| e.into_path())
                .filter(|p| p.is_file() && is_reference_path(p))
                .collect();
            found.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
            tracing::debug!(folder = %input.display(), count = found.len(), "reference folder expanded");
            paths.extend(found);
        } else if !is_reference_path(input) {
            return Err(ProofError::UnsupportedFormat {
                path: input.clone(),
                role: InputRole::Reference,
            });
        } else if input.exists() {
            paths.push(input.clone());
        } else {
            return Err(ProofError::read(input, "ファイルが存在しません"));
        }
    }

    if paths.is_empty() {
        return Err(ProofError::MissingInput(
            "校正ファイル（.xlsx / .xls）が指定されていません".into(),
        ));
    }

    Ok(paths)
}
