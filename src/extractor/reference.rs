use super::extension_of;
use crate::error::{InputRole, ProofError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use text_proof_common::{CorpusBuilder, MatchMode, ReferenceCorpus};

const REFERENCE_EXTENSIONS: &[&str] = &["xlsx", "xls"];

/// 読み込みに失敗した校正ファイルの扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// 1つでも失敗したら全体を失敗にする
    #[default]
    Abort,
    /// 失敗したファイルは空として扱い、続行する
    Skip,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceOptions {
    pub mode: MatchMode,
    pub on_error: FailurePolicy,
    /// false の場合は先頭シートのみ
    pub all_sheets: bool,
}

/// スキップした校正ファイル
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// 校正ファイルの読み込み結果
#[derive(Debug, Clone)]
pub struct ReferenceLoad {
    pub corpus: ReferenceCorpus,
    pub files_read: usize,
    pub skipped: Vec<SkippedFile>,
}

pub fn is_reference_path(path: &Path) -> bool {
    extension_of(path)
        .map(|ext| REFERENCE_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// 校正ファイル群からコーパスを構築
///
/// 形式の検証は読み込み前に全ファイル分行う。
/// 複数ファイルは並列に読み、入力順に結合する。
pub fn extract_reference(paths: &[PathBuf], options: ReferenceOptions) -> Result<ReferenceLoad> {
    if paths.is_empty() {
        return Err(ProofError::MissingInput(
            "校正ファイル（.xlsx / .xls）が指定されていません".into(),
        ));
    }
    if let Some(bad) = paths.iter().find(|p| !is_reference_path(p)) {
        return Err(ProofError::UnsupportedFormat {
            path: bad.clone(),
            role: InputRole::Reference,
        });
    }

    let parts: Vec<Result<CorpusBuilder>> = paths
        .par_iter()
        .map(|path| read_workbook(path, options))
        .collect();

    let mut builder = CorpusBuilder::new(options.mode);
    let mut files_read = 0;
    let mut skipped = Vec::new();

    for (path, part) in paths.iter().zip(parts) {
        match part {
            Ok(part) => {
                builder.merge(part);
                files_read += 1;
            }
            Err(err) if options.on_error == FailurePolicy::Skip => {
                tracing::warn!(path = %path.display(), %err, "reference file skipped");
                skipped.push(SkippedFile {
                    path: path.clone(),
                    reason: err.to_string(),
                });
            }
            Err(err) => return Err(err),
        }
    }

    let corpus = builder.build();
    tracing::debug!(
        files_read,
        skipped = skipped.len(),
        mode = %corpus.mode(),
        size = corpus.size(),
        "reference corpus built"
    );

    Ok(ReferenceLoad {
        corpus,
        files_read,
        skipped,
    })
}

fn read_workbook(path: &Path, options: ReferenceOptions) -> Result<CorpusBuilder> {
    let mut workbook = open_workbook_auto(path).map_err(|e| ProofError::read(path, e))?;
    let sheet_names = workbook.sheet_names().to_owned();
    let targets = if options.all_sheets {
        &sheet_names[..]
    } else {
        &sheet_names[..sheet_names.len().min(1)]
    };

    let mut builder = CorpusBuilder::new(options.mode);
    for sheet_name in targets {
        let range = workbook
            .worksheet_range(sheet_name)
            .map_err(|e| ProofError::read(path, format!("{sheet_name}: {e}")))?;

        for row in range.rows() {
            for cell in row {
                if let Some(text) = cell_text(cell) {
                    builder.push_cell(&text);
                }
            }
        }
    }

    Ok(builder)
}

/// セルを文字列にする。空セル・エラーセルは None。
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
