//! CLIの照合パイプライン
//!
//! 形式チェック → 本文と校正ファイルを並行に読み込み → 照合 → レポート出力

use crate::error::{ProofError, Result};
use crate::extractor::{
    collect_reference_paths, extract_primary, extract_reference,
    PrimaryFormat, ReferenceLoad, ReferenceOptions, SkippedFile,
};
use crate::output::{write_report, OutputFormat};
use std::path::PathBuf;
use std::sync::Arc;
use text_proof_common::{Document, Outcome, ReportView, Session};

/// 読み込み済みの入力
pub struct LoadedInputs {
    pub document: Document,
    pub reference: ReferenceLoad,
}

impl LoadedInputs {
    /// 入力をセットしたセッション（Ready 状態）
    pub fn into_session(self) -> Session {
        let mut session = Session::new();
        session.set_primary(self.document);
        session.set_reference(self.reference.corpus);
        session
    }
}

/// 入力ファイルを読み込む
///
/// 未対応の形式は読み込み開始前にすべて拒否する。
/// 本文と校正ファイルは blocking pool 上で並行に読む。
pub async fn load_inputs(
    primary: PathBuf,
    references: Vec<PathBuf>,
    options: ReferenceOptions,
) -> Result<LoadedInputs> {
    PrimaryFormat::from_path(&primary)?;
    let reference_paths = collect_reference_paths(&references)?;

    let primary_task = tokio::task::spawn_blocking(move || extract_primary(&primary));
    let reference_task =
        tokio::task::spawn_blocking(move || extract_reference(&reference_paths, options));

    let (document, reference) = tokio::join!(primary_task, reference_task);
    let document = document.map_err(join_error)??;
    let reference = reference.map_err(join_error)??;

    Ok(LoadedInputs {
        document,
        reference,
    })
}

fn join_error(err: tokio::task::JoinError) -> ProofError {
    ProofError::Io(std::io::Error::other(err))
}

/// バッチ照合の指定
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub primary: PathBuf,
    pub references: Vec<PathBuf>,
    pub options: ReferenceOptions,
    pub output: PathBuf,
    pub view: ReportView,
    pub format: OutputFormat,
}

/// バッチ照合の結果
#[derive(Debug)]
pub struct BatchSummary {
    pub outcome: Arc<Outcome>,
    pub report_path: PathBuf,
    pub files_read: usize,
    pub skipped: Vec<SkippedFile>,
}

/// 読み込み・照合・レポート出力を一括で行う
pub async fn run_batch(request: BatchRequest) -> Result<BatchSummary> {
    let inputs = load_inputs(request.primary, request.references, request.options).await?;
    let files_read = inputs.reference.files_read;
    let skipped = inputs.reference.skipped.clone();

    let mut session = inputs.into_session();
    let outcome = session.compare()?;
    write_report(&request.output, &outcome, request.view, request.format)?;

    tracing::debug!(
        report = %request.output.display(),
        found = outcome.comparison.found.len(),
        not_found = outcome.comparison.not_found.len(),
        "batch comparison finished"
    );

    Ok(BatchSummary {
        outcome,
        report_path: request.output,
        files_read,
        skipped,
    })
}
