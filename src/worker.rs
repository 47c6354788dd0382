//! バックグラウンド処理
//!
//! 読み込み・照合を別スレッドで実行し、結果を `mpsc` で画面側に返す。
//! 結果は常にまとめて1メッセージで送る（部分更新はしない）。

use crate::error::Result;
use crate::extractor::{extract_primary, extract_reference, ReferenceLoad, ReferenceOptions};
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::JoinHandle;
use text_proof_common::{run_comparison, Document, Outcome, ReadyInputs};

/// 読み込みジョブの `request` は依頼元が採番する。古い依頼の結果は依頼元で捨てる。
pub enum Job {
    LoadPrimary {
        request: u64,
        path: PathBuf,
    },
    LoadReference {
        request: u64,
        paths: Vec<PathBuf>,
        options: ReferenceOptions,
    },
    Compare(ReadyInputs),
}

pub enum JobOutcome {
    PrimaryLoaded {
        request: u64,
        path: PathBuf,
        result: Result<Document>,
    },
    ReferenceLoaded {
        request: u64,
        paths: Vec<PathBuf>,
        result: Result<ReferenceLoad>,
    },
    Compared {
        generation: u64,
        result: Result<Arc<Outcome>>,
    },
}

impl Job {
    pub fn describe(&self) -> &'static str {
        match self {
            Job::LoadPrimary { .. } => "本文を解析中...",
            Job::LoadReference { .. } => "校正ファイルを読み込み中...",
            Job::Compare(_) => "照合中...",
        }
    }

    /// 呼び出したスレッドでそのまま実行
    pub fn run(self) -> JobOutcome {
        match self {
            Job::LoadPrimary { request, path } => {
                let result = extract_primary(&path);
                JobOutcome::PrimaryLoaded { request, path, result }
            }
            Job::LoadReference { request, paths, options } => {
                let result = extract_reference(&paths, options);
                JobOutcome::ReferenceLoaded { request, paths, result }
            }
            Job::Compare(inputs) => {
                let result = run_comparison(&inputs.document, &inputs.corpus)
                    .map(Arc::new)
                    .map_err(Into::into);
                JobOutcome::Compared {
                    generation: inputs.generation,
                    result,
                }
            }
        }
    }
}

/// ジョブを別スレッドで実行し、完了時に `sender` へ送る
pub fn spawn(job: Job, sender: Sender<JobOutcome>) -> JoinHandle<()> {
    std::thread::spawn(move || {
        tracing::debug!(job = job.describe(), "job started");
        let outcome = job.run();
        // 受信側が閉じていれば結果は捨てる
        let _ = sender.send(outcome);
    })
}
