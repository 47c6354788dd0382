use std::path::{Path, PathBuf};

use text_proof::extractor::{ReferenceOptions, SkippedFile};
use text_proof::worker::{Job, JobOutcome};
use text_proof_common::{Phase, ReportView, Session};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Idle,
    Info(String),
    Error(String),
}

/// 画面の状態。照合状態そのものは `Session` が持つ。
pub struct AppState {
    pub session: Session,
    pub view: ReportView,
    pub options: ReferenceOptions,
    pub primary_path: Option<PathBuf>,
    pub reference_paths: Vec<PathBuf>,
    pub skipped: Vec<SkippedFile>,
    pub status: Status,
    pub show_preview: bool,
    scroll_pending: bool,
    /// 最新の読み込み依頼番号。これと異なる結果は古い依頼のもの
    primary_request: u64,
    reference_request: u64,
}

impl AppState {
    pub fn new(options: ReferenceOptions) -> Self {
        Self {
            session: Session::new(),
            view: ReportView::Summary,
            options,
            primary_path: None,
            reference_paths: Vec::new(),
            skipped: Vec::new(),
            status: Status::Idle,
            show_preview: false,
            scroll_pending: false,
            primary_request: 0,
            reference_request: 0,
        }
    }

    /// 本文の読み込みジョブ。以前の依頼の結果は無効になる。
    pub fn primary_job(&mut self, path: PathBuf) -> Job {
        self.primary_request += 1;
        Job::LoadPrimary {
            request: self.primary_request,
            path,
        }
    }

    /// 校正ファイルの読み込みジョブ（現在の照合設定で読む）
    pub fn reference_job(&mut self, paths: Vec<PathBuf>) -> Job {
        self.reference_request += 1;
        Job::LoadReference {
            request: self.reference_request,
            paths,
            options: self.options,
        }
    }

    /// ワーカーの結果を反映する。続けて照合が必要なら Compare ジョブを返す。
    pub fn apply(&mut self, outcome: JobOutcome) -> Option<Job> {
        match outcome {
            JobOutcome::PrimaryLoaded { request, .. } if request != self.primary_request => {
                tracing::debug!(request, latest = self.primary_request, "stale primary load ignored");
                None
            }
            JobOutcome::ReferenceLoaded { request, .. } if request != self.reference_request => {
                tracing::debug!(request, latest = self.reference_request, "stale reference load ignored");
                None
            }
            JobOutcome::PrimaryLoaded { path, result, .. } => match result {
                Ok(document) => {
                    self.status = Status::Info(format!(
                        "本文を読み込みました: {}（{}トークン）",
                        file_label(&path),
                        document.token_count()
                    ));
                    self.primary_path = Some(path);
                    let phase = self.session.set_primary(document);
                    self.compare_job(phase)
                }
                Err(err) => {
                    self.status = Status::Error(err.to_string());
                    None
                }
            },
            JobOutcome::ReferenceLoaded { paths, result, .. } => match result {
                Ok(load) => {
                    self.status = Status::Info(format!(
                        "校正ファイルを読み込みました: {}件（{}モード）",
                        load.files_read,
                        load.corpus.mode()
                    ));
                    self.reference_paths = paths;
                    self.skipped = load.skipped;
                    let phase = self.session.set_reference(load.corpus);
                    self.compare_job(phase)
                }
                Err(err) => {
                    self.status = Status::Error(err.to_string());
                    None
                }
            },
            JobOutcome::Compared { generation, result } => {
                if generation != self.session.generation() {
                    tracing::debug!(generation, "stale comparison ignored");
                    return None;
                }
                match result {
                    Ok(outcome) => {
                        if self.session.apply_outcome(generation, outcome) {
                            self.status = Status::Info(self.rate_label().unwrap_or_default());
                            self.scroll_pending = true;
                        }
                    }
                    Err(err) if err.is_informational() => {
                        self.status = Status::Info(err.to_string());
                    }
                    Err(err) => {
                        self.status = Status::Error(err.to_string());
                    }
                }
                None
            }
        }
    }

    fn compare_job(&self, phase: Phase) -> Option<Job> {
        if phase != Phase::Ready {
            return None;
        }
        self.session.ready_inputs().map(Job::Compare)
    }

    /// 照合モードなどの変更後に校正ファイルを読み直すジョブ
    pub fn reload_reference_job(&mut self) -> Option<Job> {
        if self.reference_paths.is_empty() {
            return None;
        }
        let paths = self.reference_paths.clone();
        Some(self.reference_job(paths))
    }

    pub fn next(&mut self) {
        if self.session.next().is_some() {
            self.scroll_pending = true;
        }
    }

    pub fn previous(&mut self) {
        if self.session.previous().is_some() {
            self.scroll_pending = true;
        }
    }

    /// 先頭の未一致項目へ
    pub fn locate(&mut self) {
        if self.session.first().is_some() {
            self.scroll_pending = true;
        }
    }

    pub fn set_view(&mut self, view: ReportView) {
        if self.view != view {
            self.view = view;
            self.scroll_pending = true;
        }
    }

    /// 現在の未一致項目の行（表示中のビュー）
    pub fn current_line(&self) -> Option<usize> {
        self.session.current(self.view).map(|(_, line)| line)
    }

    /// スクロール要求を1回だけ取り出す
    pub fn take_scroll(&mut self) -> bool {
        std::mem::take(&mut self.scroll_pending)
    }

    pub fn rate_label(&self) -> Option<String> {
        let outcome = self.session.outcome()?;
        let comparison = &outcome.comparison;
        Some(format!(
            "一致: {}件 / 不一致: {}件（一致率 {:.1}%）",
            comparison.found.len(),
            comparison.not_found.len(),
            comparison.match_rate() * 100.0
        ))
    }

    pub fn reset(&mut self) {
        self.session.reset();
        self.primary_path = None;
        self.reference_paths.clear();
        self.skipped.clear();
        self.status = Status::Idle;
        self.scroll_pending = false;
        // 実行中の読み込みはリセット後に反映しない
        self.primary_request += 1;
        self.reference_request += 1;
    }
}

pub fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use text_proof::error::ProofError;
    use text_proof::extractor::ReferenceLoad;
    use text_proof_common::{CorpusBuilder, Document, MatchMode};

    /// 依頼を出し、その依頼に対する読み込み結果を作る
    fn primary_at(state: &mut AppState, name: &str, text: &str) -> JobOutcome {
        let Job::LoadPrimary { request, path } = state.primary_job(PathBuf::from(name)) else {
            panic!("primary job expected");
        };
        JobOutcome::PrimaryLoaded {
            request,
            path,
            result: Ok(Document::from_text(text)),
        }
    }

    fn primary(state: &mut AppState, text: &str) -> JobOutcome {
        primary_at(state, "main.txt", text)
    }

    fn reference(state: &mut AppState, cells: &[&str]) -> JobOutcome {
        let Job::LoadReference { request, paths, .. } =
            state.reference_job(vec![PathBuf::from("list.xlsx")])
        else {
            panic!("reference job expected");
        };
        let mut builder = CorpusBuilder::new(MatchMode::Exact);
        for cell in cells {
            builder.push_cell(cell);
        }
        JobOutcome::ReferenceLoaded {
            request,
            paths,
            result: Ok(ReferenceLoad {
                corpus: builder.build(),
                files_read: 1,
                skipped: Vec::new(),
            }),
        }
    }

    fn state() -> AppState {
        AppState::new(ReferenceOptions {
            mode: MatchMode::Exact,
            ..Default::default()
        })
    }

    #[test]
    fn test_compare_starts_when_both_inputs_loaded() {
        let mut state = state();
        let loaded = primary(&mut state, "apple banana apple cherry");
        assert!(state.apply(loaded).is_none());
        let loaded = reference(&mut state, &["banana", "cherry"]);
        let job = state.apply(loaded).unwrap();
        assert!(matches!(job, Job::Compare(_)));

        assert!(state.apply(job.run()).is_none());
        assert_eq!(state.session.phase(), Phase::Compared);
        assert_eq!(state.current_line(), Some(7));
        assert!(state.take_scroll());
        assert!(!state.take_scroll());
    }

    #[test]
    fn test_stale_comparison_ignored() {
        let mut state = state();
        let loaded = primary(&mut state, "a b");
        state.apply(loaded);
        let loaded = reference(&mut state, &["a"]);
        let stale = state.apply(loaded).unwrap();

        let loaded = primary(&mut state, "c d");
        let fresh = state.apply(loaded).unwrap();
        state.apply(stale.run());
        assert!(state.session.outcome().is_none());

        state.apply(fresh.run());
        let outcome = state.session.outcome().unwrap();
        assert_eq!(outcome.comparison.not_found, vec!["c", "d"]);
    }

    /// 先に依頼した読み込みが後から届いても、新しい選択を上書きしない
    #[test]
    fn test_late_primary_load_ignored() {
        let mut state = state();
        let slow = primary_at(&mut state, "slow.pdf", "old");
        let fast = primary_at(&mut state, "fast.txt", "new");

        state.apply(fast);
        state.apply(slow);
        assert_eq!(state.primary_path, Some(PathBuf::from("fast.txt")));
        let words: Vec<_> = state.session.document().unwrap().words().collect();
        assert_eq!(words, vec!["new"]);
    }

    #[test]
    fn test_late_reference_reload_ignored() {
        let mut state = state();
        let first = reference(&mut state, &["old"]);
        let second = reference(&mut state, &["new"]);

        state.apply(second);
        assert!(state.apply(first).is_none());
        assert!(state.session.corpus().unwrap().contains("new"));
        assert!(!state.session.corpus().unwrap().contains("old"));
    }

    /// リセット前に依頼した読み込みはリセット後に反映しない
    #[test]
    fn test_load_after_reset_ignored() {
        let mut state = state();
        let late_primary = primary_at(&mut state, "late.txt", "a");
        let late_reference = reference(&mut state, &["a"]);

        state.reset();
        assert!(state.apply(late_primary).is_none());
        assert!(state.apply(late_reference).is_none());
        assert_eq!(state.session.phase(), Phase::Empty);
        assert_eq!(state.primary_path, None);
        assert!(state.reference_paths.is_empty());
    }

    #[test]
    fn test_primary_error_keeps_state() {
        let mut state = state();
        let loaded = primary(&mut state, "a");
        state.apply(loaded);
        let Job::LoadPrimary { request, .. } = state.primary_job(PathBuf::from("report.docx")) else {
            panic!("primary job expected");
        };
        let job = state.apply(JobOutcome::PrimaryLoaded {
            request,
            path: PathBuf::from("report.docx"),
            result: Err(ProofError::MissingInput("x".into())),
        });
        assert!(job.is_none());
        assert_eq!(state.primary_path, Some(PathBuf::from("main.txt")));
        assert_eq!(state.session.phase(), Phase::HasPrimary);
        assert!(matches!(state.status, Status::Error(_)));
    }

    #[test]
    fn test_empty_primary_is_info() {
        let mut state = state();
        let loaded = primary(&mut state, "   ");
        state.apply(loaded);
        let loaded = reference(&mut state, &["a"]);
        let job = state.apply(loaded).unwrap();
        state.apply(job.run());
        assert!(state.session.outcome().is_none());
        assert!(matches!(state.status, Status::Info(_)));
    }

    #[test]
    fn test_navigation_and_view() {
        let mut state = state();
        let loaded = primary(&mut state, "x y\nz");
        state.apply(loaded);
        let loaded = reference(&mut state, &["none"]);
        let job = state.apply(loaded).unwrap();
        state.apply(job.run());
        state.take_scroll();

        state.next();
        assert_eq!(state.session.cursor().current(), Some(1));
        assert!(state.take_scroll());

        state.set_view(ReportView::Inline);
        assert_eq!(state.current_line(), Some(1));
        state.locate();
        assert_eq!(state.session.cursor().current(), Some(0));
    }

    #[test]
    fn test_reload_and_reset() {
        let mut state = state();
        assert!(state.reload_reference_job().is_none());
        let loaded = reference(&mut state, &["a"]);
        state.apply(loaded);
        assert!(matches!(
            state.reload_reference_job(),
            Some(Job::LoadReference { .. })
        ));

        state.reset();
        assert_eq!(state.session.phase(), Phase::Empty);
        assert!(state.reference_paths.is_empty());
        assert_eq!(state.status, Status::Idle);
    }
}
