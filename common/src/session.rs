//! 照合セッション
//!
//! 本文・校正コーパス・照合結果・カーソルをまとめて保持する。
//! UIは入力が揃ったこと（`Phase::Ready`）を見て照合を起動する。
//!
//! 入力が差し替わるたびに世代番号が進み、古い世代の照合結果は破棄される。

use crate::compare::{compare, Comparison};
use crate::error::{Error, Result};
use crate::navigation::Cursor;
use crate::report::{render_inline, render_summary, Report, ReportView};
use crate::types::{Document, ReferenceCorpus};
use std::sync::Arc;

/// セッションの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Empty,
    HasPrimary,
    HasReference,
    /// 両方の入力が揃い、照合待ち
    Ready,
    Compared,
}

/// 1回分の照合結果一式
#[derive(Debug, Clone)]
pub struct Outcome {
    pub comparison: Comparison,
    pub summary: Report,
    pub inline: Report,
}

impl Outcome {
    pub fn report(&self, view: ReportView) -> &Report {
        match view {
            ReportView::Summary => &self.summary,
            ReportView::Inline => &self.inline,
        }
    }
}

/// 照合を実行して両ビューのレポートを作る
///
/// 本文にトークンがなければ `Error::EmptyInput`。
pub fn run_comparison(document: &Document, corpus: &ReferenceCorpus) -> Result<Outcome> {
    if document.is_empty() {
        return Err(Error::EmptyInput);
    }
    let comparison = compare(document.words(), corpus);
    let summary = render_summary(&comparison);
    let inline = render_inline(document, &comparison);
    Ok(Outcome {
        comparison,
        summary,
        inline,
    })
}

/// 照合に必要な入力一式（バックグラウンド実行用）
#[derive(Debug, Clone)]
pub struct ReadyInputs {
    pub generation: u64,
    pub document: Arc<Document>,
    pub corpus: Arc<ReferenceCorpus>,
}

#[derive(Debug, Default)]
pub struct Session {
    document: Option<Arc<Document>>,
    corpus: Option<Arc<ReferenceCorpus>>,
    outcome: Option<Arc<Outcome>>,
    cursor: Cursor,
    generation: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        match (&self.document, &self.corpus, &self.outcome) {
            (Some(_), Some(_), Some(_)) => Phase::Compared,
            (Some(_), Some(_), None) => Phase::Ready,
            (Some(_), None, _) => Phase::HasPrimary,
            (None, Some(_), _) => Phase::HasReference,
            (None, None, _) => Phase::Empty,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn document(&self) -> Option<&Arc<Document>> {
        self.document.as_ref()
    }

    pub fn corpus(&self) -> Option<&Arc<ReferenceCorpus>> {
        self.corpus.as_ref()
    }

    pub fn outcome(&self) -> Option<&Arc<Outcome>> {
        self.outcome.as_ref()
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// 本文を差し替える。戻り値の Phase が Ready なら照合を起動する。
    pub fn set_primary(&mut self, document: Document) -> Phase {
        self.document = Some(Arc::new(document));
        self.invalidate();
        self.phase()
    }

    /// 校正コーパスを差し替える。戻り値の Phase が Ready なら照合を起動する。
    pub fn set_reference(&mut self, corpus: ReferenceCorpus) -> Phase {
        self.corpus = Some(Arc::new(corpus));
        self.invalidate();
        self.phase()
    }

    fn invalidate(&mut self) {
        self.generation += 1;
        self.outcome = None;
        self.cursor = Cursor::default();
        tracing::debug!(generation = self.generation, phase = ?self.phase(), "session inputs changed");
    }

    pub fn ready_inputs(&self) -> Option<ReadyInputs> {
        match (&self.document, &self.corpus) {
            (Some(document), Some(corpus)) => Some(ReadyInputs {
                generation: self.generation,
                document: Arc::clone(document),
                corpus: Arc::clone(corpus),
            }),
            _ => None,
        }
    }

    /// 照合結果をまとめて差し替える。世代が古ければ破棄して false を返す。
    pub fn apply_outcome(&mut self, generation: u64, outcome: Arc<Outcome>) -> bool {
        if generation != self.generation || self.ready_inputs().is_none() {
            tracing::debug!(generation, current = self.generation, "stale outcome discarded");
            return false;
        }
        self.cursor = Cursor::for_results(outcome.comparison.not_found.len());
        self.outcome = Some(outcome);
        true
    }

    /// 同期的に照合する
    pub fn compare(&mut self) -> Result<Arc<Outcome>> {
        let inputs = self.ready_inputs().ok_or_else(|| {
            Error::NotReady(match self.phase() {
                Phase::HasPrimary => "校正ファイルが未選択です".to_string(),
                Phase::HasReference => "本文ファイルが未選択です".to_string(),
                _ => "本文と校正ファイルを選択してください".to_string(),
            })
        })?;
        let outcome = Arc::new(run_comparison(&inputs.document, &inputs.corpus)?);
        self.apply_outcome(inputs.generation, Arc::clone(&outcome));
        Ok(outcome)
    }

    pub fn next(&mut self) -> Option<usize> {
        self.cursor.next()
    }

    pub fn previous(&mut self) -> Option<usize> {
        self.cursor.previous()
    }

    pub fn first(&mut self) -> Option<usize> {
        self.cursor.first()
    }

    /// 現在の未一致項目と、指定ビューでの行番号
    pub fn current(&self, view: ReportView) -> Option<(&str, usize)> {
        let outcome = self.outcome.as_ref()?;
        let index = self.cursor.current()?;
        let token = outcome.comparison.not_found.get(index)?;
        let line = outcome.report(view).locate(index)?;
        Some((token.as_str(), line))
    }

    pub fn reset(&mut self) {
        self.document = None;
        self.corpus = None;
        self.invalidate();
    }
}
