//! 照合モジュール
//!
//! 本文の重複なしトークンを辞書順に並べ、コーパスに含まれるかで振り分ける。
//! 2回目以降に出現したトークンは重複として記録する。

use crate::types::ReferenceCorpus;
use serde::Serialize;
use std::collections::BTreeSet;

/// 照合結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Comparison {
    /// コーパスに含まれたトークン（辞書順・重複なし）
    pub found: Vec<String>,
    /// コーパスに含まれなかったトークン（辞書順・重複なし）
    pub not_found: Vec<String>,
    /// 本文中に2回以上出現したトークン
    pub duplicates: BTreeSet<String>,
    /// 本文の総トークン数
    pub total_tokens: usize,
}

impl Comparison {
    pub fn distinct_count(&self) -> usize {
        self.found.len() + self.not_found.len()
    }

    /// 一致率（0.0-1.0）
    pub fn match_rate(&self) -> f64 {
        let distinct = self.distinct_count();
        if distinct == 0 {
            0.0
        } else {
            self.found.len() as f64 / distinct as f64
        }
    }

    pub fn is_not_found(&self, token: &str) -> bool {
        self.not_found
            .binary_search_by(|t| t.as_str().cmp(token))
            .is_ok()
    }

    pub fn is_duplicate(&self, token: &str) -> bool {
        self.duplicates.contains(token)
    }
}

/// トークン列をコーパスと照合
pub fn compare<'a, I>(tokens: I, corpus: &ReferenceCorpus) -> Comparison
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = BTreeSet::new();
    let mut duplicates = BTreeSet::new();
    let mut total_tokens = 0;

    for token in tokens {
        total_tokens += 1;
        if !seen.insert(token) {
            duplicates.insert(token.to_string());
        }
    }

    let (found, not_found): (Vec<String>, Vec<String>) = seen
        .into_iter()
        .map(str::to_string)
        .partition(|token| corpus.contains(token));

    tracing::debug!(
        total_tokens,
        found = found.len(),
        not_found = not_found.len(),
        duplicates = duplicates.len(),
        mode = %corpus.mode(),
        "comparison finished"
    );

    Comparison {
        found,
        not_found,
        duplicates,
        total_tokens,
    }
}
