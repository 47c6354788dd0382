//! 照合パイプラインの型定義
//!
//! CLIとデスクトップ版で共有される型:
//! - Token / Document: 本文（TXT・PDF）から抽出したトークン列
//! - ReferenceCorpus: Excelから構築した照合用コーパス
//! - MatchMode: コーパスの構築方法と照合方法

use crate::normalize::{split_tokens, strip_whitespace};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 本文中のトークン
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    /// `Document::lines` のインデックス
    pub line: usize,
    /// 行内の文字位置（バイトではなく文字数）
    pub column: usize,
}

/// 抽出済みの本文
///
/// 空白のみの行は表示行に含めない。行末の空白は除去する。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub lines: Vec<String>,
    pub tokens: Vec<Token>,
}

impl Document {
    /// テキスト全体から構築
    pub fn from_text(text: &str) -> Self {
        let mut doc = Self::default();
        doc.push_text(text);
        doc
    }

    /// ページごとのテキストから構築（ページ間は改行で区切る）
    pub fn from_pages<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut doc = Self::default();
        for page in pages {
            doc.push_text(page.as_ref());
        }
        doc
    }

    fn push_text(&mut self, text: &str) {
        for raw in text.lines() {
            let line = raw.trim_end();
            if line.trim_start().is_empty() {
                continue;
            }
            let index = self.lines.len();
            self.tokens.extend(split_tokens(line).map(|(column, word)| Token {
                text: word.to_string(),
                line: index,
                column,
            }));
            self.lines.push(line.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// 総トークン数（重複を含む）
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// 重複を除いたトークン数
    pub fn unique_count(&self) -> usize {
        self.words().collect::<BTreeSet<_>>().len()
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|t| t.text.as_str())
    }

    /// 空白を1つに畳んだ本文（清書プレビュー用）
    pub fn normalized_text(&self) -> String {
        self.words().collect::<Vec<_>>().join(" ")
    }
}

/// 照合モード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// セル値の集合に完全一致するか
    Exact,
    /// 全セルを連結した文字列に部分一致するか
    #[default]
    Contains,
}

impl std::str::FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exact" | "set" => Ok(MatchMode::Exact),
            "contains" | "substring" | "pool" => Ok(MatchMode::Contains),
            _ => Err(format!("Unknown match mode: {}. Use exact or contains", s)),
        }
    }
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchMode::Exact => write!(f, "exact"),
            MatchMode::Contains => write!(f, "contains"),
        }
    }
}

/// 照合用コーパス
///
/// `CorpusBuilder::build` でのみ生成され、以後は変更されない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "data", rename_all = "lowercase")]
pub enum ReferenceCorpus {
    Exact(BTreeSet<String>),
    Contains(String),
}

impl ReferenceCorpus {
    pub fn mode(&self) -> MatchMode {
        match self {
            ReferenceCorpus::Exact(_) => MatchMode::Exact,
            ReferenceCorpus::Contains(_) => MatchMode::Contains,
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        match self {
            ReferenceCorpus::Exact(values) => values.contains(token),
            ReferenceCorpus::Contains(pool) => pool.contains(token),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ReferenceCorpus::Exact(values) => values.is_empty(),
            ReferenceCorpus::Contains(pool) => pool.is_empty(),
        }
    }

    /// 値の数（Exact）または文字数（Contains）
    pub fn size(&self) -> usize {
        match self {
            ReferenceCorpus::Exact(values) => values.len(),
            ReferenceCorpus::Contains(pool) => pool.chars().count(),
        }
    }

    /// 先頭 `limit` 件の値（Containsは先頭 `limit` 文字）
    pub fn sample(&self, limit: usize) -> Vec<String> {
        match self {
            ReferenceCorpus::Exact(values) => values.iter().take(limit).cloned().collect(),
            ReferenceCorpus::Contains(pool) => {
                vec![pool.chars().take(limit).collect()]
            }
        }
    }
}

/// コーパス構築
#[derive(Debug, Clone)]
pub struct CorpusBuilder {
    mode: MatchMode,
    values: BTreeSet<String>,
    pool: String,
}

impl CorpusBuilder {
    pub fn new(mode: MatchMode) -> Self {
        Self {
            mode,
            values: BTreeSet::new(),
            pool: String::new(),
        }
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// セル値を1つ追加する。空白は全て除去し、空になった値は捨てる。
    pub fn push_cell(&mut self, raw: &str) {
        let cleaned = strip_whitespace(raw);
        if cleaned.is_empty() {
            return;
        }
        match self.mode {
            MatchMode::Exact => {
                self.values.insert(cleaned);
            }
            MatchMode::Contains => self.pool.push_str(&cleaned),
        }
    }

    /// 別ファイル分のビルダーを後ろに結合
    pub fn merge(&mut self, other: CorpusBuilder) {
        debug_assert_eq!(self.mode, other.mode);
        self.values.extend(other.values);
        self.pool.push_str(&other.pool);
    }

    pub fn build(self) -> ReferenceCorpus {
        match self.mode {
            MatchMode::Exact => ReferenceCorpus::Exact(self.values),
            MatchMode::Contains => ReferenceCorpus::Contains(self.pool),
        }
    }
}
