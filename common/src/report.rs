//! 照合結果のレポート生成
//!
//! レポートはスタイル付きスパンの行リスト。表示側（CLI・デスクトップ）は
//! スタイルごとに色を割り当てるだけでよい。
//!
//! ## ビュー
//! - Summary: 一致・不一致の番号付きリスト（バッチ出力と同じ内容）
//! - Inline: 本文の各行を表示し、不一致・重複トークンを強調

use crate::compare::Comparison;
use crate::types::Document;
use serde::Serialize;
use std::collections::HashMap;

/// スパンの表示スタイル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanStyle {
    Plain,
    Heading,
    Found,
    NotFound,
    Duplicate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    pub text: String,
    pub style: SpanStyle,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportLine {
    pub spans: Vec<Span>,
}

impl ReportLine {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn styled(text: impl Into<String>, style: SpanStyle) -> Self {
        Self {
            spans: vec![Span {
                text: text.into(),
                style,
            }],
        }
    }

    fn push(&mut self, text: &str, style: SpanStyle) {
        if !text.is_empty() {
            self.spans.push(Span {
                text: text.to_string(),
                style,
            });
        }
    }

    /// スタイルを除いた行テキスト
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// レポートの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportView {
    #[default]
    Summary,
    Inline,
}

impl std::str::FromStr for ReportView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "summary" | "list" => Ok(ReportView::Summary),
            "inline" | "text" => Ok(ReportView::Inline),
            _ => Err(format!("Unknown view: {}. Use summary or inline", s)),
        }
    }
}

impl std::fmt::Display for ReportView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportView::Summary => write!(f, "summary"),
            ReportView::Inline => write!(f, "inline"),
        }
    }
}

/// 生成済みレポート
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub view: ReportView,
    pub lines: Vec<ReportLine>,
    /// `Comparison::not_found[i]` が表示される行番号
    pub anchors: Vec<usize>,
}

impl Report {
    /// 未一致項目 `index` の行番号
    pub fn locate(&self, index: usize) -> Option<usize> {
        self.anchors.get(index).copied()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// プレーンテキスト（バッチ出力用）
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.text());
            out.push('\n');
        }
        out
    }
}

pub fn render(view: ReportView, document: &Document, comparison: &Comparison) -> Report {
    match view {
        ReportView::Summary => render_summary(comparison),
        ReportView::Inline => render_inline(document, comparison),
    }
}

/// 一致・不一致の番号付きリスト
pub fn render_summary(comparison: &Comparison) -> Report {
    let mut lines = vec![
        ReportLine::styled("照合結果：", SpanStyle::Heading),
        ReportLine::blank(),
        ReportLine::styled(
            format!("一致（{}件）：", comparison.found.len()),
            SpanStyle::Heading,
        ),
    ];
    for (i, token) in comparison.found.iter().enumerate() {
        lines.push(ReportLine::styled(
            format!("{}. {}", i + 1, token),
            SpanStyle::Found,
        ));
    }

    lines.push(ReportLine::blank());
    lines.push(ReportLine::styled(
        format!("不一致（{}件）：", comparison.not_found.len()),
        SpanStyle::NotFound,
    ));

    let mut anchors = Vec::with_capacity(comparison.not_found.len());
    for (i, token) in comparison.not_found.iter().enumerate() {
        anchors.push(lines.len());
        lines.push(ReportLine::styled(
            format!("{}. {}", i + 1, token),
            SpanStyle::NotFound,
        ));
    }

    Report {
        view: ReportView::Summary,
        lines,
        anchors,
    }
}

/// 本文を行ごとに表示し、トークンを強調する
///
/// 同一内容の行は最初の1回だけ表示する。重複トークンは不一致より優先して
/// 重複スタイルで表示する。
pub fn render_inline(document: &Document, comparison: &Comparison) -> Report {
    let mut by_line: Vec<Vec<(usize, &str)>> = vec![Vec::new(); document.lines.len()];
    for token in &document.tokens {
        if let Some(slot) = by_line.get_mut(token.line) {
            slot.push((token.column, token.text.as_str()));
        }
    }

    let mut lines = vec![ReportLine::styled("照合結果（本文）：", SpanStyle::Heading)];
    let mut shown = std::collections::HashSet::new();
    let mut first_line: HashMap<&str, usize> = HashMap::new();
    let mut mismatches = 0;

    for (index, text) in document.lines.iter().enumerate() {
        if !shown.insert(text.as_str()) {
            continue;
        }

        let offsets = char_offsets(text);
        let mut line = ReportLine::default();
        let mut pos = 0;

        for &(column, token) in &by_line[index] {
            let start = offsets[column];
            line.push(&text[pos..start], SpanStyle::Plain);

            let style = if comparison.is_duplicate(token) {
                SpanStyle::Duplicate
            } else if comparison.is_not_found(token) {
                mismatches += 1;
                SpanStyle::NotFound
            } else {
                SpanStyle::Found
            };
            line.push(token, style);
            first_line.entry(token).or_insert(lines.len());
            pos = start + token.len();
        }
        line.push(&text[pos..], SpanStyle::Plain);
        lines.push(line);
    }

    lines.push(ReportLine::blank());
    if mismatches > 0 {
        lines.push(ReportLine::styled(
            format!("{} 件の不一致が見つかりました", mismatches),
            SpanStyle::NotFound,
        ));
    } else {
        lines.push(ReportLine::styled("不一致は見つかりませんでした。", SpanStyle::Plain));
    }

    let anchors = comparison
        .not_found
        .iter()
        .map(|token| first_line.get(token.as_str()).copied().unwrap_or_default())
        .collect();

    Report {
        view: ReportView::Inline,
        lines,
        anchors,
    }
}

/// 文字位置 → バイト位置（末尾に行長を含む）
fn char_offsets(text: &str) -> Vec<usize> {
    text.char_indices()
        .map(|(byte, _)| byte)
        .chain(std::iter::once(text.len()))
        .collect()
}
