//! 空白の正規化
//!
//! 本文とExcelセルで規則が異なる:
//! - 本文: 連続する空白を1つの区切りとみなし、語の境界を残す
//! - セル: 空白をすべて取り除く（完全一致・部分一致の対象になるため）

/// 連続する空白を1つの半角スペースに畳み、前後を除去
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 空白をすべて除去（全角スペース・改行を含む）
pub fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// 1行を空白区切りのトークンに分割し、各トークンの文字位置を返す
pub fn split_tokens(line: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut tokens = Vec::new();
    let mut start: Option<(usize, usize)> = None;
    let mut chars = 0;

    for (byte, ch) in line.char_indices() {
        if ch.is_whitespace() {
            if let Some((column, from)) = start.take() {
                tokens.push((column, &line[from..byte]));
            }
        } else if start.is_none() {
            start = Some((chars, byte));
        }
        chars += 1;
    }
    if let Some((column, from)) = start {
        tokens.push((column, &line[from..]));
    }

    tokens.into_iter()
}
