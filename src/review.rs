//! 対話式レビューモジュール
//!
//! 未一致項目を1件ずつ表示し、前後に移動しながら確認する。

use crate::error::{ProofError, Result};
use dialoguer::Input;
use text_proof_common::{ReportView, Session};

/// 対話アクション
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Next,
    Previous,
    /// 先頭の未一致項目へ
    First,
    Quit,
}

pub fn parse_action(input: &str) -> Option<ReviewAction> {
    match input.trim() {
        "" | "n" | "j" => Some(ReviewAction::Next),
        "p" | "k" => Some(ReviewAction::Previous),
        "f" | "g" => Some(ReviewAction::First),
        "q" | "Q" => Some(ReviewAction::Quit),
        _ => None,
    }
}

/// 現在位置の表示文字列（例: `[2/5] apple ← 3: apple pie`）
pub fn describe_current(session: &Session) -> Option<String> {
    let outcome = session.outcome()?;
    let (token, line) = session.current(ReportView::Inline)?;
    let source = outcome.inline.lines.get(line)?.text();
    Some(format!(
        "[{}] {} ← {}: {}",
        session.cursor().position_label(),
        token,
        line,
        source
    ))
}

pub fn apply_action(session: &mut Session, action: ReviewAction) -> bool {
    match action {
        ReviewAction::Next => session.next().is_some(),
        ReviewAction::Previous => session.previous().is_some(),
        ReviewAction::First => session.first().is_some(),
        ReviewAction::Quit => false,
    }
}

/// 照合済みセッションの未一致項目を対話的に確認
pub fn run_review(session: &mut Session) -> Result<()> {
    let Some(outcome) = session.outcome().cloned() else {
        return Err(text_proof_common::Error::NotReady("照合が完了していません".into()).into());
    };

    if outcome.comparison.not_found.is_empty() {
        println!("✓ すべてのトークンが校正ファイルに含まれています");
        return Ok(());
    }

    println!("🔎 未一致: {}件", outcome.comparison.not_found.len());
    println!("---");
    println!("操作: [Enter/n]次へ [p]前へ [f]先頭 [q]終了");
    println!("---\n");

    loop {
        if let Some(line) = describe_current(session) {
            println!("{}", line);
        }

        let input: String = Input::new()
            .with_prompt("操作")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| ProofError::Prompt(e.to_string()))?;

        match parse_action(&input) {
            Some(ReviewAction::Quit) => break,
            Some(action) => {
                apply_action(session, action);
            }
            None => println!("  → 不明な操作です: {}", input.trim()),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use text_proof_common::{CorpusBuilder, Document, MatchMode};

    fn compared_session() -> Session {
        let mut session = Session::new();
        session.set_primary(Document::from_text("ok x\nok y\nz"));
        let mut builder = CorpusBuilder::new(MatchMode::Exact);
        builder.push_cell("ok");
        session.set_reference(builder.build());
        session.compare().unwrap();
        session
    }

    #[test]
    fn test_parse_action() {
        assert_eq!(parse_action(""), Some(ReviewAction::Next));
        assert_eq!(parse_action(" p "), Some(ReviewAction::Previous));
        assert_eq!(parse_action("f"), Some(ReviewAction::First));
        assert_eq!(parse_action("q"), Some(ReviewAction::Quit));
        assert_eq!(parse_action("x"), None);
    }

    #[test]
    fn test_describe_current() {
        let mut session = compared_session();
        assert_eq!(describe_current(&session).unwrap(), "[1/3] x ← 1: ok x");
        apply_action(&mut session, ReviewAction::Next);
        assert_eq!(describe_current(&session).unwrap(), "[2/3] y ← 2: ok y");
    }

    #[test]
    fn test_actions_clamp() {
        let mut session = compared_session();
        for _ in 0..5 {
            apply_action(&mut session, ReviewAction::Next);
        }
        assert_eq!(session.cursor().current(), Some(2));
        apply_action(&mut session, ReviewAction::First);
        apply_action(&mut session, ReviewAction::Previous);
        assert_eq!(session.cursor().current(), Some(0));
        assert!(!apply_action(&mut session, ReviewAction::Quit));
    }

    #[test]
    fn test_review_requires_outcome() {
        let mut session = Session::new();
        assert!(run_review(&mut session).is_err());
    }
}
