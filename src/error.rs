use std::path::PathBuf;
use thiserror::Error;

/// 入力ファイルの役割
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputRole {
    /// 本文（TXT / PDF）
    Primary,
    /// 校正ファイル（Excel）
    Reference,
}

impl std::fmt::Display for InputRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputRole::Primary => write!(f, "本文ファイル（.txt / .pdf）"),
            InputRole::Reference => write!(f, "校正ファイル（.xlsx / .xls）"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ProofError {
    #[error("未対応のファイル形式です: {path}（{role}のみ対応）")]
    UnsupportedFormat { path: PathBuf, role: InputRole },

    #[error("ファイル読み込みエラー: {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("入力が不足しています: {0}")]
    MissingInput(String),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error("設定エラー: {0}")]
    Config(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] text_proof_common::Error),
}

impl ProofError {
    pub fn read(path: &std::path::Path, reason: impl std::fmt::Display) -> Self {
        ProofError::Read {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// 空入力はエラーではなく状態として表示する
    pub fn is_informational(&self) -> bool {
        matches!(self, ProofError::Common(e) if e.is_informational())
    }
}

pub type Result<T> = std::result::Result<T, ProofError>;
