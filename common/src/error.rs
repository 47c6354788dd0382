//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("入力ファイルが空です")]
    EmptyInput,

    #[error("照合の準備ができていません: {0}")]
    NotReady(String),
}

impl Error {
    /// エラーではなく状態として扱うもの
    pub fn is_informational(&self) -> bool {
        matches!(self, Error::EmptyInput)
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
