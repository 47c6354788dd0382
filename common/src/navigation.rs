//! 未一致項目のナビゲーション
//!
//! 状態は `Inactive` と `Active(index)` の2つ。
//! index は常に `0..len` に収まる。

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum CursorState {
    #[default]
    Inactive,
    Active(usize),
}

/// 未一致リスト上のカーソル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    state: CursorState,
    len: usize,
}

impl Cursor {
    /// 新しい照合結果に合わせて作り直す（空でなければ先頭を指す）
    pub fn for_results(len: usize) -> Self {
        let state = if len > 0 {
            CursorState::Active(0)
        } else {
            CursorState::Inactive
        };
        Self { state, len }
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn current(&self) -> Option<usize> {
        match self.state {
            CursorState::Active(index) => Some(index),
            CursorState::Inactive => None,
        }
    }

    pub fn next(&mut self) -> Option<usize> {
        self.state = match self.state {
            CursorState::Active(index) => CursorState::Active((index + 1).min(self.len - 1)),
            CursorState::Inactive => return self.first(),
        };
        self.current()
    }

    pub fn previous(&mut self) -> Option<usize> {
        self.state = match self.state {
            CursorState::Active(index) => CursorState::Active(index.saturating_sub(1)),
            CursorState::Inactive => return self.first(),
        };
        self.current()
    }

    /// 先頭の未一致項目へ移動
    pub fn first(&mut self) -> Option<usize> {
        if self.len > 0 {
            self.state = CursorState::Active(0);
        }
        self.current()
    }

    pub fn reset(&mut self) {
        self.state = CursorState::Inactive;
    }

    /// 位置表示用（例: "3/10"）
    pub fn position_label(&self) -> String {
        match self.state {
            CursorState::Active(index) => format!("{}/{}", index + 1, self.len),
            CursorState::Inactive => format!("-/{}", self.len),
        }
    }
}
