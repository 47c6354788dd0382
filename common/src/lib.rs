//! text-proof Common Library
//!
//! CLIとデスクトップ版で共有される照合パイプライン（ファイルI/Oなし）

pub mod types;
pub mod normalize;
pub mod compare;
pub mod report;
pub mod navigation;
pub mod session;
pub mod error;

pub use types::{CorpusBuilder, Document, MatchMode, ReferenceCorpus, Token};
pub use normalize::{normalize_whitespace, strip_whitespace};
pub use compare::{compare, Comparison};
pub use report::{render, render_inline, render_summary, Report, ReportLine, ReportView, Span, SpanStyle};
pub use navigation::{Cursor, CursorState};
pub use session::{run_comparison, Outcome, Phase, ReadyInputs, Session};
pub use error::{Error, Result};
