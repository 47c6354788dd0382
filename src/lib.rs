//! text-proof
//!
//! 本文（TXT/PDF）のトークンをExcelの語彙リストと照合する。
//! 照合ロジックは `text-proof-common`、ファイル入出力はこのクレートが担当する。

pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod review;
pub mod worker;
