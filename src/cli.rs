use crate::error::{ProofError, Result};
use crate::output::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use text_proof_common::{MatchMode, ReportView};

#[derive(Parser)]
#[command(name = "text-proof")]
#[command(about = "本文（TXT/PDF）のトークンをExcel語彙リストと照合するツール", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    // サブコマンド省略時のバッチ照合
    #[command(flatten)]
    pub batch: InputArgs,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// 入力ファイル指定（本文1つ + 校正ファイル1つ以上）
#[derive(Args, Clone, Debug, Default)]
pub struct InputArgs {
    /// 本文ファイル（.txt/.pdf）に続けて校正ファイル（.xlsx/.xls またはフォルダ）
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// 照合モード (exact/contains)
    #[arg(short, long)]
    pub mode: Option<MatchMode>,

    /// 読めない校正ファイルをスキップして続行
    #[arg(long)]
    pub skip_unreadable: bool,

    /// 全シートを読み込む（既定は先頭シートのみ）
    #[arg(long)]
    pub all_sheets: bool,
}

impl InputArgs {
    /// 本文と校正ファイルに分ける
    pub fn split(&self) -> Result<(PathBuf, Vec<PathBuf>)> {
        match self.files.split_first() {
            Some((primary, references)) if !references.is_empty() => {
                Ok((primary.clone(), references.to_vec()))
            }
            Some(_) => Err(ProofError::MissingInput(
                "校正ファイル（.xlsx / .xls）を1つ以上指定してください".into(),
            )),
            None => Err(ProofError::MissingInput(
                "本文ファイルと校正ファイルを指定してください".into(),
            )),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// 照合してレポートをファイルに出力
    Compare {
        #[command(flatten)]
        input: InputArgs,

        /// 出力ファイル（省略時は設定値、なければ一時ディレクトリの results.txt）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 出力形式 (text/json)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// レポートの種類 (summary/inline)
        #[arg(long, default_value = "summary")]
        view: ReportView,
    },

    /// 未一致項目を対話的に確認
    Review {
        #[command(flatten)]
        input: InputArgs,
    },

    /// 清書後の内容を表示
    Preview {
        #[command(flatten)]
        input: InputArgs,

        /// 表示件数（省略時は設定値）
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// 設定を表示/編集
    Config {
        /// 照合モードを設定 (exact/contains)
        #[arg(long)]
        set_mode: Option<MatchMode>,

        /// レポート出力先を設定
        #[arg(long)]
        set_report: Option<PathBuf>,

        /// 読めない校正ファイルのスキップを設定
        #[arg(long)]
        set_skip_unreadable: Option<bool>,

        /// 全シート読み込みを設定
        #[arg(long)]
        set_all_sheets: Option<bool>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_bare_files_are_batch_mode() {
        let cli = Cli::try_parse_from(["text-proof", "main.txt", "a.xlsx", "b.xlsx"]).unwrap();
        assert!(cli.command.is_none());
        let (primary, references) = cli.batch.split().unwrap();
        assert_eq!(primary, PathBuf::from("main.txt"));
        assert_eq!(references.len(), 2);
    }

    #[test]
    fn test_compare_subcommand() {
        let cli = Cli::try_parse_from([
            "text-proof", "compare", "main.pdf", "list.xlsx", "--mode", "exact", "--format", "json",
            "--view", "inline", "-o", "out.json",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Compare { input, output, format, view }) => {
                assert_eq!(input.mode, Some(MatchMode::Exact));
                assert_eq!(format, OutputFormat::Json);
                assert_eq!(view, ReportView::Inline);
                assert_eq!(output, Some(PathBuf::from("out.json")));
            }
            _ => panic!("compare expected"),
        }
    }

    #[test]
    fn test_split_requires_reference() {
        let args = InputArgs {
            files: vec![PathBuf::from("main.txt")],
            ..Default::default()
        };
        assert!(matches!(args.split(), Err(ProofError::MissingInput(_))));
        assert!(InputArgs::default().split().is_err());
    }
}
