use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use text_proof::{cli, config, error, extractor, logging, output, pipeline, review};
use cli::{Cli, Commands, InputArgs};
use config::Config;
use error::Result;
use extractor::{FailurePolicy, ReferenceOptions};
use output::OutputFormat;
use pipeline::{BatchRequest, LoadedInputs};
use text_proof_common::{ReportView, Session};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli).await {
        Ok(()) => {}
        // 空入力は状態表示のみ
        Err(e) if e.is_informational() => println!("ℹ {}", e),
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    // 設定の編集だけは壊れた設定ファイルをエラーにする
    let config = match cli.command {
        Some(Commands::Config { .. }) => Config::load()?,
        _ => Config::load_or_default(),
    };

    match cli.command {
        None => {
            if cli.batch.files.is_empty() {
                let _ = Cli::command().print_help();
                return Ok(());
            }
            println!("📝 text-proof - 照合\n");
            let output = config.resolve_report_path();
            batch(&cli.batch, &config, output, OutputFormat::Text, ReportView::Summary).await?;
        }

        Some(Commands::Compare { input, output, format, view }) => {
            println!("📝 text-proof - 照合\n");
            let output = output.unwrap_or_else(|| config.resolve_report_path());
            batch(&input, &config, output, format, view).await?;
        }

        Some(Commands::Review { input }) => {
            println!("🔎 text-proof - レビュー\n");
            let mut session = load(&input, &config).await?.into_session();
            session.compare()?;
            print_rate(&session);
            review::run_review(&mut session)?;
        }

        Some(Commands::Preview { input, limit }) => {
            println!("👀 text-proof - 清書プレビュー\n");
            let limit = limit.unwrap_or(config.preview_limit);
            let inputs = load(&input, &config).await?;
            print_preview(&inputs, limit);
        }

        Some(Commands::Config { set_mode, set_report, set_skip_unreadable, set_all_sheets, show }) => {
            let mut config = config;
            let mut changed = false;

            if let Some(mode) = set_mode {
                config.match_mode = mode;
                changed = true;
            }
            if let Some(path) = set_report {
                config.report_path = Some(path);
                changed = true;
            }
            if let Some(skip) = set_skip_unreadable {
                config.skip_unreadable = skip;
                changed = true;
            }
            if let Some(all) = set_all_sheets {
                config.all_sheets = all;
                changed = true;
            }

            if changed {
                config.save()?;
                println!("✔ 設定を保存しました: {}", Config::config_path()?.display());
            }

            if show || !changed {
                println!("設定:");
                println!("  照合モード: {}", config.match_mode);
                println!("  レポート出力先: {}", config.resolve_report_path().display());
                println!("  読めないファイルをスキップ: {}", if config.skip_unreadable { "はい" } else { "いいえ" });
                println!("  全シート読み込み: {}", if config.all_sheets { "はい" } else { "いいえ" });
                println!("  プレビュー件数: {}", config.preview_limit);
            }
        }
    }

    Ok(())
}

fn reference_options(input: &InputArgs, config: &Config) -> ReferenceOptions {
    ReferenceOptions {
        mode: input.mode.unwrap_or(config.match_mode),
        on_error: if input.skip_unreadable || config.skip_unreadable {
            FailurePolicy::Skip
        } else {
            FailurePolicy::Abort
        },
        all_sheets: input.all_sheets || config.all_sheets,
    }
}

fn spinner(message: &'static str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    bar.set_style(style);
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

async fn load(input: &InputArgs, config: &Config) -> Result<LoadedInputs> {
    let (primary, references) = input.split()?;
    let options = reference_options(input, config);

    let bar = spinner("本文と校正ファイルを読み込み中...");
    let result = pipeline::load_inputs(primary, references, options).await;
    bar.finish_and_clear();

    let inputs = result?;
    println!(
        "✔ 本文: {}トークン（{}種類） / 校正ファイル: {}件（{}モード）",
        inputs.document.token_count(),
        inputs.document.unique_count(),
        inputs.reference.files_read,
        options.mode
    );
    print_skipped(&inputs.reference.skipped);
    Ok(inputs)
}

async fn batch(
    input: &InputArgs,
    config: &Config,
    output: std::path::PathBuf,
    format: OutputFormat,
    view: ReportView,
) -> Result<()> {
    let (primary, references) = input.split()?;
    let request = BatchRequest {
        primary,
        references,
        options: reference_options(input, config),
        output,
        view,
        format,
    };

    let bar = spinner("照合中...");
    let result = pipeline::run_batch(request).await;
    bar.finish_and_clear();

    let summary = result?;
    let comparison = &summary.outcome.comparison;
    println!("✔ 校正ファイル: {}件", summary.files_read);
    print_skipped(&summary.skipped);
    println!(
        "✔ 一致: {}件 / 不一致: {}件（一致率 {:.1}%）",
        comparison.found.len(),
        comparison.not_found.len(),
        comparison.match_rate() * 100.0
    );
    println!("✔ レポートを保存: {}", summary.report_path.display());
    println!("\n✅ 照合完了");
    Ok(())
}

fn print_skipped(skipped: &[extractor::SkippedFile]) {
    for file in skipped {
        println!("⚠ スキップ: {}（{}）", file.path.display(), file.reason);
    }
}

fn print_rate(session: &Session) {
    if let Some(outcome) = session.outcome() {
        let comparison = &outcome.comparison;
        println!(
            "✔ 一致: {}件 / 不一致: {}件（一致率 {:.1}%）\n",
            comparison.found.len(),
            comparison.not_found.len(),
            comparison.match_rate() * 100.0
        );
    }
}

fn print_preview(inputs: &LoadedInputs, limit: usize) {
    let document = &inputs.document;
    let corpus = &inputs.reference.corpus;

    println!("\n本文（{}行 / {}トークン）:", document.lines.len(), document.token_count());
    for (i, word) in document.words().take(limit).enumerate() {
        println!("  {:>3}. {}", i + 1, word);
    }
    if document.token_count() > limit {
        println!("  ...（残り{}件）", document.token_count() - limit);
    }

    println!("\n校正コーパス（{}モード / サイズ {}）:", corpus.mode(), corpus.size());
    for value in corpus.sample(limit) {
        println!("  - {}", value);
    }
}
