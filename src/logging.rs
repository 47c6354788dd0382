//! ログ初期化
//!
//! `RUST_LOG` が設定されていればそれを使う。なければ warn、
//! `--verbose` 指定時は本クレートのみ debug。出力先は stderr。

use tracing_subscriber::{fmt, EnvFilter};

pub fn init(verbose: bool) {
    let default_filter = if verbose {
        "warn,text_proof=debug,text_proof_common=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // 二重初期化（テスト・デスクトップ版からの呼び出し）は無視する
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
