use crate::error::{ProofError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use text_proof_common::MatchMode;

/// レポート出力先を上書きする環境変数
pub const REPORT_PATH_ENV: &str = "TEXT_PROOF_REPORT";

const DEFAULT_REPORT_FILE: &str = "results.txt";

const CONFIG_DIR: [&str; 2] = [".config", "text-proof"];
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub match_mode: MatchMode,
    pub report_path: Option<PathBuf>,
    /// 読めない校正ファイルを空として扱い、処理を続ける
    pub skip_unreadable: bool,
    /// 先頭シートだけでなく全シートを読む
    pub all_sheets: bool,
    /// プレビューで表示する件数
    pub preview_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    /// 設定ファイルを読む（ファイルがなければ既定値）
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// 照合系コマンド用。壊れた設定ファイルは警告して既定値で続ける
    pub fn load_or_default() -> Self {
        match Self::config_path() {
            Ok(path) => Self::load_from_or_default(&path),
            Err(err) => {
                tracing::warn!(%err, "config path unavailable, using defaults");
                Self::default()
            }
        }
    }

    pub fn load_from_or_default(path: &Path) -> Self {
        Self::load_from(path).unwrap_or_else(|err| {
            tracing::warn!(path = %path.display(), %err, "config ignored, using defaults");
            Self::default()
        })
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ProofError::read(path, err)),
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// 整形済みJSONで保存（親ディレクトリがなければ作る）
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let dir = path.parent().filter(|dir| !dir.as_os_str().is_empty());
        if let Some(dir) = dir {
            std::fs::create_dir_all(dir)?;
        }
        let writer = std::io::BufWriter::new(std::fs::File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// `~/.config/text-proof/config.json`
    pub fn config_path() -> Result<PathBuf> {
        let mut path = dirs::home_dir()
            .ok_or_else(|| ProofError::Config("ホームディレクトリが見つかりません".into()))?;
        path.extend(CONFIG_DIR);
        path.push(CONFIG_FILE);
        Ok(path)
    }

    fn default_config() -> Self {
        Self {
            match_mode: MatchMode::Contains,
            report_path: None,
            skip_unreadable: false,
            all_sheets: false,
            preview_limit: 20,
        }
    }

    /// レポート出力先（環境変数 > 設定ファイル > 一時ディレクトリ/results.txt）
    pub fn resolve_report_path(&self) -> PathBuf {
        if let Ok(path) = std::env::var(REPORT_PATH_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        self.report_path
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_REPORT_FILE))
    }
}
