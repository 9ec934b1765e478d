pub mod error;
pub mod loader;
pub mod model;

pub use error::*;
pub use loader::{load_api_definition, load_environment};
pub use model::*;

use std::path::PathBuf;

/// 設定ファイルの候補 (優先順)
const CANDIDATES: [&str; 4] = [
    "stratus.local.yaml",
    "stratus.yaml",
    "stratus.yml",
    "stratus.json",
];

/// 環境定義ファイルを探す
///
/// 以下の優先順位で設定ファイルを検索:
/// 1. 環境変数 STRATUS_CONFIG_PATH (直接パス指定)
/// 2. カレントディレクトリ: stratus.local.yaml, stratus.yaml, stratus.yml, stratus.json
/// 3. ./.stratus/ ディレクトリ内: 同様の順序
/// 4. ~/.config/stratus/stratus.yaml (グローバル設定)
pub fn find_environment_file() -> Result<PathBuf> {
    // 1. 環境変数で直接指定
    if let Ok(config_path) = std::env::var("STRATUS_CONFIG_PATH") {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(path);
        }
    }

    let current_dir = std::env::current_dir()?;

    // 2. カレントディレクトリで検索
    for filename in &CANDIDATES {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(path);
        }
    }

    // 3. ./.stratus/ ディレクトリで検索
    let stratus_dir = current_dir.join(".stratus");
    if stratus_dir.is_dir() {
        for filename in &CANDIDATES {
            let path = stratus_dir.join(filename);
            if path.exists() {
                return Ok(path);
            }
        }
    }

    // 4. グローバル設定ファイル
    if let Some(config_dir) = dirs::config_dir() {
        let global_config = config_dir.join("stratus").join("stratus.yaml");
        if global_config.exists() {
            return Ok(global_config);
        }
    }

    Err(ConfigError::ConfigFileNotFound)
}
