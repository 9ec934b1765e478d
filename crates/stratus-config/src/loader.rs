//! 環境定義ローダー
//!
//! 拡張子で YAML / JSON を切り替え、読み込み後に検証まで行う

use crate::error::{ConfigError, Result};
use crate::model::EnvironmentConfig;
use std::path::Path;
use stratus_cloud::ApiDefinition;
use tracing::{debug, info, instrument};

/// ファイルから環境定義を読み込んで検証する
#[instrument(fields(path = %path.display()))]
pub fn load_environment(path: &Path) -> Result<EnvironmentConfig> {
    debug!("Reading environment file");
    let content = std::fs::read_to_string(path)?;

    let config = if is_json(path) {
        parse_json(&content, path)?
    } else {
        parse_yaml(&content, path)?
    };

    config.validate()?;
    info!(
        environment = %config.environment,
        subnets = config.vpc.subnets.len(),
        listeners = config.listeners().len(),
        "Environment loaded"
    );
    Ok(config)
}

/// YAML 文字列から環境定義をパース (検証なし)
pub fn parse_yaml(content: &str, path: &Path) -> Result<EnvironmentConfig> {
    serde_yaml::from_str(content).map_err(|source| ConfigError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

/// JSON 文字列から環境定義をパース (検証なし)
pub fn parse_json(content: &str, path: &Path) -> Result<EnvironmentConfig> {
    serde_json::from_str(content).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// OpenAPI (Swagger) 定義を読み込む
///
/// YAML でも JSON でもよい。API 名には `info.title` を使い、本文は JSON に揃える
#[instrument(fields(path = %path.display()))]
pub fn load_api_definition(path: &Path) -> Result<ApiDefinition> {
    let content = std::fs::read_to_string(path)?;
    let document: serde_json::Value = if is_json(path) {
        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?
    };

    let definition = api_definition(&document, path)?;
    info!(title = %definition.title, "API definition loaded");
    Ok(definition)
}

/// パース済みドキュメントから API 定義を組み立てる
pub fn api_definition(document: &serde_json::Value, path: &Path) -> Result<ApiDefinition> {
    let invalid = |reason: &str| ConfigError::InvalidApiDefinition {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    if !document.is_object() {
        return Err(invalid("ドキュメントがオブジェクトではありません"));
    }
    let title = document
        .pointer("/info/title")
        .and_then(|title| title.as_str())
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .ok_or_else(|| invalid("info.title がありません"))?
        .to_string();
    let body = serde_json::to_string(document).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(ApiDefinition { title, body })
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
