use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "設定ファイルが見つかりません。以下の場所を確認してください:\n\
        - カレントディレクトリ: stratus.local.yaml, stratus.yaml, stratus.yml, stratus.json\n\
        - ./.stratus/ ディレクトリ\n\
        - ~/.config/stratus/stratus.yaml\n\
        または STRATUS_CONFIG_PATH 環境変数で直接指定できます"
    )]
    ConfigFileNotFound,

    #[error("IO エラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML パースエラー: {path}\n理由: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("JSON パースエラー: {path}\n理由: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("無効な設定: {0}")]
    InvalidConfig(String),

    #[error("サブネット '{subnet}' が未定義の Network ACL '{acl}' を参照しています")]
    UnknownNetworkAcl { subnet: String, acl: String },

    #[error("Network ACL '{0}' が重複しています")]
    DuplicateNetworkAcl(String),

    #[error("S3 バケット名が不正です: {0}")]
    InvalidBucketName(String),

    #[error("API 定義が不正です: {path}\n理由: {reason}")]
    InvalidApiDefinition { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
