use thiserror::Error;

#[derive(Error, Debug)]
pub enum GridError {
    #[error("KDLパースエラー: {0}")]
    KdlParse(#[from] kdl::KdlError),

    #[error("ファイル読み込みエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("無効な設定: {0}")]
    InvalidConfig(String),

    #[error("必須フィールドがありません: {0}")]
    MissingRequiredField(&'static str),

    #[error("フィールドが空です: {0}")]
    EmptyField(&'static str),
}

pub type Result<T> = std::result::Result<T, GridError>;
