//! # Book Service エラー定義
//!
//! ハンドラのエラーと、HTTP レスポンスへの変換を定義する。
//!
//! レスポンスボディは構造化せず、エラーメッセージをそのままプレーン
//! テキストで返す。データベースエラーはドライバのメッセージをそのまま返し、
//! 種別の接頭辞はログにのみ出力する。
//!
//! | バリアント | ステータス |
//! |-----------|-----------|
//! | `BadRequest` | 400（JSON デコード失敗、不正な書籍 ID） |
//! | `NotFound` | 404（ID 指定取得で行がない） |
//! | `Database` | 500 |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bookshelf_infra::InfraError;
use thiserror::Error;

/// Book Service で発生するエラー
#[derive(Debug, Error)]
pub enum BookServiceError {
    /// 不正なリクエスト
    #[error("{0}")]
    BadRequest(String),

    /// リソースが見つからない
    #[error("{0}")]
    NotFound(String),

    /// データベースエラー
    #[error(transparent)]
    Database(#[from] InfraError),
}

impl BookServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            BookServiceError::BadRequest(_) => StatusCode::BAD_REQUEST,
            BookServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            BookServiceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for BookServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            BookServiceError::Database(e) => {
                tracing::error!(
                    error.message = %e,
                    error.span_trace = %e.span_trace(),
                    "データベースエラー"
                );
                e.driver_message()
            }
            BookServiceError::BadRequest(msg) | BookServiceError::NotFound(msg) => {
                tracing::debug!(status = status.as_u16(), "{msg}");
                msg
            }
        };

        (status, body).into_response()
    }
}
