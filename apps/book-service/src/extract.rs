//! # カスタムエクストラクタ
//!
//! axum 標準の `Path` / `Json` は独自のリジェクション（422 や 415 など）を
//! 返すため、書籍 API 用にエラー形式を [`BookServiceError::BadRequest`] に
//! 揃えたエクストラクタを用意する。
//!
//! - [`BookIdPath`]: パスパラメータ `{id}` を 10 進の `i64` として厳密に解釈する
//! - [`JsonBody`]: `Content-Type` を問わずボディを JSON としてデコードする

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use bookshelf_domain::book::BookId;
use serde::de::DeserializeOwned;

use crate::error::BookServiceError;

/// パスパラメータから取り出した書籍 ID
#[derive(Debug, Clone, Copy)]
pub struct BookIdPath(pub BookId);

impl<S> FromRequestParts<S> for BookIdPath
where
    S: Send + Sync,
{
    type Rejection = BookServiceError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| BookServiceError::BadRequest(e.body_text()))?;

        parse_book_id(&raw).map(Self)
    }
}

/// 文字列を書籍 ID として解釈する
///
/// 数値として解釈できない値や `i64` の範囲外の値はエラーにする。
pub fn parse_book_id(raw: &str) -> Result<BookId, BookServiceError> {
    raw.parse::<i64>()
        .map(BookId::from_i64)
        .map_err(|e| BookServiceError::BadRequest(format!("不正な書籍 ID です: {raw:?}: {e}")))
}

/// JSON リクエストボディ
///
/// ボディ全体を読み込んでから `serde_json` でデコードする。
/// デコードに失敗した場合はデコーダのメッセージを 400 で返す。
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = BookServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| BookServiceError::BadRequest(e.body_text()))?;

        serde_json::from_slice(&body)
            .map(Self)
            .map_err(|e| BookServiceError::BadRequest(e.to_string()))
    }
}
