//! # 書籍ハンドラ
//!
//! 書籍リソースの一覧・取得・作成・更新・削除を提供する。
//!
//! ## エンドポイント
//!
//! | メソッド | パス | 成功時 |
//! |---------|------|--------|
//! | GET | `/books` | 200 + 書籍配列 |
//! | GET | `/books/{id}` | 200 + 書籍 |
//! | POST | `/books` | 201 + 固定メッセージ |
//! | PUT | `/books/{id}` | 200 + 更新内容 |
//! | DELETE | `/books/{id}` | 200 + 固定メッセージ |
//!
//! 更新と削除は該当行の有無を確認しない。存在しない ID に対しても成功を返す。

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use bookshelf_domain::book::{Book, NewBook};
use bookshelf_infra::repository::BookRepository;
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use serde_json::{Map, Value};

use crate::{
    error::BookServiceError,
    extract::{BookIdPath, JsonBody},
};


/// 作成成功時のレスポンスボディ
pub const BOOK_CREATED_MESSAGE: &str = "Book created successfully";

/// 削除成功時のレスポンスボディ
pub const BOOK_DELETED_MESSAGE: &str = "Book deleted successfully";

/// 書籍ハンドラの State
pub struct BookState {
    pub repository: Arc<dyn BookRepository>,
}

/// 書籍の作成・更新リクエスト
///
/// キーは大文字小文字を区別せずに照合する（`Title` も `title` として扱う）。
/// 欠けたフィールドと `null` は空文字列として扱い、未知のフィールドは無視する。
#[derive(Debug, Default)]
pub struct BookRequest {
    /// 受け付けるが使わない（ID はサーバー側またはパスで決まる）
    pub id:     Option<i64>,
    pub title:  String,
    pub author: String,
    pub isbn:   String,
}

impl<'de> Deserialize<'de> for BookRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // トップレベルの null は空のリクエストとして扱う
        let Some(fields) = Option::<Map<String, Value>>::deserialize(deserializer)? else {
            return Ok(Self::default());
        };

        let mut req = Self::default();
        for (key, value) in fields {
            match key.to_lowercase().as_str() {
                "id" => req.id = Option::<i64>::deserialize(value).map_err(D::Error::custom)?,
                "title" => req.title = nullable_string(value).map_err(D::Error::custom)?,
                "author" => req.author = nullable_string(value).map_err(D::Error::custom)?,
                "isbn" => req.isbn = nullable_string(value).map_err(D::Error::custom)?,
                _ => {}
            }
        }
        Ok(req)
    }
}

fn nullable_string(value: Value) -> Result<String, serde_json::Error> {
    Option::<String>::deserialize(value).map(Option::unwrap_or_default)
}

impl From<BookRequest> for NewBook {
    fn from(req: BookRequest) -> Self {
        NewBook::new(req.title, req.author, req.isbn)
    }
}

/// 書籍レスポンス
#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub id:     i64,
    pub title:  String,
    pub author: String,
    pub isbn:   String,
}

impl From<&Book> for BookResponse {
    fn from(book: &Book) -> Self {
        Self {
            id:     book.id().as_i64(),
            title:  book.title().to_string(),
            author: book.author().to_string(),
            isbn:   book.isbn().to_string(),
        }
    }
}

/// GET /books
///
/// 全書籍を返す。0 件の場合は空配列を返す。
pub async fn list_books(
    State(state): State<Arc<BookState>>,
) -> Result<impl IntoResponse, BookServiceError> {
    let books = state.repository.find_all().await?;

    let response: Vec<BookResponse> = books.iter().map(BookResponse::from).collect();
    Ok(Json(response))
}

/// GET /books/{id}
pub async fn get_book(
    State(state): State<Arc<BookState>>,
    BookIdPath(id): BookIdPath,
) -> Result<impl IntoResponse, BookServiceError> {
    let book = state
        .repository
        .find_by_id(&id)
        .await?
        .ok_or_else(|| BookServiceError::NotFound(format!("書籍が見つかりません: id={id}")))?;

    Ok(Json(BookResponse::from(&book)))
}

/// POST /books
///
/// ボディの `id` は無視し、採番された ID で保存する。
pub async fn create_book(
    State(state): State<Arc<BookState>>,
    JsonBody(req): JsonBody<BookRequest>,
) -> Result<impl IntoResponse, BookServiceError> {
    let id = state.repository.insert(&req.into()).await?;
    tracing::info!(book.id = %id, "書籍を作成しました");

    Ok((StatusCode::CREATED, BOOK_CREATED_MESSAGE))
}

/// PUT /books/{id}
///
/// パスの ID で全フィールドを置き換え、受け取った内容をそのまま返す。
pub async fn update_book(
    State(state): State<Arc<BookState>>,
    BookIdPath(id): BookIdPath,
    JsonBody(req): JsonBody<BookRequest>,
) -> Result<impl IntoResponse, BookServiceError> {
    let book = Book::new(id, req.into());
    state.repository.update(&book).await?;

    Ok(Json(BookResponse::from(&book)))
}

/// DELETE /books/{id}
pub async fn delete_book(
    State(state): State<Arc<BookState>>,
    BookIdPath(id): BookIdPath,
) -> Result<impl IntoResponse, BookServiceError> {
    state.repository.delete(&id).await?;
    tracing::info!(book.id = %id, "書籍を削除しました");

    Ok(BOOK_DELETED_MESSAGE)
}
