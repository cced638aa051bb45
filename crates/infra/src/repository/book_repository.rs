//! # BookRepository
//!
//! `books` テーブルの CRUD を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **1 操作 = 1 ステートメント**: トランザクションもリトライも張らない
//! - **影響行数を見ない**: UPDATE / DELETE は一致する行がなくても成功扱い
//! - **id は bigint にキャスト**: `SERIAL` / `BIGSERIAL` どちらのスキーマでもデコードできる
//!
//! テーブルはこのサービスの外で作成される前提:
//!
//! ```sql
//! CREATE TABLE books (
//!     id     SERIAL PRIMARY KEY,
//!     title  TEXT NOT NULL,
//!     author TEXT NOT NULL,
//!     isbn   TEXT NOT NULL
//! );
//! ```

use async_trait::async_trait;
use bookshelf_domain::book::{Book, BookId, NewBook};
use sqlx::PgPool;

use crate::error::InfraError;

/// 書籍リポジトリトレイト
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// 全書籍を取得する（順序はデータベース任せ）
    async fn find_all(&self) -> Result<Vec<Book>, InfraError>;

    /// ID で書籍を検索する
    async fn find_by_id(&self, id: &BookId) -> Result<Option<Book>, InfraError>;

    /// 書籍を挿入し、採番された ID を返す
    async fn insert(&self, book: &NewBook) -> Result<BookId, InfraError>;

    /// 書籍のタイトル・著者・ISBN を更新する
    ///
    /// 一致する行がなくても `Ok(())` を返す。
    async fn update(&self, book: &Book) -> Result<(), InfraError>;

    /// 書籍を削除する
    ///
    /// 一致する行がなくても `Ok(())` を返す。
    async fn delete(&self, id: &BookId) -> Result<(), InfraError>;
}

/// `books` テーブルの 1 行
#[derive(Debug, sqlx::FromRow)]
struct BookRow {
    id:     i64,
    title:  String,
    author: String,
    isbn:   String,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Book::from_db(BookId::from_i64(row.id), row.title, row.author, row.isbn)
    }
}

/// PostgreSQL 実装の BookRepository
#[derive(Debug, Clone)]
pub struct PostgresBookRepository {
    pool: PgPool,
}

impl PostgresBookRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepository for PostgresBookRepository {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_all(&self) -> Result<Vec<Book>, InfraError> {
        let rows = sqlx::query_as::<_, BookRow>(
            r#"
            SELECT id::bigint AS id, title, author, isbn
            FROM books
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Book::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_by_id(&self, id: &BookId) -> Result<Option<Book>, InfraError> {
        let row = sqlx::query_as::<_, BookRow>(
            r#"
            SELECT id::bigint AS id, title, author, isbn
            FROM books
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Book::from))
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn insert(&self, book: &NewBook) -> Result<BookId, InfraError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO books (title, author, isbn)
            VALUES ($1, $2, $3)
            RETURNING id::bigint
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .fetch_one(&self.pool)
        .await?;

        Ok(BookId::from_i64(id))
    }

    #[tracing::instrument(skip_all, level = "debug", fields(id = %book.id()))]
    async fn update(&self, book: &Book) -> Result<(), InfraError> {
        sqlx::query(
            r#"
            UPDATE books
            SET title = $1, author = $2, isbn = $3
            WHERE id = $4
            "#,
        )
        .bind(book.title())
        .bind(book.author())
        .bind(book.isbn())
        .bind(book.id().as_i64())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn delete(&self, id: &BookId) -> Result<(), InfraError> {
        sqlx::query(
            r#"
            DELETE FROM books
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
