//! テスト共通フィクスチャ
//!
//! DB を使用する統合テストで共通利用するスキーマ作成・シードヘルパー。
//! スキーマ管理はサービスの責務外のため、テストごとに直接 DDL を流す。

// 各テストファイルが独立したクレートとしてコンパイルされるため、
// 使用しない関数に dead_code 警告が出る。モジュール全体で抑制する。
#![allow(dead_code)]

use bookshelf_domain::book::{BookId, NewBook};
use sqlx::PgPool;

/// `books` テーブルを作成する
pub async fn create_books_table(pool: &PgPool) {
    sqlx::query(
        r#"
        CREATE TABLE books (
            id     SERIAL PRIMARY KEY,
            title  TEXT NOT NULL,
            author TEXT NOT NULL,
            isbn   TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .expect("books テーブル作成に失敗");
}

/// リポジトリを経由せずに書籍を挿入する
pub async fn insert_book_raw(pool: &PgPool, book: &NewBook) -> BookId {
    let id: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO books (title, author, isbn)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(&book.title)
    .bind(&book.author)
    .bind(&book.isbn)
    .fetch_one(pool)
    .await
    .expect("書籍挿入に失敗");
    BookId::from_i64(i64::from(id))
}

/// Dune のテストデータ
pub fn dune() -> NewBook {
    NewBook::new("Dune", "Herbert", "123")
}
