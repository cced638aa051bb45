//! # 書籍
//!
//! REST API で公開する唯一のエンティティ。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`BookId`] | 書籍 ID | データベースが採番する整数の主キー。採番後は不変 |
//! | [`NewBook`] | 書籍フィールド | 作成・更新で書き込むタイトル・著者・ISBN |
//! | [`Book`] | 書籍 | ID と書籍フィールドの組 |
//!
//! ## ライフサイクル
//!
//! ```text
//! 作成（ID 採番） → 参照 / 更新（ID は変わらない） → 削除
//! ```
//!
//! メモリ上にキャッシュは持たない。テーブルが唯一の正。

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// 書籍 ID（データベース採番の主キー）
///
/// `SERIAL` / `BIGSERIAL` のどちらでも扱えるよう `i64` で保持する。
/// JSON では数値としてそのまま直列化される。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(transparent)]
#[display("{_0}")]
pub struct BookId(i64);

impl BookId {
    /// 既存の整数値から書籍 ID を作成する
    pub fn from_i64(value: i64) -> Self {
        Self(value)
    }

    /// 内部の整数値を取得する
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

/// 書籍の書き込み可能なフィールド
///
/// 作成時と更新時の入力。ID はデータベースが決めるため含まない。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewBook {
    pub title:  String,
    pub author: String,
    pub isbn:   String,
}

impl NewBook {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: impl Into<String>,
    ) -> Self {
        Self {
            title:  title.into(),
            author: author.into(),
            isbn:   isbn.into(),
        }
    }
}

/// 書籍エンティティ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    id:     BookId,
    title:  String,
    author: String,
    isbn:   String,
}

impl Book {
    /// 既知の ID と書き込みフィールドから書籍を組み立てる
    ///
    /// 更新リクエストのように、ID をパスから受け取る場合に使用する。
    pub fn new(id: BookId, fields: NewBook) -> Self {
        Self {
            id,
            title: fields.title,
            author: fields.author,
            isbn: fields.isbn,
        }
    }

    /// データベースの行から書籍を復元する
    pub fn from_db(id: BookId, title: String, author: String, isbn: String) -> Self {
        Self {
            id,
            title,
            author,
            isbn,
        }
    }

    pub fn id(&self) -> BookId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn isbn(&self) -> &str {
        &self.isbn
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_newでパスのidとフィールドから組み立てられる() {
        let book = Book::new(BookId::from_i64(7), NewBook::new("Dune", "Herbert", "123"));

        assert_eq!(book.id(), BookId::from_i64(7));
        assert_eq!(book.title(), "Dune");
        assert_eq!(book.author(), "Herbert");
        assert_eq!(book.isbn(), "123");
    }

    #[test]
    fn test_from_dbとnewは同じ書籍を組み立てる() {
        let book = Book::from_db(
            BookId::from_i64(3),
            "Dune".to_string(),
            "Herbert".to_string(),
            "123".to_string(),
        );

        assert_eq!(
            book,
            Book::new(BookId::from_i64(3), NewBook::new("Dune", "Herbert", "123"))
        );
    }

    #[test]
    fn test_book_idは数値としてシリアライズされる() {
        let json = serde_json::to_value(BookId::from_i64(42)).unwrap();
        assert_eq!(json, serde_json::json!(42));
    }

    #[test]
    fn test_book_idのdisplayは整数値を出力する() {
        assert_eq!(BookId::from_i64(42).to_string(), "42");
    }
}
