//! # Bookshelf ドメイン層
//!
//! 書籍（Book）エンティティと、その識別子を定義する。
//!
//! ## 設計方針
//!
//! - **エンティティ**: データベースが採番する ID を持つ [`book::Book`]
//! - **値オブジェクト**: ID を持たない書き込み用フィールド群 [`book::NewBook`]
//! - ビジネスルールは持たない。検証は型のデコードのみで、ISBN の形式や
//!   一意性はデータベーススキーマに委ねる
//!
//! ## 依存関係の方向
//!
//! ```text
//! book-service → infra → domain
//! ```
//!
//! ドメイン層はインフラ層（DB、HTTP）には一切依存しない。
//!
//! ## 使用例
//!
//! ```rust
//! use bookshelf_domain::book::{Book, BookId, NewBook};
//!
//! let fields = NewBook::new("Dune", "Herbert", "123");
//! let book = Book::new(BookId::from_i64(1), fields);
//!
//! assert_eq!(book.title(), "Dune");
//! ```

pub mod book;
