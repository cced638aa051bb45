//! # リポジトリ実装
//!
//! 書籍テーブルへのアクセスをトレイトで抽象化し、PostgreSQL 実装を提供する。
//!
//! ハンドラはトレイト経由でのみストレージに触れるため、テストでは
//! [`crate::mock`] のインメモリ実装に差し替えられる。

pub mod book_repository;

pub use book_repository::{BookRepository, PostgresBookRepository};
