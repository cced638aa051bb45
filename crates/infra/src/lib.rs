//! # Bookshelf インフラ層
//!
//! PostgreSQL との接続・通信を担当するインフラストラクチャ層。
//!
//! ## 責務
//!
//! - **データベース接続**: PostgreSQL への接続プールの作成と疎通確認
//! - **リポジトリ実装**: [`repository::BookRepository`] の PostgreSQL 実装
//! - **テスト用モック**: `test-utils` feature でインメモリ実装を公開
//!
//! ## 依存関係
//!
//! ```text
//! book-service → infra → domain
//! ```
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use bookshelf_infra::{db, repository::PostgresBookRepository};
//!
//! async fn setup() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = db::create_pool("postgres://localhost/bookshelf").await?;
//!     db::ping(&pool).await?;
//!
//!     let repository = PostgresBookRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod db;
pub mod error;
pub mod repository;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use error::{InfraError, InfraErrorKind};
