//! # Bookshelf 共有ユーティリティ
//!
//! サービス横断で使う観測性（ログ）とヘルスチェックの共通部品。
//!
//! ## 設計方針
//!
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - ドメイン層・インフラ層には依存しない

pub mod canonical_log;
pub mod health;
pub mod observability;

pub use health::{CheckStatus, HealthResponse, ReadinessResponse, ReadinessStatus};
