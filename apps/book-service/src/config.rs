//! # Book Service 設定
//!
//! 環境変数から Book Service の設定を読み込む。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `DATABASE_URL` | **Yes** | PostgreSQL 接続 URL |
//! | `RUST_LOG` | No | ログレベル（デフォルト: `info,bookshelf=debug`） |
//! | `LOG_FORMAT` | No | `json` / `pretty`（デフォルト: `pretty`） |
//!
//! バインドアドレス（`0.0.0.0:3000`）とシャットダウン猶予（10 秒）は固定値。

use std::{
    env,
    net::{Ipv4Addr, SocketAddr},
    time::Duration,
};

/// 固定のリッスンポート
pub const PORT: u16 = 3000;

/// シャットダウン時に処理中リクエストを待つ猶予期間
pub const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(10);

/// Book Service の設定
#[derive(Debug, Clone)]
pub struct BookServiceConfig {
    /// バインドアドレス
    pub addr:                  SocketAddr,
    /// データベース接続 URL
    pub database_url:          String,
    /// シャットダウン猶予期間
    pub shutdown_grace_period: Duration,
}

impl BookServiceConfig {
    /// 環境変数から設定を読み込む
    ///
    /// `DATABASE_URL` が未設定の場合はエラーを返す。
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self::with_database_url(env::var("DATABASE_URL")?))
    }

    /// 接続 URL 以外を固定値で埋めた設定を作る
    pub fn with_database_url(database_url: impl Into<String>) -> Self {
        Self {
            addr:                  SocketAddr::from((Ipv4Addr::UNSPECIFIED, PORT)),
            database_url:          database_url.into(),
            shutdown_grace_period: SHUTDOWN_GRACE_PERIOD,
        }
    }
}
