//! # Book Service サーバー
//!
//! 書籍リソースの CRUD を提供する REST API サーバー。
//!
//! ## 起動方法
//!
//! ```bash
//! DATABASE_URL=postgres://localhost/bookshelf cargo run -p bookshelf-book-service
//! ```
//!
//! 起動時にデータベースへ疎通できない場合は即座に異常終了する。
//! SIGINT / SIGTERM を受け取ると新規接続を止め、処理中のリクエストを
//! 最大 10 秒待ってから接続プールを閉じて終了する。

use std::sync::Arc;

use anyhow::Context;
use bookshelf_book_service::{
    app_builder::build_app,
    config::BookServiceConfig,
    handler::{BookState, ReadinessState},
    server::{serve_with_grace, shutdown_signal},
};
use bookshelf_infra::{
    db,
    repository::{BookRepository, PostgresBookRepository},
};
use bookshelf_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;
use tracing::Instrument;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env の読み込み結果はトレーシング初期化後にログ出力する
    let dotenv_result = dotenvy::dotenv();

    let tracing_config = TracingConfig::from_env("book-service");
    init_tracing(&tracing_config);

    match dotenv_result {
        Ok(path) => tracing::info!("環境ファイルを読み込みました: {}", path.display()),
        Err(e) => tracing::info!("環境ファイルを読み込みませんでした: {e}"),
    }

    let span = tracing::info_span!("app", service = %tracing_config.service_name);
    if let Err(e) = run().instrument(span).await {
        tracing::error!("Book Service が異常終了しました: {e:#}");
        return Err(e);
    }

    Ok(())
}

async fn run() -> anyhow::Result<()> {
    let config = BookServiceConfig::from_env().context("DATABASE_URL が設定されていません")?;

    let pool = db::create_pool(&config.database_url)
        .await
        .context("データベースへの接続に失敗しました")?;
    db::ping(&pool)
        .await
        .context("データベースの疎通確認に失敗しました")?;
    tracing::info!("データベースに接続しました");

    let repository: Arc<dyn BookRepository> =
        Arc::new(PostgresBookRepository::new(pool.clone()));
    let app = build_app(
        Arc::new(BookState { repository }),
        Arc::new(ReadinessState { pool: pool.clone() }),
    );

    let listener = TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("{} にバインドできませんでした", config.addr))?;
    tracing::info!("Book Service が起動しました: {}", config.addr);

    let result = serve_with_grace(
        listener,
        app,
        shutdown_signal(),
        config.shutdown_grace_period,
    )
    .await;

    pool.close().await;
    tracing::info!("データベース接続を閉じました");

    result.context("サーバーの停止に失敗しました")?;
    tracing::info!("Book Service を停止しました");
    Ok(())
}
