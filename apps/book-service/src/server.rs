//! # サーバー起動とグレースフルシャットダウン
//!
//! シャットダウンシグナルを受け取ると新規接続の受け付けを止め、
//! 処理中のリクエストを猶予期間まで待つ。猶予期間を超えた場合は
//! [`ServeError::ShutdownTimeout`] を返す。

use std::{future::Future, sync::Arc, time::Duration};

use axum::Router;
use thiserror::Error;
use tokio::{net::TcpListener, sync::Notify, task::JoinError};

/// サーバー実行中のエラー
#[derive(Debug, Error)]
pub enum ServeError {
    /// リスナーや接続の I/O エラー
    #[error("サーバーの I/O エラー: {0}")]
    Io(#[from] std::io::Error),

    /// サーバータスクの異常終了
    #[error("サーバータスクが異常終了しました: {0}")]
    Join(#[from] JoinError),

    /// 猶予期間内に処理中のリクエストが完了しなかった
    #[error("シャットダウンが猶予期間（{0:?}）内に完了しませんでした")]
    ShutdownTimeout(Duration),
}

/// `shutdown` が完了するまでリクエストを処理し、その後グレースフルに停止する
///
/// シャットダウン開始から `grace` 以内に処理中のリクエストが終わらない場合は
/// サーバータスクを中断してエラーを返す。
pub async fn serve_with_grace<F>(
    listener: TcpListener,
    app: Router,
    shutdown: F,
    grace: Duration,
) -> Result<(), ServeError>
where
    F: Future<Output = ()> + Send,
{
    let trigger = Arc::new(Notify::new());
    let notified = Arc::clone(&trigger);

    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { notified.notified().await })
            .await
    });

    tokio::select! {
        result = &mut server => {
            result??;
            return Ok(());
        }
        () = shutdown => {}
    }

    tracing::info!(grace_ms = grace.as_millis() as u64, "シャットダウンを開始します");
    trigger.notify_one();

    match tokio::time::timeout(grace, &mut server).await {
        Ok(result) => {
            result??;
            tracing::info!("処理中のリクエストが完了しました");
            Ok(())
        }
        Err(_) => {
            server.abort();
            Err(ServeError::ShutdownTimeout(grace))
        }
    }
}

/// SIGINT（Ctrl+C）または SIGTERM を待つ
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Ctrl+C ハンドラを登録できませんでした");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "SIGTERM ハンドラを登録できませんでした");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("SIGINT を受信しました"),
        () = terminate => tracing::info!("SIGTERM を受信しました"),
    }
}
