//! # ヘルスチェックハンドラ
//!
//! - `GET /health`: Liveness Check（プロセスが応答できるか）
//! - `GET /health/ready`: Readiness Check（データベースに到達できるか）

use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{Json, extract::State, http::StatusCode};
use bookshelf_infra::db;
use bookshelf_shared::{CheckStatus, HealthResponse, ReadinessResponse};
use sqlx::PgPool;

/// Readiness Check で依存先の応答を待つ上限
const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Readiness Check 用の State
pub struct ReadinessState {
    pub pool: PgPool,
}

/// Liveness Check
///
/// プロセスが応答できることを示す。依存サービスには触れない。
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status:  "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness Check
///
/// データベースへの疎通を確認し、失敗またはタイムアウトした場合は 503 を返す。
pub async fn readiness_check(
    State(state): State<Arc<ReadinessState>>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let database = match tokio::time::timeout(CHECK_TIMEOUT, db::ping(&state.pool)).await {
        Ok(Ok(())) => CheckStatus::Ok,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Readiness Check: データベースに接続できません");
            CheckStatus::Error
        }
        Err(_) => {
            tracing::warn!("Readiness Check: データベースの応答がタイムアウトしました");
            CheckStatus::Error
        }
    };

    let response = ReadinessResponse::from_checks(HashMap::from([(
        "database".to_string(),
        database,
    )]));
    let status = if response.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

#[cfg(test)]
mod tests {
    use axum::{Router, body::Body, http::Request, routing::get};
    use bookshelf_shared::ReadinessStatus;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn test_health_checkは200とバージョンを返す() {
        // Given
        let sut = Router::new().route("/health", get(health_check));

        // When
        let response = sut
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_データベースに到達できない場合は503を返す() {
        // Given: 到達できないアドレスを指す遅延接続プール
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(200))
            .connect_lazy("postgres://bookshelf@127.0.0.1:1/bookshelf")
            .unwrap();
        let state = Arc::new(ReadinessState { pool });
        let sut = Router::new()
            .route("/health/ready", get(readiness_check))
            .with_state(state);

        // When
        let response = sut
            .oneshot(Request::get("/health/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let readiness: ReadinessResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(readiness.status, ReadinessStatus::NotReady);
        assert_eq!(readiness.checks["database"], CheckStatus::Error);
    }
}
