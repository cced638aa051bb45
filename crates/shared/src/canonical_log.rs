//! # リクエストサマリログ
//!
//! 1 リクエストにつき 1 行、メソッド・パス・ステータス・処理時間をまとめて
//! 出力する tower Layer。TraceLayer の内側に置くと、そのスパンの中で出力される。
//!
//! | 結果 | レベル | メッセージ |
//! |------|--------|-----------|
//! | 5xx 以外のレスポンス | INFO | リクエスト完了 |
//! | 5xx レスポンス | WARN | リクエスト完了 |
//! | 内側の Service がエラー | ERROR | リクエスト処理エラー |
//!
//! 既定では `/health` 配下を出力しない。

use std::{
    fmt::Display,
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
    time::Instant,
};

use http::{Method, Request, Response, StatusCode};
use tower::{Layer, Service};

/// プローブが高頻度に叩くパス
const DEFAULT_SKIP_PREFIXES: &[&str] = &["/health"];

/// リクエストサマリを出力する Layer
#[derive(Clone, Debug)]
pub struct CanonicalLogLineLayer {
    skip_prefixes: Arc<[&'static str]>,
}

impl Default for CanonicalLogLineLayer {
    fn default() -> Self {
        Self::with_skip_prefixes(DEFAULT_SKIP_PREFIXES)
    }
}

impl CanonicalLogLineLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 出力しないパスの接頭辞を指定して作る
    pub fn with_skip_prefixes(prefixes: &[&'static str]) -> Self {
        Self {
            skip_prefixes: Arc::from(prefixes),
        }
    }
}

impl<S> Layer<S> for CanonicalLogLineLayer {
    type Service = CanonicalLogLineService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CanonicalLogLineService {
            inner,
            skip_prefixes: Arc::clone(&self.skip_prefixes),
        }
    }
}

#[derive(Clone, Debug)]
pub struct CanonicalLogLineService<S> {
    inner:         S,
    skip_prefixes: Arc<[&'static str]>,
}

impl<S> CanonicalLogLineService<S> {
    fn skips(&self, path: &str) -> bool {
        self.skip_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix))
    }
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for CanonicalLogLineService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Display + 'static,
    ReqBody: Send + 'static,
    ResBody: Send + 'static,
{
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;
    type Response = S::Response;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        // poll_ready 済みの inner を使い、self には新しい clone を残す
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        if self.skips(req.uri().path()) {
            return Box::pin(inner.call(req));
        }

        let summary = RequestSummary::start(req.method(), req.uri().path());
        let future = inner.call(req);

        Box::pin(async move {
            let result = future.await;
            match &result {
                Ok(response) => summary.completed(response.status()),
                Err(err) => summary.failed(err),
            }
            result
        })
    }
}

/// 1 リクエスト分のサマリ
struct RequestSummary {
    method:  Method,
    path:    String,
    started: Instant,
}

impl RequestSummary {
    fn start(method: &Method, path: &str) -> Self {
        Self {
            method:  method.clone(),
            path:    path.to_owned(),
            started: Instant::now(),
        }
    }

    fn latency_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn completed(&self, status: StatusCode) {
        let latency_ms = self.latency_ms();
        if status.is_server_error() {
            tracing::warn!(
                http.method = %self.method,
                http.path = %self.path,
                http.status_code = status.as_u16(),
                http.latency_ms = latency_ms,
                "リクエスト完了"
            );
        } else {
            tracing::info!(
                http.method = %self.method,
                http.path = %self.path,
                http.status_code = status.as_u16(),
                http.latency_ms = latency_ms,
                "リクエスト完了"
            );
        }
    }

    fn failed(&self, err: &dyn Display) {
        tracing::error!(
            http.method = %self.method,
            http.path = %self.path,
            http.latency_ms = self.latency_ms(),
            error.message = %err,
            "リクエスト処理エラー"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::{
        convert::Infallible,
        io,
        sync::Mutex,
    };

    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::Value;
    use tower::{ServiceExt, service_fn};
    use tracing_subscriber::layer::SubscriberExt;

    use super::*;

    /// JSON ログの書き込み先
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl LogBuffer {
        fn lines(&self) -> Vec<Value> {
            let bytes = self.0.lock().unwrap().clone();
            String::from_utf8(bytes)
                .unwrap()
                .lines()
                .map(|line| serde_json::from_str(line).unwrap())
                .collect()
        }
    }

    fn capture_json_logs() -> (tracing::subscriber::DefaultGuard, LogBuffer) {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::registry().with(
            tracing_subscriber::fmt::layer()
                .json()
                .flatten_event(true)
                .with_writer(move || writer.clone()),
        );
        (tracing::subscriber::set_default(subscriber), buffer)
    }

    async fn send_with_status(layer: &CanonicalLogLineLayer, method: Method, path: &str, status: StatusCode) {
        let service = layer.layer(service_fn(move |_req: Request<()>| async move {
            Ok::<_, Infallible>(Response::builder().status(status).body(()).unwrap())
        }));
        let request = Request::builder().method(method).uri(path).body(()).unwrap();

        let response = service.oneshot(request).await.unwrap();

        assert_eq!(response.status(), status);
    }

    #[tokio::test]
    async fn test_完了したリクエストを1行で出力する() {
        let (_guard, logs) = capture_json_logs();

        send_with_status(
            &CanonicalLogLineLayer::new(),
            Method::POST,
            "/books",
            StatusCode::CREATED,
        )
        .await;

        let lines = logs.lines();
        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        assert_eq!(line["level"], "INFO");
        assert_eq!(line["message"], "リクエスト完了");
        assert_eq!(line["http.method"], "POST");
        assert_eq!(line["http.path"], "/books");
        assert_eq!(line["http.status_code"], 201);
        assert!(line["http.latency_ms"].is_u64());
    }

    #[tokio::test]
    async fn test_5xxはwarnで出力する() {
        let (_guard, logs) = capture_json_logs();

        send_with_status(
            &CanonicalLogLineLayer::new(),
            Method::GET,
            "/books",
            StatusCode::INTERNAL_SERVER_ERROR,
        )
        .await;

        let lines = logs.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["level"], "WARN");
        assert_eq!(lines[0]["http.status_code"], 500);
    }

    #[tokio::test]
    async fn test_内側のエラーはerrorでメッセージ付きで出力する() {
        let (_guard, logs) = capture_json_logs();
        let service = CanonicalLogLineLayer::new().layer(service_fn(|_req: Request<()>| async {
            Err::<Response<()>, _>("connection reset".to_string())
        }));

        let result = service
            .oneshot(Request::delete("/books/1").body(()).unwrap())
            .await;

        assert_eq!(result.unwrap_err(), "connection reset");
        let lines = logs.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["level"], "ERROR");
        assert_eq!(lines[0]["message"], "リクエスト処理エラー");
        assert_eq!(lines[0]["error.message"], "connection reset");
    }

    #[rstest]
    #[case("/health")]
    #[case("/health/ready")]
    #[tokio::test]
    async fn test_既定ではヘルスチェックを出力しない(#[case] path: &str) {
        let (_guard, logs) = capture_json_logs();

        send_with_status(&CanonicalLogLineLayer::new(), Method::GET, path, StatusCode::OK).await;

        assert!(logs.lines().is_empty());
    }

    #[tokio::test]
    async fn test_スキップ対象は差し替えられる() {
        let (_guard, logs) = capture_json_logs();
        let layer = CanonicalLogLineLayer::with_skip_prefixes(&["/internal"]);

        send_with_status(&layer, Method::GET, "/internal/metrics", StatusCode::OK).await;
        send_with_status(&layer, Method::GET, "/health", StatusCode::OK).await;

        let lines = logs.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["http.path"], "/health");
    }
}
