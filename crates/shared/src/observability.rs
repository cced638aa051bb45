//! # Observability 基盤
//!
//! グローバル subscriber の組み立てを担う。構成は以下の 3 層:
//!
//! ```text
//! registry
//!   ├─ EnvFilter   … RUST_LOG（未設定時は TracingConfig::default_directive）
//!   ├─ fmt layer   … LOG_FORMAT に応じて JSON / Pretty
//!   └─ ErrorLayer  … InfraError の SpanTrace を埋める
//! ```

use std::str::FromStr;

use thiserror::Error;
use tracing::Subscriber;
use tracing_subscriber::{EnvFilter, Layer, registry::LookupSpan};

/// `RUST_LOG` 未設定時のフィルタ
pub const DEFAULT_DIRECTIVE: &str = "info,bookshelf=debug";

/// ログ出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 1 イベント 1 行の JSON（ログ基盤への取り込み向け）
    Json,
    #[default]
    Pretty,
}

/// `LOG_FORMAT` に解釈できない値が入っていた
#[derive(Debug, Error, PartialEq, Eq)]
#[error("LOG_FORMAT の値が不正です: {0:?}（json / pretty のいずれか）")]
pub struct UnknownLogFormat(pub String);

impl FromStr for LogFormat {
    type Err = UnknownLogFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            _ => Err(UnknownLogFormat(s.to_string())),
        }
    }
}

impl LogFormat {
    /// 環境変数の値から出力形式を決める
    ///
    /// 未設定なら Pretty。不正値も Pretty に倒すが、subscriber がまだ
    /// 無いので警告は stderr に直接書く。
    pub fn resolve(value: Option<&str>) -> Self {
        match value.map(str::parse::<Self>) {
            None => Self::default(),
            Some(Ok(format)) => format,
            Some(Err(e)) => {
                eprintln!("WARNING: {e}");
                Self::default()
            }
        }
    }

    pub fn from_env() -> Self {
        Self::resolve(std::env::var("LOG_FORMAT").ok().as_deref())
    }

    fn layer<S>(self) -> Box<dyn Layer<S> + Send + Sync>
    where
        S: Subscriber + for<'a> LookupSpan<'a> + 'static,
    {
        match self {
            LogFormat::Json => tracing_subscriber::fmt::layer()
                .json()
                .flatten_event(true)
                .with_current_span(true)
                .with_span_list(false)
                .boxed(),
            LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
        }
    }
}

/// トレーシング初期化設定
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// ルートスパン `app` の `service` フィールドに入るサービス名
    pub service_name:      String,
    pub log_format:        LogFormat,
    /// `RUST_LOG` が無いときに使うフィルタ
    pub default_directive: String,
}

impl TracingConfig {
    pub fn new(service_name: impl Into<String>, log_format: LogFormat) -> Self {
        Self {
            service_name: service_name.into(),
            log_format,
            default_directive: DEFAULT_DIRECTIVE.to_string(),
        }
    }

    pub fn from_env(service_name: impl Into<String>) -> Self {
        Self::new(service_name, LogFormat::from_env())
    }

    /// `rust_log` があればそれを、無いか壊れていれば既定のフィルタを使う
    fn env_filter(&self, rust_log: Option<&str>) -> EnvFilter {
        rust_log
            .and_then(|directives| EnvFilter::try_new(directives).ok())
            .unwrap_or_else(|| EnvFilter::new(&self.default_directive))
    }
}

/// グローバル subscriber を登録する
///
/// プロセス起動時に 1 度だけ呼ぶこと。
pub fn init_tracing(config: &TracingConfig) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let rust_log = std::env::var("RUST_LOG").ok();

    tracing_subscriber::registry()
        .with(config.env_filter(rust_log.as_deref()))
        .with(config.log_format.layer())
        .with(tracing_error::ErrorLayer::default())
        .init();
}
