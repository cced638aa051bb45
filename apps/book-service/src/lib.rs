//! # Book Service ライブラリ
//!
//! 書籍 REST API のハンドラ・ルーター・サーバー起動処理を公開する。
//! バイナリ（`main.rs`）は設定読み込みとインフラ初期化だけを担当し、
//! テストはこのライブラリ経由でルーターを組み立てる。

pub mod app_builder;
pub mod config;
pub mod error;
pub mod extract;
pub mod handler;
pub mod server;
