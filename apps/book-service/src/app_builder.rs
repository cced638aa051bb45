//! # ルーター構築
//!
//! 書籍 API とヘルスチェックのルートをまとめ、共通レイヤーを適用する。

use std::sync::Arc;

use axum::{Router, routing::get};
use bookshelf_shared::canonical_log::CanonicalLogLineLayer;
use tower_http::trace::TraceLayer;

use crate::handler::{
    BookState,
    ReadinessState,
    create_book,
    delete_book,
    get_book,
    health_check,
    list_books,
    readiness_check,
    update_book,
};

/// 書籍 API のルーター
pub fn book_routes(state: Arc<BookState>) -> Router {
    Router::new()
        .route("/books", get(list_books).post(create_book))
        .route(
            "/books/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(state)
}

/// アプリケーション全体のルーターを構築する
pub fn build_app(book_state: Arc<BookState>, readiness_state: Arc<ReadinessState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(
            Router::new()
                .route("/health/ready", get(readiness_check))
                .with_state(readiness_state),
        )
        .merge(book_routes(book_state))
        .layer(CanonicalLogLineLayer::new())
        .layer(TraceLayer::new_for_http())
}
