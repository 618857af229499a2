pub mod handler;

use crate::repositories::MovieRepository;
use anyhow::Context;
use axum::Router;
use axum::routing::get;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Debug)]
pub struct AppState<MR: MovieRepository> {
    movie_repo: Arc<MR>,
}

impl<MR: MovieRepository> AppState<MR> {
    pub fn new(movie_repo: MR) -> Self {
        Self {
            movie_repo: Arc::new(movie_repo),
        }
    }
}

impl<MR: MovieRepository> Clone for AppState<MR> {
    fn clone(&self) -> Self {
        Self {
            movie_repo: Arc::clone(&self.movie_repo),
        }
    }
}

#[derive(Debug)]
pub struct HttpServerConfig {
    port: u16,
}

impl HttpServerConfig {
    pub const fn new(port: u16) -> Self {
        Self { port }
    }
}

pub struct HttpServer {
    router: Router,
    listener: TcpListener,
}

impl HttpServer {
    pub async fn new<MR: MovieRepository>(
        state: AppState<MR>,
        config: HttpServerConfig,
    ) -> anyhow::Result<Self> {
        let router = build_router(state);

        let listener = TcpListener::bind(("0.0.0.0", config.port))
            .await
            .with_context(|| format!("Failed to bind to port {}", config.port))?;

        Ok(Self { router, listener })
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let addr = self
            .listener
            .local_addr()
            .context("Failed to read listener address")?;
        tracing::info!(%addr, "listening");

        axum::serve(self.listener, self.router)
            .await
            .context("Received error from running server")?;
        Ok(())
    }
}

pub fn build_router<MR: MovieRepository>(state: AppState<MR>) -> Router {
    Router::new()
        .route("/", get(handler::index))
        .merge(movie_routes())
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

fn movie_routes<MR: MovieRepository>() -> Router<AppState<MR>> {
    Router::new()
        .route(
            "/movies",
            get(handler::list_movies::<MR>).post(handler::create_movie::<MR>),
        )
        .route(
            "/movies/{id}",
            get(handler::get_movie::<MR>)
                .put(handler::update_movie::<MR>)
                .delete(handler::delete_movie::<MR>),
        )
}
