use crate::common::context::Context;
use crate::common::error::AppError;
use crate::common::events::EventPublisher;
use crate::common::state::AppState;
use crate::common::store::DocumentStore;
use crate::settings::AppSettings;
use crate::usecases::transactions::RetryPolicy;
use axum::Router;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::routing::get;
use std::net::SocketAddr;
use tracing::info;

pub mod v1;

pub struct RequestContext {
    pub state: AppState,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .nest("/api/v1", v1::router())
}

pub async fn index() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"))
}

pub async fn serve(settings: &AppSettings, state: AppState) -> anyhow::Result<()> {
    let app = router().with_state(state);
    let addr = SocketAddr::new(settings.app_host, settings.app_port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self {
            state: state.clone(),
        })
    }
}

impl Context for RequestContext {
    fn store(&self) -> &dyn DocumentStore {
        self.state.store()
    }

    fn events(&self) -> &dyn EventPublisher {
        self.state.events()
    }

    fn retry_policy(&self) -> RetryPolicy {
        self.state.retry_policy()
    }
}
