//! Backend entry-point: wires REST endpoints and OpenAPI docs.

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::{Key, SameSite};
use actix_web::{web, App, HttpServer};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use backend::inbound::http::health::{live, ready, HealthState};
use backend::inbound::http::{register_routes, AppState};
use backend::outbound::persistence::run_pending_migrations;
use backend::server::{build_state, load_session_key, AppConfig};
#[cfg(debug_assertions)]
use backend::ApiDoc;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::from_env()?;
    let key = load_session_key(&config)?;

    let applied = {
        let database_url = config.database_url.clone();
        tokio::task::spawn_blocking(move || run_pending_migrations(&database_url))
            .await
            .map_err(|err| std::io::Error::other(err.to_string()))?
            .map_err(|err| std::io::Error::other(err.to_string()))?
    };
    info!(applied, "database migrations up to date");

    let state = web::Data::new(build_state(&config).await?);
    let health_state = web::Data::new(HealthState::new());
    // Clone for server factory so readiness probe remains accessible.
    let server_health_state = health_state.clone();
    let cookie_secure = config.cookie_secure;

    let server = HttpServer::new(move || {
        build_app(
            state.clone(),
            server_health_state.clone(),
            key.clone(),
            cookie_secure,
        )
    })
    .bind(config.bind_addr)?;

    health_state.mark_ready();
    info!(addr = %config.bind_addr, "server listening");
    server.run().await
}

fn build_app(
    state: web::Data<AppState>,
    health_state: web::Data<HealthState>,
    key: Key,
    cookie_secure: bool,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_same_site(SameSite::Lax)
        .build();

    let app = App::new()
        .app_data(state)
        .app_data(health_state)
        .wrap(session)
        .configure(register_routes)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app =
        app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}
