//! Server construction and wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

#[cfg(debug_assertions)]
use drowse::doc::ApiDoc;
use drowse::inbound::http::cache_admin::{cache_clear, cache_stats, cache_warm};
use drowse::inbound::http::feed::{get_feed, get_feed_statistics};
use drowse::inbound::http::follows::{follow_user, list_followers, list_following, unfollow_user};
use drowse::inbound::http::health::{HealthState, live, ready};
use drowse::inbound::http::sleep_records::{
    clock_in, clock_out, delete_sleep_record, list_sleep_records,
};
use drowse::inbound::http::state::HttpState;
use drowse::inbound::http::users::{create_user, get_user, list_users};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let api = web::scope("/api/v1")
        .service(create_user)
        .service(list_users)
        .service(clock_in)
        .service(clock_out)
        .service(list_sleep_records)
        .service(delete_sleep_record)
        .service(follow_user)
        .service(unfollow_user)
        .service(list_following)
        .service(list_followers)
        .service(get_feed)
        .service(get_feed_statistics)
        .service(cache_stats)
        .service(cache_clear)
        .service(cache_warm)
        .service(get_user);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config);
    let bind_addr = config.bind_addr();

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
