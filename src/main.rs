use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use woodie_campus_server::{
    app_state::AppState,
    auth::{AuthMiddleware, JwtService},
    config::Config,
    graphql::{create_schema, graphql_handler},
    handlers,
    middleware::RequestIdMiddleware,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env();
    if let Err(err) = config.validate_for_production() {
        log::warn!("Running with development settings: {}", err);
    }

    let state = AppState::new(config.clone())
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    if config.scheduler_enabled {
        state.scheduler.start().await;
    } else {
        log::info!("Scheduler disabled by SCHEDULER_ENABLED");
    }

    let jwt_service = web::Data::new(JwtService::new(
        &config.jwt_secret,
        config.jwt_expiration_hours,
    ));
    let schema = web::Data::new(create_schema(state.clone()));
    let state_data = web::Data::new(state.clone());
    let cors_origin = config.cors_allowed_origin.clone();

    log::info!(
        "Starting HTTP server on {}:{}",
        config.web_server_host,
        config.web_server_port
    );

    let server = HttpServer::new(move || {
        let cors = match &cors_origin {
            Some(origin) => Cors::default()
                .allowed_origin(origin)
                .allowed_methods(vec!["GET", "POST", "PUT"])
                .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
                .max_age(3600),
            None => Cors::permissive(),
        };

        App::new()
            .app_data(state_data.clone())
            .app_data(jwt_service.clone())
            .app_data(schema.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(RequestIdMiddleware)
            .configure(handlers::configure_health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(handlers::configure_api),
            )
            .service(
                web::scope("/graphql")
                    .wrap(AuthMiddleware)
                    .route("", web::post().to(graphql_handler)),
            )
    })
    .bind((config.web_server_host.as_str(), config.web_server_port))?
    .run();

    let result = server.await;
    state.scheduler.stop().await;
    result
}
