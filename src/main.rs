use std::time::Duration;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use quiz_session_server::{
    app_state::AppState,
    config::Config,
    graphql::{create_schema, graphiql, graphql_handler},
    handlers,
    middleware::RequestIdMiddleware,
    services::expiry_worker::ExpiryWorker,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    config
        .validate()
        .map_err(|err| std::io::Error::other(err.to_string()))?;

    let host = config.web_server_host.clone();
    let port = config.web_server_port;
    let sweep_interval = Duration::from_secs(config.expiry_sweep_interval_seconds);

    let app_state = AppState::new(config)
        .await
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    let schema = create_schema(app_state.clone());

    let worker = ExpiryWorker::new(app_state.attempt_service.clone(), sweep_interval);
    actix_web::rt::spawn(async move { worker.run().await });

    log::info!("Starting HTTP server on http://{}:{}", host, port);
    log::info!("GraphiQL playground: http://{}:{}/graphiql", host, port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::Data::new(schema.clone()))
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(RequestIdMiddleware)
            .configure(handlers::configure)
            .service(web::resource("/graphql").route(web::post().to(graphql_handler)))
            .service(web::resource("/graphiql").route(web::get().to(graphiql)))
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
