use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use log::info;

use jobscout::config::Config;
use jobscout::entities;
use jobscout::keywords::KeywordExtractor;
use jobscout::pipeline::Pipeline;
use jobscout::server::{self, AppState};
use jobscout::logger;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    logger::init();

    let config = Config::from_env();
    info!("Starting jobscout at http://{}", config.bind_address);

    // Identifier selection happens once at startup; a missing lexicon puts
    // keyword extraction into degraded mode without failing the server.
    let identifier = entities::select_identifier(&config.lexicon_path);
    let extractor = Arc::new(KeywordExtractor::new(
        identifier,
        config.skill_vocabulary.clone(),
    ));
    let pipeline = Arc::new(Pipeline::new(extractor, config.clone()));
    let state = web::Data::new(AppState { pipeline });

    let frontend_origin = config.frontend_origin.clone();
    let bind_address = config.bind_address.clone();

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&frontend_origin)
            .allow_any_method()
            .allow_any_header();

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .service(server::health_check)
            .service(server::recommend_jobs)
    })
    .bind(bind_address)?
    .run()
    .await
}
