use actix_web::{middleware, web, App, HttpServer};

use pantry_recipes::config::Config;
use pantry_recipes::{db, routes};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    // set up database connection pool
    let pool = db::build_pool(&config.database_url, config.pool_size)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    {
        let conn = pool
            .get()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        db::init_schema(&conn).map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    }
    log::info!("using database {}", config.database_url);

    log::info!("starting HTTP server at http://{}:{}", config.host, config.port);

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            // set up DB pool to be used with web::Data<Pool> extractor
            .app_data(web::Data::new(pool.clone()))
            .wrap(middleware::Logger::default())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
