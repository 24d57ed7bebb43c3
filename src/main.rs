use std::time::Duration;

use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;

use rental_rates_api::cache::QuoteCache;
use rental_rates_api::ratelimit::RateLimiter;
use rental_rates_api::{db, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger and environment
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    log::info!("Connecting to database...");
    let pool = db::get_db_pool().await;

    // Run migrations
    log::info!("Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    log::info!("Starting server at http://localhost:8080");

    let pool_data = web::Data::new(pool);
    // Quotes are served from a five-minute cache; each session gets a
    // burst of 10 quote calls per property, refilling one every 6s.
    let quote_cache = web::Data::new(QuoteCache::new(Duration::from_secs(300)));
    let rate_limiter = web::Data::new(RateLimiter::new(10, 1.0 / 6.0));

    HttpServer::new(move || {
        App::new()
            .app_data(pool_data.clone())
            .app_data(quote_cache.clone())
            .app_data(rate_limiter.clone())
            .wrap(middleware::Logger::default())
            .service(
                web::scope("/properties")
                    .route(
                        "/{id}/calendar/regenerate",
                        web::post().to(handlers::calendars::regenerate),
                    )
                    .route(
                        "/{id}/calendar/{year}/{month}",
                        web::get().to(handlers::calendars::get_calendar),
                    )
                    .route(
                        "/{id}/calendar/{year}/{month}/{day}",
                        web::put().to(handlers::calendars::refresh_day),
                    ),
            )
            .service(web::scope("/quotes").route("", web::post().to(handlers::quotes::create_quote)))
    })
    .bind(("127.0.0.1", 8080))?
    .run()
    .await
}
