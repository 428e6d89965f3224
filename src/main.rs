use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use community_service::handlers;
use community_service::middleware::{AuthState, BearerAuth};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::io;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn health_summary(pool: web::Data<PgPool>) -> HttpResponse {
    match sqlx::query("SELECT 1").fetch_one(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "community-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("PostgreSQL connection failed: {}", e),
            "service": "community-service"
        })),
    }
}

async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}

/// Community Service
///
/// Serves the community feed API: paged and filtered feed listings, feed
/// CRUD with image attachments, anonymized comment threads with replies,
/// and likes on feeds and comments.
///
/// # Routes
///
/// - `/api/v1/feeds` and `/api/v1/feeds/{id}` - listings and feed CRUD
/// - `/api/v1/feeds/group/*` - group-scoped listings and search
/// - `/api/v1/feeds/{id}/comment*` - comment threads, replies, edits
/// - `/api/v1/feeds/{id}/like` and `.../comment/{id}/like` - likes
///
/// Listens on COMMUNITY_SERVICE_HOST:COMMUNITY_SERVICE_PORT (default
/// 0.0.0.0:8080). Requires PostgreSQL; migrations run at startup.
#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug,sqlx=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match community_service::Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {:#}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting community-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    // Initialize database connection pool
    let pool = match PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database pool creation failed: {:#}", e);
            eprintln!("ERROR: Failed to create database pool: {}", e);
            std::process::exit(1);
        }
    };

    sqlx::migrate!("./migrations").run(&pool).await.map_err(|e| {
        io::Error::new(
            io::ErrorKind::Other,
            format!("Failed to run database migrations: {e}"),
        )
    })?;

    tracing::info!("Connected to database, migrations applied");

    let auth_state = Arc::new(AuthState::new(pool.clone(), &config.auth.jwt_secret));

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    HttpServer::new(move || {
        // Build CORS configuration
        let mut cors = Cors::default();
        for origin in config.cors.allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(web::Data::new(pool.clone()))
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            // Health check endpoints
            .route("/api/v1/health", web::get().to(health_summary))
            .route("/api/v1/health/live", web::get().to(liveness_check))
            .service(
                web::scope("/api/v1")
                    .wrap(BearerAuth::new(auth_state.clone()))
                    .service(
                        web::scope("/feeds")
                            .service(
                                web::resource("")
                                    .route(web::get().to(handlers::list_feeds))
                                    .route(web::post().to(handlers::create_feed)),
                            )
                            .route("/top-like", web::get().to(handlers::top_like_feeds))
                            .route(
                                "/group/category",
                                web::get().to(handlers::group_category_feeds),
                            )
                            .route("/group/search", web::get().to(handlers::group_feed_search))
                            .route(
                                "/group/search/result",
                                web::get().to(handlers::group_feed_search_result),
                            )
                            .service(
                                web::resource("/{feed_id}")
                                    .route(web::get().to(handlers::get_feed))
                                    .route(web::put().to(handlers::update_feed))
                                    .route(web::delete().to(handlers::delete_feed)),
                            )
                            .service(
                                web::resource("/{feed_id}/like")
                                    .route(web::post().to(handlers::like_feed))
                                    .route(web::delete().to(handlers::unlike_feed)),
                            )
                            .service(
                                web::resource("/{feed_id}/comment")
                                    .route(web::get().to(handlers::get_feed_comments))
                                    .route(web::post().to(handlers::create_comment)),
                            )
                            .service(
                                web::resource("/{feed_id}/comment/{comment_id}")
                                    .route(web::put().to(handlers::update_comment))
                                    .route(web::delete().to(handlers::delete_comment)),
                            )
                            .route(
                                "/{feed_id}/comment/{comment_id}/recomment",
                                web::post().to(handlers::create_recomment),
                            )
                            .service(
                                web::resource("/{feed_id}/comment/{comment_id}/like")
                                    .route(web::post().to(handlers::like_comment))
                                    .route(web::delete().to(handlers::unlike_comment)),
                            ),
                    ),
            )
    })
    .bind(&bind_address)?
    .workers(4)
    .run()
    .await
}
