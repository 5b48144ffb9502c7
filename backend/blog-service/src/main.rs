use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use anyhow::Context;
use blog_service::handlers;
use blog_service::jobs;
use blog_service::middleware::SessionAuthMiddleware;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

struct HealthState {
    db_pool: sqlx::Pool<sqlx::Postgres>,
}

impl HealthState {
    async fn check_postgres(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.db_pool)
            .await
            .map(|_| ())
    }
}

async fn health_summary(state: web::Data<HealthState>) -> HttpResponse {
    match state.check_postgres().await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "blog-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("PostgreSQL connection failed: {}", e),
            "service": "blog-service"
        })),
    }
}

async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}

/// Blog Service
///
/// REST API for the Quill blogging platform.
///
/// # Routes
///
/// - `/api/auth/*` - Signup, login, logout (session cookie)
/// - `/api/posts/*` - Create, read, update, delete posts
/// - `/api/comments/*` - Comment trees per post, moderation-aware
/// - `/api/categories/*`, `/api/tags/*` - Taxonomy, admin-gated mutation
/// - `/api/users/*` - Public profiles and profile updates
///
/// # Architecture
///
/// - HTTP handlers with request/response conversion
/// - PostgreSQL for persistent storage (posts, comments, sessions)
/// - Session-cookie authentication read fresh from the database per request
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match blog_service::Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting blog-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    // Initialize database connection pool
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
        .context("Failed to create database pool")?;

    // Apply migrations before accepting traffic
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .context("Database migration failed")?;

    tracing::info!("Connected to database, migrations applied");

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    // Background housekeeping: sweep expired sessions
    tokio::spawn(jobs::start_session_sweeper(db_pool.clone()));

    let health_state = web::Data::new(HealthState {
        db_pool: db_pool.clone(),
    });
    let config_data = web::Data::new(config.clone());
    let db_pool_http = db_pool.clone();
    let server_config = config.clone();

    HttpServer::new(move || {
        // Build CORS configuration
        let mut cors = Cors::default();
        let mut any_origin = false;
        for origin in server_config.cors.allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                any_origin = true;
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);
        if !any_origin {
            // Session cookies require credentialed requests; the CORS spec
            // forbids combining credentials with a wildcard origin.
            cors = cors.supports_credentials();
        }

        App::new()
            .app_data(web::Data::new(db_pool_http.clone()))
            .app_data(config_data.clone())
            .app_data(health_state.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            // Health check endpoints
            .route("/api/health", web::get().to(health_summary))
            .route("/api/health/live", web::get().to(liveness_check))
            .service(
                web::scope("/api")
                    .wrap(SessionAuthMiddleware::new(
                        db_pool_http.clone(),
                        server_config.session.cookie_name.clone(),
                    ))
                    .service(
                        web::scope("/auth")
                            .route("/signup", web::post().to(handlers::signup))
                            .route("/login", web::post().to(handlers::login))
                            .route("/logout", web::post().to(handlers::logout)),
                    )
                    .service(
                        web::scope("/posts")
                            .service(
                                web::resource("")
                                    .route(web::get().to(handlers::list_posts))
                                    .route(web::post().to(handlers::create_post)),
                            )
                            .service(
                                web::resource("/{post_id}")
                                    .route(web::get().to(handlers::get_post))
                                    .route(web::put().to(handlers::update_post))
                                    .route(web::delete().to(handlers::delete_post)),
                            ),
                    )
                    .service(
                        web::scope("/comments")
                            .service(
                                web::resource("/posts/{post_id}")
                                    .route(web::get().to(handlers::get_comments_by_post))
                                    .route(web::post().to(handlers::create_comment)),
                            )
                            .service(
                                web::resource("/{comment_id}")
                                    .route(web::put().to(handlers::update_comment))
                                    .route(web::delete().to(handlers::delete_comment)),
                            ),
                    )
                    .service(
                        web::scope("/categories")
                            .service(
                                web::resource("")
                                    .route(web::get().to(handlers::list_categories))
                                    .route(web::post().to(handlers::create_category)),
                            )
                            .route(
                                "/slug/{slug}",
                                web::get().to(handlers::get_category_by_slug),
                            )
                            .service(
                                web::resource("/{category_id}")
                                    .route(web::get().to(handlers::get_category))
                                    .route(web::put().to(handlers::update_category))
                                    .route(web::delete().to(handlers::delete_category)),
                            ),
                    )
                    .service(
                        web::scope("/tags")
                            .service(
                                web::resource("")
                                    .route(web::get().to(handlers::list_tags))
                                    .route(web::post().to(handlers::create_tag)),
                            )
                            .route("/slug/{slug}", web::get().to(handlers::get_tag_by_slug))
                            .service(
                                web::resource("/{tag_id}")
                                    .route(web::get().to(handlers::get_tag))
                                    .route(web::put().to(handlers::update_tag))
                                    .route(web::delete().to(handlers::delete_tag)),
                            ),
                    )
                    .service(
                        web::scope("/users").service(
                            web::resource("/{user_id}/profile")
                                .route(web::get().to(handlers::get_profile))
                                .route(web::put().to(handlers::update_profile)),
                        ),
                    ),
            )
    })
    .bind(&bind_address)?
    .workers(4)
    .run()
    .await?;

    tracing::info!("Blog-service shutting down");

    Ok(())
}
