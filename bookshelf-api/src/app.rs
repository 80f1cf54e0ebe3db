/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use bookshelf_api::{app::{build_router, AppState}, config::Config};
/// use bookshelf_shared::repositories::UnitOfWork;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(config, UnitOfWork::in_memory(), None);
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::{request_log::request_log_layer, security::SecurityHeadersLayer},
};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state, Next},
    response::Response,
    routing::{delete, get, post},
    Router,
};
use bookshelf_shared::{
    auth::{
        jwt::JwtTokenIssuer,
        middleware::authenticate,
        password::{Argon2Hasher, PasswordHasher},
        service::AuthService,
    },
    repositories::UnitOfWork,
    services::{books::BookService, reviews::ReviewService, users::UserService},
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request via Axum's `State` extractor; every field is
/// cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub books: BookService,
    pub reviews: ReviewService,
    pub users: UserService,
    pub auth: AuthService,

    /// Validates bearer tokens on protected routes
    pub tokens: Arc<JwtTokenIssuer>,

    /// Application configuration
    pub config: Arc<Config>,

    /// Database pool; `None` when running on the in-memory store
    pub db: Option<PgPool>,
}

impl AppState {
    /// Creates application state with the default Argon2id hasher
    pub fn new(config: Config, uow: UnitOfWork, db: Option<PgPool>) -> Self {
        Self::with_password_hasher(config, uow, db, Arc::new(Argon2Hasher::default()))
    }

    /// Creates application state with a specific password hasher
    pub fn with_password_hasher(
        config: Config,
        uow: UnitOfWork,
        db: Option<PgPool>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        let tokens = Arc::new(JwtTokenIssuer::new(config.jwt.clone()));
        let auth = AuthService::new(uow.credentials(), hasher, tokens.clone())
            .with_password_policy(config.password.clone());

        Self {
            books: BookService::new(&uow),
            reviews: ReviewService::new(&uow),
            users: UserService::new(&uow),
            auth,
            tokens,
            config: Arc::new(config),
            db,
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Routes
///
/// ```text
/// /
/// ├── GET  /health
/// ├── /auth/
/// │   ├── POST /register
/// │   └── POST /login
/// ├── /books
/// │   ├── GET    /            list with reviews
/// │   ├── GET    /:id
/// │   ├── POST   /            (auth)
/// │   ├── PUT    /            (auth, id in body)
/// │   └── DELETE /:id         (auth)
/// ├── /reviews
/// │   ├── GET    /
/// │   ├── GET    /book/:book_id
/// │   ├── GET    /:id
/// │   ├── POST   /            (auth)
/// │   ├── PUT    /            (auth, id in body)
/// │   └── DELETE /:id         (auth)
/// └── /users
///     ├── GET  /:id
///     └── POST /              (auth)
/// ```
///
/// # Middleware Stack
///
/// Outermost first: security headers, CORS, request logging, tower-http
/// tracing, then bearer authentication on protected routes only.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    let public_routes = Router::new()
        .route("/books", get(routes::books::list_books))
        .route("/books/:id", get(routes::books::get_book))
        .route("/reviews", get(routes::reviews::list_reviews))
        .route("/reviews/book/:book_id", get(routes::reviews::list_book_reviews))
        .route("/reviews/:id", get(routes::reviews::get_review))
        .route("/users/:id", get(routes::users::get_user));

    let protected_routes = Router::new()
        .route(
            "/books",
            post(routes::books::create_book).put(routes::books::update_book),
        )
        .route("/books/:id", delete(routes::books::delete_book))
        .route(
            "/reviews",
            post(routes::reviews::create_review).put(routes::reviews::update_review),
        )
        .route("/reviews/:id", delete(routes::reviews::delete_review))
        .route("/users", post(routes::users::create_user))
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_layer));

    let cors = if state.config.api.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/auth", auth_routes)
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(from_fn(request_log_layer))
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// Bearer authentication for protected routes
///
/// Validates the token and inserts an `AuthContext` into request
/// extensions; any failure is a 401.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let auth_context = authenticate(req.headers(), &state.tokens)?;

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
