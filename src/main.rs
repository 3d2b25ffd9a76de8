//! Odin Crawler billing service entry point.

use std::sync::Arc;

use axum::extract::Request;
use axum::ServiceExt;
use http::HeaderValue;
use secrecy::ExposeSecret;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use odin_crawler::adapters::http::{
    api_router, trim_trailing_slash, AppState, BillingSettings,
};
use odin_crawler::adapters::paypal::{PaypalConfig, PaypalWebhookVerifier};
use odin_crawler::adapters::postgres::PostgresSubscriptionRepository;
use odin_crawler::adapters::razorpay::{RazorpayConfig, RazorpayGateway};
use odin_crawler::adapters::scraper::{HttpContentScraper, ScraperConfig};
use odin_crawler::application::handlers::subscription::OrderSettings;
use odin_crawler::config::{AppConfig, ServerConfig};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    tracing::info!(
        environment = ?config.server.environment,
        razorpay_test_mode = config.payment.razorpay.is_test_mode(),
        "starting odin-crawler"
    );

    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("database migrations applied");
    }

    let state = build_state(&config, pool)?;

    let router = api_router(state)
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors_layer(&config.server))
        .layer(TraceLayer::new_for_http());
    let app = trim_trailing_slash(router);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    if server.is_production() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn build_state(config: &AppConfig, pool: sqlx::PgPool) -> Result<AppState, BoxError> {
    let razorpay = &config.payment.razorpay;
    let paypal = &config.payment.paypal;

    let gateway = RazorpayGateway::new(
        RazorpayConfig::new(
            razorpay.key_id.clone(),
            razorpay.key_secret.expose_secret().clone(),
            razorpay.plan_id.clone(),
        )
        .with_total_count(razorpay.total_count)
        .with_base_url(razorpay.api_base_url.clone()),
    );

    let verifier = PaypalWebhookVerifier::new(
        PaypalConfig::new(
            paypal.client_id.clone(),
            paypal.client_secret.expose_secret().clone(),
            paypal.webhook_id.clone(),
        )
        .with_base_url(paypal.api_base_url.clone()),
    );

    let scraper = HttpContentScraper::new(ScraperConfig {
        search_url: config.scraper.search_url.clone(),
        user_agent: config.scraper.user_agent.clone(),
        timeout: config.scraper.timeout(),
        max_links: config.scraper.max_links,
    })?;

    let settings = BillingSettings {
        trial_policy: config.trial.policy(),
        subscription_link: razorpay.subscription_link.clone(),
        razorpay_webhook_secret: razorpay.webhook_secret.clone(),
        order: OrderSettings {
            key_id: razorpay.key_id.clone(),
            currency: razorpay.currency.clone(),
            default_amount: razorpay.default_order_amount,
        },
    };

    Ok(AppState {
        subscription_repository: Arc::new(PostgresSubscriptionRepository::new(pool)),
        payment_gateway: Arc::new(gateway),
        paypal_verifier: Arc::new(verifier),
        content_scraper: Arc::new(scraper),
        settings: Arc::new(settings),
    })
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutdown signal received");
}
