use clap::Parser;
use tracing_subscriber::prelude::__tracing_subscriber_SubscriberExt;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let registry = tracing_subscriber::Registry::default()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::filter::filter_fn(|meta| {
            meta.target().contains("backend") || meta.target().contains("game") || meta.target().contains("tower_http")
        }));
    if let Err(e) = tracing::subscriber::set_global_default(registry) {
        eprintln!("Setting up logging: {:?}", e);
        return;
    }

    let config = backend::config::Config::parse();
    tracing::info!(
        address = %config.bind_address(),
        dist = %config.dist.display(),
        questions = ?config.questions,
        "Starting..."
    );

    let questions = match config.load_questions().await {
        Ok(q) => q,
        Err(e) => {
            tracing::error!("Loading questions: {}", e);
            return;
        }
    };

    let state = backend::AppState::new(
        backend::store::Game::new(Default::default(), questions),
        config.resolve_admin_token(),
    );
    let router = backend::app(state, &config.dist);

    let listener = match tokio::net::TcpListener::bind(config.bind_address()).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Binding to {}: {:?}", config.bind_address(), e);
            return;
        }
    };
    tracing::info!("Listening on {}", config.bind_address());

    if let Err(e) = axum::serve(listener, router).await {
        tracing::error!("Serving: {:?}", e);
    }
}
