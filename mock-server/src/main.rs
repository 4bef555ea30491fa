use tokio::net::TcpListener;
use tracing::Instrument;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    mock_server::logging::init();
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    let span = tracing::info_span!("listen", %addr);
    span.in_scope(|| tracing::info!("listening"));
    mock_server::run(listener).instrument(span).await
}
