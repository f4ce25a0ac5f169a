use mock_server::Dataset;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "8000".to_string());
    // Reproduces the backend's habit of sending /analysis/all/ as a JSON string.
    let double_encode = std::env::var("MOCK_DOUBLE_ENCODE_ANALYSIS").is_ok_and(|v| v == "1");
    let data = Dataset {
        double_encode_analysis: double_encode,
        ..Dataset::seed()
    };

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(jobs = data.jobs.len(), double_encode, "serving job board API on http://{addr}/api");
    mock_server::run_with(listener, data).await
}
