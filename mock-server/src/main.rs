use mock_server::MockState;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

fn flag(key: &str) -> bool {
    std::env::var(key).is_ok_and(|v| matches!(v.as_str(), "1" | "true" | "yes"))
}

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mock_server=info")),
        )
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;

    let state = MockState::new();
    state.set_unhealthy(flag("MOCK_UNHEALTHY"));
    state.set_fail_writes(flag("MOCK_FAIL_WRITES"));
    mock_server::run_with(listener, state).await
}
