use crate::{app::build_app, state::AppState};

/// Serve a fresh in-memory app on an ephemeral port; returns its base URL.
pub(crate) async fn spawn_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, build_app(AppState::fake()))
            .await
            .expect("serve");
    });
    format!("http://{addr}")
}
