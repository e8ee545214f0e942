//! Helpers shared by unit tests that need a real HTTP peer.

use axum::Router;
use tokio::net::TcpListener;

/// Binds an ephemeral localhost port and returns it with its base URL.
pub async fn bind() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("test listener address");
    (listener, format!("http://{addr}"))
}

/// Serves `router` on an already-bound listener in the background.
pub fn spawn(listener: TcpListener, router: Router) {
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });
}

/// Serves `router` on an ephemeral localhost port and returns its base URL.
pub async fn serve(router: Router) -> String {
    let (listener, base) = bind().await;
    spawn(listener, router);
    base
}
