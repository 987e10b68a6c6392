use std::net::SocketAddr;

use reqwest::StatusCode;
use serde_json::Value;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use configs::AppConfig;
use server::{routes, startup::build_state};

async fn start_server() -> anyhow::Result<(String, server::state::AppState)> {
    let mut cfg = AppConfig::default();
    let root = std::env::temp_dir().join(format!("abc_server_{}", Uuid::new_v4()));
    cfg.storage.connection_string = format!("DataRoot={};UseDevelopmentStorage=true", root.display());
    // relational path stays off
    cfg.database.url = String::new();

    let state = build_state(&cfg).await?;
    let app = routes::build_router(state.clone(), CorsLayer::very_permissive());
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });
    Ok((format!("http://{}:{}", addr.ip(), addr.port()), state))
}

#[tokio::test]
async fn health_reports_active_paths() -> anyhow::Result<()> {
    let (base, _) = start_server().await?;
    let resp = reqwest::get(format!("{base}/health")).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await?;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["table_storage"], true);
    assert_eq!(body["relational"], false);
    Ok(())
}

#[tokio::test]
async fn metrics_expose_storage_counters() -> anyhow::Result<()> {
    let (base, state) = start_server().await?;
    assert!(state.gateway.send_message("ping").await);

    let resp = reqwest::get(format!("{base}/metrics")).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let text = resp.text().await?;
    assert!(text.contains("abc_retail_storage_operations_total"));
    assert!(text.contains(r#"backend="queue""#));
    Ok(())
}
