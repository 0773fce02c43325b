/* src/serve.rs */

// Static preview server: serves whatever is on disk right now. It has no
// build awareness; clients refresh to pick up new output.

use anyhow::{Context, Result};
use axum::Router;
use tower_http::services::ServeDir;

use crate::ui::{CYAN, RESET};

pub fn serve_url(port: u16) -> String {
  format!("http://localhost:{port}")
}

pub async fn serve(public: String, port: u16) -> Result<()> {
  let app = Router::new().fallback_service(ServeDir::new(&public));
  let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
    .await
    .with_context(|| format!("failed to bind port {port}"))?;
  println!("  {CYAN}Serving {public} at {}{RESET}", serve_url(port));
  axum::serve(listener, app).await?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn url_formatting() {
    assert_eq!(serve_url(5000), "http://localhost:5000");
    assert_eq!(serve_url(8080), "http://localhost:8080");
  }
}
