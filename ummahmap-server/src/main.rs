mod routes;
mod scrape;
mod state;
mod upstream;

use log::info;

use anyhow::Context;
use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    result::Result as StdResult,
};

use state::ServerState;

type Result<T = (), E = anyhow::Error> = StdResult<T, E>;

const DEFAULT_PORT: u16 = 5000;

/// Bind to the address passed as the first argument, otherwise all interfaces on `$PORT`
fn socket_addr() -> Result<SocketAddr> {
    let args = std::env::args().collect::<Vec<_>>();
    if let Some(raw_binding) = args.get(1) {
        return raw_binding
            .parse::<SocketAddr>()
            .context("Invalid socket addr passed");
    }

    let port = std::env::var("PORT")
        .ok()
        .map(|p| p.parse::<u16>())
        .transpose()
        .context("Invalid PORT")?
        .unwrap_or(DEFAULT_PORT);

    Ok(SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port))
}

#[tokio::main]
async fn main() -> Result {
    colog::init();

    let socket_addr = socket_addr()?;
    let state = ServerState::from_env()?;
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(socket_addr)
        .await
        .with_context(|| format!("Failed to bind to {socket_addr}"))?;

    info!(
        "Starting UmmahMap server {} on {socket_addr}",
        env!("CARGO_PKG_VERSION")
    );

    axum::serve(listener, app)
        .await
        .context("Error while running server")
}
