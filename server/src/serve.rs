use std::{io, net::IpAddr};

use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::AppState;

/// Bind `host:port`, moving up one port at a time while the address is taken.
pub async fn bind_with_retry(host: IpAddr, port: u16) -> io::Result<TcpListener> {
    let mut port = port;
    loop {
        match TcpListener::bind((host, port)).await {
            Ok(listener) => return Ok(listener),
            Err(e) if e.kind() == io::ErrorKind::AddrInUse => {
                warn!(port, "port is already in use, trying the next one");
                port = port.checked_add(1).ok_or_else(|| {
                    io::Error::new(io::ErrorKind::AddrInUse, "no free port left to try")
                })?;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Serve until Ctrl-C or SIGTERM, letting in-flight requests finish.
pub async fn serve(listener: TcpListener, state: AppState) -> io::Result<()> {
    let addr = listener.local_addr()?;
    info!(%addr, "server is running");
    axum::serve(listener, crate::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl-C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;

    #[tokio::test]
    async fn busy_port_moves_to_a_higher_one() {
        let host = IpAddr::V4(Ipv4Addr::LOCALHOST);
        let taken = TcpListener::bind((host, 0)).await.unwrap();
        let busy = taken.local_addr().unwrap().port();

        let listener = bind_with_retry(host, busy).await.unwrap();
        assert!(listener.local_addr().unwrap().port() > busy);
    }
}
