use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::app::Application;
use crate::config::Config;
use crate::http::connection::Connection;

pub async fn run<A>(cfg: &Config, app: Arc<A>) -> anyhow::Result<()>
where
    A: Application + ?Sized,
{
    let listener = TcpListener::bind(&cfg.listen_addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    serve(listener, cfg, app).await
}

/// Accepts connections on an already bound listener, one task each.
pub async fn serve<A>(listener: TcpListener, cfg: &Config, app: Arc<A>) -> anyhow::Result<()>
where
    A: Application + ?Sized,
{
    loop {
        let (socket, peer) = listener.accept().await?;
        info!("Accepted connection from {}", peer);

        let app = app.clone();
        let conn_config = cfg.connection.clone();
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, app, conn_config);
            if let Err(e) = conn.run().await {
                tracing::error!("Connection error from {}: {}", peer, e);
            }
        });
    }
}
