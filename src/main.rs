use std::sync::Arc;

use fweb::config::Config;
use fweb::http::response::StatusCode;
use fweb::http::session::Session;
use fweb::server;

fn demo(session: &mut Session) -> anyhow::Result<()> {
    match session.path().as_str() {
        "/" => session.echo("<h1>Hello from FWeb</h1>"),
        "/echo" => {
            let body = session.req_body.clone();
            session.resp_head.set("Content-Type", ["application/octet-stream"]);
            session.resp_body = body;
        }
        "/home" => session.redirect("/"),
        _ => {
            session.resp_head.set_status_code(StatusCode::NotFound);
            session.echo("404 Not Found");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;

    tokio::select! {
        res = server::listener::run(&cfg, Arc::new(demo)) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
