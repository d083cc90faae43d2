//! Accept loop around the connection engine.

pub mod listener;

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::app::Application;
use crate::config::Config;

/// Runs the listener as a background task; dropping the runtime stops it.
pub fn spawn<A>(cfg: Config, app: Arc<A>) -> JoinHandle<anyhow::Result<()>>
where
    A: Application + ?Sized,
{
    tokio::spawn(async move { listener::run(&cfg, app).await })
}
