use crate::config::{self, Config};
use crate::events::BoardEvent;
use crate::render::{OutputFormat, Scene, write_scene};
use crate::sys::server;
use anyhow::Context as _;
use async_channel::Receiver;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Configuration shared between the socket server and the reload loop.
/// Writers swap in a fully validated config, so readers never see a partial
/// reload.
pub type SharedConfig = Arc<RwLock<Config>>;

pub struct ServeOptions {
    /// Explicit config file; `None` uses the platform default.
    pub config_path: Option<PathBuf>,
    /// Re-rendered on start and after every successful reload.
    pub preview: Option<PathBuf>,
}

/// Runs the socket server and config watcher until Ctrl-C.
pub fn serve(initial: Config, options: ServeOptions) -> anyhow::Result<()> {
    let rt = Runtime::new().context("Failed to create Tokio runtime")?;
    rt.block_on(serve_async(initial, options))
}

async fn serve_async(initial: Config, options: ServeOptions) -> anyhow::Result<()> {
    let socket = initial.server.socket.clone();
    let listener = server::bind_socket(&socket)
        .with_context(|| format!("Failed to bind unix socket {}", socket.display()))?;
    let shared: SharedConfig = Arc::new(RwLock::new(initial));
    let (tx, rx) = async_channel::bounded(32);

    tokio::spawn(server::run_server(listener, shared.clone(), tx.clone()));

    match config::resolve_config_path(options.config_path.as_deref()) {
        Ok(path) => {
            let tx = tx.clone();
            tokio::spawn(async move {
                config::run_async_watcher(path, tx).await;
            });
        }
        Err(e) => log::warn!("Not watching config: {}", e),
    }

    {
        let tx = tx.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = tx.send(BoardEvent::Shutdown).await;
            }
        });
    }

    render_preview(&shared, options.preview.as_deref());
    event_loop(rx, &shared, &options).await;

    let _ = std::fs::remove_file(&socket);
    Ok(())
}

async fn event_loop(rx: Receiver<BoardEvent>, shared: &SharedConfig, options: &ServeOptions) {
    while let Ok(event) = rx.recv().await {
        match event {
            BoardEvent::ConfigReload => {
                reload_in_background(shared, options).await;
            }
            BoardEvent::ReloadRequested(reply) => {
                let applied = reload_in_background(shared, options).await;
                let _ = reply.send(applied).await;
            }
            BoardEvent::Shutdown => {
                log::info!("shutting down");
                break;
            }
        }
    }
}

/// Runs [`reload`] and the preview render off the async workers, since both
/// touch the filesystem.
async fn reload_in_background(shared: &SharedConfig, options: &ServeOptions) -> bool {
    let shared = shared.clone();
    let config_path = options.config_path.clone();
    let preview = options.preview.clone();
    let task = tokio::task::spawn_blocking(move || {
        let applied = reload(&shared, config_path.as_deref());
        if applied {
            render_preview(&shared, preview.as_deref());
        }
        applied
    });
    task.await.unwrap_or_else(|e| {
        log::error!("Reload task failed: {}", e);
        false
    })
}

/// Replaces the shared config with a fresh load. A config that fails to load
/// or validate is logged and the previous one stays in place.
pub fn reload(shared: &SharedConfig, config_path: Option<&Path>) -> bool {
    match config::load_config(config_path) {
        Ok(fresh) => {
            if fresh.server.socket != shared.read().server.socket {
                log::warn!("socket path changes take effect on restart");
            }
            *shared.write() = fresh;
            log::info!("config reloaded");
            true
        }
        Err(e) => {
            log::error!("Keeping previous config: {}", e);
            false
        }
    }
}

fn render_preview(shared: &SharedConfig, preview: Option<&Path>) {
    let Some(path) = preview else {
        return;
    };
    let config = shared.read().clone();
    let result = config
        .colors()
        .map_err(anyhow::Error::from)
        .and_then(|colors| {
            Scene::build(&config.board, &colors, &config.canvas, None).map_err(Into::into)
        })
        .and_then(|scene| {
            write_scene(&scene, path, OutputFormat::from_path(path)).map_err(Into::into)
        });
    if let Err(e) = result {
        log::error!("Failed to render preview {}: {:#}", path.display(), e);
    }
}
