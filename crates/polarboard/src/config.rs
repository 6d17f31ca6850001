use crate::events::BoardEvent;
use crate::render::theme::{ThemeColors, ThemeError};
use async_channel::Sender;
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use polargeom::BoardConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ThemeConfig {
    pub light: String,
    pub dark: String,
    pub selected: String,
    pub neighbor: String,
    pub highlight_alpha: f64,
    pub hub: String,
    pub stroke: String,
    /// `"none"` leaves the canvas transparent.
    pub background: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            light: "#e8d9b5".into(),
            dark: "#7a5230".into(),
            selected: "#4a6fd1".into(),
            neighbor: "#9db4ec".into(),
            highlight_alpha: 0.9,
            hub: "#2f6f3f".into(),
            stroke: "#1e1e1e".into(),
            background: "#ffffff".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    pub stroke_width: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 230,
            height: 230,
            stroke_width: 0.75,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub socket: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            socket: PathBuf::from("/tmp/polarboard.sock"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub board: BoardConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub canvas: CanvasConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    pub fn colors(&self) -> Result<ThemeColors, ThemeError> {
        ThemeColors::try_from(&self.theme)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Theme error: {0}")]
    Theme(#[from] ThemeError),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs = ProjectDirs::from("org", "polarboard", "polarboard")
        .ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

/// The file a run reads: `explicit` when given, else the platform default.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => get_config_path(),
    }
}

/// Loads built-in defaults, then the config file, then `POLARBOARD_*`
/// environment overrides (`__` separates nested keys).
///
/// An explicit path must exist; the platform default file is optional.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder().add_source(config::File::from_str(
        DEFAULT_CONFIG,
        config::FileFormat::Toml,
    ));

    match explicit {
        Some(path) => {
            builder = builder.add_source(
                config::File::from(path.to_path_buf())
                    .format(config::FileFormat::Toml)
                    .required(true),
            );
        }
        None => match get_config_path() {
            Ok(path) => {
                builder = builder.add_source(
                    config::File::from(path)
                        .format(config::FileFormat::Toml)
                        .required(false),
                );
            }
            Err(e) => log::warn!("{e}, using built-in defaults"),
        },
    }

    let s = builder
        .add_source(
            config::Environment::with_prefix("POLARBOARD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: Config = s.try_deserialize()?;
    // surface bad colors at load time rather than at first render
    config.colors()?;
    log::debug!(
        "loaded board with {} rings ({} cells)",
        config.board.ring_count(),
        polargeom::cell_count(&config.board)
    );
    Ok(config)
}

pub fn write_default_config(explicit: Option<&Path>) -> std::io::Result<PathBuf> {
    let path = resolve_config_path(explicit)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

pub const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

/// Sends [`BoardEvent::ConfigReload`] whenever `config_path` is created,
/// modified or removed. Returns when the receiving side hangs up.
pub async fn run_async_watcher(config_path: PathBuf, tx: Sender<BoardEvent>) {
    let config_dir = match config_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let Some(file_name) = config_path.file_name() else {
        log::error!("Config path {} names no file", config_path.display());
        return;
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }
    // notify reports absolute paths
    let watched = fs_err::canonicalize(&config_dir)
        .map(|dir| dir.join(file_name))
        .unwrap_or_else(|_| config_path.clone());

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }
    log::info!("watching {}", config_path.display());

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &watched)
                    && tx.send(BoardEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polargeom::{CellCoordinate, Point};
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config_parses() {
        let s = config::Config::builder()
            .add_source(config::File::from_str(
                DEFAULT_CONFIG,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();
        let config: Config = s.try_deserialize().unwrap();

        assert_eq!(config.board.ring_count(), 4);
        assert_eq!(config.board.sectors_per_ring(), &[8, 8, 16, 16]);
        assert_eq!(config.board.center(), Point::new(115.0, 115.0));
        assert_eq!(config.canvas.width, 230);
        assert!(config.colors().is_ok());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = write_config(
            r#"
[board]
ring_count = 2
sectors_per_ring = [4, 8]
center = { x = 0.0, y = 0.0 }
inner_radius = 10
outer_radius = 50

[canvas]
width = 100
height = 100
stroke_width = 1.0
"#,
        );

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.board.sectors_per_ring(), &[4, 8]);
        assert_eq!(config.board.outer_radius(), 50.0);
        assert_eq!(config.canvas.width, 100);
        // untouched sections keep their defaults
        assert_eq!(config.theme.dark, "#7a5230");
        assert_eq!(
            polargeom::hit_test(&config.board, Point::new(20.0, 0.0)),
            Some(CellCoordinate::new(0, 0))
        );
    }

    #[test]
    fn test_invalid_board_is_rejected() {
        let file = write_config(
            r#"
[board]
ring_count = 3
sectors_per_ring = [4, 8]
"#,
        );
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Config(_)), "{err}");
    }

    #[test]
    fn test_invalid_color_is_rejected() {
        let file = write_config(
            r#"
[theme]
light = "not-a-color"
"#,
        );
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Theme(_)), "{err}");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(dir.path().join("absent.toml").as_path())).is_err());
    }

    #[test]
    fn test_write_default_config_does_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        assert_eq!(write_default_config(Some(path.as_path())).unwrap(), path);
        assert_eq!(fs_err::read_to_string(&path).unwrap(), DEFAULT_CONFIG);

        fs_err::write(&path, "[canvas]\nwidth = 1\n").unwrap();
        write_default_config(Some(path.as_path())).unwrap();
        assert_eq!(
            fs_err::read_to_string(&path).unwrap(),
            "[canvas]\nwidth = 1\n"
        );
    }
}
