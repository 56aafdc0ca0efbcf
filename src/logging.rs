//! Global `tracing` subscriber setup.

use crate::config::{HandlerConfig, LogFormat, LogLevel, LoggingConfig, resolve_path};
use crate::error::{CultureError, Result};
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber described by `config`
///
/// `RUST_LOG` takes precedence over the configured level; `level_override`
/// (from `-v`/`-q`) takes precedence over the configuration. Relative log
/// file paths resolve against `root`.
pub fn setup_logging(
    config: &LoggingConfig,
    level_override: Option<LogLevel>,
    root: &Path,
) -> Result<()> {
    let level = level_override.unwrap_or(config.level);

    let layers = config
        .handlers
        .iter()
        .map(|handler| handler_layer(handler, config.format, root))
        .collect::<Result<Vec<_>>>()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("culture_plotter={}", level)));

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| CultureError::configuration(format!("failed to initialize logging: {}", e)))?;

    debug!("Logging initialized at level: {}", level);
    Ok(())
}

fn handler_layer(handler: &HandlerConfig, format: LogFormat, root: &Path) -> Result<BoxedLayer> {
    let layer = match handler {
        HandlerConfig::Stream => formatted(
            fmt::layer().with_target(false).with_writer(std::io::stderr),
            format,
        ),
        HandlerConfig::File { path } => {
            let path = resolve_path(root, path);
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file: File = OpenOptions::new().create(true).append(true).open(&path)?;
            formatted(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
                format,
            )
        }
    };
    Ok(layer)
}

fn formatted<W>(
    layer: fmt::Layer<Registry, fmt::format::DefaultFields, fmt::format::Format, W>,
    format: LogFormat,
) -> BoxedLayer
where
    W: for<'w> fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Full => layer.boxed(),
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Pretty => layer.pretty().boxed(),
    }
}
