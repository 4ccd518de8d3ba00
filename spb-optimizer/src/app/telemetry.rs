use color_eyre::eyre::eyre;
use std::path::Path;
use tracing::{subscriber::set_global_default, Subscriber};
use tracing_log::LogTracer;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

/// Creates a subscriber which writes to `console::Term::stdout`, and as JSON to `spb.log` in
/// `log_directory` when one is given. `RUST_LOG` takes precedence over `log_level`.
pub(crate) fn get_subscriber(
    log_level: super::LogLevel,
    log_directory: Option<&Path>,
) -> (
    impl Subscriber + Send + Sync,
    Option<tracing_appender::non_blocking::WorkerGuard>,
) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    let fmt_layer = tracing_subscriber::fmt::Layer::new()
        .with_writer(console::Term::stdout)
        .without_time();

    let (file_layer, guard) = match log_directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::never(directory, "spb.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (
                Some(
                    tracing_subscriber::fmt::Layer::new()
                        .with_writer(non_blocking)
                        .json(),
                ),
                Some(guard),
            )
        }
        None => (None, None),
    };

    (
        Registry::default()
            .with(env_filter)
            .with(fmt_layer)
            .with(file_layer),
        guard,
    )
}

pub(crate) fn init_subscriber(
    subscriber: impl Subscriber + Send + Sync + 'static,
) -> color_eyre::Result<()> {
    LogTracer::init().map_err(|e| eyre!("Failed to initialise logger: {e}"))?;
    set_global_default(subscriber).map_err(|e| eyre!("Failed to set a subscriber: {e}"))
}
