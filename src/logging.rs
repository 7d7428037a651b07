// Diagnostic logging; goes to stderr so it never mixes with progress ticks

use chrono::Local;
use console::style;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use crate::config::ENV_HOTTEST_LOG;

pub const DEFAULT_FILTER: &str = "hottest=warn";

pub struct CustomFormatter;

impl<S, N> FormatEvent<S, N> for CustomFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let timestamp = Local::now().format("%H:%M:%S%.3f");

        let level = match *event.metadata().level() {
            Level::TRACE => style("TRACE").dim(),
            Level::DEBUG => style("DEBUG").cyan(),
            Level::INFO => style(" INFO").green(),
            Level::WARN => style(" WARN").yellow(),
            Level::ERROR => style("ERROR").red(),
        };

        write!(writer, "hottest: {} [{}]: ", level, timestamp)?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Filter from `HOTTEST_LOG`, then `RUST_LOG`, then [`DEFAULT_FILTER`]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(ENV_HOTTEST_LOG)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber; a second call is a no-op
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .event_format(CustomFormatter)
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter())
        .try_init();
}
