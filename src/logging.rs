use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_ENV_VAR: &str = "AOC_LOG";
const DEFAULT_FILTER: &str = "info";

fn filter_directive(raw: Option<String>) -> String {
    raw.as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .filter(|v| EnvFilter::try_new(v).is_ok())
        .unwrap_or(DEFAULT_FILTER)
        .to_string()
}

/// Install the process-wide subscriber. Logs go to stderr so stdout stays
/// free for command output such as the raw puzzle input.
pub fn init() {
    let directive = filter_directive(std::env::var(LOG_ENV_VAR).ok());
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new(directive))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::filter_directive;

    #[test]
    fn blank_filter_falls_back_to_info() {
        assert_eq!(filter_directive(None), "info");
        assert_eq!(filter_directive(Some("  ".into())), "info");
    }

    #[test]
    fn explicit_filter_is_kept() {
        assert_eq!(filter_directive(Some(" debug ".into())), "debug");
        assert_eq!(
            filter_directive(Some("aoc_relay=trace".into())),
            "aoc_relay=trace"
        );
    }
}
