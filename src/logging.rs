use std::sync::Once;

use tracing::info;

const DEFAULT_FILTER: &str = "info,tapcard=info,tapcard_ndef=info";

static INIT: Once = Once::new();

/// Install the global subscriber, `RUST_LOG` overrides the default filter
///
/// Safe to call more than once, and a no-op if the host already installed a subscriber
pub fn init() {
    INIT.call_once(|| {
        let installed = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| DEFAULT_FILTER.into()),
            )
            .with_target(true)
            .with_line_number(true)
            .try_init();

        if installed.is_err() {
            return;
        }

        info!(
            "tapcard {} ({}), {} build",
            crate::build::version(),
            crate::build::git_short_hash(),
            crate::build::profile()
        );
    });
}

#[uniffi::export]
fn init_logging() {
    init();
}
