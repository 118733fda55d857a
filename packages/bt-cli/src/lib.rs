use clap::builder::{
	Styles,
	styling::{AnsiColor, Effects},
};
use tracing_subscriber::EnvFilter;

const FALLBACK_LOG_LEVEL: &str = "info";

/// Package version stamped with the git sha and target triple at build time.
pub const VERSION: &str = concat!(
	env!("CARGO_PKG_VERSION"),
	"-",
	env!("VERGEN_GIT_SHA"),
	"-",
	env!("VERGEN_CARGO_TARGET_TRIPLE"),
);

pub fn styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Yellow.on_default() | Effects::BOLD)
		.usage(AnsiColor::Yellow.on_default() | Effects::BOLD)
		.literal(AnsiColor::Cyan.on_default() | Effects::BOLD)
		.placeholder(AnsiColor::Green.on_default())
}

/// Filter for `service.log_level`. A directive that does not parse falls back to `info`.
pub fn log_filter(log_level: &str) -> EnvFilter {
	EnvFilter::try_new(log_level).unwrap_or_else(|err| {
		eprintln!("Ignoring log level {log_level:?} ({err}); using {FALLBACK_LOG_LEVEL}.");

		EnvFilter::new(FALLBACK_LOG_LEVEL)
	})
}

pub fn init_tracing(log_level: &str) {
	tracing_subscriber::fmt().with_env_filter(log_filter(log_level)).init();
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn keeps_valid_directives() {
		assert_eq!(log_filter("debug").to_string(), "debug");
	}

	#[test]
	fn falls_back_on_garbage() {
		assert_eq!(log_filter("bt_service=loud").to_string(), FALLBACK_LOG_LEVEL);
	}

	#[test]
	fn version_carries_the_package_version() {
		assert!(VERSION.starts_with(env!("CARGO_PKG_VERSION")));
	}
}
