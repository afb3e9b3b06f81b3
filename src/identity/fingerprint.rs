/// Device fingerprinting from environment signals
use std::env;

/// Display geometry in pixels plus color depth in bits.
///
/// All zeros on hosts without a display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenGeometry {
    pub width: u32,
    pub height: u32,
    pub color_depth: u32,
}

/// Read-only access to the environment signals feeding the fingerprint.
///
/// Every accessor is infallible: a missing or inaccessible signal degrades
/// to an empty string or zeroed geometry, never an error.
pub trait SignalProvider: Send + Sync {
    fn user_agent(&self) -> String;
    fn language(&self) -> String;
    fn platform(&self) -> String;
    fn timezone(&self) -> String;
    fn screen(&self) -> ScreenGeometry;
}

/// Signals read from the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemSignals;

impl SignalProvider for SystemSignals {
    fn user_agent(&self) -> String {
        let host = hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .unwrap_or_default();
        format!(
            "{}/{} {}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            host
        )
        .trim_end()
        .to_string()
    }

    fn language(&self) -> String {
        env::var("LC_ALL")
            .or_else(|_| env::var("LANG"))
            .unwrap_or_default()
    }

    fn platform(&self) -> String {
        format!("{}-{}", env::consts::OS, env::consts::ARCH)
    }

    fn timezone(&self) -> String {
        env::var("TZ").unwrap_or_else(|_| chrono::Local::now().offset().to_string())
    }

    fn screen(&self) -> ScreenGeometry {
        // No display geometry on headless hosts
        ScreenGeometry::default()
    }
}

const DELIMITER: &str = "|";

/// Build the fingerprint string from the provider's signals.
///
/// Deterministic for identical environment state; changes when the user
/// agent, language, platform, timezone or screen geometry changes. No side
/// effects, never fails. The result is hash input only and is never stored.
pub fn collect(signals: &dyn SignalProvider) -> String {
    let screen = signals.screen();
    [
        signals.user_agent(),
        signals.language(),
        signals.platform(),
        signals.timezone(),
        screen.width.to_string(),
        screen.height.to_string(),
        screen.color_depth.to_string(),
    ]
    .join(DELIMITER)
}
