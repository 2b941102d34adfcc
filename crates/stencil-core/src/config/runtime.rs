//! Interpreter detection for custom template entry points

use tokio::process::Command;
use tracing::debug;

/// Interpreters able to run a template entry module, in order of preference
const ENTRY_RUNTIMES: &[&str] = &["node", "bun"];

/// Detect the interpreter used to run custom template entry points
pub async fn detect_entry_runtime() -> &'static str {
    for runtime in ENTRY_RUNTIMES {
        let probe = Command::new(runtime).arg("--version").output().await;
        if probe.is_ok_and(|o| o.status.success()) {
            debug!(runtime, "detected entry runtime");
            return runtime;
        }
    }
    // Default to node if nothing detected (spawning will fail with a clear error)
    ENTRY_RUNTIMES[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_detect_entry_runtime_returns_known_runtime() {
        let runtime = detect_entry_runtime().await;
        assert!(ENTRY_RUNTIMES.contains(&runtime));
    }
}
