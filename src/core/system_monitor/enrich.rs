//! Best-effort platform enrichment.
//!
//! Auxiliary lookups shown next to the metrics (detailed OS version, battery
//! state). Each lookup has its own short timeout and falls back to a fixed
//! value instead of failing.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::timeout;

use crate::error::{ProbeError, ProbeResult};

/// Timeout applied to each enrichment lookup
pub const ENRICH_TIMEOUT: Duration = Duration::from_secs(2);

/// OS version reported when the lookup fails
#[cfg(windows)]
pub const FALLBACK_OS_VERSION: &str = "Windows";
#[cfg(not(windows))]
pub const FALLBACK_OS_VERSION: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatteryStatus {
    pub percent: f32,
    pub charging: bool,
}

/// Enrichment results gathered once per session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrichment {
    pub os_version: String,
    /// `None` on hosts without a battery or when the lookup failed
    pub battery: Option<BatteryStatus>,
}

impl Default for Enrichment {
    fn default() -> Self {
        Self {
            os_version: FALLBACK_OS_VERSION.to_string(),
            battery: None,
        }
    }
}

/// Run every enrichment lookup concurrently.
pub async fn enrich() -> Enrichment {
    let (os_version, battery) = tokio::join!(
        bounded("os version", os_version()),
        bounded("battery", battery_status()),
    );

    Enrichment {
        os_version: os_version.unwrap_or_else(|| FALLBACK_OS_VERSION.to_string()),
        battery,
    }
}

async fn bounded<T>(
    name: &str,
    lookup: impl std::future::Future<Output = ProbeResult<T>>,
) -> Option<T> {
    let result = match timeout(ENRICH_TIMEOUT, lookup).await {
        Ok(result) => result,
        Err(_) => Err(ProbeError::Timeout),
    };

    match result {
        Ok(value) => Some(value),
        Err(e) => {
            log::debug!("{} enrichment failed: {}", name, e);
            None
        }
    }
}

#[cfg(windows)]
async fn os_version() -> ProbeResult<String> {
    let output = tokio::process::Command::new("powershell")
        .args(["-Command", "(Get-CimInstance Win32_OperatingSystem).Caption"])
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| ProbeError::unavailable(e.to_string()))?;

    if !output.status.success() {
        return Err(ProbeError::unavailable(format!(
            "powershell exited with {}",
            output.status
        )));
    }

    let caption = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if caption.is_empty() {
        return Err(ProbeError::parse("empty OS caption"));
    }
    Ok(caption)
}

#[cfg(not(windows))]
async fn os_version() -> ProbeResult<String> {
    tokio::task::spawn_blocking(sysinfo::System::long_os_version)
        .await
        .map_err(|e| ProbeError::unavailable(e.to_string()))?
        .ok_or_else(|| ProbeError::unavailable("OS version not reported"))
}

async fn battery_status() -> ProbeResult<BatteryStatus> {
    tokio::task::spawn_blocking(read_battery)
        .await
        .map_err(|e| ProbeError::unavailable(e.to_string()))?
}

fn read_battery() -> ProbeResult<BatteryStatus> {
    use battery::units::ratio::percent;

    let manager = battery::Manager::new().map_err(|e| ProbeError::unavailable(e.to_string()))?;
    let battery = manager
        .batteries()
        .map_err(|e| ProbeError::unavailable(e.to_string()))?
        .next()
        .ok_or_else(|| ProbeError::unavailable("no battery present"))?
        .map_err(|e| ProbeError::parse(e.to_string()))?;

    Ok(BatteryStatus {
        percent: battery.state_of_charge().get::<percent>(),
        charging: matches!(
            battery.state(),
            battery::State::Charging | battery::State::Full
        ),
    })
}
