//! Board configuration files.

use pv_core::CheckResult;

use crate::paths::BuildPaths;
use crate::probe::{self, Presence};

/// Static address expected in the network configuration.
pub const STATIC_ADDRESS: &str = "192.168.1.10";
/// Wired interface expected in the network configuration.
pub const WIRED_INTERFACE: &str = "eth0";
/// Placeholder SSID shipped with the default wpa_supplicant.conf.
pub const PLACEHOLDER_SSID: &str = "YOUR_SSID";

/// Overlay `etc/network/interfaces` configures the static address on eth0.
///
/// FAILs when the file is missing.
pub fn network_config(paths: &BuildPaths) -> CheckResult {
    const NAME: &str = "Network Config";
    let path = paths.overlay().join("etc/network/interfaces");

    match probe::stat(&path) {
        Presence::Absent => {
            return CheckResult::fail(NAME, "Network interfaces file missing")
                .with_detail(format!("Expected at {}", path.display()));
        }
        Presence::Inaccessible(e) => {
            return CheckResult::warn(NAME, "Cannot read network config")
                .with_detail(format!("{}: {}", path.display(), e));
        }
        Presence::Present(_) => {}
    }

    match probe::read_text(&path) {
        Ok(content) if content.contains(STATIC_ADDRESS) && content.contains(WIRED_INTERFACE) => {
            CheckResult::pass(NAME, format!("Static IP configured ({})", STATIC_ADDRESS))
        }
        Ok(_) => CheckResult::warn(NAME, "Config exists but may be incomplete"),
        Err(e) => CheckResult::warn(NAME, "Cannot read network config")
            .with_detail(format!("{}: {}", path.display(), e)),
    }
}

/// `wpa_supplicant.conf` has had its placeholder credentials replaced.
///
/// Advisory: a missing file only means wireless is unused.
pub fn wifi_config(paths: &BuildPaths) -> CheckResult {
    const NAME: &str = "WiFi Config";
    let path = paths.target().join("etc/wpa_supplicant.conf");

    match probe::stat(&path) {
        Presence::Absent => return CheckResult::warn(NAME, "wpa_supplicant.conf not found"),
        Presence::Inaccessible(e) => {
            return CheckResult::warn(NAME, "Cannot read wpa_supplicant.conf")
                .with_detail(format!("{}: {}", path.display(), e));
        }
        Presence::Present(_) => {}
    }

    match probe::read_text(&path) {
        Ok(content) if content.contains(PLACEHOLDER_SSID) => {
            CheckResult::warn(NAME, "Default credentials not changed")
        }
        Ok(_) => CheckResult::pass(NAME, "WiFi credentials configured"),
        Err(e) => CheckResult::warn(NAME, "Cannot read wpa_supplicant.conf")
            .with_detail(format!("{}: {}", path.display(), e)),
    }
}

/// Robotics startup script from the custom overlay reached the target.
pub fn custom_overlay(paths: &BuildPaths) -> CheckResult {
    const NAME: &str = "Custom Overlay";
    let path = paths.target().join("etc/init.d/S99robotics");

    match probe::stat(&path) {
        Presence::Present(_) => CheckResult::pass(NAME, "Robotics startup script present"),
        Presence::Absent => CheckResult::warn(NAME, "Startup script not found"),
        Presence::Inaccessible(e) => CheckResult::warn(NAME, "Startup script not found")
            .with_detail(format!("{}: {}", path.display(), e)),
    }
}
