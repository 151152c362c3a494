//! Best-effort device naming.
//!
//! Derives a human-readable label for this machine so other
//! participants see "ThinkPad X1 Carbon" instead of an opaque id. The
//! label is requested once at connection time and never persisted.
//!
//! Strategies run in a fixed order and every failure falls through to
//! the next one; the chain as a whole cannot fail. Suppressed errors
//! are logged at debug level rather than discarded.

use std::path::Path;

const DMI_PRODUCT_NAME: &str = "/sys/devices/virtual/dmi/id/product_name";
const ANDROID_BUILD_PROP: &str = "/system/build.prop";

/// Detect a display label for the current device.
///
/// Tries, in order: the firmware product name, Android build
/// properties, Apple model and chip detection, a fixed per-OS label,
/// and finally `"Unknown Device"`.
pub async fn detect() -> String {
    if let Some(name) = dmi_product_name().await {
        return name;
    }
    if let Some(name) = android_model().await {
        return name;
    }
    if let Some(name) = apple_model().await {
        return name;
    }
    if let Some(name) = os_family_label() {
        return name;
    }
    "Unknown Device".to_owned()
}

/// Firmware product name from the DMI tree, e.g. `"20KHCTO1WW"` or
/// `"ThinkPad X1 Carbon 6th"`. The closest native analog of the
/// browser's high-entropy `model` hint.
async fn dmi_product_name() -> Option<String> {
    match tokio::fs::read_to_string(DMI_PRODUCT_NAME).await {
        Ok(raw) => {
            let name = raw.trim();
            // Some firmware ships placeholder strings here.
            if name.is_empty() || name.eq_ignore_ascii_case("to be filled by o.e.m.") {
                None
            } else {
                Some(name.to_owned())
            }
        },
        Err(e) => {
            tracing::debug!(error = %e, "no DMI product name");
            None
        },
    }
}

/// Android device model from `/system/build.prop`, or a generic label
/// when the device is recognizably Android but the model is not
/// readable.
async fn android_model() -> Option<String> {
    let looks_android =
        std::env::var_os("ANDROID_ROOT").is_some() || Path::new(ANDROID_BUILD_PROP).exists();
    if !looks_android {
        return None;
    }

    match tokio::fs::read_to_string(ANDROID_BUILD_PROP).await {
        Ok(props) => Some(
            parse_android_model(&props).unwrap_or_else(|| "Android Device".to_owned()),
        ),
        Err(e) => {
            tracing::debug!(error = %e, "android build.prop unreadable");
            Some("Android Device".to_owned())
        },
    }
}

/// Extract `ro.product.model` from build.prop contents.
fn parse_android_model(props: &str) -> Option<String> {
    props
        .lines()
        .filter_map(|line| line.strip_prefix("ro.product.model="))
        .map(str::trim)
        .find(|model| !model.is_empty())
        .map(str::to_owned)
}

/// Apple hardware label: a base name from the model identifier,
/// enriched with a parenthetical chip hint when one can be matched.
async fn apple_model() -> Option<String> {
    if std::env::consts::OS != "macos" {
        return None;
    }

    let model = sysctl("hw.model").await;
    let mut base = model.as_deref().map_or("Mac", apple_base_label).to_owned();

    // Chip hint is an enrichment only; append on match, skip otherwise.
    if let Some(brand) = sysctl("machdep.cpu.brand_string").await {
        if let Some(chip) = parse_apple_chip(&brand) {
            base.push_str(&format!(" ({chip})"));
        }
    }
    Some(base)
}

/// Map a model identifier like `MacBookPro18,3` to a base label.
fn apple_base_label(model: &str) -> &'static str {
    if model.starts_with("MacBookPro") {
        "MacBook Pro"
    } else if model.starts_with("MacBookAir") {
        "MacBook Air"
    } else if model.starts_with("MacBook") {
        "MacBook"
    } else if model.starts_with("iMac") {
        "iMac"
    } else if model.starts_with("Macmini") {
        "Mac mini"
    } else {
        "Mac"
    }
}

/// Match an Apple Silicon generation marker (`Apple M1`, `Apple M2
/// Pro`, ...) in a CPU brand string.
fn parse_apple_chip(brand: &str) -> Option<String> {
    let rest = brand.split("Apple M").nth(1)?;
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() { None } else { Some(format!("M{digits}")) }
}

async fn sysctl(key: &str) -> Option<String> {
    let output =
        match tokio::process::Command::new("sysctl").arg("-n").arg(key).output().await {
            Ok(output) => output,
            Err(e) => {
                tracing::debug!(key, error = %e, "sysctl failed");
                return None;
            },
        };
    if !output.status.success() {
        tracing::debug!(key, status = %output.status, "sysctl returned non-zero");
        return None;
    }
    let value = String::from_utf8_lossy(&output.stdout).trim().to_owned();
    if value.is_empty() { None } else { Some(value) }
}

/// Fixed label per OS family.
fn os_family_label() -> Option<String> {
    match std::env::consts::OS {
        "windows" => Some("Windows PC".to_owned()),
        "macos" => Some("Mac".to_owned()),
        "linux" => Some("Linux PC".to_owned()),
        _ => None,
    }
}
