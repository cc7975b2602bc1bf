//! Registration metadata and the handshake message.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::events::DeviceSize;

/// Host application details from the `-info` launch argument.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicationInfo {
    /// UI font.
    pub font: String,
    /// UI language code, e.g. `"en"`.
    pub language: String,
    /// `"mac"` or `"windows"`.
    pub platform: String,
    /// Operating system version.
    pub platform_version: String,
    /// Host application version.
    pub version: String,
}

/// Plugin identity as the host sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PluginInfo {
    /// Plugin UUID from the manifest.
    pub uuid: String,
    /// Plugin version from the manifest.
    pub version: String,
}

/// A device known to the host at launch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegisteredDevice {
    /// Device identifier, matches the `device` field of events.
    pub id: String,
    /// User-visible name.
    pub name: String,
    /// Key grid size.
    pub size: DeviceSize,
    /// Numeric device type.
    #[serde(rename = "type")]
    pub device_type: u32,
}

/// Registration metadata passed by the host in `-info`.
///
/// Every field defaults when absent so older and newer hosts both parse.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationInfo {
    /// Host application details.
    pub application: ApplicationInfo,
    /// Plugin identity.
    pub plugin: PluginInfo,
    /// 2 on high-DPI displays.
    pub device_pixel_ratio: f64,
    /// System colours, name → `#RRGGBBAA`.
    pub colors: HashMap<String, String>,
    /// Devices connected at launch.
    pub devices: Vec<RegisteredDevice>,
}

impl RegistrationInfo {
    /// Parses the raw `-info` JSON string.
    ///
    /// # Errors
    ///
    /// Returns the [`serde_json::Error`] when the text is not a JSON object
    /// of the expected shape.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Looks up a launch-time device by identifier.
    #[must_use]
    pub fn device(&self, id: &str) -> Option<&RegisteredDevice> {
        self.devices.iter().find(|d| d.id == id)
    }
}

/// The mandatory first frame: `{"event": <registerEvent>, "uuid": <pluginUUID>}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationMessage {
    /// Handshake command name given by the host.
    pub event: String,
    /// Plugin UUID given by the host.
    pub uuid: String,
}
