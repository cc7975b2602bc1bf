//! Launch state shared by the session and every handler.

use std::sync::Arc;

use crate::config::LaunchArgs;
use crate::domain::{RegistrationInfo, RegistrationMessage};
use crate::error::SdkError;

/// Identity and connection details handed to the plugin at launch.
///
/// Built once from the launch arguments and immutable afterwards.
#[derive(Debug, Clone)]
pub struct PluginState {
    /// Host WebSocket port.
    pub port: u16,
    /// Host-assigned plugin UUID.
    pub plugin_uuid: String,
    /// Handshake command name.
    pub register_event: String,
    /// Registration metadata.
    pub info: Arc<RegistrationInfo>,
}

impl PluginState {
    /// Builds the state from parsed launch arguments.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::InvalidRegistrationInfo`] if `-info` is not valid
    /// registration JSON.
    pub fn from_args(args: &LaunchArgs) -> Result<Self, SdkError> {
        let info = RegistrationInfo::from_json(&args.info).map_err(SdkError::InvalidRegistrationInfo)?;
        tracing::debug!(
            port = args.port,
            plugin_uuid = %args.plugin_uuid,
            register_event = %args.register_event,
            platform = %info.application.platform,
            "launch arguments parsed"
        );
        Ok(Self {
            port: args.port,
            plugin_uuid: args.plugin_uuid.clone(),
            register_event: args.register_event.clone(),
            info: Arc::new(info),
        })
    }

    /// The mandatory first frame sent after the connection opens.
    #[must_use]
    pub fn registration_message(&self) -> RegistrationMessage {
        RegistrationMessage {
            event: self.register_event.clone(),
            uuid: self.plugin_uuid.clone(),
        }
    }

    /// Host WebSocket URL.
    #[must_use]
    pub fn websocket_url(&self) -> String {
        format!("ws://localhost:{}", self.port)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn args(info: &str) -> LaunchArgs {
        LaunchArgs {
            port: 28196,
            plugin_uuid: "ABC".to_string(),
            register_event: "registerPlugin".to_string(),
            info: info.to_string(),
        }
    }

    #[test]
    fn builds_registration_and_url() {
        let Ok(state) = PluginState::from_args(&args(r#"{"plugin":{"uuid":"com.example"}}"#)) else {
            panic!("state should build");
        };
        assert_eq!(state.websocket_url(), "ws://localhost:28196");
        assert_eq!(
            state.registration_message(),
            RegistrationMessage {
                event: "registerPlugin".to_string(),
                uuid: "ABC".to_string(),
            }
        );
        assert_eq!(state.info.plugin.uuid, "com.example");
    }

    #[test]
    fn invalid_info_is_fatal() {
        let result = PluginState::from_args(&args("{"));
        let Err(err) = result else {
            panic!("expected invalid info");
        };
        assert!(matches!(err, SdkError::InvalidRegistrationInfo(_)));
        assert!(err.is_fatal());
    }
}
