//! Commands sent from the plugin to the host.
//!
//! Every command shares one envelope,
//! `{"event", "action"?, "context"?, "device"?, "payload"?}`; absent fields
//! are left out of the JSON. The constructors on [`Command`] cover the host's
//! command set; [`Command::new`] builds anything else.

use serde::{Serialize, Serializer};
use serde_json::Value;

/// Which display a title or image change applies to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Target {
    /// Hardware and software.
    #[default]
    Both,
    /// Physical device only.
    Hardware,
    /// Host UI only.
    Software,
}

impl Serialize for Target {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let code: u8 = match self {
            Self::Both => 0,
            Self::Hardware => 1,
            Self::Software => 2,
        };
        serializer.serialize_u8(code)
    }
}

/// Payload of `setTitle`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SetTitlePayload {
    /// New title; `None` restores the user's title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Display target.
    pub target: Target,
    /// State index to change; `None` changes all states.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<u32>,
}

/// Payload of `setImage`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SetImagePayload {
    /// Base64 data URL or SVG; `None` restores the manifest image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Display target.
    pub target: Target,
    /// State index to change; `None` changes all states.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<u32>,
}

/// Generic outbound command envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Command {
    /// Command name.
    pub event: String,
    /// Action kind, only for `sendToPropertyInspector`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Instance context or plugin UUID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Device identifier, only for `switchToProfile`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    /// Command payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl Command {
    /// Creates a bare command with only the event name set.
    #[must_use]
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            action: None,
            context: None,
            device: None,
            payload: None,
        }
    }

    /// Sets the `context` field.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Sets the `action` field.
    #[must_use]
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Sets the `device` field.
    #[must_use]
    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = Some(device.into());
        self
    }

    /// Sets the `payload` field.
    #[must_use]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// `setSettings`: persist per-context settings.
    #[must_use]
    pub fn set_settings(context: &str, settings: Value) -> Self {
        Self::new("setSettings")
            .with_context(context)
            .with_payload(settings)
    }

    /// `getSettings`: ask for a `didReceiveSettings` reply.
    #[must_use]
    pub fn get_settings(context: &str) -> Self {
        Self::new("getSettings").with_context(context)
    }

    /// `setGlobalSettings`: persist plugin-wide settings.
    #[must_use]
    pub fn set_global_settings(plugin_uuid: &str, settings: Value) -> Self {
        Self::new("setGlobalSettings")
            .with_context(plugin_uuid)
            .with_payload(settings)
    }

    /// `getGlobalSettings`: ask for a `didReceiveGlobalSettings` reply.
    #[must_use]
    pub fn get_global_settings(plugin_uuid: &str) -> Self {
        Self::new("getGlobalSettings").with_context(plugin_uuid)
    }

    /// `openUrl`: open a URL in the default browser.
    #[must_use]
    pub fn open_url(url: &str) -> Self {
        Self::new("openUrl").with_payload(serde_json::json!({ "url": url }))
    }

    /// `logMessage`: write a line to the host's plugin log.
    #[must_use]
    pub fn log_message(message: &str) -> Self {
        Self::new("logMessage").with_payload(serde_json::json!({ "message": message }))
    }

    /// `setTitle`.
    #[must_use]
    pub fn set_title(context: &str, payload: &SetTitlePayload) -> Self {
        Self::new("setTitle")
            .with_context(context)
            .with_payload(to_payload(payload))
    }

    /// `setImage`.
    #[must_use]
    pub fn set_image(context: &str, payload: &SetImagePayload) -> Self {
        Self::new("setImage")
            .with_context(context)
            .with_payload(to_payload(payload))
    }

    /// `setFeedback`: update touch-strip layout items.
    #[must_use]
    pub fn set_feedback(context: &str, feedback: Value) -> Self {
        Self::new("setFeedback")
            .with_context(context)
            .with_payload(feedback)
    }

    /// `setFeedbackLayout`: switch the touch-strip layout.
    #[must_use]
    pub fn set_feedback_layout(context: &str, layout: &str) -> Self {
        Self::new("setFeedbackLayout")
            .with_context(context)
            .with_payload(serde_json::json!({ "layout": layout }))
    }

    /// `showAlert`: flash the warning triangle.
    #[must_use]
    pub fn show_alert(context: &str) -> Self {
        Self::new("showAlert").with_context(context)
    }

    /// `showOk`: flash the check mark.
    #[must_use]
    pub fn show_ok(context: &str) -> Self {
        Self::new("showOk").with_context(context)
    }

    /// `setState`: switch a multi-state action.
    #[must_use]
    pub fn set_state(context: &str, state: u32) -> Self {
        Self::new("setState")
            .with_context(context)
            .with_payload(serde_json::json!({ "state": state }))
    }

    /// `switchToProfile`: switch the device to a bundled profile.
    #[must_use]
    pub fn switch_to_profile(plugin_uuid: &str, device: &str, profile: &str) -> Self {
        Self::new("switchToProfile")
            .with_context(plugin_uuid)
            .with_device(device)
            .with_payload(serde_json::json!({ "profile": profile }))
    }

    /// `sendToPropertyInspector`.
    #[must_use]
    pub fn send_to_property_inspector(action: &str, context: &str, payload: Value) -> Self {
        Self::new("sendToPropertyInspector")
            .with_action(action)
            .with_context(context)
            .with_payload(payload)
    }
}

/// Serializes a typed payload. The payload types here contain only strings,
/// integers and options, so conversion cannot fail.
fn to_payload<T: Serialize>(payload: &T) -> Value {
    serde_json::to_value(payload).unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    fn to_json(cmd: &Command) -> Value {
        let Ok(text) = serde_json::to_string(cmd) else {
            panic!("serialization failed");
        };
        let Ok(value) = serde_json::from_str(&text) else {
            panic!("output is not JSON");
        };
        value
    }

    #[test]
    fn set_settings_carries_context_and_payload() {
        let cmd = Command::set_settings("ctx1", json!({"count": 4}));
        assert_eq!(
            to_json(&cmd),
            json!({"event": "setSettings", "context": "ctx1", "payload": {"count": 4}})
        );
    }

    #[test]
    fn absent_fields_are_omitted() {
        let value = to_json(&Command::show_ok("ctx1"));
        assert_eq!(value, json!({"event": "showOk", "context": "ctx1"}));
    }

    #[test]
    fn set_title_serializes_target_as_integer() {
        let payload = SetTitlePayload {
            title: Some("7".to_string()),
            target: Target::Hardware,
            state: None,
        };
        let value = to_json(&Command::set_title("ctx2", &payload));
        assert_eq!(
            value,
            json!({"event": "setTitle", "context": "ctx2", "payload": {"title": "7", "target": 1}})
        );
    }

    #[test]
    fn set_image_with_state() {
        let payload = SetImagePayload {
            image: Some("data:image/png;base64,AAAA".to_string()),
            target: Target::Software,
            state: Some(1),
        };
        let value = to_json(&Command::set_image("ctx3", &payload));
        assert_eq!(value.get("payload").and_then(|p| p.get("target")), Some(&json!(2)));
        assert_eq!(value.get("payload").and_then(|p| p.get("state")), Some(&json!(1)));
    }

    #[test]
    fn switch_to_profile_includes_device() {
        let value = to_json(&Command::switch_to_profile("plugin", "DEV1", "Gaming"));
        assert_eq!(
            value,
            json!({
                "event": "switchToProfile",
                "context": "plugin",
                "device": "DEV1",
                "payload": {"profile": "Gaming"}
            })
        );
    }

    #[test]
    fn property_inspector_message_names_action() {
        let value = to_json(&Command::send_to_property_inspector(
            "com.example.counter",
            "ctx1",
            json!({"ready": true}),
        ));
        assert_eq!(value.get("action"), Some(&json!("com.example.counter")));
        assert_eq!(value.get("payload"), Some(&json!({"ready": true})));
    }

    #[test]
    fn open_url_has_no_context() {
        let value = to_json(&Command::open_url("https://example.com"));
        assert!(value.get("context").is_none());
        assert_eq!(
            value.get("payload"),
            Some(&json!({"url": "https://example.com"}))
        );
    }
}
