//! Typed events received from the host.
//!
//! Every inbound message decodes into an [`InboundEvent`], which is either an
//! [`ActionEvent`] (addressed to one placed action through `action` and
//! `context`) or a [`PluginEvent`] (plugin-wide, no context). Unknown payload
//! fields are ignored and optional fields default, so newer hosts that add
//! fields keep decoding.

use serde::Deserialize;
use serde_json::Value;

/// Position of a key or dial on the device grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Coordinates {
    /// Zero-based column.
    pub column: u32,
    /// Zero-based row.
    pub row: u32,
}

/// Device grid dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct DeviceSize {
    /// Number of key columns.
    pub columns: u32,
    /// Number of key rows.
    pub rows: u32,
}

/// Payload shared by key, settings and appearance events.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActionPayload {
    /// Per-context settings persisted by the host.
    pub settings: Value,
    /// Grid position; absent inside multi-actions.
    pub coordinates: Option<Coordinates>,
    /// Current state index for multi-state actions.
    pub state: Option<u32>,
    /// State the user picked in a multi-action.
    pub user_desired_state: Option<u32>,
    /// `"Keypad"` or `"Encoder"`.
    pub controller: Option<String>,
    /// Whether the action is part of a multi-action.
    pub is_in_multi_action: bool,
}

/// Payload of `touchTap`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TouchTapPayload {
    /// Per-context settings.
    pub settings: Value,
    /// Encoder position.
    pub coordinates: Option<Coordinates>,
    /// Touch position `[x, y]` on the touch strip.
    pub tap_pos: Vec<i32>,
    /// Long touch.
    pub hold: bool,
}

/// Payload of `dialDown` / `dialUp` / `dialPress`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DialPayload {
    /// Per-context settings.
    pub settings: Value,
    /// Encoder position.
    pub coordinates: Option<Coordinates>,
    /// Controller kind, always `"Encoder"` in practice.
    pub controller: Option<String>,
    /// Set by `dialPress` only.
    pub pressed: Option<bool>,
}

/// Payload of `dialRotate`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DialRotatePayload {
    /// Per-context settings.
    pub settings: Value,
    /// Encoder position.
    pub coordinates: Option<Coordinates>,
    /// Signed tick count, negative for counter-clockwise.
    pub ticks: i32,
    /// Whether the dial was held down while rotating.
    pub pressed: bool,
}

/// Title rendering parameters.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TitleParameters {
    /// Font family.
    pub font_family: String,
    /// Font size in points.
    pub font_size: u32,
    /// Font style, e.g. `"Bold Italic"`.
    pub font_style: String,
    /// Underline flag.
    pub font_underline: bool,
    /// Whether the title is visible.
    pub show_title: bool,
    /// `"top"`, `"middle"` or `"bottom"`.
    pub title_alignment: String,
    /// Colour as `#RRGGBB`.
    pub title_color: String,
}

/// Payload of `titleParametersDidChange`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TitleParametersPayload {
    /// Per-context settings.
    pub settings: Value,
    /// Grid position.
    pub coordinates: Option<Coordinates>,
    /// Current state index.
    pub state: Option<u32>,
    /// New title text.
    pub title: String,
    /// New title rendering parameters.
    pub title_parameters: TitleParameters,
}

macro_rules! action_event {
    ($(#[$meta:meta])* $name:ident, $payload:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Deserialize)]
        pub struct $name {
            /// Action kind (plugin-declared UUID).
            pub action: String,
            /// Host-assigned identifier of the placed instance.
            pub context: String,
            /// Device identifier.
            #[serde(default)]
            pub device: Option<String>,
            /// Event-specific payload.
            #[serde(default)]
            pub payload: $payload,
        }
    };
}

action_event!(
    /// Per-context settings were delivered, usually after `getSettings`.
    DidReceiveSettings,
    ActionPayload
);
action_event!(
    /// A key was pressed.
    KeyDown,
    ActionPayload
);
action_event!(
    /// A key was released.
    KeyUp,
    ActionPayload
);
action_event!(
    /// The touch strip was tapped.
    TouchTap,
    TouchTapPayload
);
action_event!(
    /// A dial was pushed down.
    DialDown,
    DialPayload
);
action_event!(
    /// A dial was released.
    DialUp,
    DialPayload
);
action_event!(
    /// A dial was pressed or released (legacy form).
    DialPress,
    DialPayload
);
action_event!(
    /// A dial was rotated.
    DialRotate,
    DialRotatePayload
);
action_event!(
    /// An instance became visible.
    WillAppear,
    ActionPayload
);
action_event!(
    /// An instance is about to be hidden.
    WillDisappear,
    ActionPayload
);
action_event!(
    /// The user changed the title or its parameters.
    TitleParametersDidChange,
    TitleParametersPayload
);
action_event!(
    /// The property inspector opened.
    PropertyInspectorDidAppear,
    Value
);
action_event!(
    /// The property inspector closed.
    PropertyInspectorDidDisappear,
    Value
);
action_event!(
    /// The property inspector sent a message to the plugin.
    SendToPlugin,
    Value
);
action_event!(
    /// A message addressed to the property inspector was echoed to the plugin.
    SendToPropertyInspector,
    Value
);

/// Payload of `didReceiveGlobalSettings`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GlobalSettingsPayload {
    /// Plugin-wide settings.
    pub settings: Value,
}

/// Plugin-wide settings were delivered.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DidReceiveGlobalSettings {
    /// Settings payload.
    pub payload: GlobalSettingsPayload,
}

/// Device description sent with `deviceDidConnect`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DeviceInfo {
    /// User-visible device name.
    pub name: String,
    /// Numeric device type.
    #[serde(rename = "type")]
    pub device_type: u32,
    /// Key grid size.
    pub size: DeviceSize,
}

/// A device was plugged in.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDidConnect {
    /// Device identifier.
    pub device: String,
    /// Device description.
    #[serde(default)]
    pub device_info: DeviceInfo,
}

/// A device was unplugged.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeviceDidDisconnect {
    /// Device identifier.
    pub device: String,
}

/// Payload naming a monitored application.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApplicationPayload {
    /// Application bundle identifier or executable name.
    pub application: String,
}

/// A monitored application started.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApplicationDidLaunch {
    /// Application payload.
    pub payload: ApplicationPayload,
}

/// A monitored application exited.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApplicationDidTerminate {
    /// Application payload.
    pub payload: ApplicationPayload,
}

/// The computer woke up from sleep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SystemDidWakeUp {}

/// Payload of `didReceiveDeepLink`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeepLinkPayload {
    /// Deep-link URL, minus the plugin prefix.
    pub url: String,
}

/// The host forwarded a `streamdeck://` deep link to the plugin.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DidReceiveDeepLink {
    /// Link payload.
    pub payload: DeepLinkPayload,
}

/// Event addressed to one placed action instance.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum ActionEvent {
    DidReceiveSettings(DidReceiveSettings),
    KeyDown(KeyDown),
    KeyUp(KeyUp),
    TouchTap(TouchTap),
    DialDown(DialDown),
    DialUp(DialUp),
    DialPress(DialPress),
    DialRotate(DialRotate),
    WillAppear(WillAppear),
    WillDisappear(WillDisappear),
    TitleParametersDidChange(TitleParametersDidChange),
    PropertyInspectorDidAppear(PropertyInspectorDidAppear),
    PropertyInspectorDidDisappear(PropertyInspectorDidDisappear),
    SendToPlugin(SendToPlugin),
    SendToPropertyInspector(SendToPropertyInspector),
}

/// Plugin-wide event without an action context.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum PluginEvent {
    DidReceiveGlobalSettings(DidReceiveGlobalSettings),
    DeviceDidConnect(DeviceDidConnect),
    DeviceDidDisconnect(DeviceDidDisconnect),
    ApplicationDidLaunch(ApplicationDidLaunch),
    ApplicationDidTerminate(ApplicationDidTerminate),
    SystemDidWakeUp(SystemDidWakeUp),
    DidReceiveDeepLink(DidReceiveDeepLink),
}

/// Any decoded inbound event.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    /// Action-addressed event.
    Action(ActionEvent),
    /// Plugin-wide event.
    Plugin(PluginEvent),
}

macro_rules! action_fields {
    ($event:expr, |$e:ident| $body:expr) => {
        match $event {
            ActionEvent::DidReceiveSettings($e) => $body,
            ActionEvent::KeyDown($e) => $body,
            ActionEvent::KeyUp($e) => $body,
            ActionEvent::TouchTap($e) => $body,
            ActionEvent::DialDown($e) => $body,
            ActionEvent::DialUp($e) => $body,
            ActionEvent::DialPress($e) => $body,
            ActionEvent::DialRotate($e) => $body,
            ActionEvent::WillAppear($e) => $body,
            ActionEvent::WillDisappear($e) => $body,
            ActionEvent::TitleParametersDidChange($e) => $body,
            ActionEvent::PropertyInspectorDidAppear($e) => $body,
            ActionEvent::PropertyInspectorDidDisappear($e) => $body,
            ActionEvent::SendToPlugin($e) => $body,
            ActionEvent::SendToPropertyInspector($e) => $body,
        }
    };
}

impl ActionEvent {
    /// Action kind the event concerns.
    #[must_use]
    pub fn action(&self) -> &str {
        action_fields!(self, |e| e.action.as_str())
    }

    /// Host-assigned context of the placed instance.
    #[must_use]
    pub fn context(&self) -> &str {
        action_fields!(self, |e| e.context.as_str())
    }

    /// Device the instance lives on, when the host sent one.
    #[must_use]
    pub fn device(&self) -> Option<&str> {
        action_fields!(self, |e| e.device.as_deref())
    }
}

impl InboundEvent {
    /// Action kind, for action-addressed events.
    #[must_use]
    pub fn action(&self) -> Option<&str> {
        match self {
            Self::Action(event) => Some(event.action()),
            Self::Plugin(_) => None,
        }
    }

    /// Context, for action-addressed events.
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::Action(event) => Some(event.context()),
            Self::Plugin(_) => None,
        }
    }
}

macro_rules! into_inbound {
    ($variant:ident, $family:ident: $($name:ident),+ $(,)?) => {
        $(
            impl From<$name> for InboundEvent {
                fn from(event: $name) -> Self {
                    Self::$variant($family::$name(event))
                }
            }
        )+
    };
}

into_inbound!(Action, ActionEvent:
    DidReceiveSettings,
    KeyDown,
    KeyUp,
    TouchTap,
    DialDown,
    DialUp,
    DialPress,
    DialRotate,
    WillAppear,
    WillDisappear,
    TitleParametersDidChange,
    PropertyInspectorDidAppear,
    PropertyInspectorDidDisappear,
    SendToPlugin,
    SendToPropertyInspector,
);

into_inbound!(Plugin, PluginEvent:
    DidReceiveGlobalSettings,
    DeviceDidConnect,
    DeviceDidDisconnect,
    ApplicationDidLaunch,
    ApplicationDidTerminate,
    SystemDidWakeUp,
    DidReceiveDeepLink,
);

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn key_down_decodes_with_coordinates() {
        let raw = json!({
            "event": "keyDown",
            "action": "com.example.counter",
            "context": "ctx1",
            "device": "dev1",
            "payload": {
                "settings": {"count": 3},
                "coordinates": {"column": 2, "row": 1},
                "isInMultiAction": false
            }
        });
        let Ok(event) = serde_json::from_value::<KeyDown>(raw) else {
            panic!("keyDown should decode");
        };
        assert_eq!(event.context, "ctx1");
        assert_eq!(event.payload.coordinates, Some(Coordinates { column: 2, row: 1 }));
        assert_eq!(event.payload.settings.get("count"), Some(&json!(3)));
    }

    #[test]
    fn empty_payload_defaults() {
        let raw = json!({
            "event": "keyDown",
            "action": "com.example.counter",
            "context": "ctx1",
            "payload": {}
        });
        let Ok(event) = serde_json::from_value::<KeyDown>(raw) else {
            panic!("keyDown should decode");
        };
        assert!(event.device.is_none());
        assert!(event.payload.settings.is_null());
        assert!(!event.payload.is_in_multi_action);
    }

    #[test]
    fn action_event_without_context_fails() {
        let raw = json!({"event": "keyUp", "action": "com.example.counter"});
        assert!(serde_json::from_value::<KeyUp>(raw).is_err());
    }

    #[test]
    fn dial_rotate_reads_ticks() {
        let raw = json!({
            "action": "com.example.volume",
            "context": "ctx9",
            "payload": {"ticks": -2, "pressed": true}
        });
        let Ok(event) = serde_json::from_value::<DialRotate>(raw) else {
            panic!("dialRotate should decode");
        };
        assert_eq!(event.payload.ticks, -2);
        assert!(event.payload.pressed);
    }

    #[test]
    fn device_did_connect_reads_info() {
        let raw = json!({
            "event": "deviceDidConnect",
            "device": "dev1",
            "deviceInfo": {"name": "Stream Deck", "type": 0, "size": {"columns": 5, "rows": 3}}
        });
        let Ok(event) = serde_json::from_value::<DeviceDidConnect>(raw) else {
            panic!("deviceDidConnect should decode");
        };
        assert_eq!(event.device_info.size, DeviceSize { columns: 5, rows: 3 });
    }

    #[test]
    fn inbound_accessors_follow_family() {
        let key: InboundEvent = KeyUp {
            action: "a".to_string(),
            context: "c".to_string(),
            device: Some("d".to_string()),
            payload: ActionPayload::default(),
        }
        .into();
        assert_eq!(key.action(), Some("a"));
        assert_eq!(key.context(), Some("c"));

        let wake: InboundEvent = SystemDidWakeUp {}.into();
        assert!(wake.action().is_none());
        assert!(wake.context().is_none());
    }

    #[test]
    fn conversions_land_in_their_family() {
        let link: InboundEvent = DidReceiveDeepLink {
            payload: DeepLinkPayload {
                url: "streamdeck://plugins/message/com.example/hi".to_string(),
            },
        }
        .into();
        assert!(matches!(
            link,
            InboundEvent::Plugin(PluginEvent::DidReceiveDeepLink(_))
        ));

        let appear: InboundEvent = WillAppear {
            action: "a".to_string(),
            context: "c".to_string(),
            device: None,
            payload: ActionPayload::default(),
        }
        .into();
        assert!(matches!(
            appear,
            InboundEvent::Action(ActionEvent::WillAppear(_))
        ));
    }
}
