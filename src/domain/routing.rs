//! Static routing table: event name → handler, decoder and scope.
//!
//! The table is the single place that knows which wire events exist. The
//! session looks up an [`EventRoute`] by the `event` field, decodes through
//! it, then routes according to [`RouteScope`].

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::events::{
    ApplicationDidLaunch, ApplicationDidTerminate, DeviceDidConnect, DeviceDidDisconnect,
    DialDown, DialPress, DialRotate, DialUp, DidReceiveDeepLink, DidReceiveGlobalSettings,
    DidReceiveSettings, InboundEvent, KeyDown, KeyUp, PropertyInspectorDidAppear,
    PropertyInspectorDidDisappear, SendToPlugin, SendToPropertyInspector, SystemDidWakeUp,
    TitleParametersDidChange, TouchTap, WillAppear, WillDisappear,
};

/// Where an event is delivered after the plugin-level handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteScope {
    /// Plugin-level handler only.
    PluginOnly,
    /// Plugin-level handler, then the action instance named by `action`.
    ActionScoped,
    /// Plugin-level handler, then every action instance.
    PluginBroadcast,
}

type Decoder = fn(Value) -> Result<InboundEvent, serde_json::Error>;

/// Routing metadata for one wire event.
#[derive(Debug, Clone, Copy)]
pub struct EventRoute {
    /// Wire value of the `event` field.
    pub event_name: &'static str,
    /// Handler method the event is delivered to.
    pub handler_name: &'static str,
    /// Delivery scope.
    pub scope: RouteScope,
    decoder: Decoder,
}

impl EventRoute {
    /// Decodes a raw message into its typed event.
    ///
    /// # Errors
    ///
    /// Returns the [`serde_json::Error`] when the message does not match the
    /// event schema.
    pub fn decode(&self, raw: Value) -> Result<InboundEvent, serde_json::Error> {
        (self.decoder)(raw)
    }
}

fn decode<T>(raw: Value) -> Result<InboundEvent, serde_json::Error>
where
    T: DeserializeOwned + Into<InboundEvent>,
{
    serde_json::from_value::<T>(raw).map(Into::into)
}

macro_rules! route {
    ($event:literal, $handler:literal, $scope:ident, $ty:ty) => {
        EventRoute {
            event_name: $event,
            handler_name: $handler,
            scope: RouteScope::$scope,
            decoder: decode::<$ty>,
        }
    };
}

/// Every event the host can send.
pub static ROUTES: &[EventRoute] = &[
    route!("didReceiveSettings", "on_did_receive_settings", ActionScoped, DidReceiveSettings),
    route!("keyDown", "on_key_down", ActionScoped, KeyDown),
    route!("keyUp", "on_key_up", ActionScoped, KeyUp),
    route!("touchTap", "on_touch_tap", ActionScoped, TouchTap),
    route!("dialDown", "on_dial_down", ActionScoped, DialDown),
    route!("dialUp", "on_dial_up", ActionScoped, DialUp),
    route!("dialPress", "on_dial_press", ActionScoped, DialPress),
    route!("dialRotate", "on_dial_rotate", ActionScoped, DialRotate),
    route!("willAppear", "on_will_appear", ActionScoped, WillAppear),
    route!("willDisappear", "on_will_disappear", ActionScoped, WillDisappear),
    route!(
        "titleParametersDidChange",
        "on_title_parameters_did_change",
        ActionScoped,
        TitleParametersDidChange
    ),
    route!(
        "propertyInspectorDidAppear",
        "on_property_inspector_did_appear",
        ActionScoped,
        PropertyInspectorDidAppear
    ),
    route!(
        "propertyInspectorDidDisappear",
        "on_property_inspector_did_disappear",
        ActionScoped,
        PropertyInspectorDidDisappear
    ),
    route!("sendToPlugin", "on_send_to_plugin", ActionScoped, SendToPlugin),
    route!(
        "sendToPropertyInspector",
        "on_send_to_property_inspector",
        ActionScoped,
        SendToPropertyInspector
    ),
    route!(
        "didReceiveGlobalSettings",
        "on_did_receive_global_settings",
        PluginBroadcast,
        DidReceiveGlobalSettings
    ),
    route!("deviceDidConnect", "on_device_did_connect", PluginBroadcast, DeviceDidConnect),
    route!(
        "deviceDidDisconnect",
        "on_device_did_disconnect",
        PluginBroadcast,
        DeviceDidDisconnect
    ),
    route!(
        "applicationDidLaunch",
        "on_application_did_launch",
        PluginBroadcast,
        ApplicationDidLaunch
    ),
    route!(
        "applicationDidTerminate",
        "on_application_did_terminate",
        PluginBroadcast,
        ApplicationDidTerminate
    ),
    route!("systemDidWakeUp", "on_system_did_wake_up", PluginBroadcast, SystemDidWakeUp),
    route!("didReceiveDeepLink", "on_did_receive_deep_link", PluginOnly, DidReceiveDeepLink),
];

/// Finds the routing entry for a wire event name.
#[must_use]
pub fn lookup(event_name: &str) -> Option<&'static EventRoute> {
    ROUTES.iter().find(|route| route.event_name == event_name)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::collections::HashSet;

    use serde_json::json;

    use super::*;
    use crate::domain::events::{ActionEvent, PluginEvent};

    #[test]
    fn event_names_are_unique() {
        let names: HashSet<_> = ROUTES.iter().map(|r| r.event_name).collect();
        assert_eq!(names.len(), ROUTES.len());
    }

    #[test]
    fn unknown_event_has_no_route() {
        assert!(lookup("brandNewEvent").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn key_down_is_action_scoped() {
        let Some(route) = lookup("keyDown") else {
            panic!("keyDown must be routed");
        };
        assert_eq!(route.scope, RouteScope::ActionScoped);
        assert_eq!(route.handler_name, "on_key_down");
    }

    #[test]
    fn application_launch_is_broadcast() {
        let Some(route) = lookup("applicationDidLaunch") else {
            panic!("applicationDidLaunch must be routed");
        };
        assert_eq!(route.scope, RouteScope::PluginBroadcast);
    }

    #[test]
    fn action_scoped_routes_decode_to_action_events() {
        let raw = json!({"action": "a", "context": "c", "payload": {}});
        for route in ROUTES.iter().filter(|r| r.scope == RouteScope::ActionScoped) {
            let Ok(event) = route.decode(raw.clone()) else {
                panic!("{} should decode a minimal action message", route.event_name);
            };
            assert!(
                matches!(event, InboundEvent::Action(_)),
                "{} decoded to the wrong family",
                route.event_name
            );
        }
    }

    #[test]
    fn decoder_matches_event_name() {
        let Some(route) = lookup("keyUp") else {
            panic!("keyUp must be routed");
        };
        let raw = json!({"event": "keyUp", "action": "a", "context": "c"});
        let Ok(InboundEvent::Action(ActionEvent::KeyUp(event))) = route.decode(raw) else {
            panic!("keyUp should decode to KeyUp");
        };
        assert_eq!(event.context, "c");
    }

    #[test]
    fn deep_link_is_plugin_only() {
        let Some(route) = lookup("didReceiveDeepLink") else {
            panic!("didReceiveDeepLink must be routed");
        };
        assert_eq!(route.scope, RouteScope::PluginOnly);
        let raw = json!({"event": "didReceiveDeepLink", "payload": {"url": "/open?x=1"}});
        let Ok(InboundEvent::Plugin(PluginEvent::DidReceiveDeepLink(link))) = route.decode(raw)
        else {
            panic!("deep link should decode");
        };
        assert_eq!(link.payload.url, "/open?x=1");
    }

    #[test]
    fn decode_failure_is_reported() {
        let Some(route) = lookup("applicationDidLaunch") else {
            panic!("applicationDidLaunch must be routed");
        };
        assert!(route.decode(json!({"payload": {}})).is_err());
    }
}
