//! Event dispatcher: delivers decoded events to handler methods.
//!
//! Every event reaches the plugin-level handler first. The route's
//! [`RouteScope`] then decides whether one action instance, every instance,
//! or nobody else receives it. A handler that returns `Err` is logged and
//! routing continues; nothing a handler does can stop the session.

use crate::domain::events::{ActionEvent, InboundEvent, PluginEvent};
use crate::domain::{EventRoute, RouteScope};
use crate::error::SdkError;
use crate::handler::{Action, ActionContext, ActionRegistry, HandlerResult, Plugin, PluginContext};

/// Routes decoded events to the plugin handler and the action registry.
#[derive(Debug)]
pub struct Dispatcher {
    registry: ActionRegistry,
    cx: PluginContext,
}

impl Dispatcher {
    /// Creates a dispatcher over a wired registry.
    #[must_use]
    pub fn new(registry: ActionRegistry, cx: PluginContext) -> Self {
        Self { registry, cx }
    }

    /// The plugin-wide context handed to handlers.
    #[must_use]
    pub fn context(&self) -> &PluginContext {
        &self.cx
    }

    /// The wired action registry.
    #[must_use]
    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Routes one event: plugin handler first, then by scope.
    ///
    /// Returns the number of handler methods invoked.
    ///
    /// # Errors
    ///
    /// Propagates the scope-specific errors of [`Self::route_to_action`] and
    /// [`Self::broadcast_to_actions`]. The plugin handler has already run
    /// when they are returned.
    pub fn dispatch(
        &mut self,
        plugin: &mut dyn Plugin,
        route: &EventRoute,
        event: &InboundEvent,
    ) -> Result<usize, SdkError> {
        let plugin_calls = self.route_to_plugin(plugin, route, event);
        let action_calls = match route.scope {
            RouteScope::PluginOnly => 0,
            RouteScope::ActionScoped => self.route_to_action(route, event)?,
            RouteScope::PluginBroadcast => self.broadcast_to_actions(route, event)?,
        };
        Ok(plugin_calls + action_calls)
    }

    /// Delivers `event` to the plugin-level handler. Always invokes exactly
    /// one method.
    pub fn route_to_plugin(
        &self,
        plugin: &mut dyn Plugin,
        route: &EventRoute,
        event: &InboundEvent,
    ) -> usize {
        let cx = &self.cx;
        let result = match event {
            InboundEvent::Action(event) => match event {
                ActionEvent::DidReceiveSettings(e) => plugin.on_did_receive_settings(cx, e),
                ActionEvent::KeyDown(e) => plugin.on_key_down(cx, e),
                ActionEvent::KeyUp(e) => plugin.on_key_up(cx, e),
                ActionEvent::TouchTap(e) => plugin.on_touch_tap(cx, e),
                ActionEvent::DialDown(e) => plugin.on_dial_down(cx, e),
                ActionEvent::DialUp(e) => plugin.on_dial_up(cx, e),
                ActionEvent::DialPress(e) => plugin.on_dial_press(cx, e),
                ActionEvent::DialRotate(e) => plugin.on_dial_rotate(cx, e),
                ActionEvent::WillAppear(e) => plugin.on_will_appear(cx, e),
                ActionEvent::WillDisappear(e) => plugin.on_will_disappear(cx, e),
                ActionEvent::TitleParametersDidChange(e) => {
                    plugin.on_title_parameters_did_change(cx, e)
                }
                ActionEvent::PropertyInspectorDidAppear(e) => {
                    plugin.on_property_inspector_did_appear(cx, e)
                }
                ActionEvent::PropertyInspectorDidDisappear(e) => {
                    plugin.on_property_inspector_did_disappear(cx, e)
                }
                ActionEvent::SendToPlugin(e) => plugin.on_send_to_plugin(cx, e),
                ActionEvent::SendToPropertyInspector(e) => {
                    plugin.on_send_to_property_inspector(cx, e)
                }
            },
            InboundEvent::Plugin(event) => match event {
                PluginEvent::DidReceiveGlobalSettings(e) => {
                    plugin.on_did_receive_global_settings(cx, e)
                }
                PluginEvent::DeviceDidConnect(e) => plugin.on_device_did_connect(cx, e),
                PluginEvent::DeviceDidDisconnect(e) => plugin.on_device_did_disconnect(cx, e),
                PluginEvent::ApplicationDidLaunch(e) => plugin.on_application_did_launch(cx, e),
                PluginEvent::ApplicationDidTerminate(e) => {
                    plugin.on_application_did_terminate(cx, e)
                }
                PluginEvent::SystemDidWakeUp(e) => plugin.on_system_did_wake_up(cx, e),
                PluginEvent::DidReceiveDeepLink(e) => plugin.on_did_receive_deep_link(cx, e),
            },
        };
        report(route, "plugin", result);
        1
    }

    /// Delivers an action-addressed event to the instance registered for its
    /// `action` field.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::MissingActionField`] if `event` is not
    /// action-addressed, or [`SdkError::UnregisteredTarget`] if no instance
    /// is registered for the action kind.
    pub fn route_to_action(
        &mut self,
        route: &EventRoute,
        event: &InboundEvent,
    ) -> Result<usize, SdkError> {
        let InboundEvent::Action(event) = event else {
            return Err(SdkError::MissingActionField {
                event: route.event_name.to_string(),
            });
        };
        let kind = event.action();
        let Some(instance) = self.registry.get_mut(kind) else {
            return Err(SdkError::UnregisteredTarget(kind.to_string()));
        };
        let cx = self.cx.for_event(event);
        let result = deliver_to_action(instance, &cx, event);
        report(route, kind, result);
        Ok(1)
    }

    /// Delivers a plugin-wide event to every instance in declaration order.
    /// A failing handler does not stop the remaining deliveries.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::ScopeMismatch`] if `event` is not one of the
    /// broadcast events.
    pub fn broadcast_to_actions(
        &mut self,
        route: &EventRoute,
        event: &InboundEvent,
    ) -> Result<usize, SdkError> {
        let InboundEvent::Plugin(event) = event else {
            return Err(scope_mismatch(route));
        };
        if matches!(event, PluginEvent::DidReceiveDeepLink(_)) {
            return Err(scope_mismatch(route));
        }

        let cx = &self.cx;
        let mut delivered = 0;
        for instance in self.registry.iter_mut() {
            if let Some(result) = deliver_broadcast(instance, cx, event) {
                report(route, instance.uuid(), result);
                delivered += 1;
            }
        }
        Ok(delivered)
    }
}

fn deliver_to_action(instance: &mut dyn Action, cx: &ActionContext, event: &ActionEvent) -> HandlerResult {
    match event {
        ActionEvent::DidReceiveSettings(e) => instance.on_did_receive_settings(cx, e),
        ActionEvent::KeyDown(e) => instance.on_key_down(cx, e),
        ActionEvent::KeyUp(e) => instance.on_key_up(cx, e),
        ActionEvent::TouchTap(e) => instance.on_touch_tap(cx, e),
        ActionEvent::DialDown(e) => instance.on_dial_down(cx, e),
        ActionEvent::DialUp(e) => instance.on_dial_up(cx, e),
        ActionEvent::DialPress(e) => instance.on_dial_press(cx, e),
        ActionEvent::DialRotate(e) => instance.on_dial_rotate(cx, e),
        ActionEvent::WillAppear(e) => instance.on_will_appear(cx, e),
        ActionEvent::WillDisappear(e) => instance.on_will_disappear(cx, e),
        ActionEvent::TitleParametersDidChange(e) => instance.on_title_parameters_did_change(cx, e),
        ActionEvent::PropertyInspectorDidAppear(e) => {
            instance.on_property_inspector_did_appear(cx, e)
        }
        ActionEvent::PropertyInspectorDidDisappear(e) => {
            instance.on_property_inspector_did_disappear(cx, e)
        }
        ActionEvent::SendToPlugin(e) => instance.on_send_to_plugin(cx, e),
        ActionEvent::SendToPropertyInspector(e) => instance.on_send_to_property_inspector(cx, e),
    }
}

/// Returns `None` for events actions never receive.
fn deliver_broadcast(
    instance: &mut dyn Action,
    cx: &PluginContext,
    event: &PluginEvent,
) -> Option<HandlerResult> {
    let result = match event {
        PluginEvent::DidReceiveGlobalSettings(e) => instance.on_did_receive_global_settings(cx, e),
        PluginEvent::DeviceDidConnect(e) => instance.on_device_did_connect(cx, e),
        PluginEvent::DeviceDidDisconnect(e) => instance.on_device_did_disconnect(cx, e),
        PluginEvent::ApplicationDidLaunch(e) => instance.on_application_did_launch(cx, e),
        PluginEvent::ApplicationDidTerminate(e) => instance.on_application_did_terminate(cx, e),
        PluginEvent::SystemDidWakeUp(e) => instance.on_system_did_wake_up(cx, e),
        PluginEvent::DidReceiveDeepLink(_) => return None,
    };
    Some(result)
}

fn scope_mismatch(route: &EventRoute) -> SdkError {
    SdkError::ScopeMismatch {
        event: route.event_name.to_string(),
        scope: route.scope,
    }
}

fn report(route: &EventRoute, target: &str, result: HandlerResult) {
    if let Err(err) = result {
        tracing::error!(
            handler = route.handler_name,
            target,
            error = %format_args!("{err:#}"),
            "handler failed"
        );
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use super::*;
    use crate::domain::events::{
        ApplicationDidLaunch, DeviceDidConnect, DidReceiveDeepLink, KeyDown, SystemDidWakeUp,
    };
    use crate::domain::{RegistrationInfo, lookup};
    use crate::ws::Outbox;

    type Calls = Arc<Mutex<Vec<String>>>;

    fn record(calls: &Calls, entry: String) {
        if let Ok(mut calls) = calls.lock() {
            calls.push(entry);
        }
    }

    struct Recorder {
        calls: Calls,
    }

    impl Plugin for Recorder {
        fn on_key_down(&mut self, _cx: &PluginContext, event: &KeyDown) -> HandlerResult {
            record(&self.calls, format!("plugin:keyDown:{}", event.context));
            Ok(())
        }

        fn on_application_did_launch(
            &mut self,
            _cx: &PluginContext,
            _event: &ApplicationDidLaunch,
        ) -> HandlerResult {
            record(&self.calls, "plugin:applicationDidLaunch".to_string());
            Ok(())
        }

        fn on_did_receive_deep_link(
            &mut self,
            _cx: &PluginContext,
            event: &DidReceiveDeepLink,
        ) -> HandlerResult {
            record(&self.calls, format!("plugin:deepLink:{}", event.payload.url));
            Ok(())
        }
    }

    struct Counter {
        uuid: String,
        calls: Calls,
        fail: bool,
    }

    impl Action for Counter {
        fn uuid(&self) -> &str {
            &self.uuid
        }

        fn on_key_down(&mut self, cx: &ActionContext, _event: &KeyDown) -> HandlerResult {
            record(&self.calls, format!("{}:keyDown:{}", self.uuid, cx.context()));
            Ok(())
        }

        fn on_application_did_launch(
            &mut self,
            _cx: &PluginContext,
            event: &ApplicationDidLaunch,
        ) -> HandlerResult {
            record(
                &self.calls,
                format!("{}:applicationDidLaunch:{}", self.uuid, event.payload.application),
            );
            if self.fail {
                anyhow::bail!("refusing launch");
            }
            Ok(())
        }
    }

    fn dispatcher(kinds: &[(&str, bool)], calls: &Calls) -> Dispatcher {
        let (outbox, _rx) = Outbox::channel();
        let cx = PluginContext::new(outbox, "PLUGIN", Arc::new(RegistrationInfo::default()));
        let actions: Vec<Box<dyn Action>> = kinds
            .iter()
            .map(|(uuid, fail)| {
                Box::new(Counter {
                    uuid: (*uuid).to_string(),
                    calls: Arc::clone(calls),
                    fail: *fail,
                }) as Box<dyn Action>
            })
            .collect();
        let Ok(registry) = ActionRegistry::wire(actions, &cx) else {
            panic!("wiring should succeed");
        };
        Dispatcher::new(registry, cx)
    }

    fn route(name: &str) -> &'static EventRoute {
        let Some(route) = lookup(name) else {
            panic!("{name} must be routed");
        };
        route
    }

    fn snapshot(calls: &Calls) -> Vec<String> {
        let Ok(calls) = calls.lock() else {
            panic!("lock poisoned");
        };
        calls.clone()
    }

    fn key_down(action: &str, context: &str) -> InboundEvent {
        let raw = json!({"event": "keyDown", "action": action, "context": context, "payload": {}});
        let Ok(event) = route("keyDown").decode(raw) else {
            panic!("keyDown should decode");
        };
        event
    }

    fn app_launch() -> InboundEvent {
        let raw = json!({"event": "applicationDidLaunch", "payload": {"application": "foo"}});
        let Ok(event) = route("applicationDidLaunch").decode(raw) else {
            panic!("applicationDidLaunch should decode");
        };
        event
    }

    #[test]
    fn action_event_reaches_plugin_then_owner() {
        let calls = Calls::default();
        let mut dispatcher = dispatcher(&[("a", false), ("b", false)], &calls);
        let mut plugin = Recorder {
            calls: Arc::clone(&calls),
        };

        let result = dispatcher.dispatch(&mut plugin, route("keyDown"), &key_down("b", "ctx1"));
        assert!(matches!(result, Ok(2)));
        assert_eq!(snapshot(&calls), ["plugin:keyDown:ctx1", "b:keyDown:ctx1"]);
    }

    #[test]
    fn unregistered_action_is_reported() {
        let calls = Calls::default();
        let mut dispatcher = dispatcher(&[("a", false)], &calls);
        let result = dispatcher.route_to_action(route("keyDown"), &key_down("zzz", "ctx1"));
        let Err(SdkError::UnregisteredTarget(kind)) = result else {
            panic!("expected unregistered target");
        };
        assert_eq!(kind, "zzz");
        assert!(snapshot(&calls).is_empty());
    }

    #[test]
    fn plugin_event_on_action_route_is_missing_action() {
        let calls = Calls::default();
        let mut dispatcher = dispatcher(&[("a", false)], &calls);
        let event: InboundEvent = SystemDidWakeUp {}.into();
        let result = dispatcher.route_to_action(route("keyDown"), &event);
        assert!(matches!(result, Err(SdkError::MissingActionField { .. })));
    }

    #[test]
    fn broadcast_visits_every_action_in_order() {
        let calls = Calls::default();
        let mut dispatcher = dispatcher(&[("one", false), ("two", false), ("three", false)], &calls);
        let mut plugin = Recorder {
            calls: Arc::clone(&calls),
        };

        let result = dispatcher.dispatch(&mut plugin, route("applicationDidLaunch"), &app_launch());
        assert!(matches!(result, Ok(4)));
        assert_eq!(
            snapshot(&calls),
            [
                "plugin:applicationDidLaunch",
                "one:applicationDidLaunch:foo",
                "two:applicationDidLaunch:foo",
                "three:applicationDidLaunch:foo",
            ]
        );
    }

    #[test]
    fn failing_handler_does_not_stop_broadcast() {
        let calls = Calls::default();
        let mut dispatcher = dispatcher(&[("one", true), ("two", false)], &calls);
        let result = dispatcher.broadcast_to_actions(route("applicationDidLaunch"), &app_launch());
        assert!(matches!(result, Ok(2)));
        assert_eq!(snapshot(&calls).len(), 2);
    }

    #[test]
    fn action_event_cannot_be_broadcast() {
        let calls = Calls::default();
        let mut dispatcher = dispatcher(&[("a", false)], &calls);
        let result = dispatcher.broadcast_to_actions(route("keyDown"), &key_down("a", "ctx1"));
        assert!(matches!(result, Err(SdkError::ScopeMismatch { .. })));
        assert!(snapshot(&calls).is_empty());
    }

    #[test]
    fn deep_link_reaches_plugin_only() {
        let calls = Calls::default();
        let mut dispatcher = dispatcher(&[("a", false)], &calls);
        let mut plugin = Recorder {
            calls: Arc::clone(&calls),
        };
        let raw = json!({"event": "didReceiveDeepLink", "payload": {"url": "/x"}});
        let Ok(event) = route("didReceiveDeepLink").decode(raw) else {
            panic!("deep link should decode");
        };

        let result = dispatcher.dispatch(&mut plugin, route("didReceiveDeepLink"), &event);
        assert!(matches!(result, Ok(1)));
        assert_eq!(snapshot(&calls), ["plugin:deepLink:/x"]);

        let broadcast = dispatcher.broadcast_to_actions(route("didReceiveDeepLink"), &event);
        assert!(matches!(broadcast, Err(SdkError::ScopeMismatch { .. })));
    }

    #[test]
    fn unhandled_broadcast_counts_default_handlers() {
        let calls = Calls::default();
        let mut dispatcher = dispatcher(&[("a", false), ("b", false)], &calls);
        let raw = json!({"event": "deviceDidConnect", "device": "DEV1"});
        let Ok(event) = route("deviceDidConnect").decode(raw) else {
            panic!("deviceDidConnect should decode");
        };
        assert!(matches!(event, InboundEvent::Plugin(PluginEvent::DeviceDidConnect(DeviceDidConnect { .. }))));
        let result = dispatcher.broadcast_to_actions(route("deviceDidConnect"), &event);
        assert!(matches!(result, Ok(2)));
        assert!(snapshot(&calls).is_empty());
    }
}
