//! Handler traits for the plugin and its actions.
//!
//! Every method has a no-op default, so an implementor overrides only the
//! events it cares about. A handler returning `Err` is logged by the
//! dispatcher and routing carries on.

use crate::domain::events::{
    ApplicationDidLaunch, ApplicationDidTerminate, DeviceDidConnect, DeviceDidDisconnect,
    DialDown, DialPress, DialRotate, DialUp, DidReceiveDeepLink, DidReceiveGlobalSettings,
    DidReceiveSettings, KeyDown, KeyUp, PropertyInspectorDidAppear, PropertyInspectorDidDisappear,
    SendToPlugin, SendToPropertyInspector, SystemDidWakeUp, TitleParametersDidChange, TouchTap,
    WillAppear, WillDisappear,
};

use super::context::{ActionContext, PluginContext};

/// Result returned by every handler method.
pub type HandlerResult = anyhow::Result<()>;

/// Plugin-level handler: sees every event before any action does.
#[allow(unused_variables, clippy::missing_errors_doc)]
pub trait Plugin: Send {
    /// `didReceiveSettings`.
    fn on_did_receive_settings(&mut self, cx: &PluginContext, event: &DidReceiveSettings) -> HandlerResult {
        Ok(())
    }

    /// `keyDown`.
    fn on_key_down(&mut self, cx: &PluginContext, event: &KeyDown) -> HandlerResult {
        Ok(())
    }

    /// `keyUp`.
    fn on_key_up(&mut self, cx: &PluginContext, event: &KeyUp) -> HandlerResult {
        Ok(())
    }

    /// `touchTap`.
    fn on_touch_tap(&mut self, cx: &PluginContext, event: &TouchTap) -> HandlerResult {
        Ok(())
    }

    /// `dialDown`.
    fn on_dial_down(&mut self, cx: &PluginContext, event: &DialDown) -> HandlerResult {
        Ok(())
    }

    /// `dialUp`.
    fn on_dial_up(&mut self, cx: &PluginContext, event: &DialUp) -> HandlerResult {
        Ok(())
    }

    /// `dialPress`.
    fn on_dial_press(&mut self, cx: &PluginContext, event: &DialPress) -> HandlerResult {
        Ok(())
    }

    /// `dialRotate`.
    fn on_dial_rotate(&mut self, cx: &PluginContext, event: &DialRotate) -> HandlerResult {
        Ok(())
    }

    /// `willAppear`.
    fn on_will_appear(&mut self, cx: &PluginContext, event: &WillAppear) -> HandlerResult {
        Ok(())
    }

    /// `willDisappear`.
    fn on_will_disappear(&mut self, cx: &PluginContext, event: &WillDisappear) -> HandlerResult {
        Ok(())
    }

    /// `titleParametersDidChange`.
    fn on_title_parameters_did_change(
        &mut self,
        cx: &PluginContext,
        event: &TitleParametersDidChange,
    ) -> HandlerResult {
        Ok(())
    }

    /// `propertyInspectorDidAppear`.
    fn on_property_inspector_did_appear(
        &mut self,
        cx: &PluginContext,
        event: &PropertyInspectorDidAppear,
    ) -> HandlerResult {
        Ok(())
    }

    /// `propertyInspectorDidDisappear`.
    fn on_property_inspector_did_disappear(
        &mut self,
        cx: &PluginContext,
        event: &PropertyInspectorDidDisappear,
    ) -> HandlerResult {
        Ok(())
    }

    /// `sendToPlugin`.
    fn on_send_to_plugin(&mut self, cx: &PluginContext, event: &SendToPlugin) -> HandlerResult {
        Ok(())
    }

    /// `sendToPropertyInspector`.
    fn on_send_to_property_inspector(
        &mut self,
        cx: &PluginContext,
        event: &SendToPropertyInspector,
    ) -> HandlerResult {
        Ok(())
    }

    /// `didReceiveGlobalSettings`.
    fn on_did_receive_global_settings(
        &mut self,
        cx: &PluginContext,
        event: &DidReceiveGlobalSettings,
    ) -> HandlerResult {
        Ok(())
    }

    /// `deviceDidConnect`.
    fn on_device_did_connect(&mut self, cx: &PluginContext, event: &DeviceDidConnect) -> HandlerResult {
        Ok(())
    }

    /// `deviceDidDisconnect`.
    fn on_device_did_disconnect(
        &mut self,
        cx: &PluginContext,
        event: &DeviceDidDisconnect,
    ) -> HandlerResult {
        Ok(())
    }

    /// `applicationDidLaunch`.
    fn on_application_did_launch(
        &mut self,
        cx: &PluginContext,
        event: &ApplicationDidLaunch,
    ) -> HandlerResult {
        Ok(())
    }

    /// `applicationDidTerminate`.
    fn on_application_did_terminate(
        &mut self,
        cx: &PluginContext,
        event: &ApplicationDidTerminate,
    ) -> HandlerResult {
        Ok(())
    }

    /// `systemDidWakeUp`.
    fn on_system_did_wake_up(&mut self, cx: &PluginContext, event: &SystemDidWakeUp) -> HandlerResult {
        Ok(())
    }

    /// `didReceiveDeepLink`. Delivered to the plugin only.
    fn on_did_receive_deep_link(
        &mut self,
        cx: &PluginContext,
        event: &DidReceiveDeepLink,
    ) -> HandlerResult {
        Ok(())
    }
}

/// Plugin-level handler that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPlugin;

impl Plugin for NoopPlugin {}

/// Handler for one declared action kind.
///
/// One instance serves every placed copy of the action; the
/// [`ActionContext`] passed to each call names the copy the event is for.
#[allow(unused_variables, clippy::missing_errors_doc)]
pub trait Action: Send {
    /// Action kind, matching the `UUID` of the action in the plugin manifest.
    fn uuid(&self) -> &str;

    /// Called once at startup with the plugin-wide context, before any event
    /// is delivered. Keep a clone to send commands outside handler calls.
    fn bind(&mut self, cx: &PluginContext) {}

    /// `didReceiveSettings`.
    fn on_did_receive_settings(&mut self, cx: &ActionContext, event: &DidReceiveSettings) -> HandlerResult {
        Ok(())
    }

    /// `keyDown`.
    fn on_key_down(&mut self, cx: &ActionContext, event: &KeyDown) -> HandlerResult {
        Ok(())
    }

    /// `keyUp`.
    fn on_key_up(&mut self, cx: &ActionContext, event: &KeyUp) -> HandlerResult {
        Ok(())
    }

    /// `touchTap`.
    fn on_touch_tap(&mut self, cx: &ActionContext, event: &TouchTap) -> HandlerResult {
        Ok(())
    }

    /// `dialDown`.
    fn on_dial_down(&mut self, cx: &ActionContext, event: &DialDown) -> HandlerResult {
        Ok(())
    }

    /// `dialUp`.
    fn on_dial_up(&mut self, cx: &ActionContext, event: &DialUp) -> HandlerResult {
        Ok(())
    }

    /// `dialPress`.
    fn on_dial_press(&mut self, cx: &ActionContext, event: &DialPress) -> HandlerResult {
        Ok(())
    }

    /// `dialRotate`.
    fn on_dial_rotate(&mut self, cx: &ActionContext, event: &DialRotate) -> HandlerResult {
        Ok(())
    }

    /// `willAppear`.
    fn on_will_appear(&mut self, cx: &ActionContext, event: &WillAppear) -> HandlerResult {
        Ok(())
    }

    /// `willDisappear`.
    fn on_will_disappear(&mut self, cx: &ActionContext, event: &WillDisappear) -> HandlerResult {
        Ok(())
    }

    /// `titleParametersDidChange`.
    fn on_title_parameters_did_change(
        &mut self,
        cx: &ActionContext,
        event: &TitleParametersDidChange,
    ) -> HandlerResult {
        Ok(())
    }

    /// `propertyInspectorDidAppear`.
    fn on_property_inspector_did_appear(
        &mut self,
        cx: &ActionContext,
        event: &PropertyInspectorDidAppear,
    ) -> HandlerResult {
        Ok(())
    }

    /// `propertyInspectorDidDisappear`.
    fn on_property_inspector_did_disappear(
        &mut self,
        cx: &ActionContext,
        event: &PropertyInspectorDidDisappear,
    ) -> HandlerResult {
        Ok(())
    }

    /// `sendToPlugin`.
    fn on_send_to_plugin(&mut self, cx: &ActionContext, event: &SendToPlugin) -> HandlerResult {
        Ok(())
    }

    /// `sendToPropertyInspector`.
    fn on_send_to_property_inspector(
        &mut self,
        cx: &ActionContext,
        event: &SendToPropertyInspector,
    ) -> HandlerResult {
        Ok(())
    }

    /// `didReceiveGlobalSettings`, broadcast to every action.
    fn on_did_receive_global_settings(
        &mut self,
        cx: &PluginContext,
        event: &DidReceiveGlobalSettings,
    ) -> HandlerResult {
        Ok(())
    }

    /// `deviceDidConnect`, broadcast to every action.
    fn on_device_did_connect(&mut self, cx: &PluginContext, event: &DeviceDidConnect) -> HandlerResult {
        Ok(())
    }

    /// `deviceDidDisconnect`, broadcast to every action.
    fn on_device_did_disconnect(
        &mut self,
        cx: &PluginContext,
        event: &DeviceDidDisconnect,
    ) -> HandlerResult {
        Ok(())
    }

    /// `applicationDidLaunch`, broadcast to every action.
    fn on_application_did_launch(
        &mut self,
        cx: &PluginContext,
        event: &ApplicationDidLaunch,
    ) -> HandlerResult {
        Ok(())
    }

    /// `applicationDidTerminate`, broadcast to every action.
    fn on_application_did_terminate(
        &mut self,
        cx: &PluginContext,
        event: &ApplicationDidTerminate,
    ) -> HandlerResult {
        Ok(())
    }

    /// `systemDidWakeUp`, broadcast to every action.
    fn on_system_did_wake_up(&mut self, cx: &PluginContext, event: &SystemDidWakeUp) -> HandlerResult {
        Ok(())
    }
}
