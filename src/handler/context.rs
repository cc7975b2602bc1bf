//! Command-sending capabilities handed to every handler call.
//!
//! [`PluginContext`] carries the plugin identity and the shared [`Outbox`];
//! [`ActionContext`] narrows it to one placed action instance so that
//! per-instance commands address the right `context`.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::domain::{ActionEvent, Command, RegistrationInfo, SetImagePayload, SetTitlePayload};
use crate::error::SdkError;
use crate::ws::Outbox;

/// Plugin-wide sending capability.
#[derive(Debug, Clone)]
pub struct PluginContext {
    outbox: Outbox,
    plugin_uuid: Arc<str>,
    info: Arc<RegistrationInfo>,
}

impl PluginContext {
    /// Creates a context over the shared outbox.
    #[must_use]
    pub fn new(outbox: Outbox, plugin_uuid: impl Into<Arc<str>>, info: Arc<RegistrationInfo>) -> Self {
        Self {
            outbox,
            plugin_uuid: plugin_uuid.into(),
            info,
        }
    }

    /// Host-assigned plugin UUID.
    #[must_use]
    pub fn plugin_uuid(&self) -> &str {
        &self.plugin_uuid
    }

    /// Registration metadata from launch.
    #[must_use]
    pub fn info(&self) -> &RegistrationInfo {
        &self.info
    }

    /// The shared outbox.
    #[must_use]
    pub fn outbox(&self) -> &Outbox {
        &self.outbox
    }

    /// Sends any serializable message.
    ///
    /// # Errors
    ///
    /// See [`Outbox::send`].
    pub fn send<T: Serialize + ?Sized>(&self, value: &T) -> Result<(), SdkError> {
        self.outbox.send(value)
    }

    /// Sends pre-built text verbatim.
    ///
    /// # Errors
    ///
    /// See [`Outbox::send_text`].
    pub fn send_text(&self, text: impl Into<String>) -> Result<(), SdkError> {
        self.outbox.send_text(text)
    }

    /// Persists plugin-wide settings.
    ///
    /// # Errors
    ///
    /// See [`Outbox::send`].
    pub fn set_global_settings(&self, settings: Value) -> Result<(), SdkError> {
        self.send(&Command::set_global_settings(&self.plugin_uuid, settings))
    }

    /// Requests a `didReceiveGlobalSettings` event.
    ///
    /// # Errors
    ///
    /// See [`Outbox::send`].
    pub fn get_global_settings(&self) -> Result<(), SdkError> {
        self.send(&Command::get_global_settings(&self.plugin_uuid))
    }

    /// Opens `url` in the default browser.
    ///
    /// # Errors
    ///
    /// See [`Outbox::send`].
    pub fn open_url(&self, url: &str) -> Result<(), SdkError> {
        self.send(&Command::open_url(url))
    }

    /// Writes `message` to the host's plugin log.
    ///
    /// # Errors
    ///
    /// See [`Outbox::send`].
    pub fn log_message(&self, message: &str) -> Result<(), SdkError> {
        self.send(&Command::log_message(message))
    }

    /// Switches `device` to a profile bundled with the plugin.
    ///
    /// # Errors
    ///
    /// See [`Outbox::send`].
    pub fn switch_to_profile(&self, device: &str, profile: &str) -> Result<(), SdkError> {
        self.send(&Command::switch_to_profile(&self.plugin_uuid, device, profile))
    }

    /// Narrows to one placed action instance.
    #[must_use]
    pub fn for_action(&self, action: impl Into<String>, context: impl Into<String>) -> ActionContext {
        ActionContext {
            plugin: self.clone(),
            action: action.into(),
            context: context.into(),
            device: None,
        }
    }

    pub(crate) fn for_event(&self, event: &ActionEvent) -> ActionContext {
        ActionContext {
            plugin: self.clone(),
            action: event.action().to_string(),
            context: event.context().to_string(),
            device: event.device().map(str::to_string),
        }
    }
}

/// Sending capability bound to one action instance.
#[derive(Debug, Clone)]
pub struct ActionContext {
    plugin: PluginContext,
    action: String,
    context: String,
    device: Option<String>,
}

impl ActionContext {
    /// Action kind of the instance.
    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Host-assigned context of the instance.
    #[must_use]
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Device the triggering event came from, if any.
    #[must_use]
    pub fn device(&self) -> Option<&str> {
        self.device.as_deref()
    }

    /// The plugin-wide context.
    #[must_use]
    pub fn plugin(&self) -> &PluginContext {
        &self.plugin
    }

    /// Persists settings for this instance.
    ///
    /// # Errors
    ///
    /// See [`Outbox::send`].
    pub fn set_settings(&self, settings: Value) -> Result<(), SdkError> {
        self.plugin.send(&Command::set_settings(&self.context, settings))
    }

    /// Requests a `didReceiveSettings` event for this instance.
    ///
    /// # Errors
    ///
    /// See [`Outbox::send`].
    pub fn get_settings(&self) -> Result<(), SdkError> {
        self.plugin.send(&Command::get_settings(&self.context))
    }

    /// Changes the title.
    ///
    /// # Errors
    ///
    /// See [`Outbox::send`].
    pub fn set_title(&self, payload: &SetTitlePayload) -> Result<(), SdkError> {
        self.plugin.send(&Command::set_title(&self.context, payload))
    }

    /// Changes the image.
    ///
    /// # Errors
    ///
    /// See [`Outbox::send`].
    pub fn set_image(&self, payload: &SetImagePayload) -> Result<(), SdkError> {
        self.plugin.send(&Command::set_image(&self.context, payload))
    }

    /// Updates touch-strip layout items.
    ///
    /// # Errors
    ///
    /// See [`Outbox::send`].
    pub fn set_feedback(&self, feedback: Value) -> Result<(), SdkError> {
        self.plugin.send(&Command::set_feedback(&self.context, feedback))
    }

    /// Switches the touch-strip layout.
    ///
    /// # Errors
    ///
    /// See [`Outbox::send`].
    pub fn set_feedback_layout(&self, layout: &str) -> Result<(), SdkError> {
        self.plugin
            .send(&Command::set_feedback_layout(&self.context, layout))
    }

    /// Flashes the alert icon.
    ///
    /// # Errors
    ///
    /// See [`Outbox::send`].
    pub fn show_alert(&self) -> Result<(), SdkError> {
        self.plugin.send(&Command::show_alert(&self.context))
    }

    /// Flashes the check mark.
    ///
    /// # Errors
    ///
    /// See [`Outbox::send`].
    pub fn show_ok(&self) -> Result<(), SdkError> {
        self.plugin.send(&Command::show_ok(&self.context))
    }

    /// Switches a multi-state action to `state`.
    ///
    /// # Errors
    ///
    /// See [`Outbox::send`].
    pub fn set_state(&self, state: u32) -> Result<(), SdkError> {
        self.plugin.send(&Command::set_state(&self.context, state))
    }

    /// Sends a message to this instance's property inspector.
    ///
    /// # Errors
    ///
    /// See [`Outbox::send`].
    pub fn send_to_property_inspector(&self, payload: Value) -> Result<(), SdkError> {
        self.plugin.send(&Command::send_to_property_inspector(
            &self.action,
            &self.context,
            payload,
        ))
    }
}
