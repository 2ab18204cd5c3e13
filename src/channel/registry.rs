use std::sync::Arc;

use super::Channel;
use crate::error::NotificationError;

/// Read-only, ordered lookup over the registered channels.
///
/// Built once at composition time; iteration order is registration order.
pub struct ChannelRegistry {
    channels: Vec<Arc<dyn Channel>>,
}

impl ChannelRegistry {
    pub fn new(channels: Vec<Arc<dyn Channel>>) -> Self {
        Self { channels }
    }

    /// First registered channel that supports the given name.
    ///
    /// The error wording ("not found or not configured") is historical; this
    /// is a lookup miss regardless of configuration state.
    pub fn get_channel(&self, channel_name: &str) -> Result<Arc<dyn Channel>, NotificationError> {
        self.channels
            .iter()
            .find(|channel| channel.supports(channel_name))
            .cloned()
            .ok_or_else(|| NotificationError::ChannelNotFound(channel_name.to_string()))
    }

    /// Whether a channel supports the name and is ready to send. Never
    /// constructs a lookup-miss error.
    pub fn has_channel(&self, channel_name: &str) -> bool {
        self.channels
            .iter()
            .any(|channel| channel.supports(channel_name) && channel.is_configured())
    }

    /// All registered channels, in registration order.
    pub fn all_channels(&self) -> &[Arc<dyn Channel>] {
        &self.channels
    }
}
