use serde::{Deserialize, Serialize};

fn default_app_to_ui() -> usize {
    64
}

fn default_ui_to_app() -> usize {
    16
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ChannelConfig {
    #[serde(default = "default_app_to_ui")]
    pub app_to_ui: usize,
    #[serde(default = "default_ui_to_app")]
    pub ui_to_app: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            app_to_ui: default_app_to_ui(),
            ui_to_app: default_ui_to_app(),
        }
    }
}
