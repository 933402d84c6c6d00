use serde::{Deserialize, Serialize};

fn default_prompt_delay_ms() -> u64 {
    150
}

fn default_grant_on_request() -> bool {
    true
}

/// Behaviour of one simulated platform capability
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct GrantConfig {
    /// Already granted at startup
    pub granted: bool,
    /// What the permission prompt answers when shown
    #[serde(default = "default_grant_on_request")]
    pub grant_on_request: bool,
    pub fail_query: bool,
    pub fail_request: bool,
}

impl Default for GrantConfig {
    fn default() -> Self {
        Self {
            granted: false,
            grant_on_request: default_grant_on_request(),
            fail_query: false,
            fail_request: false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct PlatformConfig {
    pub camera: GrantConfig,
    pub media_storage: GrantConfig,
    /// Simulated time the user spends on a permission prompt
    #[serde(default = "default_prompt_delay_ms")]
    pub prompt_delay_ms: u64,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            camera: GrantConfig::default(),
            media_storage: GrantConfig::default(),
            prompt_delay_ms: default_prompt_delay_ms(),
        }
    }
}
