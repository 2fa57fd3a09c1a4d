use serde::{Deserialize, Serialize};

// for client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuntimeConfig {
    pub api_url: String,
    pub sign_in_url: String,
}
