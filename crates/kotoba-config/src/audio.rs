use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_capture_dir() -> PathBuf {
    env::temp_dir().join("kotoba-captures")
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct AudioConfig {
    /// Directory where recorded attempts are written before submission.
    #[serde(default = "default_capture_dir")]
    pub capture_dir: PathBuf,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            capture_dir: default_capture_dir(),
        }
    }
}

impl AudioConfig {
    pub fn new() -> Self {
        let capture_dir = env::var("KOTOBA_CAPTURE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_capture_dir());

        Self { capture_dir }
    }
}
