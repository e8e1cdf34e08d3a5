use serde::{Deserialize, Serialize};

/// Last audio/video state an endpoint reported about itself.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq)]
pub struct MediaState {
    pub audio_enabled: bool,
    pub video_enabled: bool,
}

impl Default for MediaState {
    fn default() -> Self {
        Self {
            audio_enabled: true,
            video_enabled: true,
        }
    }
}
