use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::Point2D;

/// One inference response from a remote landmark endpoint. The service
/// reports zero or one hand per frame; `landmarks` is only meaningful when
/// `handsDetected` is true.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RemoteLandmarkFrame {
    pub hands_detected: bool,
    #[serde(default)]
    pub landmarks: Vec<Point2D>,
}

/// Polls a remote (HTTP) hand-landmark inference service on a fixed
/// interval, as an alternative to providers publishing frames over Tether.
/// Both transports feed the same landmark-handling path.
pub struct RemoteLandmarkProvider {
    agent: ureq::Agent,
    url: String,
    last_polled: SystemTime,
}

impl RemoteLandmarkProvider {
    pub fn new(url: &str) -> RemoteLandmarkProvider {
        RemoteLandmarkProvider {
            agent: ureq::AgentBuilder::new()
                .timeout(Duration::from_secs(2))
                .build(),
            url: String::from(url),
            last_polled: SystemTime::now(),
        }
    }

    pub fn get_elapsed(&self) -> Duration {
        self.last_polled.elapsed().unwrap_or_default()
    }

    pub fn reset_timer(&mut self) {
        self.last_polled = SystemTime::now();
    }

    /// Fetch one frame of landmark points; an empty list means the service
    /// found no hand this frame.
    pub fn fetch_frame(&self) -> Result<Vec<Point2D>> {
        let frame: RemoteLandmarkFrame = self
            .agent
            .get(&self.url)
            .call()
            .with_context(|| format!("failed to reach landmark endpoint {}", self.url))?
            .into_json()
            .context("failed to decode landmark frame")?;

        if frame.hands_detected {
            Ok(frame.landmarks)
        } else {
            Ok(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_frame_with_hand() {
        let json = r#"{
            "handsDetected": true,
            "landmarks": [[0.5, 0.9], [0.49, 0.85], [0.48, 0.8]]
        }"#;
        let frame: RemoteLandmarkFrame = serde_json::from_str(json).unwrap();
        assert!(frame.hands_detected);
        assert_eq!(frame.landmarks.len(), 3);
        assert_eq!(frame.landmarks[0], (0.5, 0.9));
    }

    #[test]
    fn test_decode_frame_without_hand() {
        // No-hand responses may omit the landmarks field entirely
        let frame: RemoteLandmarkFrame =
            serde_json::from_str(r#"{ "handsDetected": false }"#).unwrap();
        assert!(!frame.hands_detected);
        assert!(frame.landmarks.is_empty());
    }
}
