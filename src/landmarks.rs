use anyhow::{anyhow, Result};

use crate::Point2D;

// Hand landmark indices, as per MediaPipe Hands tracking
pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

pub const LANDMARK_COUNT: usize = 21;

/// One hand's landmark set: exactly 21 points in normalised image space
/// ([0,1] on both axes, y growing downward). Only constructible via the
/// validating constructors, so holders can index freely.
#[derive(Debug, Clone, PartialEq)]
pub struct HandLandmarks([Point2D; LANDMARK_COUNT]);

impl HandLandmarks {
    pub fn from_points(points: &[Point2D]) -> Result<HandLandmarks> {
        match <[Point2D; LANDMARK_COUNT]>::try_from(points) {
            Ok(points) => Ok(HandLandmarks(points)),
            Err(_) => Err(anyhow!(
                "expected exactly {} landmarks, got {}",
                LANDMARK_COUNT,
                points.len()
            )),
        }
    }

    /// Decode one wire frame: an empty list means "no hand found this frame",
    /// anything other than 21 points is a malformed frame.
    pub fn from_frame(points: &[Point2D]) -> Result<Option<HandLandmarks>> {
        if points.is_empty() {
            Ok(None)
        } else {
            HandLandmarks::from_points(points).map(Some)
        }
    }

    pub fn point(&self, index: usize) -> Point2D {
        self.0[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_21_points_required() {
        let full = vec![(0.5, 0.5); LANDMARK_COUNT];
        assert!(HandLandmarks::from_points(&full).is_ok());

        let partial = vec![(0.5, 0.5); 5];
        assert!(HandLandmarks::from_points(&partial).is_err());

        let extra = vec![(0.5, 0.5); LANDMARK_COUNT + 1];
        assert!(HandLandmarks::from_points(&extra).is_err());
    }

    #[test]
    fn test_empty_frame_is_no_hand() {
        assert_eq!(HandLandmarks::from_frame(&[]).unwrap(), None);
        assert!(HandLandmarks::from_frame(&vec![(0.1, 0.2); 3]).is_err());
        assert!(
            HandLandmarks::from_frame(&vec![(0.1, 0.2); LANDMARK_COUNT])
                .unwrap()
                .is_some()
        );
    }

    #[test]
    fn test_point_by_index() {
        let mut points = vec![(0., 0.); LANDMARK_COUNT];
        points[WRIST] = (0.5, 0.9);
        points[THUMB_TIP] = (0.46, 0.55);
        let hand = HandLandmarks::from_points(&points).unwrap();
        assert_eq!(hand.point(WRIST), (0.5, 0.9));
        assert_eq!(hand.point(THUMB_TIP), (0.46, 0.55));
    }
}
