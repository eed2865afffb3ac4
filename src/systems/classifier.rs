use serde::{Deserialize, Serialize};

use crate::geometry_utils::{centroid, distance_points};
use crate::landmarks::{
    HandLandmarks, INDEX_MCP, INDEX_TIP, MIDDLE_MCP, MIDDLE_TIP, PINKY_MCP, PINKY_TIP, RING_MCP,
    RING_TIP, THUMB_IP, THUMB_MCP, THUMB_TIP, WRIST,
};

// Empirical thresholds, in normalised image units
const THUMB_EXTENSION_MIN: f32 = 0.03;
const THUMB_IP_EXTENSION_MIN: f32 = 0.02;
const OTHER_FINGER_EXTENDED_MIN: f32 = 0.08;
const THUMB_FINGERS_Y_MIN: f32 = 0.08;
const THUMB_WRIST_Y_MIN: f32 = 0.05;
const THUMB_FINGERS_X_MAX: f32 = 0.15;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GestureLabel {
    Positive,
    Negative,
    None,
}

/// Scalar measurements computed alongside every classification; published
/// for display/debugging only and never consulted downstream.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GestureDiagnostics {
    pub thumb_extension: f32,
    pub thumb_ip_extension: f32,
    pub thumb_to_fingers_y: f32,
    pub thumb_to_fingers_x: f32,
    pub thumb_to_wrist_y: f32,
    pub thumb_extended: bool,
}

/// Classify one hand pose as thumbs-up (Positive), thumbs-down (Negative)
/// or no actionable gesture. Pure arithmetic over the landmark set; the same
/// input always yields the same label and diagnostics.
pub fn classify(hand: &HandLandmarks) -> (GestureLabel, GestureDiagnostics) {
    let wrist = hand.point(WRIST);
    let thumb_mcp = hand.point(THUMB_MCP);
    let thumb_ip = hand.point(THUMB_IP);
    let thumb_tip = hand.point(THUMB_TIP);

    let thumb_extension = distance_points(&thumb_tip, &thumb_mcp);
    let thumb_ip_extension = distance_points(&thumb_ip, &thumb_mcp);
    let thumb_extended =
        thumb_extension > THUMB_EXTENSION_MIN || thumb_ip_extension > THUMB_IP_EXTENSION_MIN;

    let finger_tips = [
        hand.point(INDEX_TIP),
        hand.point(MIDDLE_TIP),
        hand.point(RING_TIP),
        hand.point(PINKY_TIP),
    ];
    let (avg_tip_x, avg_tip_y) = centroid(&finger_tips).expect("four fingertips always present");

    // y grows downward, so negative offsets mean "above"
    let thumb_to_fingers_y = thumb_tip.1 - avg_tip_y;
    let thumb_to_fingers_x = thumb_tip.0 - avg_tip_x;
    let thumb_to_wrist_y = thumb_tip.1 - wrist.1;

    let diagnostics = GestureDiagnostics {
        thumb_extension,
        thumb_ip_extension,
        thumb_to_fingers_y,
        thumb_to_fingers_x,
        thumb_to_wrist_y,
        thumb_extended,
    };

    if !thumb_extended {
        return (GestureLabel::None, diagnostics);
    }

    // An open hand must never read as a thumb gesture
    let other_fingers_extended = [
        (INDEX_TIP, INDEX_MCP),
        (MIDDLE_TIP, MIDDLE_MCP),
        (RING_TIP, RING_MCP),
        (PINKY_TIP, PINKY_MCP),
    ]
    .iter()
    .any(|(tip, mcp)| {
        distance_points(&hand.point(*tip), &hand.point(*mcp)) > OTHER_FINGER_EXTENDED_MIN
    });

    if other_fingers_extended {
        return (GestureLabel::None, diagnostics);
    }

    let label = if thumb_to_fingers_y < -THUMB_FINGERS_Y_MIN
        && thumb_to_wrist_y < -THUMB_WRIST_Y_MIN
        && thumb_to_fingers_x.abs() < THUMB_FINGERS_X_MAX
    {
        GestureLabel::Positive
    } else if thumb_to_fingers_y > THUMB_FINGERS_Y_MIN
        && thumb_to_wrist_y > THUMB_WRIST_Y_MIN
        && thumb_to_fingers_x.abs() < THUMB_FINGERS_X_MAX
    {
        GestureLabel::Negative
    } else {
        GestureLabel::None
    };

    (label, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{LANDMARK_COUNT, THUMB_CMC};
    use crate::Point2D;

    /// Fist near the bottom of the frame: every non-thumb tip sits close to
    /// its own MCP, thumb tucked against the palm.
    fn closed_hand() -> Vec<Point2D> {
        let mut points = vec![(0.5, 0.84); LANDMARK_COUNT];
        points[WRIST] = (0.5, 0.9);
        points[THUMB_CMC] = (0.49, 0.85);
        points[THUMB_MCP] = (0.48, 0.8);
        points[THUMB_IP] = (0.485, 0.81);
        points[THUMB_TIP] = (0.49, 0.82);
        let mcps = [(INDEX_MCP, 0.55), (MIDDLE_MCP, 0.52), (RING_MCP, 0.49), (PINKY_MCP, 0.46)];
        let tips = [(INDEX_TIP, 0.55), (MIDDLE_TIP, 0.52), (RING_TIP, 0.49), (PINKY_TIP, 0.46)];
        for (i, x) in mcps {
            points[i] = (x, 0.88);
        }
        for (i, x) in tips {
            points[i] = (x, 0.85);
        }
        points
    }

    fn thumbs_up_hand() -> Vec<Point2D> {
        let mut points = closed_hand();
        points[THUMB_IP] = (0.47, 0.65);
        points[THUMB_TIP] = (0.46, 0.55);
        points
    }

    /// Vertical mirror of the thumbs-up pose
    fn thumbs_down_hand() -> Vec<Point2D> {
        let mut points = vec![(0.5, 0.16); LANDMARK_COUNT];
        points[WRIST] = (0.5, 0.1);
        points[THUMB_CMC] = (0.49, 0.15);
        points[THUMB_MCP] = (0.48, 0.2);
        points[THUMB_IP] = (0.47, 0.35);
        points[THUMB_TIP] = (0.46, 0.45);
        let mcps = [(INDEX_MCP, 0.55), (MIDDLE_MCP, 0.52), (RING_MCP, 0.49), (PINKY_MCP, 0.46)];
        let tips = [(INDEX_TIP, 0.55), (MIDDLE_TIP, 0.52), (RING_TIP, 0.49), (PINKY_TIP, 0.46)];
        for (i, x) in mcps {
            points[i] = (x, 0.12);
        }
        for (i, x) in tips {
            points[i] = (x, 0.15);
        }
        points
    }

    fn classify_points(points: &[Point2D]) -> (GestureLabel, GestureDiagnostics) {
        classify(&HandLandmarks::from_points(points).unwrap())
    }

    #[test]
    fn test_tucked_thumb_is_none() {
        let (label, diagnostics) = classify_points(&closed_hand());
        assert_eq!(label, GestureLabel::None);
        assert!(!diagnostics.thumb_extended);
        assert!(diagnostics.thumb_extension <= THUMB_EXTENSION_MIN);
        assert!(diagnostics.thumb_ip_extension <= THUMB_IP_EXTENSION_MIN);
    }

    #[test]
    fn test_thumbs_up_is_positive() {
        let (label, diagnostics) = classify_points(&thumbs_up_hand());
        assert_eq!(label, GestureLabel::Positive);
        assert!(diagnostics.thumb_extended);
        assert!(diagnostics.thumb_to_fingers_y < -THUMB_FINGERS_Y_MIN);
        assert!(diagnostics.thumb_to_wrist_y < -THUMB_WRIST_Y_MIN);
    }

    #[test]
    fn test_thumbs_down_is_negative() {
        let (label, diagnostics) = classify_points(&thumbs_down_hand());
        assert_eq!(label, GestureLabel::Negative);
        assert!(diagnostics.thumb_to_fingers_y > THUMB_FINGERS_Y_MIN);
        assert!(diagnostics.thumb_to_wrist_y > THUMB_WRIST_Y_MIN);
    }

    #[test]
    fn test_open_hand_is_none_despite_thumb() {
        // Thumb geometry says Positive, but an extended index finger vetoes
        let mut points = thumbs_up_hand();
        points[INDEX_TIP] = (0.55, 0.7);
        let (label, _) = classify_points(&points);
        assert_eq!(label, GestureLabel::None);
    }

    #[test]
    fn test_sideways_thumb_is_none() {
        // Extended, fingers closed, but pointing neither up nor down
        let mut points = closed_hand();
        points[THUMB_TIP] = (0.3, 0.86);
        let (label, diagnostics) = classify_points(&points);
        assert_eq!(label, GestureLabel::None);
        assert!(diagnostics.thumb_extended);
    }

    #[test]
    fn test_offset_thumb_is_none() {
        // Up-pose heights but too far left of the fingertips
        let mut points = thumbs_up_hand();
        points[THUMB_TIP] = (0.25, 0.55);
        let (label, _) = classify_points(&points);
        assert_eq!(label, GestureLabel::None);
    }

    #[test]
    fn test_classification_is_idempotent() {
        let hand = HandLandmarks::from_points(&thumbs_up_hand()).unwrap();
        assert_eq!(classify(&hand), classify(&hand));
    }
}
