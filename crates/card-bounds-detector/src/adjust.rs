//! Manual edge adjustment on top of a finished detection.

use card_bounds_core::{Edges, Side};

use crate::detector::{CardDetection, DetectionMethod};

/// Move one side of `detection` by `delta` pixels and return the result.
///
/// `bounds` is the `(width, height)` of the raster the edges refer to. The
/// moved side is clamped into the raster and kept at least one pixel away
/// from its opposite side. Corners are rebuilt from the new edges and the
/// method becomes [`DetectionMethod::Manual`]; confidences are carried over.
pub fn adjust_edge(
    detection: &CardDetection,
    side: Side,
    delta: f64,
    bounds: (usize, usize),
) -> CardDetection {
    let edges = nudge_within(&detection.edges, side, delta, bounds);
    log::debug!(
        "{side:?} {:.2} -> {:.2}",
        detection.edges.get(side),
        edges.get(side)
    );

    let mut out = detection.clone();
    out.edges = edges;
    out.method = DetectionMethod::Manual;
    // rebuilt corners live in the edge frame; only valid for unrectified input
    if !detection.perspective_corrected {
        out.corners = edges.corners();
    }
    out
}

fn nudge_within(edges: &Edges, side: Side, delta: f64, (width, height): (usize, usize)) -> Edges {
    let max_x = width.saturating_sub(1) as f64;
    let max_y = height.saturating_sub(1) as f64;
    let base = edges.clamped(width, height);
    let moved = base.nudged(side, delta).get(side);
    let value = match side {
        Side::Left => moved.clamp(0.0, (base.right - 1.0).max(0.0)),
        Side::Right => moved.clamp((base.left + 1.0).min(max_x), max_x),
        Side::Top => moved.clamp(0.0, (base.bottom - 1.0).max(0.0)),
        Side::Bottom => moved.clamp((base.top + 1.0).min(max_y), max_y),
    };
    base.with(side, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::BorderColor;
    use card_bounds_core::Point2;

    fn detection(edges: Edges) -> CardDetection {
        CardDetection {
            edges,
            corners: edges.corners(),
            rectified: None,
            confidence: 0.8,
            perspective_corrected: false,
            background_recommendation: None,
            method: DetectionMethod::GradientSubpixel,
            border_color: BorderColor::Black,
            border_confidence: 0.5,
            edge_confidence: 0.9,
            max_skew: Some(0.0),
            background: None,
        }
    }

    #[test]
    fn nudge_moves_one_side_and_rebuilds_corners() {
        let det = detection(Edges::new(50.0, 450.0, 70.0, 630.0));
        let out = adjust_edge(&det, Side::Left, 2.5, (500, 700));
        assert_eq!(out.edges, Edges::new(52.5, 450.0, 70.0, 630.0));
        assert_eq!(out.corners[0], Point2::new(52.5, 70.0));
        assert_eq!(out.method, DetectionMethod::Manual);
        assert_eq!(out.confidence, det.confidence);
        // input untouched
        assert_eq!(det.edges.left, 50.0);
    }

    #[test]
    fn adjustment_stays_inside_raster_and_ordered() {
        let det = detection(Edges::new(50.0, 450.0, 70.0, 630.0));
        let out = adjust_edge(&det, Side::Right, 1000.0, (500, 700));
        assert_eq!(out.edges.right, 499.0);
        let out = adjust_edge(&det, Side::Top, 5000.0, (500, 700));
        assert_eq!(out.edges.top, 629.0);
        assert!(out.edges.is_ordered());
        let out = adjust_edge(&det, Side::Left, -80.0, (500, 700));
        assert_eq!(out.edges.left, 0.0);
    }

    #[test]
    fn rectified_detection_keeps_input_corners() {
        let mut det = detection(Edges::new(10.0, 110.0, 10.0, 150.0));
        det.perspective_corrected = true;
        det.corners[0] = Point2::new(3.0, 4.0);
        let out = adjust_edge(&det, Side::Bottom, -3.0, (121, 161));
        assert_eq!(out.edges.bottom, 147.0);
        assert_eq!(out.corners[0], Point2::new(3.0, 4.0));
    }
}
