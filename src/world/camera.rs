/// Scroll offset; recomputed from the player every tick, no smoothing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Camera {
    pub x: f64,
    pub y: f64,
}

impl Camera {
    /// Centres on `target` and clamps each axis to `[0, max(0, map - viewport)]`.
    pub fn follow(target: (f64, f64), viewport: (f64, f64), map: (f64, f64)) -> Self {
        let axis = |t: f64, view: f64, extent: f64| (t - view / 2.0).clamp(0.0, (extent - view).max(0.0));
        Self { x: axis(target.0, viewport.0, map.0), y: axis(target.1, viewport.1, map.1) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centres_when_away_from_edges() {
        let cam = Camera::follow((500.0, 300.0), (480.0, 320.0), (1024.0, 640.0));
        assert_eq!(cam, Camera { x: 260.0, y: 140.0 });
    }

    #[test]
    fn clamps_to_map_edges() {
        let cam = Camera::follow((10.0, 630.0), (480.0, 320.0), (1024.0, 640.0));
        assert_eq!(cam, Camera { x: 0.0, y: 320.0 });
    }

    #[test]
    fn map_smaller_than_viewport_pins_to_zero() {
        let cam = Camera::follow((200.0, 100.0), (480.0, 320.0), (300.0, 200.0));
        assert_eq!(cam, Camera { x: 0.0, y: 0.0 });
    }
}
