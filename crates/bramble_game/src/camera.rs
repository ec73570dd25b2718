use glam::Vec2;

/// Screen-space camera that keeps its target centred in the viewport.
///
/// There is no smoothing: the offset is recomputed from the target every
/// frame, and every drawable is shifted by the same offset.
#[derive(Debug, Clone, Copy)]
pub struct Camera2D {
    pub position: Vec2,
    pub viewport: Vec2,
}

impl Camera2D {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            position: viewport * 0.5,
            viewport,
        }
    }

    pub fn follow(&mut self, target_center: Vec2) {
        self.position = target_center;
    }

    /// `viewport_center - target`.
    pub fn offset(&self) -> Vec2 {
        self.viewport * 0.5 - self.position
    }

    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        world + self.offset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_lands_in_viewport_center() {
        let mut camera = Camera2D::new(Vec2::new(1280.0, 720.0));
        camera.follow(Vec2::new(2000.0, 300.0));
        assert_eq!(camera.offset(), Vec2::new(-1360.0, 60.0));
        assert_eq!(camera.to_screen(Vec2::new(2000.0, 300.0)), Vec2::new(640.0, 360.0));
    }

    #[test]
    fn fresh_camera_has_no_offset() {
        let camera = Camera2D::new(Vec2::new(800.0, 600.0));
        assert_eq!(camera.offset(), Vec2::ZERO);
    }
}
