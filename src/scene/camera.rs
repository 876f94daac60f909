use glam::{Mat4, Vec3};

/// Right-handed perspective camera. The projection matrix is cached and only
/// recomputed by [`PerspectiveCamera::update_projection_matrix`], so changing
/// `aspect` or `fov_y_degrees` has no effect until that call.
#[derive(Clone, Copy, Debug)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    projection: Mat4,
}

impl PerspectiveCamera {
    pub const DEFAULT_FOV_Y_DEGREES: f32 = 60.0;
    pub const DEFAULT_NEAR: f32 = 0.1;
    pub const DEFAULT_FAR: f32 = 1000.0;

    pub fn new(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            target: Vec3::NEG_Z,
            up: Vec3::Y,
            fov_y_degrees,
            aspect,
            near,
            far,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    pub fn with_aspect(aspect: f32) -> Self {
        Self::new(
            Self::DEFAULT_FOV_Y_DEGREES,
            aspect,
            Self::DEFAULT_NEAR,
            Self::DEFAULT_FAR,
        )
    }

    pub fn update_projection_matrix(&mut self) {
        self.projection = Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        );
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection * self.view()
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::with_aspect(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_proj_is_invertible() {
        let mut cam = PerspectiveCamera::with_aspect(16.0 / 9.0);
        cam.position = Vec3::new(3.0, 3.0, 5.0);
        cam.look_at(Vec3::ZERO);
        let vp = cam.view_proj();
        assert!((vp * vp.inverse()).abs_diff_eq(Mat4::IDENTITY, 1e-4));
    }

    #[test]
    fn projection_is_cached_until_updated() {
        let mut cam = PerspectiveCamera::with_aspect(1.0);
        let before = cam.projection();
        cam.aspect = 2.0;
        assert_eq!(cam.projection(), before);
        cam.update_projection_matrix();
        assert_ne!(cam.projection(), before);
        // x scale is focal / aspect
        assert!((cam.projection().x_axis.x * 2.0 - cam.projection().y_axis.y).abs() < 1e-5);
    }

    #[test]
    fn origin_projects_to_screen_centre() {
        let mut cam = PerspectiveCamera::with_aspect(800.0 / 600.0);
        cam.position = Vec3::new(3.0, 3.0, 3.0);
        cam.look_at(Vec3::ZERO);
        let clip = cam.view_proj() * Vec3::ZERO.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }
}
