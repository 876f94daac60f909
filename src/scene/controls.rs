//! Orbit camera controls: left drag rotates around the target, right drag
//! pans, the wheel dollies in and out.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

use super::camera::PerspectiveCamera;

const EPS: f32 = 1e-6;
/// Pixels per line for wheel events reported in lines.
const LINE_HEIGHT: f32 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Windowing-agnostic pointer input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Moved { x: f32, y: f32 },
    Pressed(PointerButton),
    Released(PointerButton),
    /// Positive values scroll away from the user (zoom in).
    Wheel(f32),
}

impl PointerEvent {
    pub fn from_window_event(event: &WindowEvent) -> Option<Self> {
        match event {
            WindowEvent::CursorMoved { position, .. } => Some(PointerEvent::Moved {
                x: position.x as f32,
                y: position.y as f32,
            }),
            WindowEvent::MouseInput { state, button, .. } => {
                let button = match button {
                    MouseButton::Left => PointerButton::Primary,
                    MouseButton::Right => PointerButton::Secondary,
                    MouseButton::Middle => PointerButton::Middle,
                    _ => return None,
                };
                Some(match state {
                    ElementState::Pressed => PointerEvent::Pressed(button),
                    ElementState::Released => PointerEvent::Released(button),
                })
            }
            WindowEvent::MouseWheel { delta, .. } => Some(PointerEvent::Wheel(match delta {
                MouseScrollDelta::LineDelta(_, y) => *y * LINE_HEIGHT,
                MouseScrollDelta::PixelDelta(p) => p.y as f32,
            })),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragMode {
    Rotate,
    Pan,
    Dolly,
}

#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    pub rotate_speed: f32,
    pub pan_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    viewport: Vec2,
    cursor: Option<Vec2>,
    drag: Option<DragMode>,
    // Accumulated since the last `update`.
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
    pan_offset: Vec3,
    pending_pan: Vec2,
}

impl OrbitControls {
    pub fn new(camera: &PerspectiveCamera, viewport: Vec2) -> Self {
        Self {
            target: camera.target,
            rotate_speed: 1.0,
            pan_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            viewport,
            cursor: None,
            drag: None,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            pan_offset: Vec3::ZERO,
            pending_pan: Vec2::ZERO,
        }
    }

    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Feeds one pointer event. Returns true when the event was consumed.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Pressed(button) => {
                self.drag = Some(match button {
                    PointerButton::Primary => DragMode::Rotate,
                    PointerButton::Secondary => DragMode::Pan,
                    PointerButton::Middle => DragMode::Dolly,
                });
                true
            }
            PointerEvent::Released(_) => self.drag.take().is_some(),
            PointerEvent::Moved { x, y } => {
                let position = Vec2::new(x, y);
                let previous = self.cursor.replace(position);
                match (self.drag, previous) {
                    (Some(mode), Some(previous)) => {
                        self.drag_by(mode, position - previous);
                        true
                    }
                    _ => false,
                }
            }
            PointerEvent::Wheel(delta) => {
                if delta > 0.0 {
                    self.dolly_in(self.zoom_scale());
                } else if delta < 0.0 {
                    self.dolly_out(self.zoom_scale());
                }
                delta != 0.0
            }
        }
    }

    fn drag_by(&mut self, mode: DragMode, delta: Vec2) {
        let height = self.viewport.y.max(1.0);
        match mode {
            DragMode::Rotate => {
                self.rotate_left(TAU * delta.x / height * self.rotate_speed);
                self.rotate_up(TAU * delta.y / height * self.rotate_speed);
            }
            DragMode::Pan => self.pending_pan += delta * self.pan_speed,
            DragMode::Dolly => {
                if delta.y > 0.0 {
                    self.dolly_out(self.zoom_scale());
                } else if delta.y < 0.0 {
                    self.dolly_in(self.zoom_scale());
                }
            }
        }
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.delta_theta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.delta_phi -= angle;
    }

    pub fn dolly_in(&mut self, scale: f32) {
        self.scale *= scale;
    }

    pub fn dolly_out(&mut self, scale: f32) {
        self.scale /= scale;
    }

    fn zoom_scale(&self) -> f32 {
        0.95f32.powf(self.zoom_speed)
    }

    /// Applies the accumulated input to `camera`. Returns true when the
    /// camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let previous_position = camera.position;
        let previous_target = self.target;

        if self.pending_pan != Vec2::ZERO {
            self.pan_offset += self.pan_world(camera, self.pending_pan);
            self.pending_pan = Vec2::ZERO;
        }

        let mut offset = camera.position - self.target;
        let radius = offset.length();
        let (mut theta, mut phi) = if radius > EPS {
            (offset.x.atan2(offset.z), (offset.y / radius).clamp(-1.0, 1.0).acos())
        } else {
            (0.0, PI / 2.0)
        };

        theta += self.delta_theta;
        phi = (phi + self.delta_phi)
            .clamp(self.min_polar_angle, self.max_polar_angle)
            .clamp(EPS, PI - EPS);
        let radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);

        self.target += self.pan_offset;
        let sin_phi = phi.sin();
        offset = Vec3::new(
            radius * sin_phi * theta.sin(),
            radius * phi.cos(),
            radius * sin_phi * theta.cos(),
        );

        camera.position = self.target + offset;
        camera.look_at(self.target);

        self.delta_theta = 0.0;
        self.delta_phi = 0.0;
        self.scale = 1.0;
        self.pan_offset = Vec3::ZERO;

        camera.position.distance_squared(previous_position) > EPS
            || self.target.distance_squared(previous_target) > EPS
    }

    fn pan_world(&self, camera: &PerspectiveCamera, delta: Vec2) -> Vec3 {
        let distance = (camera.position - self.target).length()
            * (camera.fov_y_degrees.to_radians() / 2.0).tan();
        let height = self.viewport.y.max(1.0);
        let forward = camera.forward();
        let right = forward.cross(camera.up).normalize_or_zero();
        let up = right.cross(forward).normalize_or_zero();

        let left = -right * (2.0 * delta.x * distance / height);
        let upward = up * (2.0 * delta.y * distance / height);
        left + upward
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> PerspectiveCamera {
        let mut camera = PerspectiveCamera::with_aspect(800.0 / 600.0);
        camera.position = Vec3::new(3.0, 3.0, 5.0);
        camera.look_at(Vec3::ZERO);
        camera
    }

    #[test]
    fn update_without_input_keeps_camera() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(&cam, Vec2::new(800.0, 600.0));
        assert!(!controls.update(&mut cam));
        assert!(cam.position.abs_diff_eq(Vec3::new(3.0, 3.0, 5.0), 1e-4));
    }

    #[test]
    fn wheel_dollies_towards_target() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(&cam, Vec2::new(800.0, 600.0));
        let before = cam.position.length();
        assert!(controls.handle_pointer(PointerEvent::Wheel(120.0)));
        controls.update(&mut cam);
        assert!((cam.position.length() - before * 0.95).abs() < 1e-4);
    }

    #[test]
    fn left_drag_orbits_at_constant_distance() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(&cam, Vec2::new(800.0, 600.0));
        let radius = cam.position.length();

        controls.handle_pointer(PointerEvent::Moved { x: 100.0, y: 100.0 });
        controls.handle_pointer(PointerEvent::Pressed(PointerButton::Primary));
        assert!(controls.handle_pointer(PointerEvent::Moved { x: 200.0, y: 100.0 }));
        controls.handle_pointer(PointerEvent::Released(PointerButton::Primary));

        assert!(controls.update(&mut cam));
        assert!((cam.position.length() - radius).abs() < 1e-4);
        assert_eq!(cam.target, Vec3::ZERO);
    }

    #[test]
    fn polar_angle_never_flips_over_the_pole() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(&cam, Vec2::new(800.0, 600.0));
        controls.rotate_up(10.0);
        controls.update(&mut cam);
        assert!(cam.position.y > 0.0);
        assert!(cam.position.x.is_finite() && cam.position.z.is_finite());
    }

    #[test]
    fn right_drag_pans_target() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(&cam, Vec2::new(800.0, 600.0));
        controls.handle_pointer(PointerEvent::Moved { x: 0.0, y: 0.0 });
        controls.handle_pointer(PointerEvent::Pressed(PointerButton::Secondary));
        controls.handle_pointer(PointerEvent::Moved { x: 50.0, y: 0.0 });
        controls.update(&mut cam);
        assert_ne!(controls.target, Vec3::ZERO);
        assert!((cam.position - controls.target).abs_diff_eq(Vec3::new(3.0, 3.0, 5.0), 1e-3));
    }

    #[test]
    fn drag_lasts_from_press_to_release() {
        let cam = camera();
        let mut controls = OrbitControls::new(&cam, Vec2::new(800.0, 600.0));
        assert!(!controls.is_dragging());

        assert!(controls.handle_pointer(PointerEvent::Pressed(PointerButton::Middle)));
        assert!(controls.is_dragging());

        assert!(controls.handle_pointer(PointerEvent::Released(PointerButton::Middle)));
        assert!(!controls.is_dragging());
        // A second release has nothing to end
        assert!(!controls.handle_pointer(PointerEvent::Released(PointerButton::Middle)));
    }

    #[test]
    fn moving_without_button_is_ignored() {
        let cam = camera();
        let mut controls = OrbitControls::new(&cam, Vec2::new(800.0, 600.0));
        assert!(!controls.handle_pointer(PointerEvent::Moved { x: 1.0, y: 1.0 }));
        assert!(!controls.handle_pointer(PointerEvent::Moved { x: 5.0, y: 1.0 }));
    }
}
