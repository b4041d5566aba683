//! Held-key tracking and the per-frame movement it drives.
//!
//! Key state is maintained from window events but consumed by polling once
//! per frame, so a key held across N frames applies its translation N times
//! regardless of the platform's key-repeat rate.

use std::collections::HashSet;

use glam::Vec3;
use winit::event::ElementState;
use winit::keyboard::KeyCode;

use crate::transform::SceneTransform;

/// Translation applied per frame for each held movement key.
pub const MOVE_STEP: f32 = 0.005;

/// Currently held keys, fed by winit keyboard events.
#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<KeyCode>,
}

impl InputState {
    /// Record a key press or release.
    ///
    /// Repeated press events for an already-held key are absorbed by the
    /// set, so OS key repeat never double-applies a movement.
    pub fn key_changed(&mut self, code: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.held.insert(code);
            }
            ElementState::Released => {
                self.held.remove(&code);
            }
        }
    }

    /// Track window focus. Losing focus clears the held set; release
    /// events delivered to another window would otherwise leave keys stuck.
    pub fn focus_changed(&mut self, focused: bool) {
        if !focused {
            self.held.clear();
        }
    }

    /// Whether a key is currently held.
    #[must_use]
    pub fn held(&self, code: KeyCode) -> bool {
        self.held.contains(&code)
    }

    /// Whether the close key (Escape) is held this frame.
    #[must_use]
    pub fn close_requested(&self) -> bool {
        self.held(KeyCode::Escape)
    }

    /// Apply one frame's worth of movement to the scene transform.
    ///
    /// W/A/S/D translate along +Y/-X/-Y/+X respectively; every held key
    /// applies its full step, with no normalization for diagonals.
    pub fn apply_movement(&self, transform: &mut SceneTransform) {
        if self.held(KeyCode::KeyW) {
            transform.translate_by(Vec3::new(0.0, MOVE_STEP, 0.0));
        }
        if self.held(KeyCode::KeyA) {
            transform.translate_by(Vec3::new(-MOVE_STEP, 0.0, 0.0));
        }
        if self.held(KeyCode::KeyS) {
            transform.translate_by(Vec3::new(0.0, -MOVE_STEP, 0.0));
        }
        if self.held(KeyCode::KeyD) {
            transform.translate_by(Vec3::new(MOVE_STEP, 0.0, 0.0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_translation(transform: &SceneTransform, expected: Vec3) {
        let actual = transform.translation();
        assert!(
            (actual - expected).abs().max_element() < 1e-6,
            "expected {expected:?}, got {actual:?}",
        );
    }

    #[test]
    fn press_and_release_toggle_held() {
        let mut input = InputState::default();
        input.key_changed(KeyCode::KeyW, ElementState::Pressed);
        assert!(input.held(KeyCode::KeyW));
        input.key_changed(KeyCode::KeyW, ElementState::Released);
        assert!(!input.held(KeyCode::KeyW));
    }

    #[test]
    fn held_w_translates_up_each_frame() {
        let mut input = InputState::default();
        input.key_changed(KeyCode::KeyW, ElementState::Pressed);

        let mut transform = SceneTransform::new();
        let frames = 20;
        for _ in 0..frames {
            input.apply_movement(&mut transform);
        }

        #[expect(clippy::cast_precision_loss)]
        let expected = MOVE_STEP * frames as f32;
        assert_translation(&transform, Vec3::new(0.0, expected, 0.0));
    }

    #[test]
    fn each_movement_key_maps_to_its_axis() {
        let cases = [
            (KeyCode::KeyW, Vec3::new(0.0, MOVE_STEP, 0.0)),
            (KeyCode::KeyA, Vec3::new(-MOVE_STEP, 0.0, 0.0)),
            (KeyCode::KeyS, Vec3::new(0.0, -MOVE_STEP, 0.0)),
            (KeyCode::KeyD, Vec3::new(MOVE_STEP, 0.0, 0.0)),
        ];
        for (code, expected) in cases {
            let mut input = InputState::default();
            input.key_changed(code, ElementState::Pressed);
            let mut transform = SceneTransform::new();
            input.apply_movement(&mut transform);
            assert_translation(&transform, expected);
        }
    }

    #[test]
    fn simultaneous_keys_each_apply() {
        let mut input = InputState::default();
        input.key_changed(KeyCode::KeyW, ElementState::Pressed);
        input.key_changed(KeyCode::KeyD, ElementState::Pressed);

        let mut transform = SceneTransform::new();
        input.apply_movement(&mut transform);

        assert_translation(&transform, Vec3::new(MOVE_STEP, MOVE_STEP, 0.0));
    }

    #[test]
    fn key_repeat_does_not_double_apply() {
        let mut input = InputState::default();
        input.key_changed(KeyCode::KeyD, ElementState::Pressed);
        // OS key repeat re-sends presses while held.
        input.key_changed(KeyCode::KeyD, ElementState::Pressed);
        input.key_changed(KeyCode::KeyD, ElementState::Pressed);

        let mut transform = SceneTransform::new();
        input.apply_movement(&mut transform);

        assert_translation(&transform, Vec3::new(MOVE_STEP, 0.0, 0.0));
    }

    #[test]
    fn escape_requests_close() {
        let mut input = InputState::default();
        assert!(!input.close_requested());
        input.key_changed(KeyCode::Escape, ElementState::Pressed);
        assert!(input.close_requested());
    }

    #[test]
    fn focus_loss_clears_held_keys() {
        let mut input = InputState::default();
        input.key_changed(KeyCode::KeyA, ElementState::Pressed);
        input.focus_changed(false);
        assert!(!input.held(KeyCode::KeyA));

        let mut transform = SceneTransform::new();
        input.apply_movement(&mut transform);
        assert_translation(&transform, Vec3::ZERO);
    }

    #[test]
    fn hold_d_then_s_for_ten_frames_each() {
        let mut input = InputState::default();
        let mut transform = SceneTransform::new();

        input.key_changed(KeyCode::KeyD, ElementState::Pressed);
        for _ in 0..10 {
            input.apply_movement(&mut transform);
        }
        input.key_changed(KeyCode::KeyD, ElementState::Released);

        input.key_changed(KeyCode::KeyS, ElementState::Pressed);
        for _ in 0..10 {
            input.apply_movement(&mut transform);
        }
        input.key_changed(KeyCode::KeyS, ElementState::Released);

        assert_translation(&transform, Vec3::new(0.05, -0.05, 0.0));
    }
}
