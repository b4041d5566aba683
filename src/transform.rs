//! The accumulated scene transform and the aspect-correction scale.

use glam::{Mat4, Vec3};

/// Whole-scene transform accumulated over the process lifetime.
///
/// Starts at identity and picks up one translation per held movement key per
/// frame. It is never reset or clamped; translation is unbounded and
/// cumulative.
#[derive(Debug, Clone)]
pub struct SceneTransform {
    matrix: Mat4,
}

impl SceneTransform {
    /// The identity transform.
    #[must_use]
    pub fn new() -> Self {
        Self {
            matrix: Mat4::IDENTITY,
        }
    }

    /// Append a translation to the accumulated transform.
    ///
    /// Matches `transform = transform * T(delta)`; for a matrix that only
    /// ever accumulates translations this is a plain component-wise sum of
    /// the translation column.
    pub fn translate_by(&mut self, delta: Vec3) {
        self.matrix *= Mat4::from_translation(delta);
    }

    /// The accumulated translation component.
    #[must_use]
    pub fn translation(&self) -> Vec3 {
        self.matrix.w_axis.truncate()
    }

    /// Column-major matrix elements, as the `transform` uniform expects them.
    #[must_use]
    pub fn to_uniform(&self) -> [f32; 16] {
        self.matrix.to_cols_array()
    }
}

impl Default for SceneTransform {
    fn default() -> Self {
        Self::new()
    }
}

/// Non-uniform scale compensating for the window's aspect ratio.
///
/// Computed every frame from the current window dimensions as
/// `(height / width, 1, 1)` and applied to vertex positions before the scene
/// transform, so the figure keeps its proportions in non-square windows.
/// A zero width (minimized window) yields the neutral `(1, 1, 1)`.
#[must_use]
pub fn aspect_scale(width: u32, height: u32) -> [f32; 3] {
    if width == 0 {
        return [1.0, 1.0, 1.0];
    }
    // Window dimensions are far below the f32 mantissa range.
    #[expect(clippy::cast_precision_loss)]
    let ratio = height as f32 / width as f32;
    [ratio, 1.0, 1.0]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec3_eq(actual: Vec3, expected: Vec3) {
        assert!(
            (actual - expected).abs().max_element() < 1e-6,
            "expected {expected:?}, got {actual:?}",
        );
    }

    #[test]
    fn starts_at_identity() {
        let transform = SceneTransform::new();
        assert_vec3_eq(transform.translation(), Vec3::ZERO);
        for (actual, expected) in transform.to_uniform().iter().zip(Mat4::IDENTITY.to_cols_array())
        {
            assert!((actual - expected).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn translations_accumulate() {
        let mut transform = SceneTransform::new();
        transform.translate_by(Vec3::new(0.25, 0.0, 0.0));
        transform.translate_by(Vec3::new(0.0, -0.5, 0.0));
        transform.translate_by(Vec3::new(0.25, 0.0, 0.0));
        assert_vec3_eq(transform.translation(), Vec3::new(0.5, -0.5, 0.0));
    }

    #[test]
    fn uniform_export_is_column_major() {
        let mut transform = SceneTransform::new();
        transform.translate_by(Vec3::new(0.1, 0.2, 0.3));
        let elements = transform.to_uniform();
        // Translation lives in the last column for a column-major layout.
        assert!((elements[12] - 0.1).abs() < 1e-6);
        assert!((elements[13] - 0.2).abs() < 1e-6);
        assert!((elements[14] - 0.3).abs() < 1e-6);
        assert!((elements[15] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn aspect_scale_matches_height_over_width() {
        let scale = aspect_scale(400, 800);
        assert!((scale[0] - 2.0).abs() < f32::EPSILON);
        assert!((scale[1] - 1.0).abs() < f32::EPSILON);
        assert!((scale[2] - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn aspect_scale_for_default_window() {
        let scale = aspect_scale(800, 600);
        assert!((scale[0] - 0.75).abs() < f32::EPSILON);
    }

    #[test]
    fn aspect_scale_square_window_is_neutral() {
        let scale = aspect_scale(512, 512);
        assert!((scale[0] - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn aspect_scale_zero_width_is_neutral() {
        assert!((aspect_scale(0, 600)[0] - 1.0).abs() < f32::EPSILON);
    }
}
