//! Fixed geometry for the hand-drawn figure and its outline.
//!
//! Both render variants share one set of vertex positions; they differ only
//! in which index sequence walks those positions (triangle list for the
//! fill, line strip for the outline).

use bytemuck::{Pod, Zeroable};

/// A vertex position, ready for the GPU.
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
#[repr(C)]
pub struct Vertex {
    /// Position in normalized device coordinates (before scale/transform).
    pub position: [f32; 3],
}

const fn v(x: f32, y: f32, z: f32) -> Vertex {
    Vertex { position: [x, y, z] }
}

/// All points used by both the figure and its outline.
const FIGURE_VERTICES: [Vertex; 17] = [
    v(-0.5, -0.5, 0.0),
    v(-0.5, 0.0, 0.0),
    v(0.0, 0.0, 0.0),
    v(0.5, 0.0, 0.0),
    v(0.5, -0.5, 0.0),
    v(0.25, -0.25, 0.0),
    v(-0.25, -0.25, 0.0),
    v(0.7, 0.2, 0.0),
    v(0.55, 0.25, 0.0),
    v(0.75, 0.4, 0.0),
    v(-0.5, -0.15, 0.0),
    v(-0.5, 0.15, 0.0),
    v(-0.8, -0.15, 0.0),
    v(-0.8, 0.15, 0.0),
    v(-0.5, 0.45, 0.0),
    v(-0.8, 0.55, 0.0),
    v(-0.6286, 0.3214, 0.0),
];

/// Triangle list for the filled figure (9 triangles).
const FILL_INDICES: [u32; 27] = [
    0, 1, 2, //
    2, 3, 4, //
    5, 6, 2, //
    3, 7, 8, //
    7, 8, 9, //
    10, 11, 12, //
    11, 12, 13, //
    16, 13, 15, //
    11, 13, 14,
];

/// Line strip tracing the figure's outline.
const OUTLINE_INDICES: [u32; 27] = [
    8, 9, 7, 3, 8, 3, 4, 5, 6, 0, 1, 3, 2, 5, 6, 2, 1, 10, 12, 13, 11, 10, 11, 14, 13, 15, 16,
];

/// Vertex positions plus the two index sequences that draw them.
///
/// Construction validates that every index references an existing vertex;
/// the contents are immutable afterwards, so the invariant holds for the
/// mesh's lifetime.
#[derive(Debug)]
pub struct FigureMesh {
    vertices: Vec<Vertex>,
    fill_indices: Vec<u32>,
    outline_indices: Vec<u32>,
}

impl FigureMesh {
    /// Create a mesh, checking both index sequences against the vertex count.
    ///
    /// # Errors
    ///
    /// Returns a description of the first out-of-range index found, or of a
    /// vertex count too large for `u32` indexing.
    pub fn new(
        vertices: Vec<Vertex>,
        fill_indices: Vec<u32>,
        outline_indices: Vec<u32>,
    ) -> Result<Self, String> {
        let vertex_count = u32::try_from(vertices.len())
            .map_err(|_| format!("vertex count {} exceeds u32 index range", vertices.len()))?;

        for (buffer, indices) in [("fill", &fill_indices), ("outline", &outline_indices)] {
            if let Some(&index) = indices.iter().find(|&&index| index >= vertex_count) {
                return Err(format!(
                    "{buffer} index {index} is out of range for {vertex_count} vertices"
                ));
            }
        }

        Ok(Self {
            vertices,
            fill_indices,
            outline_indices,
        })
    }

    /// The built-in hand-drawn figure.
    ///
    /// # Panics
    ///
    /// Panics if the built-in vertex/index constants violate the index-range
    /// invariant, which indicates a bug in this module.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(
            FIGURE_VERTICES.to_vec(),
            FILL_INDICES.to_vec(),
            OUTLINE_INDICES.to_vec(),
        )
        .expect("built-in figure mesh violates the index-range invariant")
    }

    /// Vertex positions shared by both variants.
    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Triangle-list indices for the filled figure.
    #[must_use]
    pub fn fill_indices(&self) -> &[u32] {
        &self.fill_indices
    }

    /// Line-strip indices for the outline.
    #[must_use]
    pub fn outline_indices(&self) -> &[u32] {
        &self.outline_indices
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn builtin_mesh_counts() {
        let mesh = FigureMesh::builtin();
        assert_eq!(mesh.vertices().len(), 17);
        assert_eq!(mesh.fill_indices().len(), 27);
        assert_eq!(mesh.outline_indices().len(), 27);
    }

    #[test]
    fn fill_indices_form_whole_triangles() {
        let mesh = FigureMesh::builtin();
        assert_eq!(mesh.fill_indices().len() % 3, 0);
    }

    #[test]
    fn all_indices_reference_existing_vertices() {
        let mesh = FigureMesh::builtin();
        let count = u32::try_from(mesh.vertices().len()).unwrap();
        assert!(mesh.fill_indices().iter().all(|&i| i < count));
        assert!(mesh.outline_indices().iter().all(|&i| i < count));
    }

    #[test]
    fn out_of_range_fill_index_is_rejected() {
        let vertices = vec![v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0)];
        let err = FigureMesh::new(vertices, vec![0, 1, 2], vec![]).unwrap_err();
        assert!(err.contains("fill index 2"), "unexpected error: {err}");
    }

    #[test]
    fn out_of_range_outline_index_is_rejected() {
        let vertices = vec![v(0.0, 0.0, 0.0)];
        let err = FigureMesh::new(vertices, vec![], vec![1]).unwrap_err();
        assert!(err.contains("outline index 1"), "unexpected error: {err}");
    }

    #[test]
    fn mesh_is_debug_printable() {
        // `unwrap_err` on `Result<FigureMesh, _>` needs the Debug derive.
        let rendered = format!("{:?}", FigureMesh::builtin());
        assert!(rendered.contains("FigureMesh"));
    }

    #[test]
    fn vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 3 * std::mem::size_of::<f32>());
    }

    #[test]
    fn figure_is_flat() {
        let mesh = FigureMesh::builtin();
        assert!(mesh.vertices().iter().all(|v| v.position[2].abs() < f32::EPSILON));
    }
}
