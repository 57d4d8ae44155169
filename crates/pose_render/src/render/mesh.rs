//! Mesh representation for 3D models
//!
//! Plain triangle soup: a vertex array and a flat index list with three
//! indices per triangle. Meshes are model-space only; placement lives on the
//! object instance that references them. Face normals are derived from the
//! winding at render time, so vertices carry positions only.

/// 3D vertex data structure for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in model space
    pub position: [f32; 3],
}

impl Vertex {
    /// Create a new vertex
    pub const fn new(position: [f32; 3]) -> Self {
        Self { position }
    }
}

/// Triangle mesh
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Object name the mesh was registered under
    pub name: String,

    /// Vertex data
    pub vertices: Vec<Vertex>,

    /// Index data for triangles
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new mesh
    pub fn new(name: impl Into<String>, vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            vertices,
            indices,
        }
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate triangles as vertex triples
    ///
    /// Index triples pointing outside the vertex array are skipped; the
    /// loader never produces them.
    pub fn triangles(&self) -> impl Iterator<Item = [&Vertex; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(move |tri| {
            let a = self.vertices.get(tri[0] as usize)?;
            let b = self.vertices.get(tri[1] as usize)?;
            let c = self.vertices.get(tri[2] as usize)?;
            Some([a, b, c])
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Square of side 2 in the z = 0 plane, facing +Z
    pub(crate) fn quad(name: &str) -> Mesh {
        let vertices = [[-1.0, -1.0, 0.0], [1.0, -1.0, 0.0], [1.0, 1.0, 0.0], [-1.0, 1.0, 0.0]]
            .map(Vertex::new)
            .to_vec();
        Mesh::new(name, vertices, vec![0, 1, 2, 2, 3, 0])
    }

    #[test]
    fn test_quad_topology() {
        let mesh = quad("quad");
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.triangles().count(), 2);
        assert_eq!(mesh.triangles().nth(1).unwrap()[1].position, [-1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_out_of_range_triangles_skipped() {
        let mesh = Mesh::new("broken", vec![Vertex::new([0.0; 3])], vec![0, 0, 7]);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.triangles().count(), 0);
    }
}
