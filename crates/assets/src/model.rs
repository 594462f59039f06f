use glam::IVec3;

use crate::ModelError;

/// How a model's index list is grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    /// Two indices per face: a wireframe edge.
    Lines,
    /// Three indices per face: a filled triangle.
    Triangles,
}

impl Topology {
    pub fn indices_per_face(self) -> usize {
        match self {
            Topology::Lines => 2,
            Topology::Triangles => 3,
        }
    }

    fn from_word(word: u16) -> Result<Self, ModelError> {
        match word {
            2 => Ok(Topology::Lines),
            3 => Ok(Topology::Triangles),
            other => Err(ModelError::IndicesPerFace(other)),
        }
    }
}

/// Number of 16-bit words in a model header.
const HEADER_WORDS: usize = 8;
/// Most vertices whose coordinate count still fits in a header word.
pub const MAX_VERTICES: usize = u16::MAX as usize / 3;

/// Immutable geometry asset with a bounding sphere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    label: u16,
    topology: Topology,
    center: IVec3,
    radius: i32,
    /// Vertex numbers, `topology.indices_per_face()` per face.
    indices: Vec<u16>,
    vertices: Vec<IVec3>,
}

impl Model {
    /// Build a model, checking every index against the vertex list.
    pub fn new(
        label: u16,
        topology: Topology,
        center: IVec3,
        radius: i32,
        indices: Vec<u16>,
        vertices: Vec<IVec3>,
    ) -> Result<Self, ModelError> {
        if radius < 0 {
            return Err(ModelError::NegativeRadius(radius));
        }
        let per_face = topology.indices_per_face();
        if indices.len() % per_face != 0 {
            return Err(ModelError::PartialFace {
                count: indices.len(),
                per_face,
            });
        }
        let faces = indices.len() / per_face;
        if vertices.len() > MAX_VERTICES || faces > u16::MAX as usize {
            return Err(ModelError::TooLarge {
                vertices: vertices.len(),
                faces,
            });
        }
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(ModelError::IndexOutOfRange {
                index: bad as usize,
                vertex_count: vertices.len(),
            });
        }
        Ok(Self {
            label,
            topology,
            center,
            radius,
            indices,
            vertices,
        })
    }

    /// Parse one model from the front of `words`. Returns the model and the
    /// number of words it occupied.
    pub fn from_words(words: &[u16]) -> Result<(Self, usize), ModelError> {
        let need = |needed: usize| {
            if words.len() < needed {
                Err(ModelError::Truncated {
                    needed,
                    available: words.len(),
                })
            } else {
                Ok(())
            }
        };
        need(HEADER_WORDS)?;

        let vertex_numbers = words[0];
        let faces = words[1] as usize;
        let topology = Topology::from_word(words[2])?;
        let signed = |w: u16| w as i16 as i32;
        let center = IVec3::new(signed(words[3]), signed(words[4]), signed(words[5]));
        let radius = signed(words[6]);
        let label = words[7];

        if vertex_numbers % 3 != 0 {
            return Err(ModelError::VertexNumbers(vertex_numbers));
        }
        let index_slots = faces * topology.indices_per_face();
        let total = HEADER_WORDS + index_slots + vertex_numbers as usize;
        need(total)?;

        let slots = &words[HEADER_WORDS..HEADER_WORDS + index_slots];
        let coords = &words[HEADER_WORDS + index_slots..total];

        // Index slots address coordinates, three per vertex.
        let mut indices = Vec::with_capacity(slots.len());
        for &slot in slots {
            if slot % 3 != 0 {
                return Err(ModelError::MisalignedIndex(slot));
            }
            indices.push(slot / 3);
        }
        let vertices = coords
            .chunks_exact(3)
            .map(|c| IVec3::new(signed(c[0]), signed(c[1]), signed(c[2])))
            .collect();

        let model = Self::new(label, topology, center, radius, indices, vertices)?;
        Ok((model, total))
    }

    /// Serialise back into the flat word layout. Counts fit their header
    /// words because [`Model::new`] bounds them.
    pub fn to_words(&self) -> Vec<u16> {
        let mut out = Vec::with_capacity(HEADER_WORDS + self.indices.len() + self.vertices.len() * 3);
        out.push((self.vertices.len() * 3) as u16);
        out.push(self.face_count() as u16);
        out.push(self.topology.indices_per_face() as u16);
        out.extend([self.center.x, self.center.y, self.center.z, self.radius].map(|v| v as i16 as u16));
        out.push(self.label);
        out.extend(self.indices.iter().map(|&i| i * 3));
        for v in &self.vertices {
            out.extend([v.x, v.y, v.z].map(|c| c as i16 as u16));
        }
        out
    }

    /// Axis-aligned wireframe cube of 8 vertices and 12 edges centred on the
    /// origin.
    pub fn wire_cube(label: u16, half_extent: i16) -> Self {
        let edges: Vec<u16> = vec![
            0, 1, 2, 3, 4, 5, 6, 7, // along z
            0, 2, 1, 3, 4, 6, 5, 7, // along y
            0, 4, 1, 5, 2, 6, 3, 7, // along x
        ];
        Self::cube(label, half_extent, Topology::Lines, edges)
    }

    /// Solid cube of 12 triangles, wound so outward faces survive backface
    /// culling.
    pub fn solid_cube(label: u16, half_extent: i16) -> Self {
        let quads: [[u16; 4]; 6] = [
            [0, 2, 6, 4], // -z
            [1, 5, 7, 3], // +z
            [0, 1, 3, 2], // -x
            [4, 6, 7, 5], // +x
            [0, 4, 5, 1], // -y
            [2, 3, 7, 6], // +y
        ];
        let tris = quads
            .iter()
            .flat_map(|q| [q[0], q[1], q[2], q[0], q[2], q[3]])
            .collect();
        Self::cube(label, half_extent, Topology::Triangles, tris)
    }

    /// Vertex `n` sits at bit 2 = +x, bit 1 = +y, bit 0 = +z.
    fn cube(label: u16, half_extent: i16, topology: Topology, indices: Vec<u16>) -> Self {
        let h = half_extent.unsigned_abs() as i32;
        let vertices = (0..8)
            .map(|n| {
                let s = |bit: i32| if n & bit != 0 { h } else { -h };
                IVec3::new(s(4), s(2), s(1))
            })
            .collect();
        // ceil(h * sqrt(3))
        let radius = (h * 1774 + 1023) / 1024;
        Self {
            label,
            topology,
            center: IVec3::ZERO,
            radius,
            indices,
            vertices,
        }
    }

    /// Copy of this model moved by `offset`, bounding sphere included.
    pub fn translated(&self, offset: IVec3) -> Self {
        Self {
            label: self.label,
            topology: self.topology,
            center: self.center + offset,
            radius: self.radius,
            indices: self.indices.clone(),
            vertices: self.vertices.iter().map(|&v| v + offset).collect(),
        }
    }

    pub fn label(&self) -> u16 {
        self.label
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn center(&self) -> IVec3 {
        self.center
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    pub fn vertices(&self) -> &[IVec3] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.indices.len() / self.topology.indices_per_face()
    }

    /// Faces as index slices of length `indices_per_face`.
    pub fn faces(&self) -> impl Iterator<Item = &[u16]> {
        self.indices.chunks_exact(self.topology.indices_per_face())
    }

    /// Every edge as a vertex-number pair: the faces themselves for line
    /// models, the three sides of each triangle otherwise.
    pub fn edges(&self) -> impl Iterator<Item = (u16, u16)> + '_ {
        let topology = self.topology;
        self.faces().flat_map(move |f| {
            let sides = match topology {
                Topology::Lines => [Some((f[0], f[1])), None, None],
                Topology::Triangles => [Some((f[0], f[1])), Some((f[1], f[2])), Some((f[2], f[0]))],
            };
            sides.into_iter().flatten()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_words() -> Vec<u16> {
        // 3 vertices, 1 face, triangles, center (1,2,3), radius 40, label 7
        let mut w = vec![9, 1, 3, 1, 2, 3, 40, 7];
        w.extend([0, 3, 6]);
        w.extend([0, 0, 0, 10, 0, 0, (-10i16) as u16, 20, 5]);
        w
    }

    #[test]
    fn parse_triangle_model() {
        let words = triangle_words();
        let (m, used) = Model::from_words(&words).unwrap();
        assert_eq!(used, words.len());
        assert_eq!(m.label(), 7);
        assert_eq!(m.topology(), Topology::Triangles);
        assert_eq!(m.center(), IVec3::new(1, 2, 3));
        assert_eq!(m.radius(), 40);
        assert_eq!(m.indices(), &[0, 1, 2]);
        assert_eq!(m.vertices()[2], IVec3::new(-10, 20, 5));
        assert_eq!(m.face_count(), 1);
    }

    #[test]
    fn words_round_trip() {
        let words = triangle_words();
        let (m, _) = Model::from_words(&words).unwrap();
        assert_eq!(m.to_words(), words);
    }

    #[test]
    fn rejects_truncated_buffer() {
        let words = triangle_words();
        let err = Model::from_words(&words[..words.len() - 1]).unwrap_err();
        assert!(matches!(err, ModelError::Truncated { .. }));
        let err = Model::from_words(&words[..4]).unwrap_err();
        assert!(matches!(err, ModelError::Truncated { needed: 8, .. }));
    }

    #[test]
    fn rejects_bad_layout() {
        let mut words = triangle_words();
        words[2] = 4;
        assert!(matches!(
            Model::from_words(&words),
            Err(ModelError::IndicesPerFace(4))
        ));

        let mut words = triangle_words();
        words[9] = 4;
        assert!(matches!(
            Model::from_words(&words),
            Err(ModelError::MisalignedIndex(4))
        ));

        let mut words = triangle_words();
        words[10] = 9;
        assert!(matches!(
            Model::from_words(&words),
            Err(ModelError::IndexOutOfRange { index: 3, .. })
        ));
    }

    #[test]
    fn new_validates_radius_and_faces() {
        let verts = vec![IVec3::ZERO, IVec3::X];
        assert!(matches!(
            Model::new(0, Topology::Lines, IVec3::ZERO, -1, vec![0, 1], verts.clone()),
            Err(ModelError::NegativeRadius(-1))
        ));
        assert!(matches!(
            Model::new(0, Topology::Lines, IVec3::ZERO, 1, vec![0], verts),
            Err(ModelError::PartialFace { .. })
        ));
    }

    #[test]
    fn new_rejects_models_too_large_for_the_layout() {
        let many = vec![IVec3::ZERO; MAX_VERTICES + 1];
        assert!(matches!(
            Model::new(0, Topology::Lines, IVec3::ZERO, 0, vec![0, 0], many),
            Err(ModelError::TooLarge { vertices: 21_846, faces: 1 })
        ));

        let faces = vec![0u16; 2 * (u16::MAX as usize + 1)];
        assert!(matches!(
            Model::new(0, Topology::Lines, IVec3::ZERO, 0, faces, vec![IVec3::ZERO]),
            Err(ModelError::TooLarge { faces: 65_536, .. })
        ));

        // the largest model still serialises with exact counts
        let last = (MAX_VERTICES - 1) as u16;
        let model = Model::new(
            0,
            Topology::Lines,
            IVec3::ZERO,
            0,
            vec![0, last],
            vec![IVec3::ZERO; MAX_VERTICES],
        )
        .unwrap();
        let words = model.to_words();
        assert_eq!(words[0], 65_535);
        assert_eq!(words[9], last * 3);
    }

    #[test]
    fn wire_cube_shape() {
        let cube = Model::wire_cube(1, 100);
        assert_eq!(cube.vertex_count(), 8);
        assert_eq!(cube.face_count(), 12);
        assert_eq!(cube.edges().count(), 12);
        assert_eq!(cube.radius(), 174);
        for (a, b) in cube.edges() {
            let d = cube.vertices()[a as usize] - cube.vertices()[b as usize];
            // each edge runs along exactly one axis
            assert_eq!(d.abs().to_array().iter().filter(|&&c| c == 200).count(), 1);
        }
    }

    #[test]
    fn solid_cube_edges_cover_triangles() {
        let cube = Model::solid_cube(2, 50);
        assert_eq!(cube.face_count(), 12);
        assert_eq!(cube.edges().count(), 36);
        assert!(cube.indices().iter().all(|&i| i < 8));
    }

    #[test]
    fn translated_moves_geometry_and_bounds() {
        let cube = Model::wire_cube(3, 10);
        let moved = cube.translated(IVec3::new(0, 0, 500));
        assert_eq!(moved.center(), IVec3::new(0, 0, 500));
        assert_eq!(moved.radius(), cube.radius());
        assert_eq!(moved.indices(), cube.indices());
        assert_eq!(moved.vertices()[0], cube.vertices()[0] + IVec3::new(0, 0, 500));
    }
}
