use crate::model::Vertex;

/// Borrowed view of the buffers produced by one update pass.
#[derive(Clone, Copy, Debug)]
pub struct MeshView<'a> {
    pub vertices: &'a [Vertex],
    pub indices: &'a [u32],
    pub draw_offsets: &'a [u32],
    pub vertices_changed: bool,
    pub indices_changed: bool,
}

impl<'a> MeshView<'a> {
    /// Index range of the i-th drawn line.
    pub fn draw_range(&self, i: usize) -> Option<std::ops::Range<usize>> {
        let start = *self.draw_offsets.get(i)? as usize;
        let end = *self.draw_offsets.get(i + 1)? as usize;
        Some(start..end)
    }

    pub fn vertex_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.vertices)
    }
}

/// Backend side of an update: receives the finished buffers. The layer never
/// looks at how they are consumed.
pub trait MeshSink {
    fn upload(&mut self, mesh: MeshView<'_>);
}

/// Keeps CPU copies of the latest buffers; skips copies of unchanged parts.
#[derive(Clone, Debug, Default)]
pub struct CpuMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub draw_offsets: Vec<u32>,
    pub uploads: u32,
}

impl MeshSink for CpuMesh {
    fn upload(&mut self, mesh: MeshView<'_>) {
        if mesh.vertices_changed {
            self.vertices.clear();
            self.vertices.extend_from_slice(mesh.vertices);
        }
        if mesh.indices_changed {
            self.indices.clear();
            self.indices.extend_from_slice(mesh.indices);
            self.draw_offsets.clear();
            self.draw_offsets.extend_from_slice(mesh.draw_offsets);
        }
        self.uploads += 1;
    }
}
