pub mod config;
pub mod error;
pub mod model;
pub mod sink;
pub mod style;
pub mod geometry {
    pub mod align;
    pub mod limits;
}
pub mod algorithms {
    pub mod compact;
    pub mod mesh;
    pub mod neighbors;
    pub mod runs;
}

use algorithms::compact::{compact, CompactStats};
use algorithms::mesh::{build_indices, build_vertices, Mesh, VertexPass};
use algorithms::neighbors::{self, PointUse};
use algorithms::runs::RunStore;
use bitflags::bitflags;
use config::LayerConfig;
use error::LineError;
use geometry::limits;
use log::{debug, trace};
use model::{Alignment, Color, IndexSlot, LineData, NodeInputs, Padding, Point, Run, Vec2};
use serde::Serialize;
use sink::{MeshSink, MeshView};
use style::LineStyleTable;

bitflags! {
    /// What changed since the last update. Callers pass the node-side bits;
    /// the layer adds its own pending data bits.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct UpdateStates: u8 {
        /// Visible set or draw order changed.
        const NODE_ORDER = 1 << 0;
        const NODE_OFFSET_SIZE = 1 << 1;
        const NODE_ENABLED = 1 << 2;
        const NODE_OPACITY = 1 << 3;
        /// Line topology changed; rebuilds both buffers.
        const DATA = 1 << 4;
        /// Per-line color, style, alignment or padding changed.
        const VERTICES = 1 << 5;
        /// Unused runs are waiting for compaction.
        const COMPACT = 1 << 6;
    }
}

impl UpdateStates {
    fn needs_indices(self) -> bool {
        self.intersects(UpdateStates::DATA | UpdateStates::NODE_ORDER)
    }

    fn needs_vertices(self) -> bool {
        self.intersects(
            UpdateStates::DATA
                | UpdateStates::VERTICES
                | UpdateStates::NODE_OFFSET_SIZE
                | UpdateStates::NODE_ENABLED
                | UpdateStates::NODE_OPACITY,
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LayerStats {
    pub lines: u32,
    pub runs: u32,
    pub unused_runs: u32,
    pub points: u32,
    pub slots: u32,
}

#[derive(Clone, Copy, Debug)]
enum Topology<'a> {
    Explicit(&'a [u32]),
    Strip,
    Loop,
}

pub struct LineLayer {
    pub(crate) lines: Vec<Option<LineData>>, // id is index
    pub(crate) free: Vec<u32>,
    pub(crate) store: RunStore,
    pub(crate) mesh: Mesh,
    pub(crate) style_count: u32,
    pub(crate) config: LayerConfig,
    pub(crate) pending: UpdateStates,
    pub(crate) synced_style_ver: u64,
    pub(crate) disabled_transition: Option<fn(u32) -> u32>,
    // Populate scratch, validated before any arena is touched
    scratch_indices: Vec<u32>,
    scratch_neighbors: Vec<u32>,
    scratch_uses: Vec<PointUse>,
}

impl LineLayer {
    pub fn new(style_count: u32) -> Self {
        Self::with_config(style_count, LayerConfig::default())
    }

    pub fn with_config(style_count: u32, config: LayerConfig) -> Self {
        LineLayer {
            lines: Vec::new(),
            free: Vec::new(),
            store: RunStore::with_capacity(
                config.initial_point_capacity,
                config.initial_index_capacity,
            ),
            mesh: Mesh::default(),
            style_count,
            config,
            // first update always emits the (possibly empty) draw-offset table
            pending: UpdateStates::DATA | UpdateStates::NODE_ORDER,
            synced_style_ver: 0,
            disabled_transition: None,
            scratch_indices: Vec::new(),
            scratch_neighbors: Vec::new(),
            scratch_uses: Vec::new(),
        }
    }

    pub fn config(&self) -> &LayerConfig {
        &self.config
    }

    pub fn style_count(&self) -> u32 {
        self.style_count
    }

    /// Pending state the next update will act on, besides what the caller passes.
    pub fn pending(&self) -> UpdateStates {
        self.pending
    }

    /// Style used for lines attached to disabled nodes. `None` keeps the
    /// line's own style.
    pub fn set_disabled_style_transition(&mut self, f: Option<fn(u32) -> u32>) {
        self.disabled_transition = f;
        self.pending |= UpdateStates::VERTICES;
    }

    fn check_style(&self, style: u32) -> Result<(), LineError> {
        if style >= self.style_count {
            return Err(LineError::StyleOutOfRange {
                style,
                style_count: self.style_count,
            });
        }
        Ok(())
    }

    fn line(&self, id: u32) -> Result<&LineData, LineError> {
        self.lines
            .get(id as usize)
            .and_then(|l| l.as_ref())
            .ok_or(LineError::InvalidId { kind: "line", id })
    }

    fn line_mut(&mut self, id: u32) -> Result<&mut LineData, LineError> {
        self.lines
            .get_mut(id as usize)
            .and_then(|l| l.as_mut())
            .ok_or(LineError::InvalidId { kind: "line", id })
    }

    // Validates input and fills the scratch indices/neighbors. Touches nothing else.
    fn prepare(
        &mut self,
        topology: Topology<'_>,
        points: &[Vec2],
        colors: &[Color],
    ) -> Result<(), LineError> {
        if points.len() > limits::MAX_POINTS_PER_LINE {
            return Err(LineError::CapsExceeded("points"));
        }
        if !colors.is_empty() && colors.len() != points.len() {
            return Err(LineError::ColorCountMismatch {
                expected: points.len(),
                got: colors.len(),
            });
        }
        if points
            .iter()
            .any(|p| !limits::in_coord_bounds(p.x) || !limits::in_coord_bounds(p.y))
        {
            return Err(LineError::NonFinite { param: "points" });
        }
        if colors.iter().any(|c| !c.is_finite()) {
            return Err(LineError::NonFinite { param: "colors" });
        }
        let point_count = points.len() as u32;
        match topology {
            Topology::Explicit(indices) => {
                if indices.len() > limits::MAX_INDICES_PER_LINE {
                    return Err(LineError::CapsExceeded("indices"));
                }
                neighbors::explicit_neighbors(
                    indices,
                    point_count,
                    &mut self.scratch_uses,
                    &mut self.scratch_neighbors,
                )?;
                self.scratch_indices.clear();
                self.scratch_indices.extend_from_slice(indices);
            }
            Topology::Strip => {
                neighbors::strip_index_count(points.len())?;
                neighbors::fill_strip_indices(point_count, &mut self.scratch_indices);
                neighbors::strip_neighbors(point_count, &mut self.scratch_neighbors);
            }
            Topology::Loop => {
                neighbors::loop_index_count(points.len())?;
                neighbors::fill_loop_indices(point_count, &mut self.scratch_indices);
                neighbors::loop_neighbors(point_count, &mut self.scratch_neighbors);
            }
        }
        if self.store.point_len() + points.len() > limits::MAX_ARENA_LEN
            || self.store.slot_len() + self.scratch_indices.len() > limits::MAX_ARENA_LEN
        {
            return Err(LineError::CapsExceeded("arena"));
        }
        Ok(())
    }

    // Writes the prepared scratch into the line's run, reusing it when sizes match.
    fn commit(&mut self, id: u32, points: &[Vec2], colors: &[Color]) {
        let point_count = points.len() as u32;
        let index_count = self.scratch_indices.len() as u32;
        let current = self.lines[id as usize].map(|l| l.run);
        let run = match current {
            Some(run) if self.store.fits(run, point_count, index_count) => run,
            other => {
                if let Some(old) = other {
                    debug!(
                        "line {} resized to {} points / {} indices, replacing run {}",
                        id, point_count, index_count, old
                    );
                    self.store.mark_unused(old);
                    self.pending |= UpdateStates::COMPACT;
                }
                let run = self.store.allocate(point_count, index_count, id);
                if let Some(Some(line)) = self.lines.get_mut(id as usize) {
                    line.run = run;
                }
                run
            }
        };

        let (dst_points, dst_slots, join_count) = self.store.run_data_mut(run);
        for (i, (dst, &position)) in dst_points.iter_mut().zip(points).enumerate() {
            *dst = Point {
                position,
                color: colors.get(i).copied().unwrap_or(Color::WHITE),
            };
        }
        for ((dst, &point), &neighbor) in dst_slots
            .iter_mut()
            .zip(&self.scratch_indices)
            .zip(&self.scratch_neighbors)
        {
            *dst = IndexSlot { point, neighbor };
        }
        *join_count = neighbors::join_count(&self.scratch_neighbors);

        self.pending |= UpdateStates::DATA;
        if self.config.eager_compaction && self.pending.contains(UpdateStates::COMPACT) {
            self.compact();
        }
    }

    fn create(
        &mut self,
        style: u32,
        topology: Topology<'_>,
        points: &[Vec2],
        colors: &[Color],
        node: u32,
    ) -> Result<u32, LineError> {
        self.check_style(style)?;
        if self.free.is_empty() && self.lines.len() >= limits::MAX_LINES {
            return Err(LineError::CapsExceeded("lines"));
        }
        self.prepare(topology, points, colors)?;
        let id = match self.free.pop() {
            Some(id) => id,
            None => {
                self.lines.push(None);
                (self.lines.len() - 1) as u32
            }
        };
        let run = self.store.allocate(points.len() as u32, self.scratch_indices.len() as u32, id);
        self.lines[id as usize] = Some(LineData::new(run, node, style));
        self.commit(id, points, colors);
        Ok(id)
    }

    /// Creates a line from an arbitrary index buffer, each pair one segment.
    pub fn create_line(
        &mut self,
        style: u32,
        indices: &[u32],
        points: &[Vec2],
        colors: &[Color],
        node: u32,
    ) -> Result<u32, LineError> {
        self.create(style, Topology::Explicit(indices), points, colors, node)
    }

    /// Creates an open strip; needs 0 or at least 2 points.
    pub fn create_strip(
        &mut self,
        style: u32,
        points: &[Vec2],
        colors: &[Color],
        node: u32,
    ) -> Result<u32, LineError> {
        self.create(style, Topology::Strip, points, colors, node)
    }

    /// Creates a closed loop; needs 0, 1 or at least 3 points.
    pub fn create_loop(
        &mut self,
        style: u32,
        points: &[Vec2],
        colors: &[Color],
        node: u32,
    ) -> Result<u32, LineError> {
        self.create(style, Topology::Loop, points, colors, node)
    }

    fn set(
        &mut self,
        id: u32,
        topology: Topology<'_>,
        points: &[Vec2],
        colors: &[Color],
    ) -> Result<(), LineError> {
        self.line(id)?;
        self.prepare(topology, points, colors)?;
        self.commit(id, points, colors);
        Ok(())
    }

    pub fn set_line(
        &mut self,
        id: u32,
        indices: &[u32],
        points: &[Vec2],
        colors: &[Color],
    ) -> Result<(), LineError> {
        self.set(id, Topology::Explicit(indices), points, colors)
    }

    pub fn set_line_strip(&mut self, id: u32, points: &[Vec2], colors: &[Color]) -> Result<(), LineError> {
        self.set(id, Topology::Strip, points, colors)
    }

    pub fn set_line_loop(&mut self, id: u32, points: &[Vec2], colors: &[Color]) -> Result<(), LineError> {
        self.set(id, Topology::Loop, points, colors)
    }

    /// Frees the line and its run. The id may be handed out again.
    pub fn remove(&mut self, id: u32) -> Result<(), LineError> {
        let run = self.line(id)?.run;
        self.store.mark_unused(run);
        self.lines[id as usize] = None;
        self.free.push(id);
        self.pending |= UpdateStates::DATA | UpdateStates::COMPACT;
        if self.config.eager_compaction {
            self.compact();
        }
        Ok(())
    }

    pub fn set_color(&mut self, id: u32, color: Color) -> Result<(), LineError> {
        if !color.is_finite() {
            return Err(LineError::NonFinite { param: "color" });
        }
        self.line_mut(id)?.color = color;
        self.pending |= UpdateStates::VERTICES;
        Ok(())
    }

    /// `None` falls back to the style's alignment.
    pub fn set_alignment(&mut self, id: u32, alignment: Option<Alignment>) -> Result<(), LineError> {
        self.line_mut(id)?.alignment = alignment;
        self.pending |= UpdateStates::VERTICES;
        Ok(())
    }

    /// Added on top of the style padding.
    pub fn set_padding(&mut self, id: u32, padding: Padding) -> Result<(), LineError> {
        if !padding.is_finite() {
            return Err(LineError::NonFinite { param: "padding" });
        }
        self.line_mut(id)?.padding = padding;
        self.pending |= UpdateStates::VERTICES;
        Ok(())
    }

    pub fn set_style(&mut self, id: u32, style: u32) -> Result<(), LineError> {
        self.check_style(style)?;
        let line = self.line_mut(id)?;
        line.style = style;
        line.calculated_style = style;
        self.pending |= UpdateStates::VERTICES;
        Ok(())
    }

    pub fn attach(&mut self, id: u32, node: u32) -> Result<(), LineError> {
        self.line_mut(id)?.node = node;
        self.pending |= UpdateStates::VERTICES;
        Ok(())
    }

    pub fn is_valid(&self, id: u32) -> bool {
        self.line(id).is_ok()
    }

    pub fn used_count(&self) -> u32 {
        self.lines.iter().filter(|l| l.is_some()).count() as u32
    }

    pub fn color(&self, id: u32) -> Result<Color, LineError> {
        Ok(self.line(id)?.color)
    }

    pub fn alignment(&self, id: u32) -> Result<Option<Alignment>, LineError> {
        Ok(self.line(id)?.alignment)
    }

    pub fn padding(&self, id: u32) -> Result<Padding, LineError> {
        Ok(self.line(id)?.padding)
    }

    pub fn style(&self, id: u32) -> Result<u32, LineError> {
        Ok(self.line(id)?.style)
    }

    /// Style in effect after the last update, including disabled transitions.
    pub fn calculated_style(&self, id: u32) -> Result<u32, LineError> {
        Ok(self.line(id)?.calculated_style)
    }

    pub fn node(&self, id: u32) -> Result<u32, LineError> {
        Ok(self.line(id)?.node)
    }

    pub fn run(&self, id: u32) -> Result<Run, LineError> {
        Ok(*self.store.run(self.line(id)?.run))
    }

    pub fn index_count(&self, id: u32) -> Result<u32, LineError> {
        Ok(self.run(id)?.index_count)
    }

    pub fn point_count(&self, id: u32) -> Result<u32, LineError> {
        Ok(self.run(id)?.point_count)
    }

    pub fn join_count(&self, id: u32) -> Result<u32, LineError> {
        Ok(self.run(id)?.join_count)
    }

    pub fn points(&self, id: u32) -> Result<&[Point], LineError> {
        let run = self.store.run(self.line(id)?.run);
        Ok(self.store.points_of(run))
    }

    pub fn slots(&self, id: u32) -> Result<&[IndexSlot], LineError> {
        let run = self.store.run(self.line(id)?.run);
        Ok(self.store.slots_of(run))
    }

    pub fn stats(&self) -> LayerStats {
        LayerStats {
            lines: self.used_count(),
            runs: self.store.runs().len() as u32,
            unused_runs: self.store.unused_count(),
            points: self.store.point_len() as u32,
            slots: self.store.slot_len() as u32,
        }
    }

    /// Reclaims holes left by removed or resized lines right away.
    pub fn compact(&mut self) -> CompactStats {
        #[cfg(feature = "mesh_prof")]
        let t = std::time::Instant::now();
        let stats = compact(&mut self.store, &mut self.lines);
        self.pending.remove(UpdateStates::COMPACT);
        if stats.runs_dropped > 0 {
            self.pending |= UpdateStates::DATA;
        }
        debug!(
            "compacted: {} runs dropped, {} points and {} slots reclaimed",
            stats.runs_dropped, stats.points_reclaimed, stats.slots_reclaimed
        );
        #[cfg(feature = "mesh_prof")]
        debug!("compact_ms={:.3}", t.elapsed().as_secs_f64() * 1000.0);
        stats
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    fn validate_update(
        &self,
        draw_order: &[u32],
        nodes: &NodeInputs<'_>,
        styles: &LineStyleTable,
    ) -> Result<(), LineError> {
        if styles.style_count() != self.style_count {
            return Err(LineError::StyleCountMismatch {
                expected: self.style_count,
                got: styles.style_count(),
            });
        }
        for &id in draw_order {
            self.line(id)?;
        }
        let node_count = nodes.len();
        for (param, got) in [
            ("sizes", nodes.sizes.len()),
            ("opacities", nodes.opacities.len()),
            ("enabled", nodes.enabled.len()),
        ] {
            if got != node_count {
                return Err(LineError::LengthMismatch {
                    param,
                    expected: node_count,
                    got,
                });
            }
        }
        if nodes.offsets.iter().any(|v| !v.is_finite()) {
            return Err(LineError::NonFinite { param: "offsets" });
        }
        if nodes.sizes.iter().any(|v| !v.is_finite()) {
            return Err(LineError::NonFinite { param: "sizes" });
        }
        if nodes.opacities.iter().any(|o| !o.is_finite()) {
            return Err(LineError::NonFinite { param: "opacities" });
        }
        for line in self.lines.iter().flatten() {
            if line.node as usize >= node_count {
                return Err(LineError::NodeOutOfRange {
                    node: line.node,
                    node_count: node_count as u32,
                });
            }
            if let Some(f) = self.disabled_transition {
                self.check_style(f(line.style))?;
            }
        }
        Ok(())
    }

    /// Compacts if needed and rebuilds whatever `states` plus pending changes
    /// require. `draw_order` lists the visible lines front to back; node
    /// inputs are indexed by the node ids lines are attached to.
    pub fn update(
        &mut self,
        states: UpdateStates,
        draw_order: &[u32],
        nodes: NodeInputs<'_>,
        styles: &LineStyleTable,
    ) -> Result<MeshView<'_>, LineError> {
        self.validate_update(draw_order, &nodes, styles)?;

        if self.pending.contains(UpdateStates::COMPACT) || self.store.unused_count() > 0 {
            self.compact();
        }
        let mut states = states | self.pending;
        if styles.version() != self.synced_style_ver {
            states |= UpdateStates::VERTICES;
        }

        let vertices_changed = states.needs_vertices();
        let indices_changed = states.needs_indices();
        trace!(
            "line update: states={:?} vertices={} indices={}",
            states,
            vertices_changed,
            indices_changed
        );

        if vertices_changed {
            #[cfg(feature = "mesh_prof")]
            let t = std::time::Instant::now();
            let pass = VertexPass {
                store: &self.store,
                nodes,
                styles,
                disabled_transition: self.disabled_transition,
                check_indices: self.config.check_indices,
            };
            build_vertices(&pass, &mut self.lines, &mut self.mesh.vertices);
            #[cfg(feature = "mesh_prof")]
            debug!("vertices_ms={:.3}", t.elapsed().as_secs_f64() * 1000.0);
        }
        if indices_changed {
            #[cfg(feature = "mesh_prof")]
            let t = std::time::Instant::now();
            build_indices(
                &self.store,
                &self.lines,
                draw_order,
                &mut self.mesh.indices,
                &mut self.mesh.draw_offsets,
            );
            #[cfg(feature = "mesh_prof")]
            debug!("indices_ms={:.3}", t.elapsed().as_secs_f64() * 1000.0);
        }

        self.pending = UpdateStates::empty();
        self.synced_style_ver = styles.version();
        Ok(MeshView {
            vertices: &self.mesh.vertices,
            indices: &self.mesh.indices,
            draw_offsets: &self.mesh.draw_offsets,
            vertices_changed,
            indices_changed,
        })
    }

    /// Same as [`update`](Self::update), handing the result to a backend.
    pub fn update_into(
        &mut self,
        states: UpdateStates,
        draw_order: &[u32],
        nodes: NodeInputs<'_>,
        styles: &LineStyleTable,
        sink: &mut dyn MeshSink,
    ) -> Result<(), LineError> {
        let view = self.update(states, draw_order, nodes, styles)?;
        sink.upload(view);
        Ok(())
    }
}
