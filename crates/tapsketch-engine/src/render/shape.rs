use std::ops::Range;

use bytemuck::{Pod, Zeroable};

use crate::coords::{Rect, Vec2};
use crate::paint::Color;
use crate::render::RenderCtx;
use crate::scene::DrawCmd;

use super::common::{
    QuadBuffers, QuadVertex, ViewportUniform, QUAD_INDEX_COUNT, create_viewport_ubo,
    grown_capacity, premul_alpha_blend, triangle_list, viewport_ubo_entry,
};

/// Extra logical pixels around each shape so the anti-aliased edge is not cut.
const AA_MARGIN: f32 = 1.0;

const KIND_BOX: f32 = 0.0;
const KIND_CIRCLE: f32 = 1.0;
const KIND_LINE: f32 = 2.0;

/// Signed-distance renderer for every non-text `DrawCmd`.
///
/// One instanced pipeline covers rects (a rounded box with zero radii),
/// rounded rects, circles and butt-capped line segments. Commands are encoded
/// in paint order; `SceneRenderer` draws instance ranges so shapes interleave
/// correctly with text. Every shape is filled with one solid color.
#[derive(Default)]
pub struct ShapeRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,

    quad: Option<QuadBuffers>,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,
    instances: Vec<ShapeInstance>,
}

impl ShapeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepares GPU state and drops last frame's instances.
    pub(super) fn begin(&mut self, ctx: &RenderCtx<'_>) {
        self.ensure_pipeline(ctx);
        self.ensure_static_buffers(ctx);
        self.ensure_bindings(ctx);
        self.instances.clear();
    }

    /// Number of instances recorded since `begin`.
    #[inline]
    pub(super) fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Encodes one command; returns how many instances it produced (0 or 1).
    pub(super) fn push(&mut self, cmd: &DrawCmd) -> u32 {
        match encode(cmd) {
            Some(inst) => {
                self.instances.push(inst);
                1
            }
            None => 0,
        }
    }

    /// Uploads the viewport uniform and all recorded instances.
    pub(super) fn upload(&mut self, ctx: &RenderCtx<'_>) {
        if self.instances.is_empty() {
            return;
        }
        if let Some(ubo) = self.viewport_ubo.as_ref() {
            ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&ViewportUniform::from_ctx(ctx)));
        }
        self.ensure_instance_capacity(ctx, self.instances.len());
        let Some(instance_vbo) = self.instance_vbo.as_ref() else { return; };
        ctx.queue.write_buffer(instance_vbo, 0, bytemuck::cast_slice(&self.instances));
    }

    /// Draws the instances in `range` into an open pass.
    pub(super) fn draw(&self, rpass: &mut wgpu::RenderPass<'_>, range: Range<u32>) {
        if range.is_empty() {
            return;
        }
        let Some(pipeline)     = self.pipeline.as_ref()     else { return; };
        let Some(bind_group)   = self.bind_group.as_ref()   else { return; };
        let Some(quad)         = self.quad.as_ref()         else { return; };
        let Some(instance_vbo) = self.instance_vbo.as_ref() else { return; };

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, quad.vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(quad.ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..QUAD_INDEX_COUNT, 0, range);
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("tapsketch shape shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/shape.wgsl").into()),
        });

        let bind_group_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("tapsketch shape bgl"),
                entries: &[viewport_ubo_entry(0)],
            });

        let pipeline_layout =
            ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("tapsketch shape pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("tapsketch shape pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout(), ShapeInstance::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: triangle_list(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);
        self.bind_group = None;
        self.viewport_ubo = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.viewport_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return; };

        let viewport_ubo = create_viewport_ubo(ctx, "tapsketch shape viewport ubo");
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tapsketch shape bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        self.viewport_ubo = Some(viewport_ubo);
        self.bind_group = Some(bind_group);
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad.is_none() {
            self.quad = Some(QuadBuffers::new(ctx, "tapsketch shape"));
        }
    }

    fn ensure_instance_capacity(&mut self, ctx: &RenderCtx<'_>, required: usize) {
        if required <= self.instance_capacity && self.instance_vbo.is_some() {
            return;
        }
        let new_cap = grown_capacity(required);
        let new_size = (new_cap * std::mem::size_of::<ShapeInstance>()) as u64;
        self.instance_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("tapsketch shape instance vbo"),
            size: new_size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.instance_capacity = new_cap;
    }
}

// ── encoding ──────────────────────────────────────────────────────────────

/// Converts a draw command into its GPU instance.
///
/// Returns `None` for text (handled by the glyph pipeline) and for shapes that
/// cover no pixels: empty or non-finite rects, non-positive radii or widths,
/// zero-length lines.
fn encode(cmd: &DrawCmd) -> Option<ShapeInstance> {
    match cmd {
        DrawCmd::Rect(c) => {
            let r = c.rect.normalized();
            if r.is_empty() || !r.is_finite() {
                return None;
            }
            Some(ShapeInstance::with_bounds(r.inflate(AA_MARGIN), KIND_BOX)
                .geometry(r.origin, r.size, [0.0; 4], 0.0)
                .color(c.color))
        }

        DrawCmd::RoundedRect(c) => {
            let r = c.rect.normalized();
            if r.is_empty() || !r.is_finite() {
                return None;
            }
            let radii = c.radii.clamped(0.5 * r.size.x.min(r.size.y));
            Some(ShapeInstance::with_bounds(r.inflate(AA_MARGIN), KIND_BOX)
                .geometry(r.origin, r.size, radii.to_array(), 0.0)
                .color(c.color))
        }

        DrawCmd::Circle(c) => {
            if c.radius <= 0.0 || !c.radius.is_finite() || !c.center.is_finite() {
                return None;
            }
            let ext = c.radius + AA_MARGIN;
            let bounds = Rect::new(c.center.x - ext, c.center.y - ext, 2.0 * ext, 2.0 * ext);
            Some(ShapeInstance::with_bounds(bounds, KIND_CIRCLE)
                .geometry(c.center, Vec2::new(c.radius, 0.0), [0.0; 4], 0.0)
                .color(c.color))
        }

        DrawCmd::Line(c) => {
            if c.width <= 0.0 || !c.width.is_finite() || !c.from.is_finite() || !c.to.is_finite() {
                return None;
            }
            if (c.to - c.from).length() == 0.0 {
                return None;
            }
            let half = 0.5 * c.width;
            let ext = half + AA_MARGIN;
            let min = Vec2::new(c.from.x.min(c.to.x) - ext, c.from.y.min(c.to.y) - ext);
            let max = Vec2::new(c.from.x.max(c.to.x) + ext, c.from.y.max(c.to.y) + ext);
            Some(ShapeInstance::with_bounds(Rect::from_origin_size(min, max - min), KIND_LINE)
                .geometry(c.from, c.to, [0.0; 4], half)
                .color(c.color))
        }

        DrawCmd::Text(_) => None,
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Instance data layout (80 bytes):
///
///  offset   0  bounds_min [f32; 2]   loc 1   quad extent, logical px
///  offset   8  bounds_max [f32; 2]   loc 2
///  offset  16  a          [f32; 2]   loc 3   box origin | circle center | line start
///  offset  24  b          [f32; 2]   loc 4   box size   | (radius, 0)   | line end
///  offset  32  radii      [f32; 4]   loc 5   (tl, tr, br, bl)
///  offset  48  params     [f32; 4]   loc 6   (.x = kind, .y = line half-width)
///  offset  64  color      [f32; 4]   loc 7   premultiplied
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct ShapeInstance {
    bounds_min: [f32; 2],
    bounds_max: [f32; 2],
    a: [f32; 2],
    b: [f32; 2],
    radii: [f32; 4],
    params: [f32; 4],
    color: [f32; 4],
}

impl ShapeInstance {
    const ATTRS: [wgpu::VertexAttribute; 7] = wgpu::vertex_attr_array![
        1 => Float32x2,  // bounds_min
        2 => Float32x2,  // bounds_max
        3 => Float32x2,  // a
        4 => Float32x2,  // b
        5 => Float32x4,  // radii
        6 => Float32x4,  // params
        7 => Float32x4   // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ShapeInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }

    fn with_bounds(bounds: Rect, kind: f32) -> Self {
        let (min, max) = (bounds.min(), bounds.max());
        Self {
            bounds_min: [min.x, min.y],
            bounds_max: [max.x, max.y],
            params: [kind, 0.0, 0.0, 0.0],
            ..Self::zeroed()
        }
    }

    fn geometry(mut self, a: Vec2, b: Vec2, radii: [f32; 4], half_width: f32) -> Self {
        self.a = [a.x, a.y];
        self.b = [b.x, b.y];
        self.radii = radii;
        self.params[1] = half_width;
        self
    }

    fn color(mut self, color: Color) -> Self {
        self.color = color.to_array();
        self
    }
}
