use std::collections::HashMap;
use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use fontdue::layout::{CoordinateSystem, GlyphRasterConfig, Layout, LayoutSettings, TextStyle};

use crate::coords::Vec2;
use crate::paint::Paint;
use crate::render::RenderCtx;
use crate::scene::shapes::TextCmd;
use crate::text::FontSystem;

use super::common::{
    QuadBuffers, QuadVertex, ViewportUniform, QUAD_INDEX_COUNT, create_viewport_ubo,
    grown_capacity, premul_alpha_blend, triangle_list, viewport_ubo_entry,
};

// ── atlas constants ────────────────────────────────────────────────────────

const ATLAS_SIZE: u32 = 2048;
const GLYPH_PADDING: u32 = 1; // pixels between glyphs in the atlas

// ── cached glyph ──────────────────────────────────────────────────────────

struct CachedGlyph {
    uv_min: [f32; 2],
    uv_max: [f32; 2],
}

/// Shelf packer over a square atlas. Pure bookkeeping; the caller uploads.
#[derive(Debug)]
struct ShelfPacker {
    size: u32,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
    full: bool,
}

impl ShelfPacker {
    fn new(size: u32) -> Self {
        Self {
            size,
            cursor_x: GLYPH_PADDING,
            cursor_y: GLYPH_PADDING,
            row_height: 0,
            full: false,
        }
    }

    /// Reserves a `w × h` slot; returns its top-left texel, or `None` once full.
    fn place(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        if self.full || w + 2 * GLYPH_PADDING > self.size {
            return None;
        }

        // Advance to a new shelf row when the glyph doesn't fit horizontally.
        if self.cursor_x + w + GLYPH_PADDING > self.size {
            self.cursor_y += self.row_height + GLYPH_PADDING;
            self.cursor_x = GLYPH_PADDING;
            self.row_height = 0;
        }

        if self.cursor_y + h + GLYPH_PADDING > self.size {
            self.full = true;
            return None;
        }

        let at = (self.cursor_x, self.cursor_y);
        self.cursor_x += w + GLYPH_PADDING;
        self.row_height = self.row_height.max(h);
        Some(at)
    }
}

// ── renderer ──────────────────────────────────────────────────────────────

/// Glyph renderer for `DrawCmd::Text`.
///
/// Maintains a 2048 × 2048 R8Unorm glyph atlas. Glyphs are rasterized on
/// first use via fontdue at the window's scale factor and cached for the
/// renderer's lifetime, keyed by `GlyphRasterConfig` (font, glyph, px size).
///
/// The run's brush is resolved per glyph. A glyph under a gradient is split
/// into horizontal bands at every stop that crosses it; each band carries the
/// brush color at its top and bottom edge, so the shader's linear blend
/// reproduces a vertical gradient exactly across the whole run.
pub struct TextRenderer {
    // pipeline
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,

    // bindings
    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,
    sampler: Option<wgpu::Sampler>,

    // atlas
    atlas_texture: Option<wgpu::Texture>,
    atlas_view: Option<wgpu::TextureView>,
    packer: ShelfPacker,
    warned_atlas_full: bool,

    glyph_cache: HashMap<GlyphRasterConfig, CachedGlyph>,

    // geometry
    quad: Option<QuadBuffers>,
    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,
    instances: Vec<GlyphInstance>,

    // reusable fontdue layout
    layout: Layout<()>,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            pipeline_format: None,
            pipeline: None,
            bind_group_layout: None,
            bind_group: None,
            viewport_ubo: None,
            sampler: None,
            atlas_texture: None,
            atlas_view: None,
            packer: ShelfPacker::new(ATLAS_SIZE),
            warned_atlas_full: false,
            glyph_cache: HashMap::new(),
            quad: None,
            instance_vbo: None,
            instance_capacity: 0,
            instances: Vec::new(),
            layout: Layout::new(CoordinateSystem::PositiveYDown),
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepares GPU state and drops last frame's instances.
    pub(super) fn begin(&mut self, ctx: &RenderCtx<'_>) {
        self.ensure_pipeline(ctx);
        self.ensure_atlas(ctx);
        self.ensure_sampler(ctx);
        self.ensure_static_buffers(ctx);
        self.ensure_bindings(ctx);
        self.instances.clear();
    }

    #[inline]
    pub(super) fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Lays out one run and appends a quad per visible glyph.
    ///
    /// Returns the number of instances added. Unknown fonts add nothing.
    pub(super) fn push_run(&mut self, ctx: &RenderCtx<'_>, cmd: &TextCmd, fonts: &FontSystem) -> u32 {
        let Some(font) = fonts.get(cmd.font) else {
            log::trace!("text run with unknown {:?} skipped", cmd.font);
            return 0;
        };
        if cmd.text.is_empty() || cmd.size <= 0.0 || !cmd.size.is_finite() {
            return 0;
        }

        // Lay out in physical pixels so glyphs rasterize crisply on HiDPI.
        let scale = ctx.scale_factor;
        self.layout.reset(&LayoutSettings {
            x: cmd.origin.x * scale,
            y: cmd.origin.y * scale,
            ..LayoutSettings::default()
        });
        self.layout.append(&[font], &TextStyle::new(&cmd.text, cmd.size * scale, 0));

        // Snapshot glyph positions so the borrow on `self.layout` ends before
        // `self.upload_glyph` needs `&mut self`.
        let glyph_snap: Vec<(GlyphRasterConfig, f32, f32, usize, usize)> = self
            .layout
            .glyphs()
            .iter()
            .filter(|g| g.char_data.rasterize() && g.width > 0 && g.height > 0)
            .map(|g| (g.key, g.x, g.y, g.width, g.height))
            .collect();

        let before = self.instances.len();
        for (key, x, y, w, h) in glyph_snap {
            if !self.glyph_cache.contains_key(&key) {
                let (metrics, bitmap) = font.rasterize_config(key);
                if metrics.width == 0 || metrics.height == 0 {
                    continue;
                }
                match self.upload_glyph(ctx, &bitmap, metrics.width as u32, metrics.height as u32) {
                    Some(entry) => {
                        self.glyph_cache.insert(key, entry);
                    }
                    None => continue,
                }
            }
            let Some(cached) = self.glyph_cache.get(&key) else { continue; };

            let dst_min = Vec2::new(x / scale, y / scale);
            let dst_max = Vec2::new((x + w as f32) / scale, (y + h as f32) / scale);
            push_glyph_bands(&mut self.instances, &cmd.brush, dst_min, dst_max, cached.uv_min, cached.uv_max);
        }
        (self.instances.len() - before) as u32
    }

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

    // ── atlas helpers ──────────────────────────────────────────────────────

    fn upload_glyph(&mut self, ctx: &RenderCtx<'_>, bitmap: &[u8], w: u32, h: u32) -> Option<CachedGlyph> {
        let Some((gx, gy)) = self.packer.place(w, h) else {
            if !self.warned_atlas_full {
                log::warn!(
                    "glyph atlas is full ({ATLAS_SIZE}×{ATLAS_SIZE}); some glyphs will not be rendered"
                );
                self.warned_atlas_full = true;
            }
            return None;
        };

        let atlas = self.atlas_texture.as_ref()?;
        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: atlas,
                mip_level: 0,
                origin: wgpu::Origin3d { x: gx, y: gy, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            bitmap,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(w),
                rows_per_image: Some(h),
            },
            wgpu::Extent3d { width: w, height: h, depth_or_array_layers: 1 },
        );

        let atlas_f = ATLAS_SIZE as f32;
        Some(CachedGlyph {
            uv_min: [gx as f32 / atlas_f,       gy as f32 / atlas_f],
            uv_max: [(gx + w) as f32 / atlas_f, (gy + h) as f32 / atlas_f],
        })
    }

    // ── lazy-init helpers ──────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("tapsketch text shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/text.wgsl").into()),
        });

        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("tapsketch text bgl"),
            entries: &[
                viewport_ubo_entry(0),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("tapsketch text pipeline layout"),
            bind_group_layouts: &[&bgl],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("tapsketch text pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout(), GlyphInstance::layout()],
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
        self.bind_group_layout = Some(bgl);
        self.bind_group = None;
        self.viewport_ubo = None;
    }

    fn ensure_atlas(&mut self, ctx: &RenderCtx<'_>) {
        if self.atlas_texture.is_some() {
            return;
        }

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("tapsketch text atlas"),
            size: wgpu::Extent3d {
                width: ATLAS_SIZE,
                height: ATLAS_SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        self.atlas_view = Some(texture.create_view(&wgpu::TextureViewDescriptor::default()));
        self.atlas_texture = Some(texture);
        self.packer = ShelfPacker::new(ATLAS_SIZE);
        self.glyph_cache.clear();
        self.bind_group = None;
    }

    fn ensure_sampler(&mut self, ctx: &RenderCtx<'_>) {
        if self.sampler.is_some() {
            return;
        }
        self.sampler = Some(ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("tapsketch text sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        }));
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.viewport_ubo.is_some() {
            return;
        }

        let Some(bgl)        = self.bind_group_layout.as_ref() else { return; };
        let Some(atlas_view) = self.atlas_view.as_ref()        else { return; };
        let Some(sampler)    = self.sampler.as_ref()           else { return; };

        let viewport_ubo = create_viewport_ubo(ctx, "tapsketch text viewport ubo");
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tapsketch text bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: viewport_ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(atlas_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        self.viewport_ubo = Some(viewport_ubo);
        self.bind_group = Some(bind_group);
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad.is_none() {
            self.quad = Some(QuadBuffers::new(ctx, "tapsketch text"));
        }
    }

    fn ensure_instance_capacity(&mut self, ctx: &RenderCtx<'_>, required: usize) {
        if required <= self.instance_capacity && self.instance_vbo.is_some() {
            return;
        }
        let new_cap  = grown_capacity(required);
        let new_size = (new_cap * std::mem::size_of::<GlyphInstance>()) as u64;
        self.instance_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("tapsketch text instance vbo"),
            size: new_size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.instance_capacity = new_cap;
    }
}

/// Y coordinates splitting `top..bottom` into bands with no gradient stop
/// strictly inside. Always starts with `top` and ends with `bottom`.
///
/// Stops are placed by projecting onto the gradient axis's y extent, which is
/// exact for vertical gradients.
fn band_edges(brush: &Paint, top: f32, bottom: f32) -> Vec<f32> {
    let mut edges = vec![top];
    if let Paint::LinearGradient(g) = brush {
        let (y0, y1) = (g.start.y, g.end.y);
        if (y1 - y0).abs() > f32::EPSILON {
            edges.extend(
                g.stops
                    .iter()
                    .map(|s| y0 + s.t.clamp(0.0, 1.0) * (y1 - y0))
                    .filter(|&y| y > top && y < bottom),
            );
            edges.sort_by(f32::total_cmp);
            edges.dedup();
        }
    }
    edges.push(bottom);
    edges
}

/// Appends one instance per band of a glyph quad.
fn push_glyph_bands(
    out: &mut Vec<GlyphInstance>,
    brush: &Paint,
    dst_min: Vec2,
    dst_max: Vec2,
    uv_min: [f32; 2],
    uv_max: [f32; 2],
) {
    let cx = 0.5 * (dst_min.x + dst_max.x);
    let height = dst_max.y - dst_min.y;
    let uv_y = |y: f32| {
        let f = if height > 0.0 { (y - dst_min.y) / height } else { 0.0 };
        uv_min[1] + f * (uv_max[1] - uv_min[1])
    };

    for band in band_edges(brush, dst_min.y, dst_max.y).windows(2) {
        let (top, bottom) = (band[0], band[1]);
        out.push(GlyphInstance {
            dst_min: [dst_min.x, top],
            dst_max: [dst_max.x, bottom],
            uv_min: [uv_min[0], uv_y(top)],
            uv_max: [uv_max[0], uv_y(bottom)],
            color_top: brush.color_at(Vec2::new(cx, top)).to_array(),
            color_bottom: brush.color_at(Vec2::new(cx, bottom)).to_array(),
        });
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Instance data layout (64 bytes):
///
///  offset  0  dst_min      [f32; 2]   loc 1
///  offset  8  dst_max      [f32; 2]   loc 2
///  offset 16  uv_min       [f32; 2]   loc 3
///  offset 24  uv_max       [f32; 2]   loc 4
///  offset 32  color_top    [f32; 4]   loc 5
///  offset 48  color_bottom [f32; 4]   loc 6
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct GlyphInstance {
    dst_min:      [f32; 2],
    dst_max:      [f32; 2],
    uv_min:       [f32; 2],
    uv_max:       [f32; 2],
    color_top:    [f32; 4],
    color_bottom: [f32; 4],
}

impl GlyphInstance {
    const ATTRS: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
        1 => Float32x2, // dst_min
        2 => Float32x2, // dst_max
        3 => Float32x2, // uv_min
        4 => Float32x2, // uv_max
        5 => Float32x4, // color_top
        6 => Float32x4  // color_bottom
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GlyphInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::{Color, LinearGradient};

    // ── shelf packing ─────────────────────────────────────────────────────

    #[test]
    fn packer_fills_a_row_then_wraps() {
        let mut p = ShelfPacker::new(32);
        assert_eq!(p.place(10, 4), Some((1, 1)));
        assert_eq!(p.place(10, 6), Some((12, 1)));
        // 23 + 10 + 1 > 32: next shelf starts below the tallest glyph so far.
        assert_eq!(p.place(10, 4), Some((1, 8)));
    }

    #[test]
    fn packer_reports_full_and_stays_full() {
        let mut p = ShelfPacker::new(16);
        assert_eq!(p.place(14, 14), Some((1, 1)));
        assert_eq!(p.place(14, 14), None);
        assert_eq!(p.place(1, 1), None);
    }

    #[test]
    fn oversized_glyph_is_rejected_without_filling() {
        let mut p = ShelfPacker::new(16);
        assert_eq!(p.place(40, 2), None);
        assert_eq!(p.place(2, 2), Some((1, 1)));
    }

    // ── gradient bands ────────────────────────────────────────────────────

    fn palette_brush() -> Paint {
        Paint::LinearGradient(LinearGradient::vertical(
            728.0,
            800.0,
            &[Color::black(), Color::blue(), Color::yellow(), Color::red(), Color::green(), Color::magenta()],
        ))
    }

    fn bands(brush: &Paint, top: f32, bottom: f32) -> Vec<GlyphInstance> {
        let mut out = Vec::new();
        push_glyph_bands(&mut out, brush, Vec2::new(10.0, top), Vec2::new(40.0, bottom), [0.0, 0.0], [0.5, 1.0]);
        out
    }

    /// Color the shader produces at `y`: linear blend inside the band.
    fn shade_at(bands: &[GlyphInstance], y: f32) -> [f32; 4] {
        let b = bands
            .iter()
            .find(|b| y >= b.dst_min[1] && y <= b.dst_max[1])
            .expect("y inside the glyph");
        let f = (y - b.dst_min[1]) / (b.dst_max[1] - b.dst_min[1]);
        std::array::from_fn(|i| b.color_top[i] + (b.color_bottom[i] - b.color_top[i]) * f)
    }

    fn assert_close(a: [f32; 4], b: [f32; 4]) {
        for i in 0..4 {
            assert!((a[i] - b[i]).abs() < 1e-4, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn solid_brush_keeps_one_flat_quad() {
        let out = bands(&Paint::Solid(Color::black()), 0.0, 20.0);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].color_top, out[0].color_bottom);
        assert_eq!(out[0].color_top, Color::black().to_array());
        assert_eq!((out[0].uv_min, out[0].uv_max), ([0.0, 0.0], [0.5, 1.0]));
    }

    #[test]
    fn stops_inside_a_glyph_split_it() {
        // Stops sit every 14.4 px from 728; 735..790 contains four of them.
        let out = bands(&palette_brush(), 735.0, 790.0);
        assert_eq!(out.len(), 5);
        assert_eq!(out[0].dst_min[1], 735.0);
        assert_eq!(out[4].dst_max[1], 790.0);
        for pair in out.windows(2) {
            assert_eq!(pair[0].dst_max[1], pair[1].dst_min[1]);
            assert_eq!(pair[0].uv_max[1], pair[1].uv_min[1]);
            assert_eq!(pair[0].color_bottom, pair[1].color_top);
        }
        assert_eq!(out[0].uv_min[1], 0.0);
        assert!((out[4].uv_max[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn glyph_middle_matches_the_brush() {
        let brush = palette_brush();
        let out = bands(&brush, 735.0, 790.0);
        for y in [735.0, 750.0, 762.5, 771.0, 789.0] {
            assert_close(shade_at(&out, y), brush.color_at(Vec2::new(25.0, y)).to_array());
        }
    }

    #[test]
    fn glyph_between_stops_stays_whole() {
        // 730..740 lies between the first two stops (728 and 742.4).
        let out = bands(&palette_brush(), 730.0, 740.0);
        assert_eq!(out.len(), 1);
    }
}
