use std::ops::Range;

use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{DrawCmd, DrawList};
use crate::text::FontSystem;

use super::shape::ShapeRenderer;
use super::text::TextRenderer;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Pipeline {
    Shapes,
    Glyphs,
}

/// A run of consecutive instances drawn with one pipeline.
#[derive(Debug, Clone, Eq, PartialEq)]
struct Batch {
    pipeline: Pipeline,
    instances: Range<u32>,
}

/// Appends `count` instances starting at `start`, extending the previous batch
/// when it uses the same pipeline and ends where this one begins.
fn push_batch(batches: &mut Vec<Batch>, pipeline: Pipeline, start: u32, count: u32) {
    if count == 0 {
        return;
    }
    let end = start + count;
    if let Some(last) = batches.last_mut() {
        if last.pipeline == pipeline && last.instances.end == start {
            last.instances.end = end;
            return;
        }
    }
    batches.push(Batch { pipeline, instances: start..end });
}

/// Renders a whole `DrawList` in one pass, preserving paint order.
///
/// Items are walked back-to-front. Shapes and glyphs are encoded into their
/// renderers' instance buffers, and each switch between the two starts a new
/// batch, so text painted before a shape stays underneath it.
#[derive(Default)]
pub struct SceneRenderer {
    shapes: ShapeRenderer,
    text: TextRenderer,
    batches: Vec<Batch>,
}

impl SceneRenderer {
    pub fn new() -> Self {
        Self {
            shapes: ShapeRenderer::new(),
            text: TextRenderer::new(),
            batches: Vec::new(),
        }
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
        fonts: &FontSystem,
    ) {
        self.shapes.begin(ctx);
        self.text.begin(ctx);
        self.batches.clear();

        for item in draw_list.iter_in_paint_order() {
            match &item.cmd {
                DrawCmd::Text(cmd) => {
                    let start = self.text.instance_count();
                    let n = self.text.push_run(ctx, cmd, fonts);
                    push_batch(&mut self.batches, Pipeline::Glyphs, start, n);
                }
                other => {
                    let start = self.shapes.instance_count();
                    let n = self.shapes.push(other);
                    push_batch(&mut self.batches, Pipeline::Shapes, start, n);
                }
            }
        }

        if self.batches.is_empty() {
            return;
        }

        self.shapes.upload(ctx);
        self.text.upload(ctx);

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("tapsketch scene pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        for batch in &self.batches {
            match batch.pipeline {
                Pipeline::Shapes => self.shapes.draw(&mut rpass, batch.instances.clone()),
                Pipeline::Glyphs => self.text.draw(&mut rpass, batch.instances.clone()),
            }
        }
    }
}
