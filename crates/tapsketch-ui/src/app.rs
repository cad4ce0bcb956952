use winit::dpi::LogicalSize;

use tapsketch_engine::core::{App as EngineApp, AppControl, FrameCtx};
use tapsketch_engine::device::GpuInit;
use tapsketch_engine::paint::Color;
use tapsketch_engine::render::SceneRenderer;
use tapsketch_engine::scene::DrawList;
use tapsketch_engine::text::{FontId, FontSystem};
use tapsketch_engine::window::{Runtime, RuntimeConfig};

use crate::painter::Painter;
use crate::screen::Screen;
use crate::surface::FrameTaps;

// ── Application ───────────────────────────────────────────────────────────

/// Top-level sketch application builder.
///
/// ```rust,ignore
/// Application::new()
///     .title("tapsketch")
///     .size(400.0, 800.0)
///     .body_font(std::fs::read("DejaVuSans.ttf")?)
///     .run()?;
/// ```
pub struct Application {
    title:        String,
    width:        f64,
    height:       f64,
    background:   Color,
    body_font:    Option<Vec<u8>>,
    heading_font: Option<Vec<u8>>,
    gpu_init:     GpuInit,
}

impl Application {
    pub fn new() -> Self {
        let defaults = RuntimeConfig::default();
        Self {
            title:        defaults.title,
            width:        defaults.initial_size.width,
            height:       defaults.initial_size.height,
            background:   Color::white(),
            body_font:    None,
            heading_font: None,
            gpu_init:     GpuInit::default(),
        }
    }

    /// Set the window title.
    pub fn title(mut self, t: impl Into<String>) -> Self {
        self.title = t.into();
        self
    }

    /// Set the initial window size in logical pixels.
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width  = width;
        self.height = height;
        self
    }

    /// Canvas clear color.
    pub fn background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Face for the status text and the "Hola" greeting.
    pub fn body_font(mut self, data: Vec<u8>) -> Self {
        self.body_font = Some(data);
        self
    }

    /// Face for the gradient heading. Falls back to the body font.
    pub fn heading_font(mut self, data: Vec<u8>) -> Self {
        self.heading_font = Some(data);
        self
    }

    pub fn gpu(mut self, init: GpuInit) -> Self {
        self.gpu_init = init;
        self
    }

    /// Opens the window and runs until it is closed.
    pub fn run(self) -> anyhow::Result<()> {
        let config = RuntimeConfig {
            title:        self.title.clone(),
            initial_size: LogicalSize::new(self.width, self.height),
        };
        let gpu_init = self.gpu_init.clone();
        let state = SketchApp::new(self);
        Runtime::run(config, gpu_init, state)
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}

// ── SketchApp ─────────────────────────────────────────────────────────────

/// Internal state that implements `tapsketch_engine::core::App`.
///
/// Everything engine-specific (renderer, draw list, fonts) lives here.
struct SketchApp {
    background: Color,
    body_font:  FontId,

    screen: Screen,

    // Rendering
    fonts:          FontSystem,
    draw_list:      DrawList,
    scene_renderer: SceneRenderer,
}

impl SketchApp {
    fn new(app: Application) -> Self {
        let mut fonts = FontSystem::new();
        let body = load_font(&mut fonts, "body", app.body_font.as_deref());
        let heading = match app.heading_font.as_deref() {
            Some(bytes) => load_font(&mut fonts, "heading", Some(bytes)),
            None => body,
        };
        let heading = if fonts.contains(heading) { heading } else { body };

        Self {
            background:     app.background,
            body_font:      body,
            screen:         Screen::new(body, heading),
            fonts,
            draw_list:      DrawList::new(),
            scene_renderer: SceneRenderer::new(),
        }
    }
}

/// Loads `bytes` into `fonts`. Missing or unparsable data is logged and
/// yields [`FontId::MISSING`], which measures empty and draws nothing.
fn load_font(fonts: &mut FontSystem, name: &str, bytes: Option<&[u8]>) -> FontId {
    let Some(bytes) = bytes else {
        log::warn!("no {name} font configured; text will not be drawn");
        return FontId::MISSING;
    };
    match fonts.load_font(bytes) {
        Ok(id) => id,
        Err(e) => {
            log::warn!("failed to load {name} font: {e}");
            FontId::MISSING
        }
    }
}

impl EngineApp for SketchApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        // ── Input ─────────────────────────────────────────────────────────
        self.screen.drain(&mut FrameTaps::new(&ctx.input_frame.taps));

        // ── Paint ─────────────────────────────────────────────────────────
        self.draw_list.clear();
        {
            let size = ctx.window.viewport().size();
            let scale = ctx.window.scale_factor();
            let mut painter =
                Painter::new(&mut self.draw_list, &self.fonts, self.body_font, size, scale);
            self.screen.paint(&mut painter, &mut rand::rng());
        }

        // ── Render ────────────────────────────────────────────────────────
        let dl       = &mut self.draw_list;
        let fonts    = &self.fonts;
        let renderer = &mut self.scene_renderer;

        ctx.render(self.background, |rctx, target| {
            renderer.render(rctx, target, dl, fonts);
        })
    }
}
