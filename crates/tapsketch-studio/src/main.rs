use tapsketch_engine::logging::{LoggingConfig, init_logging};
use tapsketch_ui::Application;

const BODY_FONTS: &[&str] = &[
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
];

const HEADING_FONTS: &[&str] = &[
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/noto/NotoSans-Bold.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Bold.ttf",
];

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let mut app = Application::new().title("tapsketch").size(400.0, 800.0);
    match load_font(BODY_FONTS) {
        Some(bytes) => app = app.body_font(bytes),
        None => log::warn!("no system body font found; text will not be drawn"),
    }
    if let Some(bytes) = load_font(HEADING_FONTS) {
        app = app.heading_font(bytes);
    }

    app.run()
}

/// First readable font file among `candidates`.
fn load_font(candidates: &[&str]) -> Option<Vec<u8>> {
    candidates.iter().find_map(|p| {
        let bytes = std::fs::read(p).ok()?;
        log::debug!("loaded font {p}");
        Some(bytes)
    })
}
