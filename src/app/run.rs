//! Top-level entry point for running the picker as a native window.

use eframe::egui;

use crate::config::PickerConfig;

use super::picker_app::PickerApp;

/// Launch the picker in a native window. Blocks until the window is closed.
pub fn run_picker(mut cfg: PickerConfig) -> eframe::Result<()> {
    let title = cfg.title.clone();
    let mut opts = cfg.native_options.take().unwrap_or_default();

    if opts.viewport.icon.is_none() {
        if let Some(icon) = load_app_icon_svg() {
            opts.viewport = opts.viewport.clone().with_icon(icon);
        }
    }
    if opts.viewport.inner_size.is_none() {
        // plot area plus the side panel
        opts.viewport = opts
            .viewport
            .clone()
            .with_inner_size(egui::vec2(cfg.width + 350.0, cfg.height));
    }

    eframe::run_native(
        &title,
        opts,
        Box::new(move |cc| {
            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);
            let app = PickerApp::from_config(&cfg)?;
            Ok(Box::new(app))
        }),
    )
}

/// Side of the rasterised window icon in pixels.
const ICON_SIDE: u32 = 64;

static ICON_SVG: &[u8] = include_bytes!("../../icon.svg");

/// Rasterise the bundled crosshair icon into a square `ICON_SIDE` image.
fn load_app_icon_svg() -> Option<egui::IconData> {
    let tree = usvg::Tree::from_data(ICON_SVG, &usvg::Options::default()).ok()?;
    let src = tree.size();
    let scale = ICON_SIDE as f32 / src.width().max(src.height());
    if !scale.is_finite() {
        return None;
    }

    let mut pixmap = tiny_skia::Pixmap::new(ICON_SIDE, ICON_SIDE)?;
    let transform = tiny_skia::Transform::from_scale(scale, scale);
    resvg::render(&tree, transform, &mut pixmap.as_mut());
    Some(egui::IconData {
        rgba: pixmap.take(),
        width: ICON_SIDE,
        height: ICON_SIDE,
    })
}
