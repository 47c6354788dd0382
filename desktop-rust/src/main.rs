mod app;
mod io;
mod model;

use app::{configure_fonts, DesktopApp};
use eframe::egui;

fn main() -> eframe::Result<()> {
    text_proof::logging::init(false);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([960.0, 720.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Text Proof",
        options,
        Box::new(|cc| {
            configure_fonts(&cc.egui_ctx);
            Box::new(DesktopApp::default())
        }),
    )
}
