mod app;
mod interference;
mod session;
mod types;

use session::Session;
use types::InterferometerParams;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let session = Session::new(InterferometerParams::default()).map_err(|err| {
        log::error!("invalid interferometer parameters: {err}");
        eframe::Error::AppCreation(Box::new(err))
    })?;

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 640.0])
            .with_min_inner_size([900.0, 520.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Michelson Interferometer",
        options,
        Box::new(move |cc| Ok(Box::new(app::InterferometerApp::new(cc, session)))),
    )
}
