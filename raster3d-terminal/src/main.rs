/// raster3d terminal viewer - rotating textured cube
///
/// Renders on the CPU and presents the framebuffer with true-color half
/// blocks, or writes a single frame to an image file with `--output`.
///   - Q/ESC: Quit
use anyhow::Result;
use raster3d_terminal::{
    build_model, export_frame, init_logging, options::{DEFAULT_EXPORT_SIZE, USAGE}, renderer_for, Command,
    LoggingConfig, TerminalApp, ViewerOptions, Viewport,
};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let options = match ViewerOptions::parse(std::env::args().skip(1))? {
        Command::Run(options) => options,
        Command::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
    };
    log::debug!("options: {:?}", options);

    let model = build_model(&options)?;

    if let Some(path) = &options.output {
        let (width, height) = options.size.unwrap_or(DEFAULT_EXPORT_SIZE);
        let mut viewport = Viewport::new(model, renderer_for(&options), width, height);
        return export_frame(&mut viewport, path);
    }

    let mut app = TerminalApp::new(model, &options)?;
    app.run()
}
