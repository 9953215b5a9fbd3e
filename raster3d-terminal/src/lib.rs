/// Terminal viewer for the raster3d software rasterizer
use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use raster3d_core::{
    Camera, Color as PixelColor, FrameBuffer, Mesh, Model, RasterizerSettings, Renderer, RotationState, Texture,
    Vector3, ZBuffer,
};
use std::io::{stdout, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub mod logging;
pub mod options;
pub mod presenter;

pub use logging::{init_logging, LoggingConfig};
pub use options::{Command, ViewerOptions};
pub use presenter::HalfBlockPresenter;

/// Rotation applied every frame, radians per axis.
const SPIN: (f32, f32, f32) = (0.01, 0.015, 0.0);

/// Builds the rasterizer configuration the options ask for.
pub fn settings_for(options: &ViewerOptions) -> RasterizerSettings {
    RasterizerSettings {
        use_texture: options.use_texture,
        use_lighting: options.use_lighting,
        draw_polygonal_grid: options.grid,
        grid_color: PixelColor::rgb(0.1, 0.9, 0.3),
        ..RasterizerSettings::default()
    }
}

/// Renderer with the viewer's settings and a light above and behind the camera.
pub fn renderer_for(options: &ViewerOptions) -> Renderer {
    Renderer::new(settings_for(options), Vector3::new(0.4, 0.8, -1.0))
}

/// Decodes a texture file. Decoding stays out of the core crate.
pub fn load_texture(path: &Path) -> Result<Texture> {
    let image = image::open(path)
        .with_context(|| format!("failed to open texture {}", path.display()))?
        .to_rgba8();
    Texture::from_rgba_image(&image).with_context(|| format!("unusable texture {}", path.display()))
}

/// The textured cube shown by the viewer.
pub fn build_model(options: &ViewerOptions) -> Result<Model> {
    let mut model = Model::new(Mesh::cube(2.0));
    model.rotation = RotationState::new(0.3, 0.3, 0.0);

    if options.use_texture {
        let texture = match &options.texture {
            Some(path) => load_texture(path)?,
            None => Texture::checkerboard(
                64,
                8,
                PixelColor::rgb(0.9, 0.9, 0.9),
                PixelColor::rgb(0.8, 0.25, 0.2),
            )?,
        };
        model = model.with_texture(Arc::new(texture));
    }
    Ok(model)
}

/// Buffers, camera and model for one view; owns no terminal state.
pub struct Viewport {
    pub model: Model,
    pub camera: Camera,
    pub renderer: Renderer,
    pub zbuffer: ZBuffer,
    pub framebuffer: FrameBuffer,
}

impl Viewport {
    pub fn new(model: Model, renderer: Renderer, width: usize, height: usize) -> Self {
        Self {
            model,
            camera: Camera::new(width as u32, height as u32),
            renderer,
            zbuffer: ZBuffer::new(width, height),
            framebuffer: FrameBuffer::new(width, height),
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.camera.set_viewport(width as u32, height as u32);
        self.zbuffer.resize(width, height);
        self.framebuffer = FrameBuffer::new(width, height);
    }

    /// Clears both buffers and draws the model.
    pub fn render(&mut self) {
        self.zbuffer.clear();
        self.framebuffer.clear(PixelColor::BLACK);
        self.renderer
            .render_frame([&self.model], &self.camera, &mut self.zbuffer, &mut self.framebuffer);
    }

    pub fn spin(&mut self) {
        self.model.rotation.rotate(SPIN.0, SPIN.1, SPIN.2);
    }
}

/// Renders a single frame and writes it to `path`; the format follows the
/// file extension.
pub fn export_frame(viewport: &mut Viewport, path: &Path) -> Result<()> {
    viewport.render();
    viewport
        .framebuffer
        .to_rgba_image()
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    log::info!("wrote {}", path.display());
    Ok(())
}

/// Framebuffer size that fills the terminal below the status line.
fn terminal_pixels() -> Result<(usize, usize)> {
    let (cols, rows) = terminal::size().context("failed to query terminal size")?;
    Ok((cols.max(1) as usize, (rows.saturating_sub(1).max(1) as usize) * 2))
}

/// Runs `restore` once when dropped.
struct RestoreOnDrop<F: FnMut()> {
    restore: F,
}

impl<F: FnMut()> RestoreOnDrop<F> {
    fn new(restore: F) -> Self {
        Self { restore }
    }
}

impl<F: FnMut()> Drop for RestoreOnDrop<F> {
    fn drop(&mut self) {
        (self.restore)();
    }
}

fn restore_terminal() {
    if let Err(err) = execute!(stdout(), ResetColor, terminal::LeaveAlternateScreen, cursor::Show) {
        log::warn!("failed to leave the alternate screen: {}", err);
    }
    if let Err(err) = terminal::disable_raw_mode() {
        log::warn!("failed to disable raw mode: {}", err);
    }
}

/// Main application struct for terminal rendering
pub struct TerminalApp {
    viewport: Viewport,
    presenter: HalfBlockPresenter,
    fixed_size: bool,
    max_frames: Option<u32>,
    running: bool,
    frames_drawn: u32,
    last_fps_sample: Instant,
    frames_since_sample: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(model: Model, options: &ViewerOptions) -> Result<Self> {
        let (width, height) = match options.size {
            Some(size) => size,
            None => terminal_pixels()?,
        };
        Ok(Self {
            viewport: Viewport::new(model, renderer_for(options), width, height),
            presenter: HalfBlockPresenter::new(1),
            fixed_size: options.size.is_some(),
            max_frames: options.frames,
            running: true,
            frames_drawn: 0,
            last_fps_sample: Instant::now(),
            frames_since_sample: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        // restores on every exit from here on, early returns included
        let _guard = RestoreOnDrop::new(restore_terminal);
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        self.main_loop()
    }

    fn main_loop(&mut self) -> Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30);

        while self.running {
            let frame_start = Instant::now();

            if event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?)?;
            }

            self.viewport.spin();
            self.viewport.render();
            self.present()?;

            self.frames_drawn += 1;
            if self.max_frames.is_some_and(|max| self.frames_drawn >= max) {
                self.running = false;
            }

            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }
            self.sample_fps();
        }

        log::debug!("stopped after {} frames", self.frames_drawn);
        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(KeyEvent { code, modifiers, .. }) => match code {
                KeyCode::Char('q') | KeyCode::Esc => self.running = false,
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => self.running = false,
                _ => {}
            },
            Event::Resize(..) if !self.fixed_size => {
                let (width, height) = terminal_pixels()?;
                self.viewport.resize(width, height);
                execute!(stdout(), terminal::Clear(terminal::ClearType::All))?;
            }
            _ => {}
        }
        Ok(())
    }

    fn sample_fps(&mut self) {
        self.frames_since_sample += 1;
        let elapsed = self.last_fps_sample.elapsed();
        if elapsed.as_secs() >= 1 {
            self.fps = self.frames_since_sample as f32 / elapsed.as_secs_f32();
            self.frames_since_sample = 0;
            self.last_fps_sample = Instant::now();
        }
    }

    fn present(&mut self) -> Result<()> {
        let mut stdout = stdout().lock();
        self.presenter.draw(&self.viewport.framebuffer, &mut stdout)?;

        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(terminal::ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "raster3d | {}x{} | FPS: {:.1} | Q=Quit",
                self.viewport.framebuffer.width(),
                self.viewport.framebuffer.height(),
                self.fps
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(args: &[&str]) -> ViewerOptions {
        match ViewerOptions::parse(args.iter().map(|s| s.to_string())).unwrap() {
            Command::Run(options) => options,
            Command::Help => panic!("unexpected help"),
        }
    }

    #[test]
    fn test_restore_runs_when_setup_fails_early() {
        use std::cell::Cell;

        let restored = Cell::new(0);
        let failing_setup = || -> Result<()> {
            let _guard = RestoreOnDrop::new(|| restored.set(restored.get() + 1));
            anyhow::bail!("alternate screen unavailable");
        };
        assert!(failing_setup().is_err());
        assert_eq!(restored.get(), 1);

        {
            let _guard = RestoreOnDrop::new(|| restored.set(restored.get() + 1));
        }
        assert_eq!(restored.get(), 2);
    }

    #[test]
    fn test_settings_follow_flags() {
        let settings = settings_for(&options(&["--no-texture", "--no-lighting", "--grid"]));
        assert!(!settings.use_texture);
        assert!(!settings.use_lighting);
        assert!(settings.draw_polygonal_grid);

        let settings = settings_for(&ViewerOptions::default());
        assert!(settings.use_texture && settings.use_lighting && !settings.draw_polygonal_grid);
    }

    #[test]
    fn test_build_model_textures() {
        let model = build_model(&ViewerOptions::default()).unwrap();
        assert_eq!(model.mesh.triangles.len(), 12);
        assert_eq!(model.texture.as_ref().map(|t| t.width()), Some(64));

        let model = build_model(&options(&["--no-texture", "--texture", "ignored.png"])).unwrap();
        assert!(model.texture.is_none());
    }

    #[test]
    fn test_missing_texture_file_is_an_error() {
        let result = build_model(&options(&["--texture", "/nonexistent/raster3d/texture.png"]));
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("failed to open texture"), "{}", message);
    }

    #[test]
    fn test_viewport_draws_cube() {
        let model = build_model(&ViewerOptions::default()).unwrap();
        let mut viewport = Viewport::new(model, Renderer::default(), 48, 32);
        viewport.render();
        assert_ne!(viewport.framebuffer.get_pixel(24, 16), Some(PixelColor::BLACK));
        assert_eq!(viewport.framebuffer.get_pixel(0, 0), Some(PixelColor::BLACK));

        viewport.resize(20, 10);
        viewport.render();
        assert_eq!(viewport.framebuffer.width(), 20);
        assert_eq!(viewport.zbuffer.height(), 10);
    }

    #[test]
    fn test_export_frame_writes_png() {
        let model = build_model(&options(&["--no-texture"])).unwrap();
        let mut viewport = Viewport::new(model, Renderer::default(), 32, 24);
        let path = std::env::temp_dir().join(format!("raster3d-export-{}.png", std::process::id()));
        export_frame(&mut viewport, &path).unwrap();

        let image = image::open(&path).unwrap().to_rgba8();
        assert_eq!(image.dimensions(), (32, 24));
        assert_ne!(image.get_pixel(16, 12).0, [0, 0, 0, 255]);
        std::fs::remove_file(&path).unwrap();
    }
}
