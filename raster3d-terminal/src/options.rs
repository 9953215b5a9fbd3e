/// Command-line options for the viewer
use anyhow::{anyhow, bail, Context, Result};
use std::path::PathBuf;

pub const USAGE: &str = "\
Usage: raster3d-terminal [OPTIONS]

Options:
  --size WxH        Framebuffer size in pixels (default: fit the terminal)
  --texture PATH    Texture image for the cube (default: checkerboard)
  --no-texture      Fill with the default color instead of sampling a texture
  --no-lighting     Disable N.L shading
  --grid            Overlay triangle edges
  --frames N        Stop after N frames
  --output PATH     Render one frame to an image file and exit
  -h, --help        Show this help";

/// Default framebuffer size for image export when `--size` is absent.
pub const DEFAULT_EXPORT_SIZE: (usize, usize) = (320, 240);

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerOptions {
    pub size: Option<(usize, usize)>,
    pub texture: Option<PathBuf>,
    pub use_texture: bool,
    pub use_lighting: bool,
    pub grid: bool,
    pub frames: Option<u32>,
    pub output: Option<PathBuf>,
}

/// What the binary was asked to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(ViewerOptions),
    Help,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            size: None,
            texture: None,
            use_texture: true,
            use_lighting: true,
            grid: false,
            frames: None,
            output: None,
        }
    }
}

impl ViewerOptions {
    /// Parses arguments, excluding the program name.
    pub fn parse<I>(args: I) -> Result<Command>
    where
        I: IntoIterator<Item = String>,
    {
        let mut options = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--size" => {
                    let value = required_value(&mut args, &arg)?;
                    options.size = Some(parse_size(&value)?);
                }
                "--texture" => {
                    options.texture = Some(PathBuf::from(required_value(&mut args, &arg)?));
                }
                "--no-texture" => options.use_texture = false,
                "--no-lighting" => options.use_lighting = false,
                "--grid" => options.grid = true,
                "--frames" => {
                    let value = required_value(&mut args, &arg)?;
                    let frames: u32 = value
                        .parse()
                        .with_context(|| format!("invalid frame count '{}'", value))?;
                    if frames == 0 {
                        bail!("--frames must be at least 1");
                    }
                    options.frames = Some(frames);
                }
                "--output" | "-o" => {
                    options.output = Some(PathBuf::from(required_value(&mut args, &arg)?));
                }
                "--help" | "-h" => return Ok(Command::Help),
                other => bail!("unknown argument '{}'\n\n{}", other, USAGE),
            }
        }

        Ok(Command::Run(options))
    }
}

fn required_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next().ok_or_else(|| anyhow!("{} expects a value", flag))
}

/// Parses `WxH`, both sides non-zero.
pub fn parse_size(value: &str) -> Result<(usize, usize)> {
    let (w, h) = value
        .split_once(|c: char| c == 'x' || c == 'X')
        .ok_or_else(|| anyhow!("size '{}' is not in WxH form", value))?;
    let width: usize = w.trim().parse().with_context(|| format!("invalid width in '{}'", value))?;
    let height: usize = h.trim().parse().with_context(|| format!("invalid height in '{}'", value))?;
    if width == 0 || height == 0 {
        bail!("size '{}' has a zero dimension", value);
    }
    Ok((width, height))
}
