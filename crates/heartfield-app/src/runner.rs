use std::path::PathBuf;
use std::str::FromStr;

use heartfield_core::{FieldConfig, FieldStats, ProfileKind, SeededRandom};
use heartfield_page::{Page, PageConfig, PageParts};
use heartfield_platform::{FixedStepScheduler, ImageElement, Result, ViewportSize};
use serde::Serialize;
use tracing::{info, warn};

use crate::headless::{LogElement, SharedViewport, SilentMedia};
use crate::raster::{RasterSurface, SharedRaster};
use crate::script::RunScript;

const FACE_COUNT: usize = 6;
/// Largest raster edge the runner will allocate.
pub const MAX_EDGE: u32 = 16_384;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub config_path: Option<PathBuf>,
    pub frames: u64,
    pub seed: u64,
    pub viewport: ViewportSize,
    pub frame_interval_ms: f64,
    pub output: PathBuf,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            config_path: None,
            frames: 600,
            seed: 2024,
            viewport: ViewportSize::new(1280, 800),
            frame_interval_ms: 16.0,
            output: PathBuf::from("heartfield.png"),
        }
    }
}

impl RunOptions {
    /// `HEARTFIELD_CONFIG`, `HEARTFIELD_FRAMES`, `HEARTFIELD_SEED`,
    /// `HEARTFIELD_WIDTH`, `HEARTFIELD_HEIGHT`, `HEARTFIELD_OUT`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            config_path: std::env::var_os("HEARTFIELD_CONFIG").map(PathBuf::from),
            frames: env_or("HEARTFIELD_FRAMES", defaults.frames),
            seed: env_or("HEARTFIELD_SEED", defaults.seed),
            viewport: ViewportSize::new(
                env_or("HEARTFIELD_WIDTH", defaults.viewport.width),
                env_or("HEARTFIELD_HEIGHT", defaults.viewport.height),
            ),
            frame_interval_ms: defaults.frame_interval_ms,
            output: std::env::var_os("HEARTFIELD_OUT")
                .map(PathBuf::from)
                .unwrap_or(defaults.output),
        }
    }

    /// Rejects viewports the software canvas cannot hold.
    pub fn validate(&self) -> Result<()> {
        let ViewportSize { width, height } = self.viewport;
        if width == 0 || height == 0 || width > MAX_EDGE || height > MAX_EDGE {
            return Err(format!(
                "viewport {width}x{height} must be within 1..={MAX_EDGE} on each edge"
            )
            .into());
        }
        Ok(())
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("ignoring unparsable {name}={raw:?}");
            default
        }),
        Err(_) => default,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub profile: ProfileKind,
    pub stats: FieldStats,
    pub peak_live: usize,
    pub audio_paused: bool,
    pub cube_paused: bool,
    pub lightbox_open: bool,
    pub output: String,
}

/// Runs the page against the software canvas and writes the last frame.
pub fn run_headless(options: &RunOptions) -> Result<RunSummary> {
    options.validate()?;
    let field_config = match &options.config_path {
        Some(path) => FieldConfig::load(path)?,
        None => FieldConfig::default(),
    };
    let viewport = SharedViewport::new(options.viewport);
    let surface = SharedRaster::new(RasterSurface::new(options.viewport));
    let faces = (0..FACE_COUNT)
        .map(|index| {
            let src = format!("faces/{index}.jpg");
            let alt = format!("Memory {}", index + 1);
            Box::new(LogElement::image(format!("face {index}"), &src, &alt)) as Box<dyn ImageElement>
        })
        .collect();
    let parts = PageParts {
        surface: Box::new(surface.clone()),
        viewport: Box::new(viewport.clone()),
        media: Box::new(SilentMedia::new()),
        audio_button: Box::new(LogElement::new("audio toggle")),
        initial_volume: 0.5,
        cube_large: Box::new(LogElement::new("large cube")),
        cube_small: Box::new(LogElement::new("small cube")),
        faces,
        lightbox: Box::new(LogElement::new("lightbox")),
        lightbox_image: Box::new(LogElement::image("lightbox image", "", "")),
    };
    let mut page = Page::new(
        field_config,
        &PageConfig::default(),
        parts,
        Box::new(SeededRandom::new(options.seed)),
    )?;
    let handles = page.handles();
    let resized = ViewportSize::new(
        (options.viewport.width / 5 * 4).max(1),
        (options.viewport.height / 5 * 4).max(1),
    );
    let mut script = RunScript::demo(resized);
    let mut scheduler = FixedStepScheduler::new(options.frame_interval_ms);

    page.start(0.0, &mut scheduler);
    let mut peak_live = 0;
    while scheduler.frames_granted() < options.frames {
        let Some(timestamp) = scheduler.next_frame() else {
            break;
        };
        let frame = scheduler.frames_granted();
        script.dispatch(frame, &handles, &viewport);
        page.frame(timestamp, &mut scheduler);
        peak_live = peak_live.max(page.field().len());
        if frame % 120 == 0 {
            info!("frame {frame}: {} hearts", page.field().len());
        }
    }

    if !script.is_finished() {
        info!("run ended before the scripted interactions finished");
    }
    surface.save_png(&options.output)?;
    info!("last frame written to {}", options.output.display());
    Ok(RunSummary {
        profile: page.field().profile_kind(),
        stats: page.field().stats(),
        peak_live,
        audio_paused: page.audio().is_paused(),
        cube_paused: page.cube().is_paused(),
        lightbox_open: page.lightbox().is_open(),
        output: options.output.display().to_string(),
    })
}
