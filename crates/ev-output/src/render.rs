//! Frame-by-frame rendering of a run.
//!
//! The network's edges are drawn once into a base image.  Each recorded step
//! then becomes one frame: the base, the target marked as a square, and one
//! semi-transparent disc per agent record, so crowded nodes come out darker.
//! Frames go to a [`FrameSink`]; [`FfmpegSink`] encodes them to a video by
//! piping raw RGB into an `ffmpeg` process, [`PngSequenceSink`] writes
//! numbered images.
//!
//! Longitude is scaled by the cosine of the network's mid latitude so that
//! small areas are drawn without visible stretching.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use image::{Rgb, RgbImage};

use ev_core::{GeoPoint, NodeId};
use ev_sim::{AgentRecord, TimeSeries};
use ev_spatial::RoadNetwork;

use crate::{OutputError, OutputResult};

/// Default palette.
pub mod colors {
    use image::Rgb;

    pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    pub const LIGHT_GRAY: Rgb<u8> = Rgb([170, 170, 170]);
    pub const ORANGE: Rgb<u8> = Rgb([255, 140, 0]);
    pub const BLUE: Rgb<u8> = Rgb([0, 110, 230]);
}

// ── Options ───────────────────────────────────────────────────────────────────

/// Look of the rendered frames.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Frame width in pixels.  Must be even (the video encoder's chroma
    /// subsampling needs it).
    pub width:         u32,
    /// Frame height in pixels.  Must be even.
    pub height:        u32,
    pub margin:        u32,
    pub marker_radius: u32,
    pub background:    Rgb<u8>,
    pub edge:          Rgb<u8>,
    pub agent:         Rgb<u8>,
    /// Opacity of one agent marker, `0.0..=1.0`.
    pub agent_alpha:   f32,
    pub target:        Rgb<u8>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width:         1280,
            height:        720,
            margin:        20,
            marker_radius: 4,
            background:    colors::WHITE,
            edge:          colors::LIGHT_GRAY,
            agent:         colors::ORANGE,
            agent_alpha:   0.2,
            target:        colors::BLUE,
        }
    }
}

impl RenderOptions {
    pub fn validate(&self) -> OutputResult<()> {
        let invalid = |msg: String| Err(OutputError::InvalidOptions(msg));
        if self.width == 0 || self.height == 0 {
            return invalid(format!("frame size {}x{} is empty", self.width, self.height));
        }
        if self.width % 2 != 0 || self.height % 2 != 0 {
            return invalid(format!("frame size {}x{} must be even", self.width, self.height));
        }
        if 2 * self.margin >= self.width.min(self.height) {
            return invalid(format!("margin {} leaves no drawing area", self.margin));
        }
        if !(0.0..=1.0).contains(&self.agent_alpha) {
            return invalid(format!("agent_alpha {} is outside 0..=1", self.agent_alpha));
        }
        Ok(())
    }
}

// ── Drawing helpers ───────────────────────────────────────────────────────────

/// Pixels outside the image are ignored.
fn put(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && x < img.width() as i64 && y < img.height() as i64 {
        img.put_pixel(x as u32, y as u32, color);
    }
}

fn blend(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>, alpha: f32) {
    if x < 0 || y < 0 || x >= img.width() as i64 || y >= img.height() as i64 {
        return;
    }
    let pixel = img.get_pixel_mut(x as u32, y as u32);
    for (dst, src) in pixel.0.iter_mut().zip(color.0) {
        *dst = (src as f32 * alpha + *dst as f32 * (1.0 - alpha)).round() as u8;
    }
}

/// Bresenham line, inclusive of both ends.
fn draw_line(img: &mut RgbImage, (x0, y0): (i64, i64), (x1, y1): (i64, i64), color: Rgb<u8>) {
    let (dx, dy) = ((x1 - x0).abs(), -(y1 - y0).abs());
    let (sx, sy) = (if x0 < x1 { 1 } else { -1 }, if y0 < y1 { 1 } else { -1 });
    let (mut x, mut y, mut err) = (x0, y0, dx + dy);
    loop {
        put(img, x, y, color);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

fn draw_disc(img: &mut RgbImage, (cx, cy): (i64, i64), radius: i64, color: Rgb<u8>, alpha: f32) {
    for y in -radius..=radius {
        for x in -radius..=radius {
            if x * x + y * y <= radius * radius {
                blend(img, cx + x, cy + y, color, alpha);
            }
        }
    }
}

fn draw_square(img: &mut RgbImage, (cx, cy): (i64, i64), half: i64, color: Rgb<u8>) {
    for y in -half..=half {
        for x in -half..=half {
            put(img, cx + x, cy + y, color);
        }
    }
}

// ── Renderer ──────────────────────────────────────────────────────────────────

/// Maps geographic positions onto the frame.
#[derive(Debug, Clone, Copy)]
struct Projection {
    min_x:  f64,
    max_y:  f64,
    kx:     f64,
    scale:  f64,
    left:   f64,
    top:    f64,
}

impl Projection {
    fn fit(min: GeoPoint, max: GeoPoint, options: &RenderOptions) -> Self {
        let kx = ((min.lat + max.lat) / 2.0).to_radians().cos();
        let span_x = (max.lon - min.lon) * kx;
        let span_y = max.lat - min.lat;
        let avail_w = (options.width - 2 * options.margin) as f64;
        let avail_h = (options.height - 2 * options.margin) as f64;

        let scale = match (span_x > 0.0, span_y > 0.0) {
            (true, true) => (avail_w / span_x).min(avail_h / span_y),
            (true, false) => avail_w / span_x,
            (false, true) => avail_h / span_y,
            (false, false) => 1.0,
        };
        Self {
            min_x: min.lon * kx,
            max_y: max.lat,
            kx,
            scale,
            left:  options.margin as f64 + (avail_w - span_x * scale) / 2.0,
            top:   options.margin as f64 + (avail_h - span_y * scale) / 2.0,
        }
    }

    fn to_px(&self, pos: GeoPoint) -> (i64, i64) {
        let x = self.left + (pos.lon * self.kx - self.min_x) * self.scale;
        let y = self.top + (self.max_y - pos.lat) * self.scale;
        (x.round() as i64, y.round() as i64)
    }
}

/// Draws frames for one network.
pub struct Renderer<'a> {
    network:    &'a RoadNetwork,
    options:    RenderOptions,
    projection: Projection,
    base:       RgbImage,
}

impl<'a> Renderer<'a> {
    pub fn new(network: &'a RoadNetwork, options: RenderOptions) -> OutputResult<Self> {
        options.validate()?;
        let (min, max) = network
            .bounds()
            .ok_or_else(|| OutputError::InvalidOptions("network has no nodes to draw".to_string()))?;
        let projection = Projection::fit(min, max, &options);

        let mut base = RgbImage::from_pixel(options.width, options.height, options.background);
        for e in 0..network.edge_count() {
            let (from, to) = (network.edge_from[e], network.edge_to[e]);
            if let (Some(a), Some(b)) = (network.position(from), network.position(to)) {
                draw_line(&mut base, projection.to_px(a), projection.to_px(b), options.edge);
            }
        }
        Ok(Self { network, options, projection, base })
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Pixel position of `node`, if it exists.
    pub fn node_px(&self, node: NodeId) -> Option<(i64, i64)> {
        self.network.position(node).map(|p| self.projection.to_px(p))
    }

    /// The network with nothing on it.
    pub fn base(&self) -> &RgbImage {
        &self.base
    }

    /// One frame: `records` (a single step) drawn over the base.
    ///
    /// Each record adds one marker, so a node's tint deepens with its
    /// occupancy.
    pub fn frame(&self, records: &[AgentRecord], target: NodeId) -> RgbImage {
        let mut img = self.base.clone();
        let radius = self.options.marker_radius as i64;

        if let Some(px) = self.node_px(target) {
            draw_square(&mut img, px, radius + 2, self.options.target);
        }
        for record in records {
            if let Some(px) = self.node_px(record.position) {
                draw_disc(&mut img, px, radius, self.options.agent, self.options.agent_alpha);
            }
        }
        img
    }
}

// ── Sinks ─────────────────────────────────────────────────────────────────────

/// Where rendered frames go.
pub trait FrameSink {
    fn write_frame(&mut self, frame: &RgbImage) -> OutputResult<()>;

    /// Flush and close.  Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}

/// Encodes frames into a video file with an external `ffmpeg` process.
pub struct FfmpegSink {
    child:  Option<Child>,
    stdin:  Option<ChildStdin>,
    path:   PathBuf,
    size:   (u32, u32),
}

impl FfmpegSink {
    /// Start `ffmpeg` from `PATH`, writing to `path` at `fps` frames per second.
    pub fn spawn(path: &Path, width: u32, height: u32, fps: u32) -> OutputResult<Self> {
        Self::spawn_program("ffmpeg", path, width, height, fps)
    }

    /// Like [`spawn`][Self::spawn] with an explicit encoder binary.
    ///
    /// The output path is always the encoder's last argument.
    pub fn spawn_program(
        program: &str,
        path:    &Path,
        width:   u32,
        height:  u32,
        fps:     u32,
    ) -> OutputResult<Self> {
        if fps == 0 {
            return Err(OutputError::InvalidFps);
        }
        let mut child = Command::new(program)
            .args(["-hide_banner", "-loglevel", "error", "-nostats", "-y"])
            .args(["-f", "rawvideo", "-pix_fmt", "rgb24"])
            .args(["-s", &format!("{width}x{height}"), "-r", &fps.to_string()])
            .args(["-i", "-", "-an", "-pix_fmt", "yuv420p"])
            .arg(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| OutputError::Encoder(format!("cannot start {program}: {e}")))?;
        let stdin = child.stdin.take();
        Ok(Self { child: Some(child), stdin, path: path.to_path_buf(), size: (width, height) })
    }
}

impl FrameSink for FfmpegSink {
    /// A write that fails because the encoder has exited reports the
    /// encoder's own error output when it has any.
    fn write_frame(&mut self, frame: &RgbImage) -> OutputResult<()> {
        if frame.dimensions() != self.size {
            return Err(OutputError::InvalidOptions(format!(
                "frame is {}x{}, encoder expects {}x{}",
                frame.width(), frame.height(), self.size.0, self.size.1,
            )));
        }
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| OutputError::Encoder("encoder input already closed".to_string()))?;
        if let Err(e) = stdin.write_all(frame.as_raw()) {
            self.finish()?;
            return Err(e.into());
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        // Closing stdin tells ffmpeg the stream is over.
        drop(self.stdin.take());
        let Some(child) = self.child.take() else { return Ok(()) };
        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(OutputError::Encoder(format!(
                "{} while writing {}: {}",
                output.status,
                self.path.display(),
                String::from_utf8_lossy(&output.stderr).trim(),
            )));
        }
        Ok(())
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        if self.child.is_some() {
            if let Err(e) = self.finish() {
                log::warn!("encoder for {} did not finish cleanly: {e}", self.path.display());
            }
        }
    }
}

/// Writes `frame_00000.png`, `frame_00001.png`, … into a directory.
pub struct PngSequenceSink {
    dir:  PathBuf,
    next: usize,
}

impl PngSequenceSink {
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self { dir: dir.to_path_buf(), next: 0 })
    }

    pub fn frames_written(&self) -> usize {
        self.next
    }

    pub fn frame_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("frame_{index:05}.png"))
    }
}

impl FrameSink for PngSequenceSink {
    fn write_frame(&mut self, frame: &RgbImage) -> OutputResult<()> {
        frame.save(self.frame_path(self.next))?;
        self.next += 1;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        Ok(())
    }
}

// ── Entry points ──────────────────────────────────────────────────────────────

/// Render one frame per recorded step of `series` into `sink`, then finish it.
///
/// Returns the number of frames written.
pub fn render_frames<S: FrameSink>(
    network: &RoadNetwork,
    series:  &TimeSeries,
    target:  NodeId,
    options: &RenderOptions,
    sink:    &mut S,
) -> OutputResult<usize> {
    if series.step_count() == 0 {
        return Err(OutputError::NoSteps);
    }
    let renderer = Renderer::new(network, options.clone())?;
    let mut frames = 0;
    for step in series.steps() {
        sink.write_frame(&renderer.frame(series.at_step(step), target))?;
        frames += 1;
    }
    sink.finish()?;
    Ok(frames)
}

/// Render the run to a video at `path`, playing `fps` steps per second.
pub fn render(
    network: &RoadNetwork,
    series:  &TimeSeries,
    target:  NodeId,
    path:    &Path,
    fps:     u32,
    options: &RenderOptions,
) -> OutputResult<usize> {
    if fps == 0 {
        return Err(OutputError::InvalidFps);
    }
    if series.step_count() == 0 {
        return Err(OutputError::NoSteps);
    }
    options.validate()?;

    let mut sink = FfmpegSink::spawn(path, options.width, options.height, fps)?;
    let frames = render_frames(network, series, target, options, &mut sink)?;
    log::info!("rendered {frames} frames at {fps} fps to {}", path.display());
    Ok(frames)
}
