//! Multi-threaded pixel scheduler.
//!
//! Workers on a rayon pool pull pixel coordinates from a shared cursor,
//! compute each pixel through the camera and write it into an
//! [`ImageSink`]. A separate thread reports progress on a timer.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::CameraError;
use crate::random::pixel_rng;
use crate::{Camera, ImageSink, RayTracer};

/// Upper bound on worker threads.
pub const MAX_THREADS: usize = 4;

/// Errors that stop a render before any pixel is computed.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Camera is not ready: {0}")]
    Camera(#[from] CameraError),

    #[error("Image of {width}x{height} pixels has nothing to render")]
    EmptyImage { width: u32, height: u32 },

    #[error("Thread count {requested} must be between 1 and {max}")]
    InvalidThreadCount { requested: usize, max: usize },

    #[error("Grid interval must be positive")]
    InvalidGridInterval,

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Render configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Number of worker threads, 1 to [`MAX_THREADS`]
    pub threads: usize,
    /// Progress report period in milliseconds; 0 disables reporting
    pub progress_interval_ms: u64,
    /// Seed for sampling jitter
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            threads: 1,
            progress_interval_ms: 0,
            seed: 0,
        }
    }
}

/// Cloneable flag for stopping a render from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask running workers to stop after their current pixel.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Outcome of a render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderStats {
    /// Pixels in the image
    pub total: u64,
    /// Pixels written to the sink
    pub completed: u64,
    /// Pixels whose computation panicked or produced a non-finite colour
    pub failed: u64,
    /// Whether the render stopped before visiting every pixel
    pub cancelled: bool,
}

/// Next pixel to hand out, in row-major order.
#[derive(Debug, Default)]
struct Cursor {
    row: u32,
    col: u32,
}

/// State shared by the workers of one render.
pub struct RenderContext {
    width: u32,
    height: u32,
    cursor: Mutex<Cursor>,
    completed: Mutex<u64>,
    failed: AtomicU64,
    cancel: CancelToken,
}

impl RenderContext {
    pub fn new(width: u32, height: u32, cancel: CancelToken) -> Self {
        Self {
            width,
            height,
            cursor: Mutex::new(Cursor::default()),
            completed: Mutex::new(0),
            failed: AtomicU64::new(0),
            cancel,
        }
    }

    pub fn total(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Claim the next pixel as `(x, y)`, or `None` once the image is
    /// exhausted or the render was cancelled.
    pub fn next_pixel(&self) -> Option<(u32, u32)> {
        if self.cancel.is_cancelled() {
            return None;
        }
        let mut cursor = self.cursor.lock().unwrap_or_else(PoisonError::into_inner);
        if cursor.row >= self.height || self.width == 0 {
            return None;
        }
        let pixel = (cursor.col, cursor.row);
        cursor.col += 1;
        if cursor.col >= self.width {
            cursor.col = 0;
            cursor.row += 1;
        }
        Some(pixel)
    }

    fn pixel_done(&self) {
        *self.completed.lock().unwrap_or_else(PoisonError::into_inner) += 1;
    }

    fn pixel_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn completed(&self) -> u64 {
        *self.completed.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    /// Pixels finished either way.
    pub fn processed(&self) -> u64 {
        self.completed() + self.failed()
    }

    fn stats(&self) -> RenderStats {
        let (completed, failed) = (self.completed(), self.failed());
        RenderStats {
            total: self.total(),
            completed,
            failed,
            cancelled: completed + failed < self.total(),
        }
    }
}

/// Render every pixel of `sink` through `camera` and `tracer`.
///
/// The camera and the configuration are validated before any pixel work
/// starts. Pixels that fail are counted and skipped; the sink slot keeps
/// its previous value.
pub fn render(
    camera: &Camera,
    tracer: &dyn RayTracer,
    sink: &dyn ImageSink,
    config: &RenderConfig,
    cancel: &CancelToken,
) -> Result<RenderStats, RenderError> {
    camera.validate()?;

    let (width, height) = (sink.width(), sink.height());
    if width == 0 || height == 0 {
        return Err(RenderError::EmptyImage { width, height });
    }
    if !(1..=MAX_THREADS).contains(&config.threads) {
        return Err(RenderError::InvalidThreadCount {
            requested: config.threads,
            max: MAX_THREADS,
        });
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .thread_name(|i| format!("lumen-worker-{i}"))
        .build()?;

    log::info!(
        "Rendering {}x{} on {} threads ({:?} sampling, {} samples)",
        width,
        height,
        config.threads,
        camera.sampling(),
        camera.samples()
    );

    let ctx = RenderContext::new(width, height, cancel.clone());
    let start = Instant::now();

    let (stop_tx, stop_rx) = mpsc::channel::<()>();
    thread::scope(|s| {
        if config.progress_interval_ms > 0 {
            let interval = Duration::from_millis(config.progress_interval_ms);
            let ctx = &ctx;
            s.spawn(move || report_progress(ctx, interval, stop_rx));
        }

        pool.broadcast(|_| worker(&ctx, camera, tracer, sink, config.seed));
        drop(stop_tx);
    });

    let stats = ctx.stats();
    if stats.cancelled {
        log::info!(
            "Render cancelled after {}/{} pixels ({:.2?})",
            stats.completed + stats.failed,
            stats.total,
            start.elapsed()
        );
    } else {
        log::info!(
            "Rendered {} pixels in {:.2?} ({} failed)",
            stats.total,
            start.elapsed(),
            stats.failed
        );
    }
    Ok(stats)
}

fn worker(
    ctx: &RenderContext,
    camera: &Camera,
    tracer: &dyn RayTracer,
    sink: &dyn ImageSink,
    seed: u64,
) {
    while let Some((x, y)) = ctx.next_pixel() {
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let mut rng = pixel_rng(seed, x, y);
            camera.pixel_color(tracer, ctx.width, ctx.height, x, y, &mut rng)
        }));

        match result {
            Ok(color) if color.is_finite() => {
                sink.write_pixel(x, y, color);
                ctx.pixel_done();
            }
            Ok(color) => {
                log::warn!("Pixel ({x}, {y}) produced a non-finite colour {color}");
                ctx.pixel_failed();
            }
            Err(payload) => {
                log::warn!("Pixel ({x}, {y}) failed: {}", panic_message(payload.as_ref()));
                ctx.pixel_failed();
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// Log progress every `interval` until `stop` fires or disconnects.
fn report_progress(ctx: &RenderContext, interval: Duration, stop: Receiver<()>) {
    let total = ctx.total();
    let mut last = None;
    loop {
        let permille = ctx.processed() * 1000 / total;
        if last != Some(permille) {
            log::info!("{:5.1}%", permille as f64 / 10.0);
            last = Some(permille);
        }
        match stop.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => continue,
            _ => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, ImageBuffer, SamplingMode};
    use lumen_math::{Ray, Vec3};
    use std::sync::atomic::AtomicUsize;

    fn camera() -> Camera {
        Camera::new(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y)
            .unwrap()
            .with_view_plane(3.0, 3.0)
            .with_distance(1.0)
    }

    struct DirectionTracer;

    impl RayTracer for DirectionTracer {
        fn trace_ray(&self, ray: &Ray) -> Color {
            ray.direction().abs()
        }
    }

    /// Panics right of the vertical axis, NaN above the horizontal one.
    struct FaultyTracer;

    impl RayTracer for FaultyTracer {
        fn trace_ray(&self, ray: &Ray) -> Color {
            let d = ray.direction();
            if d.x > 1e-3 {
                panic!("bad pixel");
            }
            if d.y > 1e-3 {
                return Color::splat(f32::NAN);
            }
            Color::ONE
        }
    }

    /// Cancels the render once it has traced `limit` rays.
    struct CancellingTracer {
        token: CancelToken,
        calls: AtomicUsize,
        limit: usize,
    }

    impl RayTracer for CancellingTracer {
        fn trace_ray(&self, _ray: &Ray) -> Color {
            if self.calls.fetch_add(1, Ordering::Relaxed) + 1 >= self.limit {
                self.token.cancel();
            }
            Color::ONE
        }
    }

    #[test]
    fn test_cursor_is_row_major() {
        let ctx = RenderContext::new(2, 2, CancelToken::new());
        let pixels: Vec<_> = std::iter::from_fn(|| ctx.next_pixel()).collect();
        assert_eq!(pixels, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
        assert_eq!(ctx.next_pixel(), None);
        assert_eq!(ctx.total(), 4);
    }

    #[test]
    fn test_cursor_empty_dimensions() {
        let no_columns = RenderContext::new(0, 3, CancelToken::new());
        assert_eq!(no_columns.next_pixel(), None);
        assert_eq!(no_columns.total(), 0);

        let no_rows = RenderContext::new(3, 0, CancelToken::new());
        assert_eq!(no_rows.next_pixel(), None);
    }

    #[test]
    fn test_every_pixel_written() {
        let cam = camera();
        let buffer = ImageBuffer::new(3, 3);
        let config = RenderConfig {
            threads: 3,
            ..RenderConfig::default()
        };

        let stats = render(&cam, &DirectionTracer, &buffer, &config, &CancelToken::new()).unwrap();
        assert_eq!(
            stats,
            RenderStats {
                total: 9,
                completed: 9,
                failed: 0,
                cancelled: false
            }
        );

        for y in 0..3 {
            for x in 0..3 {
                let expected = cam.construct_ray(3, 3, x, y).direction().abs();
                assert_eq!(buffer.get(x, y), expected);
            }
        }
    }

    #[test]
    fn test_seeded_render_independent_of_thread_count() {
        let cam = camera().with_sampling(SamplingMode::AntiAliasing, 4);
        let render_with = |threads| {
            let buffer = ImageBuffer::new(6, 4);
            let config = RenderConfig {
                threads,
                seed: 11,
                ..RenderConfig::default()
            };
            render(&cam, &DirectionTracer, &buffer, &config, &CancelToken::new()).unwrap();
            buffer.to_rgba()
        };
        assert_eq!(render_with(1), render_with(4));
    }

    #[test]
    fn test_rejects_bad_configuration() {
        let buffer = ImageBuffer::new(2, 2);
        let token = CancelToken::new();

        for threads in [0, MAX_THREADS + 1] {
            let config = RenderConfig {
                threads,
                ..RenderConfig::default()
            };
            assert!(matches!(
                render(&camera(), &DirectionTracer, &buffer, &config, &token),
                Err(RenderError::InvalidThreadCount { requested, max: MAX_THREADS }) if requested == threads
            ));
        }

        let bare = Camera::new(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y).unwrap();
        assert!(matches!(
            render(&bare, &DirectionTracer, &buffer, &RenderConfig::default(), &token),
            Err(RenderError::Camera(CameraError::ViewPlaneNotSet))
        ));

        let empty = ImageBuffer::new(0, 5);
        assert!(matches!(
            render(&camera(), &DirectionTracer, &empty, &RenderConfig::default(), &token),
            Err(RenderError::EmptyImage { width: 0, height: 5 })
        ));
    }

    #[test]
    fn test_pixel_failures_are_isolated() {
        let buffer = ImageBuffer::new(3, 3);
        let config = RenderConfig {
            threads: 2,
            ..RenderConfig::default()
        };

        let stats = render(&camera(), &FaultyTracer, &buffer, &config, &CancelToken::new()).unwrap();
        // Right column panics, the rest of the top row is NaN
        assert_eq!(stats.failed, 5);
        assert_eq!(stats.completed, 4);
        assert!(!stats.cancelled);

        assert_eq!(buffer.get(0, 2), Color::ONE);
        assert_eq!(buffer.get(2, 2), Color::ZERO);
        assert_eq!(buffer.get(0, 0), Color::ZERO);
    }

    #[test]
    fn test_cancelled_before_start() {
        let buffer = ImageBuffer::new(4, 4);
        let token = CancelToken::new();
        token.cancel();

        let stats = render(&camera(), &DirectionTracer, &buffer, &RenderConfig::default(), &token).unwrap();
        assert_eq!(stats.completed, 0);
        assert!(stats.cancelled);
        assert_eq!(buffer.get(1, 1), Color::ZERO);
    }

    #[test]
    fn test_cancel_mid_render() {
        let buffer = ImageBuffer::new(4, 4);
        let token = CancelToken::new();
        let tracer = CancellingTracer {
            token: token.clone(),
            calls: AtomicUsize::new(0),
            limit: 5,
        };

        let stats = render(&camera(), &tracer, &buffer, &RenderConfig::default(), &token).unwrap();
        assert_eq!(stats.completed, 5);
        assert_eq!(stats.total, 16);
        assert!(stats.cancelled);
        assert_eq!(buffer.get(0, 1), Color::ONE);
        assert_eq!(buffer.get(1, 1), Color::ZERO);
    }

    #[test]
    fn test_progress_reporting_finishes() {
        let buffer = ImageBuffer::new(8, 8);
        let config = RenderConfig {
            threads: 2,
            progress_interval_ms: 1,
            seed: 0,
        };
        let stats = render(&camera(), &DirectionTracer, &buffer, &config, &CancelToken::new()).unwrap();
        assert_eq!(stats.completed, 64);
    }

    #[test]
    fn test_config_json() {
        let config = RenderConfig {
            threads: 4,
            progress_interval_ms: 250,
            seed: 42,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(serde_json::from_str::<RenderConfig>(&json).unwrap(), config);

        let defaults: RenderConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(defaults, RenderConfig::default());
    }
}
