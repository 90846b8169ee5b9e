//! Parallel path-tracing renderer.
//!
//! Frame-buffer rows are dealt round-robin to a fixed pool of scoped OS
//! threads. The committed scene is shared read-only, every row has exactly
//! one writer, and each worker draws from its own RNG, so the only
//! synchronization point is the final join.

use crate::sampling::gen_f64;
use crate::{Camera, Color, HitRecord, Hittable};
use ember_math::{Interval, Ray};
use image::RgbImage;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::num::NonZeroUsize;
use std::path::Path;
use std::thread;

/// Minimum hit distance; keeps bounced rays from re-hitting their origin.
const T_MIN: f64 = 0.001;

/// Renderer configuration consumed by `render_scene`.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub image_width: u32,
    pub image_height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Worker thread count; zero or negative means hardware concurrency
    pub num_threads: i32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            image_width: 400,
            image_height: 225,
            samples_per_pixel: 30,
            max_depth: 10,
            num_threads: 0,
        }
    }
}

/// Compute the color seen by a ray.
///
/// The core path tracing estimator: recurse through scatter events until
/// the bounce budget runs out (black), the ray escapes (background
/// gradient), or a material absorbs it (black).
pub fn ray_color(ray: &Ray, world: &dyn Hittable, depth: u32, rng: &mut dyn RngCore) -> Color {
    if depth == 0 {
        return Color::ZERO;
    }

    let mut rec = HitRecord::default();
    if world.hit(ray, Interval::new(T_MIN, f64::INFINITY), &mut rec) {
        return match rec.material.scatter(ray, &rec, rng) {
            Some(scatter) => {
                scatter.attenuation * ray_color(&scatter.scattered, world, depth - 1, rng)
            }
            None => Color::ZERO,
        };
    }

    sky_gradient(ray)
}

/// Background: white at the horizon blending to sky blue upward.
fn sky_gradient(ray: &Ray) -> Color {
    let a = 0.5 * (ray.direction().y + 1.0);
    (1.0 - a) * Color::ONE + a * Color::new(0.5, 0.7, 1.0)
}

/// Row-major frame buffer of averaged linear pixel colors.
///
/// Row 0 is the bottom of the image; encoding flips to the usual
/// top-to-bottom order.
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl FrameBuffer {
    /// Create a new frame buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Mutable frame rows, bottom-up.
    fn rows_mut(&mut self) -> std::slice::ChunksMut<'_, Color> {
        self.pixels.chunks_mut(self.width as usize)
    }

    /// Gamma-encoded RGB8 bytes, top row first.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity((self.width * self.height * 3) as usize);
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                let color = self.get(x, y);
                bytes.push(to_byte(color.x));
                bytes.push(to_byte(color.y));
                bytes.push(to_byte(color.z));
            }
        }
        bytes
    }

    /// Encode and write the buffer as a PNG.
    pub fn save_png(&self, path: &Path) -> Result<(), image::ImageError> {
        let image = RgbImage::from_fn(self.width, self.height, |x, y| {
            // image rows run top-down, the buffer bottom-up
            let color = self.get(x, self.height - 1 - y);
            image::Rgb([to_byte(color.x), to_byte(color.y), to_byte(color.z)])
        });
        image.save(path)
    }
}

/// Square-root tone map, clamp to [0, 0.999], scale to a byte.
#[inline]
fn to_byte(channel: f64) -> u8 {
    let gamma = channel.max(0.0).sqrt();
    (256.0 * gamma.clamp(0.0, 0.999)) as u8
}

fn resolve_thread_count(requested: i32) -> usize {
    let available = thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1);
    if requested <= 0 {
        available
    } else {
        (requested as usize).min(available)
    }
}

/// Render `world` through `camera` into a frame buffer.
///
/// Pixels accumulate `samples_per_pixel` jittered samples each and are
/// written exactly once by the worker owning their row.
pub fn render_scene(world: &dyn Hittable, camera: &Camera, config: &RenderConfig) -> FrameBuffer {
    let width = config.image_width;
    let height = config.image_height;
    let nthreads = resolve_thread_count(config.num_threads);
    log::info!(
        "rendering {}x{} at {} spp, depth {}, {} threads",
        width,
        height,
        config.samples_per_pixel,
        config.max_depth,
        nthreads
    );

    let mut frame = FrameBuffer::new(width, height);

    // deal rows round-robin so every worker gets a similar slice of sky
    // and ground
    let mut partitions: Vec<Vec<(u32, &mut [Color])>> = Vec::with_capacity(nthreads);
    partitions.resize_with(nthreads, Vec::new);
    for (y, row) in frame.rows_mut().enumerate() {
        partitions[y % nthreads].push((y as u32, row));
    }

    thread::scope(|scope| {
        for rows in partitions {
            scope.spawn(move || {
                // one independently seeded generator per worker
                let mut rng = StdRng::from_entropy();
                for (y, row) in rows {
                    for (x, pixel) in row.iter_mut().enumerate() {
                        let mut color = Color::ZERO;
                        for _ in 0..config.samples_per_pixel {
                            let s = (x as f64 + gen_f64(&mut rng)) / (width - 1) as f64;
                            let t = (y as f64 + gen_f64(&mut rng)) / (height - 1) as f64;
                            let ray = camera.ray_at(s, t, &mut rng);
                            color += ray_color(&ray, world, config.max_depth, &mut rng);
                        }
                        *pixel = color / config.samples_per_pixel as f64;
                    }
                }
            });
        }
    });

    frame
}
