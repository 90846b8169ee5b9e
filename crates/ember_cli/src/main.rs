//! Demo renderer: builds or loads a scene, commits it, renders, writes a
//! PNG.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use ember_render::{
    gen_f64, gen_range, render_scene, Camera, Color, Dielectric, Glossy, Hittable, HittableList,
    Lambertian, Material, Metal, MovingSphere, Point3, RenderConfig, Sphere, TriangleMesh, Vec3,
};

#[derive(Parser)]
#[command(name = "ember", about = "ember demo renderer")]
struct Cli {
    /// Render an OBJ mesh instead of the builtin sphere field
    #[arg(long)]
    obj: Option<PathBuf>,

    /// Output image path
    #[arg(long, default_value = "render.png")]
    output: PathBuf,

    #[arg(long, default_value_t = 400)]
    width: u32,

    #[arg(long, default_value_t = 225)]
    height: u32,

    /// Samples per pixel
    #[arg(long, default_value_t = 30)]
    samples: u32,

    /// Maximum ray bounce depth
    #[arg(long, default_value_t = 10)]
    max_depth: u32,

    /// Worker threads; 0 or negative uses all hardware threads
    #[arg(long, default_value_t = 0)]
    threads: i32,

    /// Seed for the builtin scene layout
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// The classic sphere field: a ground plane, a grid of small randomized
/// spheres, and three large feature spheres.
fn random_scene(rng: &mut dyn RngCore) -> HittableList {
    let mut world = HittableList::new();

    let ground: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5)));
    world.add(Box::new(Sphere::new(
        Point3::new(0.0, -1000.0, 0.0),
        1000.0,
        ground,
    )));

    for a in -11..11 {
        for b in -11..11 {
            let center = Point3::new(
                a as f64 + 0.9 * gen_f64(rng),
                0.2,
                b as f64 + 0.9 * gen_f64(rng),
            );
            if (center - Point3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let choose_mat = gen_f64(rng);
            let radius = 0.2;

            if choose_mat < 0.6 {
                // diffuse, drifting upward over the shutter interval
                let albedo = Color::new(gen_f64(rng), gen_f64(rng), gen_f64(rng))
                    * Color::new(gen_f64(rng), gen_f64(rng), gen_f64(rng));
                let material = Arc::new(Lambertian::new(albedo));
                let center1 = center + Vec3::new(0.0, gen_range(rng, 0.0, 0.5), 0.0);
                world.add(Box::new(MovingSphere::new(
                    center, center1, 0.0, 1.0, radius, material,
                )));
            } else if choose_mat < 0.8 {
                // glossy
                let albedo = Color::new(
                    gen_range(rng, 0.1, 0.6),
                    gen_range(rng, 0.1, 0.6),
                    gen_range(rng, 0.1, 0.6),
                );
                let material = Arc::new(Glossy::new(
                    albedo,
                    Color::new(0.9, 0.9, 0.9),
                    gen_range(rng, 0.0, 0.5),
                    0.3,
                ));
                world.add(Box::new(Sphere::new(center, radius, material)));
            } else if choose_mat < 0.95 {
                // metal
                let albedo = Color::new(
                    gen_range(rng, 0.5, 1.0),
                    gen_range(rng, 0.5, 1.0),
                    gen_range(rng, 0.5, 1.0),
                );
                let fuzz = gen_range(rng, 0.0, 0.5);
                let material = Arc::new(Metal::new(albedo, fuzz));
                world.add(Box::new(Sphere::new(center, radius, material)));
            } else {
                // glass
                let material = Arc::new(Dielectric::new(1.5));
                world.add(Box::new(Sphere::new(center, radius, material)));
            }
        }
    }

    world.add(Box::new(Sphere::new(
        Point3::new(0.0, 1.0, 0.0),
        1.0,
        Arc::new(Dielectric::new(1.5)),
    )));
    world.add(Box::new(Sphere::new(
        Point3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Lambertian::new(Color::new(0.4, 0.2, 0.1))),
    )));
    world.add(Box::new(Sphere::new(
        Point3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    world
}

/// Load an OBJ mesh, center it on the origin, and drop it on a ground
/// sphere.
fn mesh_scene(path: &Path) -> anyhow::Result<HittableList> {
    let mesh_data =
        ember_core::load_obj(path).with_context(|| format!("loading {}", path.display()))?;

    let material: Arc<dyn Material> =
        Arc::new(Glossy::new(Color::new(0.6, 0.2, 0.2), Color::new(0.9, 0.9, 0.9), 0.2, 0.25));
    let mut mesh = TriangleMesh::new(mesh_data, material);
    mesh.to_origin();

    let mut world = HittableList::new();
    world.add(Box::new(mesh));
    world.add(Box::new(Sphere::new(
        Point3::new(0.0, -1001.0, 0.0),
        1000.0,
        Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5))),
    )));
    Ok(world)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut world = match &cli.obj {
        Some(path) => mesh_scene(path)?,
        None => random_scene(&mut StdRng::seed_from_u64(cli.seed)),
    };
    world.commit().context("scene commit failed")?;

    let camera = Camera::new(
        Point3::new(13.0, 2.0, 3.0),
        Point3::ZERO,
        Vec3::Y,
        20.0,
        cli.width as f64 / cli.height as f64,
        0.1,
        10.0,
    )
    .with_shutter(0.0, 1.0);

    let config = RenderConfig {
        image_width: cli.width,
        image_height: cli.height,
        samples_per_pixel: cli.samples,
        max_depth: cli.max_depth,
        num_threads: cli.threads,
    };

    let start = Instant::now();
    let frame = render_scene(&world, &camera, &config);
    log::info!("render finished in {:.2?}", start.elapsed());

    frame
        .save_png(&cli.output)
        .with_context(|| format!("writing {}", cli.output.display()))?;
    log::info!("wrote {}", cli.output.display());

    Ok(())
}
