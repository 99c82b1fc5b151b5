//! Simple ray tracer example.
//!
//! Renders a small scene using every shape and light kind with adaptive
//! supersampling and saves it as a PNG.
//!
//! Run with `RUST_LOG=info` to see progress.

use anyhow::Context;
use lumen_renderer::{
    render, AmbientLight, CancelToken, Camera, Circle, Color, Cone, Cylinder, DirectionalLight,
    Geometry, ImageBuffer, Material, Plane, PointLight, Polygon, Ray, RenderConfig,
    SamplingMode, Scene, SceneTracer, Sphere, SpotLight, Square, TraceConfig, Triangle, Tube,
    Vec3,
};

const WIDTH: u32 = 500;
const HEIGHT: u32 = 500;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let start = std::time::Instant::now();
    let scene = build_scene()?;
    log::info!("Scene '{}' built in {:?}", scene.name, start.elapsed());

    let camera = Camera::new(Vec3::new(0.0, 0.0, 1000.0), Vec3::NEG_Z, Vec3::Y)?
        .with_view_plane(200.0, 200.0)
        .with_distance(1000.0)
        .with_sampling(SamplingMode::Adaptive, 1);

    let tracer = SceneTracer::with_config(&scene, TraceConfig::default());
    let image = ImageBuffer::new(WIDTH, HEIGHT);
    let config = RenderConfig {
        threads: 4,
        progress_interval_ms: 500,
        seed: 1,
    };

    let stats = render(&camera, &tracer, &image, &config, &CancelToken::new())?;
    if stats.failed > 0 {
        log::warn!("{} pixels failed to render", stats.failed);
    }

    let output = "output.png";
    image
        .to_image()
        .save(output)
        .with_context(|| format!("failed to write {output}"))?;
    log::info!("Saved {output}");

    Ok(())
}

fn build_scene() -> anyhow::Result<Scene> {
    let shiny = Material::new().with_kd(0.5).with_ks(0.5).with_shininess(60);
    let mirror = Material::new().with_kd(0.2).with_ks(0.2).with_kr(0.6).with_shininess(100);
    let glass = Material::new().with_kd(0.1).with_ks(0.4).with_kt(0.7).with_shininess(200);
    let matte = Material::new().with_kd(0.7).with_ks(0.1).with_shininess(10);

    let floor = Geometry::new(Plane::new(Vec3::new(0.0, -60.0, 0.0), Vec3::Y)?)
        .with_emission(Color::new(0.1, 0.1, 0.12))
        .with_material(matte.with_kr(0.2));

    let back_wall = Geometry::new(Square::new(&[
        Vec3::new(-150.0, -60.0, -200.0),
        Vec3::new(150.0, -60.0, -200.0),
        Vec3::new(150.0, 150.0, -200.0),
        Vec3::new(-150.0, 150.0, -200.0),
    ])?)
    .with_emission(Color::new(0.15, 0.15, 0.2))
    .with_material(mirror);

    let glass_ball = Geometry::new(Sphere::new(Vec3::new(0.0, -10.0, -50.0), 40.0)?)
        .with_emission(Color::new(0.05, 0.1, 0.3))
        .with_material(glass);
    let inner_ball = Geometry::new(Sphere::new(Vec3::new(0.0, -10.0, -50.0), 15.0)?)
        .with_emission(Color::new(0.6, 0.2, 0.1))
        .with_material(shiny);

    let up = Ray::new(Vec3::new(-70.0, -60.0, -80.0), Vec3::Y);
    let column = Geometry::new(Cylinder::new(up, 12.0, 90.0)?)
        .with_emission(Color::new(0.3, 0.3, 0.1))
        .with_material(shiny);
    let cap = Geometry::new(Cone::new(
        Ray::new(Vec3::new(-70.0, 30.0, -80.0), Vec3::Y),
        20.0,
        30.0,
    )?)
    .with_emission(Color::new(0.4, 0.1, 0.1))
    .with_material(shiny);

    let pipe = Geometry::new(Tube::new(
        Ray::new(Vec3::new(0.0, 110.0, -150.0), Vec3::X),
        6.0,
    )?)
    .with_emission(Color::new(0.1, 0.3, 0.1))
    .with_material(shiny);

    let ring = Geometry::new(Circle::annulus(
        Vec3::new(70.0, -20.0, -60.0),
        Vec3::new(-0.3, 0.2, 1.0),
        30.0,
        18.0,
    )?)
    .with_emission(Color::new(0.1, 0.25, 0.3))
    .with_material(mirror);

    let shard = Geometry::new(Triangle::new(
        Vec3::new(50.0, -60.0, -20.0),
        Vec3::new(90.0, -60.0, -40.0),
        Vec3::new(70.0, -30.0, -30.0),
    )?)
    .with_emission(Color::new(0.3, 0.1, 0.3))
    .with_material(shiny);

    let pentagon = Geometry::new(Polygon::new(&[
        Vec3::new(-100.0, 60.0, -190.0),
        Vec3::new(-60.0, 60.0, -190.0),
        Vec3::new(-48.0, 95.0, -190.0),
        Vec3::new(-80.0, 118.0, -190.0),
        Vec3::new(-112.0, 95.0, -190.0),
    ])?)
    .with_emission(Color::new(0.3, 0.2, 0.0))
    .with_material(matte);

    Ok(Scene::new("showcase")
        .with_background(Color::new(0.02, 0.02, 0.05))
        .with_ambient_light(AmbientLight::new(Color::ONE, Vec3::splat(0.05)))
        .with_geometry(floor)
        .with_geometry(back_wall)
        .with_geometry(glass_ball)
        .with_geometry(inner_ball)
        .with_geometry(column)
        .with_geometry(cap)
        .with_geometry(pipe)
        .with_geometry(ring)
        .with_geometry(shard)
        .with_geometry(pentagon)
        .with_light(
            SpotLight::new(
                Color::new(1.0, 0.8, 0.6),
                Vec3::new(60.0, 80.0, 50.0),
                Vec3::new(-1.0, -1.0, -2.0),
            )?
            .with_kl(0.0004)
            .with_kq(0.00001)
            .with_narrow_beam(4),
        )
        .with_light(
            PointLight::new(Color::new(0.5, 0.5, 0.6), Vec3::new(-80.0, 100.0, 20.0))
                .with_kl(0.0005)
                .with_kq(0.00002),
        )
        .with_light(DirectionalLight::new(
            Color::new(0.2, 0.2, 0.25),
            Vec3::new(0.5, -1.0, -0.3),
        )?))
}
