use std::error::Error;

use log::info;
use rand::{
    distr::{Distribution, Uniform},
    Rng, SeedableRng,
};
use rand_chacha::ChaCha8Rng;

use collision2d::{
    collision::{CollisionDetector, HybridCollisionDetector},
    geometry::{Angle, Ellipse, Point, PolyLine, Polygon, Position, Primitive, Transformable},
    scene::{Colour, Component, ComponentBuilder, ComponentId, Scene, SceneBuilder},
};

mod plot;

const RNG_SEED: u64 = 42;
const SCENE_SIZE: f64 = 100.0;
const GROUP_COUNT: usize = 4;
const SHAPES_PER_GROUP: usize = 3;
const GROUP_MARGIN: f64 = 1.0;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut scene = create_scene()?;
    scene.on_redraw(|id| info!("redraw requested for {id}"));

    let detectors = [
        ("rectangle", HybridCollisionDetector::coarse_rectangle()),
        ("circle", HybridCollisionDetector::coarse_circle()),
    ];
    let queries = create_queries()?;

    for (name, detector) in &detectors {
        report(&scene, name, detector, &queries);
    }

    if let Some(first) = scene.components().first().map(Component::id) {
        scene.translate_component(first, Position::new(10.0, 5.0))?;
        for (name, detector) in &detectors {
            report(&scene, name, detector, &queries);
        }
    }

    let mut canvas = plot::TextPlotCanvas::new(scene.size());
    scene.draw(&mut canvas);
    println!("{}", canvas.render());

    Ok(())
}

fn create_scene() -> Result<Scene, Box<dyn Error>> {
    let mut rng = ChaCha8Rng::seed_from_u64(RNG_SEED);
    let position_rng = Uniform::try_from(15.0..=SCENE_SIZE - 15.0)?;
    let offset_rng = Uniform::try_from(-8.0..=8.0)?;
    let size_rng = Uniform::try_from(1.0..=6.0)?;

    let mut builder = ComponentBuilder::new();
    let mut groups = vec![];
    for group in 0..GROUP_COUNT {
        let center = Position::new(position_rng.sample(&mut rng), position_rng.sample(&mut rng));
        for shape in 0..SHAPES_PER_GROUP {
            let position =
                center + Position::new(offset_rng.sample(&mut rng), offset_rng.sample(&mut rng));
            let size = size_rng.sample(&mut rng);
            let mut primitive = create_primitive(shape + group, position, size)?;
            primitive.rotate(Angle::from_deg(rng.random_range(0.0..360.0)));
            builder.child(ComponentBuilder::new().primitive(primitive).build());
        }
        groups.push(
            builder
                .margin(GROUP_MARGIN)
                .border_colour(Colour::rgb(200, 40, 40))
                .text(format!("group {group}"))
                .build(),
        );
    }

    Ok(SceneBuilder::new()
        .width(SCENE_SIZE)
        .height(SCENE_SIZE)
        .components(groups)
        .build())
}

fn create_primitive(index: usize, position: Position, size: f64) -> Result<Primitive, Box<dyn Error>> {
    let primitive: Primitive = match index % 4 {
        0 => Point::new(position).into(),
        1 => PolyLine::new(vec![
            position,
            position + Position::new(size, size / 2.0),
            position + Position::new(2.0 * size, 0.0),
        ])?
        .into(),
        2 => Polygon::rectangle(position, Position::new(size, size * 0.75))?.into(),
        _ => Ellipse::new(position, Position::new(size, size / 2.0), Angle::default())?.into(),
    };
    Ok(primitive)
}

fn create_queries() -> Result<Vec<Primitive>, Box<dyn Error>> {
    let center = Position::new(SCENE_SIZE / 2.0, SCENE_SIZE / 2.0);
    Ok(vec![
        Point::new(center).into(),
        PolyLine::new(vec![Position::ZERO, Position::new(SCENE_SIZE, SCENE_SIZE)])?.into(),
        Ellipse::circle(center, SCENE_SIZE / 4.0)?.into(),
    ])
}

fn report(scene: &Scene, name: &str, detector: &dyn CollisionDetector, queries: &[Primitive]) {
    for query in queries {
        let hits = scene.colliding_with(query, detector);
        info!("{name}: {} query hits [{}]", query.kind(), joined(&hits));
    }

    let components = scene.components();
    for (i, a) in components.iter().enumerate() {
        for b in &components[i + 1..] {
            if a.collides_with_component(b, detector) {
                info!("{name}: {} collides with {}", a.id(), b.id());
            }
        }
    }
}

fn joined(ids: &[ComponentId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
