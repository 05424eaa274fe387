use criterion::{Criterion, criterion_group, criterion_main};
use glidenav::task::{GlideSettings, PolarCoefficients, Task, Turnpoint, WindVector};
use glidenav::{PlanarPoint, Projection, Waypoint};

fn final_glide_benchmark(c: &mut Criterion) {
    let projection = Projection::new(0.855, 0.96, 0.89, -0.0175).unwrap();

    let corners = [
        (0.0, 0.0),
        (0.0, 60_000.0),
        (45_000.0, 80_000.0),
        (70_000.0, 20_000.0),
        (0.0, 0.0),
    ];
    let turnpoints = corners
        .iter()
        .enumerate()
        .map(|(i, &(x, y))| {
            let position = PlanarPoint::new(x, y);
            let waypoint = Waypoint::new(format!("TP{i}"), format!("Turnpoint {i}"), position);
            Turnpoint::sector(waypoint, 3000.0, 90.0)
        })
        .collect();

    let mut task = Task::new(turnpoints, PolarCoefficients::new(-0.002117, 0.08998, -1.560))
        .unwrap()
        .with_settings(GlideSettings::default().with_maccready(1.5).with_safety_height(200.0));
    task.update_geometry(&projection);
    task.start();

    let position = PlanarPoint::new(-2000.0, 5000.0);
    let wind = WindVector::new(6.0, 4.0);

    c.bench_function("final_glide", |b| {
        b.iter(|| task.final_glide(&projection, position, 2500.0, wind));
    });

    c.bench_function("task_geometry", |b| {
        b.iter(|| task.update_geometry(&projection));
    });
}

criterion_group!(benches, final_glide_benchmark);
criterion_main!(benches);
