use criterion::{black_box, criterion_group, criterion_main, Criterion};

use virtual_joystick::engine::{classify_direction, is_valid, percentage_of_travel};
use virtual_joystick::joystick::JoystickSettings;
use virtual_joystick::sensor::Acceleration;
use virtual_joystick::{Direction, Joystick, JoystickGeometry, Point};

fn geometry() -> JoystickGeometry {
    JoystickGeometry::new(Point::new(100.0, 100.0), 80.0, 20.0).expect("valid geometry")
}

fn bench_engine(c: &mut Criterion) {
    let g = geometry();
    let points: Vec<Point> = (0..64)
        .map(|i| {
            let t = f64::from(i) / 64.0 * std::f64::consts::TAU;
            Point::new(100.0 + 70.0 * t.cos(), 100.0 + 70.0 * t.sin())
        })
        .collect();

    c.bench_function("classify_and_validate", |b| {
        b.iter(|| {
            for &p in &points {
                let dir = classify_direction(g.center(), black_box(p), 25.0);
                black_box(is_valid(&g, p, dir));
                black_box(percentage_of_travel(&g, p));
            }
        })
    });
}

fn bench_sessions(c: &mut Criterion) {
    c.bench_function("touch_drag_64", |b| {
        let mut joystick = Joystick::new(geometry(), JoystickSettings::default(), ());
        b.iter(|| {
            for y in (40..104).rev() {
                joystick.touch_moved(&[Point::new(100.0, f64::from(y))]);
            }
            joystick.touch_ended();
        })
    });

    c.bench_function("tilt_sample", |b| {
        let mut joystick = Joystick::new(geometry(), JoystickSettings::default(), ());
        joystick.set_tilt_mode(true);
        let sample = Acceleration::planar(0.2, -0.05);
        b.iter(|| {
            black_box(joystick.on_sample(black_box(sample)));
            joystick.recenter();
        })
    });

    c.bench_function("step_right_until_rim", |b| {
        let mut joystick = Joystick::new(geometry(), JoystickSettings::default(), ());
        b.iter(|| {
            while joystick.step(Direction::Right).is_some() {}
            joystick.recenter();
        })
    });
}

criterion_group!(benches, bench_engine, bench_sessions);
criterion_main!(benches);
