//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::TAU;

/// Point on a quadratic Bezier curve at `t` in `0..=1`
pub fn quadratic_bezier(start: Vec2, control: Vec2, end: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    start * (u * u) + control * (2.0 * u * t) + end * (t * t)
}

/// Outline of a scalloped ring: `lobes` quadratic curves between points on a
/// circle of `radius`, each pulled inward by `depth` at its middle.
///
/// Returns a closed polygon (first point not repeated) with `samples` points per lobe.
pub fn lobed_ring(center: Vec2, radius: f32, depth: f32, lobes: u32, rotation: f32, samples: u32) -> Vec<Vec2> {
    let lobes = lobes.max(1);
    let samples = samples.max(1);
    let step = TAU / lobes as f32;
    let mut points = Vec::with_capacity((lobes * samples) as usize);

    for i in 0..lobes {
        let start_angle = i as f32 * step + rotation;
        let end_angle = start_angle + step;
        let mid_angle = start_angle + step / 2.0;

        let start = center + Vec2::from_angle(start_angle) * radius;
        let end = center + Vec2::from_angle(end_angle) * radius;
        let control = center + Vec2::from_angle(mid_angle) * (radius - depth);

        // The end point is the next lobe's start, so stop one sample short
        for s in 0..samples {
            let t = s as f32 / samples as f32;
            points.push(quadratic_bezier(start, control, end, t));
        }
    }

    points
}
