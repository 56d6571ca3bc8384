use glam::Vec2;
use slopes::*;
use std::time::Instant;

// ninja tileset ids: 2 = FULL, 4 = HALF_BOTTOM_RIGHT
const MAP: [[i32; 8]; 6] = [
    [-1, -1, -1, -1, -1, -1, -1, -1],
    [-1, -1, -1, -1, -1, -1, -1, -1],
    [-1, -1, -1, -1, -1, -1, 4, 2],
    [-1, -1, -1, -1, -1, 4, 2, 2],
    [-1, -1, -1, -1, 4, 2, 2, 2],
    [2, 2, 2, 2, 2, 2, 2, 2],
];

fn main() {
    let rows: Vec<Vec<i32>> = MAP.iter().map(|r| r.to_vec()).collect();
    let mut layer = TileLayer::from_rows(16.0, 16.0, &rows);

    let slopes = Slopes::default();
    slopes.convert_layer_with_preset(&mut layer, "ninja", None);

    let mut body = Body::new(Vec2::new(4.0, 60.0), Vec2::new(10.0, 14.0));
    body.tile_padding = Vec2::splat(2.0);
    let config = SlopesConfig { pull_down: 2.0, snap_down: 3.0, ..SlopesConfig::default() };
    slopes.enable_body_with(&mut body, Some(config));

    let dt = 1.0 / 60.0;
    let gravity = Vec2::new(0.0, 600.0);
    let run_speed = 90.0;

    let start = Instant::now();
    for step in 0..150 {
        body.velocity.x = run_speed;
        body.velocity += gravity * dt;
        body.position += body.velocity * dt;

        body.reset_contacts();
        let hit = slopes.collide_layer(&mut body, &layer, false);

        if step % 10 == 0 {
            println!(
                "step {:3}: pos=({:6.2},{:6.2}) vel=({:7.2},{:7.2}) hit={} down={} right={}",
                step,
                body.position.x,
                body.position.y,
                body.velocity.x,
                body.velocity.y,
                hit,
                body.touching.down,
                body.touching.right,
            );
        }
        if body.right() >= layer.width() as f32 * layer.tile_size().x {
            println!("reached the end of the map at step {}", step);
            break;
        }
    }
    println!("simulated in {:?}", start.elapsed());
}
