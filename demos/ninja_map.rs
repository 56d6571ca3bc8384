use slopes::*;

fn edge(flag: EdgeFlag) -> char {
    match flag {
        EdgeFlag::Empty => '.',
        EdgeFlag::Solid => '#',
        EdgeFlag::Interesting => '~',
    }
}

fn main() {
    // Tiled-style gids with the ninja tileset registered at first gid 11.
    let rows = vec![
        vec![0, 0, 0, 0, 0],
        vec![0, 0, 0, 14, 12],
        vec![0, 0, 14, 12, 12],
        vec![12, 12, 12, 12, 12],
    ];
    let mut layer = TileLayer::from_rows(32.0, 32.0, &rows);
    let factory = TileSlopeFactory::new();
    factory.convert_layer_with_preset(&mut layer, "ninja", Some(11));

    for tile in layer.tiles().filter(|t| t.slope.is_some()) {
        let Some(slope) = tile.slope.as_ref() else { continue };
        let e = slope.edges;
        println!(
            "({}, {}) {:<20} slope={:5.2} edges t{} b{} l{} r{}",
            tile.x,
            tile.y,
            slope.kind,
            slope.slope(),
            edge(e.top),
            edge(e.bottom),
            edge(e.left),
            edge(e.right),
        );
    }

    // Custom mappings load from JSON, by name or by id.
    match SlopeMapping::from_json(r#"{ "1": "half_top", "2": 21 }"#) {
        Ok(mapping) => {
            let mut strip = TileLayer::from_rows(16.0, 16.0, &[vec![1, 2, 1]]);
            factory.convert_layer(&mut strip, &mapping);
            let kinds: Vec<String> = strip
                .tiles()
                .filter_map(|t| t.slope.as_ref().map(|s| s.kind.to_string()))
                .collect();
            println!("json mapping: {}", kinds.join(", "));
        }
        Err(err) => println!("mapping failed: {}", err),
    }
}
