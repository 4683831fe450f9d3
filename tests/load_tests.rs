// tests/load_tests.rs

mod common;

use common::*;
use flipgrid::{Map, MapConfig, MapError, TileId, TilesetMode};
use std::fs;

const LEVEL: &str = r#"
{
  "width": 3,
  "height": 2,
  "tilewidth": 64,
  "tileheight": 64,
  "layers": [
    { "name": "ground", "type": "tilelayer", "width": 3, "height": 2, "data": [1, 2, 18, 0, 257, 258] },
    { "name": "spawns", "type": "objectgroup", "objects": [] },
    { "name": "decor", "width": 3, "height": 2, "data": [0, 0, 0, 2147483649, 0, 0] }
  ],
  "tilesets": [
    { "firstgid": 1, "source": "Grass Tileset.tsx" },
    { "firstgid": 257, "source": "Animated water tiles.tsx" }
  ]
}
"#;

#[test]
fn loads_level_with_fixed_tilesets() {
    let dir = standard_assets();
    let path = write_map(dir.path(), "level.tmj", LEVEL);

    let map = Map::load(&path, MapConfig::default()).expect("level should load");
    assert_eq!(map.layers().len(), 2);
    assert_eq!(map.layers()[0].name, "ground");
    assert_eq!(map.layers()[1].name, "decor");
    assert_eq!(map.tilesets().len(), 2);
    assert_eq!(map.tile_size(), (64, 64));
    // 1, 2, 18, 257, 258 and the flipped 1
    assert_eq!(map.cache().decode_count(), 6);
    assert_eq!(map.layer("decor").and_then(|l| l.get(0, 1)), Some(TileId(0x8000_0001)));
}

#[test]
fn loads_from_str_against_asset_dir() {
    let dir = standard_assets();
    let mut map = Map::load_from_str(LEVEL, dir.path(), MapConfig::default()).expect("load");
    assert_eq!(map.frame().len(), 6);
}

#[test]
fn unsupported_extension() {
    let err = Map::load("foo.tmx", MapConfig::default()).err().expect("expected error");
    match err {
        MapError::UnsupportedFormat(ext) => assert_eq!(ext, "foo.tmx"),
        other => panic!("expected UnsupportedFormat, got {:?}", other),
    }
}

#[test]
fn missing_map_file_is_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = Map::load(dir.path().join("nope.json"), MapConfig::default())
        .err()
        .expect("expected error");
    assert!(matches!(err, MapError::Io { .. }));
}

#[test]
fn missing_tileset_image_is_asset_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_atlas(&dir.path().join("Grass Tileset.png"), 16, 2);
    let path = write_map(dir.path(), "level.json", LEVEL);

    let err = Map::load(&path, MapConfig::default()).err().expect("expected error");
    assert!(matches!(err, MapError::Asset { ref path, .. } if path.ends_with("Animated water tiles.png")));
}

#[test]
fn layer_size_mismatch_names_the_layer() {
    let dir = standard_assets();
    let path = write_map(
        dir.path(),
        "bad.json",
        r#"{ "layers": [ { "name": "oops", "width": 2, "height": 2, "data": [1, 2, 3] } ] }"#,
    );
    let err = Map::load(&path, MapConfig::default()).err().expect("expected error");
    assert!(matches!(err, MapError::InvalidLayerSize { ref layer, .. } if layer == "oops"));
}

#[test]
fn oversized_layer_is_rejected_without_panicking() {
    let dir = standard_assets();
    let json = r#"{ "layers": [ { "name": "vast", "width": 9223372036854775807, "height": 4, "data": [] } ] }"#;
    let err = Map::load_from_str(json, dir.path(), MapConfig::default())
        .err()
        .expect("expected error");
    assert!(matches!(err, MapError::InvalidMap(ref msg) if msg.contains("vast")));
}

#[test]
fn map_without_tile_layers_is_invalid() {
    let dir = standard_assets();
    let path = write_map(
        dir.path(),
        "objects.json",
        r#"{ "layers": [ { "name": "spawns", "type": "objectgroup" } ] }"#,
    );
    let err = Map::load(&path, MapConfig::default()).err().expect("expected error");
    assert!(matches!(err, MapError::InvalidMap(_)));
}

#[test]
fn declared_tilesets_come_from_the_map() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(dir.path().join("art")).expect("mkdir");
    write_atlas(&dir.path().join("art/cliffs.png"), 4, 4);
    fs::write(
        dir.path().join("art/cliffs.tsj"),
        r#"{ "name": "cliffs", "image": "cliffs.png", "columns": 4, "tilewidth": 64, "tileheight": 64 }"#,
    )
    .expect("write tileset");
    write_atlas(&dir.path().join("sand.png"), 2, 1);

    let path = write_map(
        dir.path(),
        "declared.tmj",
        r#"{
          "tilewidth": 64, "tileheight": 64,
          "layers": [ { "name": "l", "width": 3, "height": 1, "data": [1, 6, 17] } ],
          "tilesets": [
            { "firstgid": 1, "source": "art/cliffs.tsj" },
            { "firstgid": 17, "name": "sand", "image": "sand.png", "columns": 2, "tilewidth": 64, "tileheight": 64 }
          ]
        }"#,
    );

    let config = MapConfig {
        tilesets: TilesetMode::Declared,
        ..MapConfig::default()
    };
    let mut map = Map::load(&path, config).expect("declared map should load");
    assert_eq!(map.tilesets().len(), 2);

    let tile6 = map.resolve(TileId(6)).expect("decode").expect("image");
    // local 5 in cliffs
    assert_eq!(pixel(tile6, 0, 0), [5, 0, 0, 255]);
    let tile17 = map.resolve(TileId(17)).expect("decode").expect("image");
    assert_eq!(pixel(tile17, 3, 2), [0, 3, 2, 255]);
}
