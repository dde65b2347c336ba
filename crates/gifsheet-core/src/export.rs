use crate::model::SheetMeta;
use crate::pipeline::Spritesheet;
use serde_json::{Value, json};

/// Metadata block shared by the exporters.
pub fn sheet_meta(sheet: &Spritesheet, image_name: &str) -> SheetMeta {
    SheetMeta {
        app: "gifsheet".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        image: image_name.into(),
        format: "RGBA8888".into(),
        size: (sheet.width(), sheet.height()),
        tile_size: (sheet.tile_width, sheet.tile_height),
        margin: sheet.margin,
        columns: sheet.layout.columns,
        rows: sheet.layout.rows,
        frame_count: sheet.tiles.len(),
    }
}

/// Frames keyed by name (`frame_0000`, `frame_0001`, ...) plus sheet metadata.
/// Shape: `{ frames: { name: { frame, sourceSize, index } }, meta }`, close to the
/// TexturePacker JSON hash that most engines can import.
pub fn to_json_hash(sheet: &Spritesheet, image_name: &str) -> Value {
    let mut frames = serde_json::Map::new();
    for tile in &sheet.tiles {
        let r = tile.rect;
        frames.insert(
            frame_name(tile.index),
            json!({
                "frame": {"x": r.x, "y": r.y, "w": r.w, "h": r.h},
                "rotated": false,
                "trimmed": false,
                "spriteSourceSize": {"x": 0, "y": 0, "w": r.w, "h": r.h},
                "sourceSize": {"w": tile.source_size.0, "h": tile.source_size.1},
                "index": tile.index,
            }),
        );
    }
    json!({ "frames": frames, "meta": sheet_meta(sheet, image_name) })
}

/// Name used for tile `index` in exported metadata.
pub fn frame_name(index: usize) -> String {
    format!("frame_{:04}", index)
}
