use gifsheet_core::prelude::*;
use image::codecs::gif::GifEncoder;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

const PALETTE: [[u8; 3]; 4] = [[255, 0, 0], [0, 255, 0], [0, 0, 255], [255, 255, 0]];

/// Encode `count` solid frames cycling through `PALETTE` as an animated GIF.
fn gif_bytes(count: usize, w: u32, h: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    {
        let mut enc = GifEncoder::new(&mut buf);
        let frames = (0..count).map(|i| {
            let [r, g, b] = PALETTE[i % PALETTE.len()];
            image::Frame::new(RgbaImage::from_pixel(w, h, Rgba([r, g, b, 255])))
        });
        enc.encode_frames(frames).expect("encode gif");
    }
    buf
}

fn dominant_channel(px: &Rgba<u8>) -> [bool; 3] {
    [px[0] > 200, px[1] > 200, px[2] > 200]
}

#[test]
fn extracts_every_frame_in_order() {
    let bytes = gif_bytes(6, 12, 10);
    let anim = extract(&bytes).expect("extract");
    assert_eq!(anim.len(), 6);
    assert_eq!((anim.width, anim.height), (12, 10));
    for (i, frame) in anim.frames.iter().enumerate() {
        assert_eq!(frame.dimensions(), (12, 10));
        let [r, g, b] = PALETTE[i % PALETTE.len()];
        let px = frame.rgba().get_pixel(5, 5);
        assert_eq!(
            dominant_channel(px),
            [r > 200, g > 200, b > 200],
            "frame {} color {:?}",
            i,
            px
        );
        assert_eq!(px[3], 255);
    }
}

#[test]
fn single_frame_gif_yields_one_frame() {
    let anim = extract(&gif_bytes(1, 4, 4)).expect("extract");
    assert_eq!(anim.len(), 1);
}

#[test]
fn frames_are_independent_copies() {
    let anim = extract(&gif_bytes(2, 4, 4)).unwrap();
    let a = anim.frames[0].rgba().get_pixel(0, 0);
    let b = anim.frames[1].rgba().get_pixel(0, 0);
    assert_ne!(a, b, "second frame must not overwrite the first");
}

#[test]
fn still_png_is_a_one_frame_animation() {
    let img = RgbaImage::from_pixel(7, 3, Rgba([1, 2, 3, 128]));
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut buf, ImageFormat::Png)
        .unwrap();
    let anim = extract(buf.get_ref()).expect("extract png");
    assert_eq!(anim.len(), 1);
    assert_eq!((anim.width, anim.height), (7, 3));
    assert_eq!(*anim.frames[0].rgba().get_pixel(6, 2), Rgba([1, 2, 3, 128]));
}

#[test]
fn extract_reader_matches_extract() {
    let bytes = gif_bytes(3, 5, 5);
    let from_reader = extract_reader(Cursor::new(bytes.clone())).unwrap();
    let from_slice = extract(&bytes).unwrap();
    assert_eq!(from_reader.len(), from_slice.len());
    assert_eq!(from_reader.frames, from_slice.frames);
}

#[test]
fn corrupt_gif_is_decode_error() {
    let mut bytes = gif_bytes(3, 8, 8);
    // Keep the header and logical screen, drop the image data.
    bytes.truncate(20);
    let err = extract(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
}

#[test]
fn empty_input_is_decode_error() {
    let err = extract(&[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
}

/// Encode `count` solid frames (red ramp 0, 80, 160, ...) as an APNG.
fn apng_bytes(count: u32, w: u32, h: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    {
        let mut enc = png::Encoder::new(&mut buf, w, h);
        enc.set_color(png::ColorType::Rgba);
        enc.set_depth(png::BitDepth::Eight);
        enc.set_animated(count, 0).expect("animated");
        let mut writer = enc.write_header().expect("header");
        for i in 0..count {
            let shade = (i * 80) as u8;
            let data: Vec<u8> = (0..w * h).flat_map(|_| [shade, 0, 0, 255]).collect();
            writer.write_image_data(&data).expect("frame");
        }
        writer.finish().expect("finish");
    }
    buf
}

#[test]
fn apng_yields_every_frame_in_order() {
    let anim = extract(&apng_bytes(3, 6, 4)).expect("extract apng");
    assert_eq!(anim.len(), 3);
    assert_eq!((anim.width, anim.height), (6, 4));
    for (i, frame) in anim.frames.iter().enumerate() {
        let px = frame.rgba().get_pixel(0, 0);
        assert_eq!(*px, Rgba([(i * 80) as u8, 0, 0, 255]), "frame {}", i);
    }
}

#[test]
fn still_webp_is_a_one_frame_animation() {
    let img = RgbaImage::from_pixel(5, 3, Rgba([10, 20, 30, 255]));
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut buf, ImageFormat::WebP)
        .unwrap();
    let anim = extract(buf.get_ref()).expect("extract webp");
    assert_eq!(anim.len(), 1);
    assert_eq!((anim.width, anim.height), (5, 3));
    assert_eq!(anim.frames[0].rgba().get_pixel(4, 2)[3], 255);
}
