use crate::error::{Result, SheetError};
use crate::model::{Frame, SourceAnimation};
use image::codecs::gif::GifDecoder;
use image::codecs::png::PngDecoder;
use image::codecs::webp::WebPDecoder;
use image::{AnimationDecoder, DynamicImage, ImageFormat};
use std::io::{Cursor, Read};
use tracing::{debug, instrument};

/// Decodes every frame of an animated image held in memory.
///
/// - GIF: all frames, composited to the logical screen size by the decoder.
/// - PNG: all APNG frames, or the single still image.
/// - WebP: all animation frames, or the single still image.
/// - Any other format `image` can decode is returned as a one-frame animation.
///
/// Frame order matches the file. Delays are discarded. A broken frame anywhere in the
/// stream fails the whole call; no partial sequence is returned.
#[instrument(skip_all, fields(bytes = bytes.len()))]
pub fn extract(bytes: &[u8]) -> Result<SourceAnimation> {
    if bytes.is_empty() {
        return Err(SheetError::Decode("input is empty".into()));
    }
    let format = image::guess_format(bytes).map_err(decode_err)?;
    let frames = match format {
        ImageFormat::Gif => {
            let decoder = GifDecoder::new(Cursor::new(bytes)).map_err(decode_err)?;
            collect_frames(decoder)?
        }
        ImageFormat::Png => {
            let decoder = PngDecoder::new(Cursor::new(bytes)).map_err(decode_err)?;
            if decoder.is_apng().map_err(decode_err)? {
                collect_frames(decoder.apng().map_err(decode_err)?)?
            } else {
                let still = DynamicImage::from_decoder(decoder).map_err(decode_err)?;
                vec![Frame::from_dynamic(&still)]
            }
        }
        ImageFormat::WebP => {
            let decoder = WebPDecoder::new(Cursor::new(bytes)).map_err(decode_err)?;
            if decoder.has_animation() {
                collect_frames(decoder)?
            } else {
                let still = DynamicImage::from_decoder(decoder).map_err(decode_err)?;
                vec![Frame::from_dynamic(&still)]
            }
        }
        other => {
            let still = image::load_from_memory_with_format(bytes, other).map_err(decode_err)?;
            vec![Frame::from_dynamic(&still)]
        }
    };

    let Some(first) = frames.first() else {
        return Err(SheetError::EmptyAnimation);
    };
    let (width, height) = first.dimensions();
    debug!(?format, frames = frames.len(), width, height, "extracted frames");
    Ok(SourceAnimation {
        frames,
        width,
        height,
    })
}

/// Reads the whole stream into memory, then behaves like [`extract`].
pub fn extract_reader<R: Read>(mut reader: R) -> Result<SourceAnimation> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    extract(&bytes)
}

fn collect_frames<'a>(decoder: impl AnimationDecoder<'a>) -> Result<Vec<Frame>> {
    let mut frames = Vec::new();
    for (idx, next) in decoder.into_frames().enumerate() {
        let frame = next.map_err(|e| SheetError::Decode(format!("frame {idx}: {e}")))?;
        frames.push(Frame::snapshot(frame.buffer()));
    }
    Ok(frames)
}

fn decode_err(e: image::ImageError) -> SheetError {
    SheetError::Decode(e.to_string())
}
