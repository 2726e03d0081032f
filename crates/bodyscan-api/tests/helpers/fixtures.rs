use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage};
use serde_json::json;

/// Gradient image encoded in `format`.
pub fn encoded_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let image = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), format)
        .expect("encode fixture");
    bytes
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    encoded_image(width, height, ImageFormat::Png)
}

/// Anthropic Messages API body wrapping `text` as the only content block.
pub fn anthropic_reply(text: &str) -> String {
    json!({
        "id": "msg_test",
        "type": "message",
        "role": "assistant",
        "content": [{ "type": "text", "text": text }]
    })
    .to_string()
}

pub const FENCED_REPLY: &str = "```json\n{\"body_fat_percentage\": 18.2, \"confidence\": \"High\", \"reasoning\": \"Visible muscle definition, lean physique overall.\", \"photo_quality\": \"Good\"} \n```";
