// Shared helpers for integration tests

use bytes::Bytes;
use grapemark::preview::{PreviewController, PreviewSettings};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// A deterministic gradient so captures of different sizes are distinguishable.
pub fn gradient(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 7 % 256) as u8, (y * 5 % 256) as u8, 180, 255])
    })
}

pub fn png_bytes(image: &RgbaImage) -> Bytes {
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(image.clone())
        .write_to(&mut buffer, ImageFormat::Png)
        .unwrap();
    Bytes::from(buffer.into_inner())
}

pub fn png(width: u32, height: u32) -> Bytes {
    png_bytes(&gradient(width, height))
}

pub fn controller() -> PreviewController {
    PreviewController::new(PreviewSettings::default())
}

/// Controller loaded with `(name, width, height)` images, in order.
pub fn controller_with(images: &[(&str, u32, u32)]) -> PreviewController {
    let mut controller = controller();
    for (name, width, height) in images {
        controller.add_image(*name, png(*width, *height)).unwrap();
    }
    controller
}

/// Entry names and contents of a ZIP blob, in archive order.
pub fn unzip(archive: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut zip = ZipArchive::new(Cursor::new(archive.to_vec())).unwrap();
    (0..zip.len())
        .map(|i| {
            let mut file = zip.by_index(i).unwrap();
            let mut data = Vec::new();
            file.read_to_end(&mut data).unwrap();
            (file.name().to_string(), data)
        })
        .collect()
}
