// SPDX-FileCopyrightText: 2025 Joshua Goins <josh@redstrate.com>
// SPDX-License-Identifier: GPL-3.0-or-later

use pixelconv::{
    convert_bulk, decompress_surface, decompress_surface_to, get_memory_size, scale, ColorValue,
    ConversionOptions, Endian, Filter, PixelBox, PixelConverter, PixelFormat, Region,
};
use texpresso::{Format, Params};

const WIDTH: usize = 12;
const HEIGHT: usize = 8;

/// An RGBA8 image with smooth gradients in every channel.
fn gradient_rgba() -> Vec<u8> {
    let mut rgba = Vec::with_capacity(WIDTH * HEIGHT * 4);
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            rgba.push((x * 255 / (WIDTH - 1)) as u8);
            rgba.push((y * 255 / (HEIGHT - 1)) as u8);
            rgba.push(((x + y) * 255 / (WIDTH + HEIGHT - 2)) as u8);
            rgba.push((255 - (x * 16 + y * 8).min(255)) as u8);
        }
    }
    rgba
}

fn compress(format: Format, rgba: &[u8]) -> Vec<u8> {
    let mut compressed = vec![0u8; format.compressed_size(WIDTH, HEIGHT)];
    format.compress(rgba, WIDTH, HEIGHT, Params::default(), &mut compressed);
    compressed
}

fn assert_similar(ours: &[u8], reference: &[u8], tolerance: u8) {
    assert_eq!(ours.len(), reference.len());
    for (i, (a, b)) in ours.iter().zip(reference).enumerate() {
        assert!(
            a.abs_diff(*b) <= tolerance,
            "byte {i} differs: {a} vs {b} (pixel {}, channel {})",
            i / 4,
            i % 4
        );
    }
}

fn check_against_texpresso(reference_format: Format, format: PixelFormat) {
    let compressed = compress(reference_format, &gradient_rgba());
    assert_eq!(compressed.len(), get_memory_size(WIDTH, HEIGHT, 1, format));

    let mut reference = vec![0u8; WIDTH * HEIGHT * 4];
    reference_format.decompress(&compressed, WIDTH, HEIGHT, &mut reference);

    let surface = decompress_surface_to(
        &compressed,
        WIDTH,
        HEIGHT,
        1,
        format,
        Endian::Little,
        PixelFormat::BYTE_RGBA,
    )
    .unwrap();

    assert_similar(&surface.data, &reference, 3);
}

#[test]
fn test_dxt1_matches_texpresso() {
    check_against_texpresso(Format::Bc1, PixelFormat::DXT1);
}

#[test]
fn test_dxt3_matches_texpresso() {
    check_against_texpresso(Format::Bc2, PixelFormat::DXT3);
}

#[test]
fn test_dxt5_matches_texpresso() {
    check_against_texpresso(Format::Bc3, PixelFormat::DXT5);
}

#[test]
fn test_premultiplied_variants_decode_like_their_base() {
    let rgba = gradient_rgba();

    let bc2 = compress(Format::Bc2, &rgba);
    let decode = |data: &[u8], format| {
        decompress_surface(data, WIDTH, HEIGHT, 1, format, Endian::Little).unwrap()
    };

    let dxt2 = decode(&bc2, PixelFormat::DXT2);
    let dxt3 = decode(&bc2, PixelFormat::DXT3);
    assert_eq!(dxt2, dxt3);

    let bc3 = compress(Format::Bc3, &rgba);
    let dxt4 = decode(&bc3, PixelFormat::DXT4);
    let dxt5 = decode(&bc3, PixelFormat::DXT5);
    assert_eq!(dxt4, dxt5);
    assert_eq!(dxt5.format, PixelFormat::BYTE_RGBA);
}

#[test]
fn test_decoded_surface_converts() {
    let compressed = compress(Format::Bc1, &gradient_rgba());
    let surface =
        decompress_surface(&compressed, WIDTH, HEIGHT, 1, PixelFormat::DXT1, Endian::Little)
            .unwrap();

    // BYTE_RGB or BYTE_RGBA, depending on the blocks texpresso picked
    let dst_box = PixelBox::new(WIDTH, HEIGHT, 1, PixelFormat::Float32Rgba);
    let mut floats = vec![0u8; dst_box.required_len()];
    convert_bulk(&surface.pixel_box(), &surface.data, &dst_box, &mut floats).unwrap();

    let first = pixelconv::unpack_color(PixelFormat::Float32Rgba, &floats[..16]).unwrap();
    let expected = pixelconv::unpack_color(surface.format, &surface.data).unwrap();
    assert_eq!(first, expected);
}

#[test]
fn test_round_trip_through_every_packable_format() {
    let src_box = PixelBox::new(4, 4, 1, PixelFormat::Float32Rgba);
    let mut src = vec![0u8; src_box.required_len()];
    for (i, pixel) in src.chunks_exact_mut(16).enumerate() {
        let value = i as f32 / 15.0;
        let color = ColorValue::new(value, 1.0 - value, 0.5, value);
        pixelconv::pack_color(color, src_box.format, pixel).unwrap();
    }

    for format in PixelFormat::ALL
        .iter()
        .copied()
        .filter(|format| format.is_accessible() && !format.is_depth())
    {
        let mid_box = PixelBox::new(4, 4, 1, format);
        let mut mid = vec![0u8; mid_box.required_len()];
        convert_bulk(&src_box, &src, &mid_box, &mut mid).unwrap();

        let mut back = vec![0u8; src_box.required_len()];
        convert_bulk(&mid_box, &mid, &src_box, &mut back).unwrap();

        // once quantized, another trip through the format changes nothing
        let mut again = vec![0u8; mid_box.required_len()];
        convert_bulk(&src_box, &back, &mid_box, &mut again).unwrap();
        let mut back_again = vec![0u8; src_box.required_len()];
        convert_bulk(&mid_box, &again, &src_box, &mut back_again).unwrap();
        assert_eq!(back, back_again, "{format} is not stable after one round trip");
    }
}

#[test]
fn test_optimized_paths_can_be_disabled() {
    let src_box = PixelBox::new(16, 16, 2, PixelFormat::A8R8G8B8);
    let src: Vec<u8> = (0..src_box.required_len()).map(|i| (i * 7) as u8).collect();

    for dst_format in [PixelFormat::R8G8B8A8, PixelFormat::L8, PixelFormat::B8G8R8] {
        let dst_box = PixelBox::new(16, 16, 2, dst_format);
        let mut fast = vec![0u8; dst_box.required_len()];
        let mut slow = vec![0u8; dst_box.required_len()];

        PixelConverter::default()
            .convert(&src_box, &src, &dst_box, &mut fast)
            .unwrap();
        PixelConverter::new(ConversionOptions {
            optimized_paths: false,
        })
        .convert(&src_box, &src, &dst_box, &mut slow)
        .unwrap();

        assert_eq!(fast, slow, "A8R8G8B8 => {dst_format}");
    }
}

#[test]
fn test_convert_sub_volume_between_images() {
    // copy the middle 2x2 of a 4x4 L8 image into the corner of a 3x3 A8R8G8B8 image
    let src_image = PixelBox::new(4, 4, 1, PixelFormat::L8);
    let src: Vec<u8> = (0..16).map(|i| i * 16).collect();
    let dst_image = PixelBox::new(3, 3, 1, PixelFormat::A8R8G8B8);
    let mut dst = vec![0u8; dst_image.required_len()];

    let src_box = src_image.sub_volume(Region::new_2d(1, 1, 3, 3)).unwrap();
    let dst_box = dst_image.sub_volume(Region::new_2d(1, 1, 3, 3)).unwrap();
    convert_bulk(&src_box, &src, &dst_box, &mut dst).unwrap();

    let pixel = |x: usize, y: usize| {
        let at = dst_image.pixel_offset(x, y, 0);
        u32::from_ne_bytes(dst[at..at + 4].try_into().unwrap())
    };
    assert_eq!(pixel(0, 0), 0);
    assert_eq!(pixel(1, 1), 0xFF505050);
    assert_eq!(pixel(2, 1), 0xFF606060);
    assert_eq!(pixel(1, 2), 0xFF909090);
    assert_eq!(pixel(2, 2), 0xFFA0A0A0);
}

#[test]
fn test_scale_decoded_surface() {
    let compressed = compress(Format::Bc3, &gradient_rgba());
    let surface =
        decompress_surface(&compressed, WIDTH, HEIGHT, 1, PixelFormat::DXT5, Endian::Little)
            .unwrap();

    let dst_box = PixelBox::new(WIDTH / 2, HEIGHT / 2, 1, PixelFormat::A8R8G8B8);
    let mut nearest = vec![0u8; dst_box.required_len()];
    let mut linear = vec![0u8; dst_box.required_len()];
    scale(&surface.pixel_box(), &surface.data, &dst_box, &mut nearest, Filter::Nearest).unwrap();
    scale(&surface.pixel_box(), &surface.data, &dst_box, &mut linear, Filter::Bilinear).unwrap();

    // a smooth gradient looks about the same either way
    assert_similar(&nearest, &linear, 40);
}
