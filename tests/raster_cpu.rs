use std::fs;
use std::path::Path;

use tempfile::TempDir;
use vignette::{FigSize, Illustrator, ShowOpts, Surface, rasterize};

fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn digest_u64(bytes: &[u8]) -> u64 {
    let mut state = 0x9E37_79B9_7F4A_7C15u64;
    for chunk in bytes.chunks(8) {
        let mut v = 0u64;
        for (i, &b) in chunk.iter().enumerate() {
            v |= (b as u64) << (i * 8);
        }
        state = mix64(state ^ v);
    }
    state
}

fn write_png(dir: &Path, name: &str, w: u32, h: u32, rgba: [u8; 4]) {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    img.save_with_format(dir.join(name), image::ImageFormat::Png)
        .unwrap();
}

fn red_fixture(size: FigSize, caption: bool) -> Surface {
    let tmp = TempDir::new().unwrap();
    write_png(tmp.path(), "red.png", 4, 4, [255, 0, 0, 255]);
    if caption {
        fs::write(tmp.path().join("src.txt"), "Somewhere, 2001").unwrap();
    }
    let renderer = Illustrator::new(tmp.path());
    let caption_rel = caption.then_some("src.txt");
    renderer
        .show("red.png", caption_rel, &ShowOpts { size })
        .into_surface()
        .unwrap()
}

#[test]
fn raster_is_deterministic_and_sized() {
    let surface = red_fixture(FigSize::default(), false);

    let a = rasterize(&surface).unwrap();
    let b = rasterize(&surface).unwrap();

    assert_eq!(a.width, 700);
    assert_eq!(a.height, 400);
    assert!(a.premultiplied);
    assert_eq!(a.data.len(), 700 * 400 * 4);
    assert_eq!(digest_u64(&a.data), digest_u64(&b.data));
}

#[test]
fn background_is_white_and_image_lands_in_axes_box() {
    let surface = red_fixture(FigSize::default(), false);
    let frame = rasterize(&surface).unwrap();

    // Top-left corner is outside the axes box: pure background.
    assert_eq!(&frame.data[0..4], &[255, 255, 255, 255]);

    // Center of the default axes box (left 0.125, bottom 0.11, 0.775x0.77):
    // x = (0.125 + 0.775/2) * 700, y = (1 - 0.11 - 0.77/2) * 400.
    let cx = ((0.125 + 0.775 / 2.0) * 700.0) as usize;
    let cy = ((1.0 - 0.11 - 0.77 / 2.0) * 400.0) as usize;
    let idx = (cy * 700 + cx) * 4;
    let px = &frame.data[idx..idx + 4];
    assert!(px[0] > 200, "expected red at axes center, got {px:?}");
    assert!(px[1] < 50 && px[2] < 50, "expected red at axes center, got {px:?}");
}

#[test]
fn caption_rasterizes_best_effort() {
    let surface = red_fixture(FigSize::default(), true);
    assert!(surface.figure.caption().is_some());

    // Must succeed whether or not a system font is available.
    let frame = rasterize(&surface).unwrap();
    assert_eq!((frame.width, frame.height), (700, 400));
}

#[test]
fn oversized_figure_fails_to_rasterize() {
    // 700 units * 100 dpi = 70000 px, beyond the u16 pixmap limit.
    let surface = red_fixture(FigSize::new(700.0, 4.0).unwrap(), false);
    let err = rasterize(&surface).unwrap_err();
    assert!(err.to_string().contains("exceeds u16"));
}
