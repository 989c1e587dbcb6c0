use std::sync::Arc;

use kurbo::Affine;
use tracing::warn;

use crate::assets::decode::PreparedImage;
use crate::foundation::error::{VignetteError, VignetteResult};
use crate::render::text::{CaptionBrush, CaptionLayoutEngine};
use crate::surface::{
    CAPTION_BOX_PAD_PT, CAPTION_BOX_RGBA, CAPTION_FONT_SIZE_PT, CAPTION_Y_FRAC, Surface,
};

/// Rasterized figure: a tightly packed RGBA8 frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameRgba {
    pub width: u32,
    pub height: u32,
    /// Row-major premultiplied RGBA8.
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRgba {
    /// Encode the frame as PNG at `path`.
    pub fn write_png(&self, path: &std::path::Path) -> VignetteResult<()> {
        image::save_buffer_with_format(
            path,
            &self.data,
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .map_err(|e| {
            VignetteError::raster(format!("failed to write png '{}': {e}", path.display()))
        })
    }
}

/// Rasterize a [`Surface`] to an RGBA8 frame.
///
/// Draw order: figure background, then the image aspect-fit into the axes
/// box, then the caption backing box and glyphs. Caption glyphs are
/// best-effort: when no system font resolves, the box still renders and the
/// glyphs are skipped with a diagnostic.
pub fn rasterize(surface: &Surface) -> VignetteResult<FrameRgba> {
    let (width, height) = surface.figure.pixel_size();
    let w: u16 = width
        .try_into()
        .map_err(|_| VignetteError::raster(format!("figure width exceeds u16: {width}")))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| VignetteError::raster(format!("figure height exceeds u16: {height}")))?;

    let mut ctx = vello_cpu::RenderContext::new(w, h);

    let [r, g, b, a] = surface.figure.background_rgba();
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        width as f64,
        height as f64,
    ));

    if let Some(img) = surface.axes.image() {
        draw_image(&mut ctx, surface, img, width, height)?;
    }

    if let Some(caption) = surface.figure.caption() {
        draw_caption(&mut ctx, caption.label(), surface.figure.dpi(), width, height)?;
    }

    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);

    Ok(FrameRgba {
        width,
        height,
        data: pixmap.data_as_u8_slice().to_vec(),
        premultiplied: true,
    })
}

/// Aspect-preserving fit of the image into the axes box, centered.
fn draw_image(
    ctx: &mut vello_cpu::RenderContext,
    surface: &Surface,
    img: &PreparedImage,
    fig_w: u32,
    fig_h: u32,
) -> VignetteResult<()> {
    if img.width == 0 || img.height == 0 {
        return Ok(());
    }

    // Axes rect is stored in figure fractions with a bottom-left origin;
    // pixels run from the top-left.
    let rect = surface.axes.rect();
    let ax_x = rect.x0 * fig_w as f64;
    let ax_y = (1.0 - rect.y1) * fig_h as f64;
    let ax_w = rect.width() * fig_w as f64;
    let ax_h = rect.height() * fig_h as f64;

    let scale = (ax_w / img.width as f64).min(ax_h / img.height as f64);
    let draw_w = img.width as f64 * scale;
    let draw_h = img.height as f64 * scale;
    let tx = ax_x + (ax_w - draw_w) / 2.0;
    let ty = ax_y + (ax_h - draw_h) / 2.0;

    let paint = rgba_premul_to_image(&img.rgba8_premul, img.width, img.height)?;
    let tr = Affine::translate((tx, ty)) * Affine::scale(scale);
    ctx.set_transform(affine_to_cpu(tr));
    ctx.set_paint(paint);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        img.width as f64,
        img.height as f64,
    ));
    Ok(())
}

fn draw_caption(
    ctx: &mut vello_cpu::RenderContext,
    label: &str,
    dpi: u32,
    fig_w: u32,
    fig_h: u32,
) -> VignetteResult<()> {
    let size_px = CAPTION_FONT_SIZE_PT * dpi as f32 / 72.0;
    let pad_px = f64::from(CAPTION_BOX_PAD_PT * dpi as f32 / 72.0);

    let mut engine = CaptionLayoutEngine::new();
    let ink = CaptionBrush {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };
    let layout = engine.layout_plain(label, size_px, ink, Some(fig_w as f32))?;

    let text_w = f64::from(layout.width());
    let text_h = f64::from(layout.height());
    if text_w <= 0.0 || text_h <= 0.0 {
        warn!("caption layout is empty (no usable system font?); drawing box only");
    }

    let origin_x = (fig_w as f64 - text_w) / 2.0;
    let bottom = fig_h as f64 * (1.0 - CAPTION_Y_FRAC);
    let origin_y = bottom - text_h;

    let [br, bg, bb, ba] = CAPTION_BOX_RGBA;
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(br, bg, bb, ba));
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        origin_x - pad_px,
        origin_y - pad_px,
        origin_x + text_w + pad_px,
        bottom + pad_px,
    ));

    ctx.set_transform(affine_to_cpu(Affine::translate((origin_x, origin_y))));
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            // The font resolved out of the system collection; rebuild a
            // vello-side handle from its raw blob.
            let font = run.run().font();
            let font_data = vello_cpu::peniko::FontData::new(
                vello_cpu::peniko::Blob::from(font.data.as_ref().to_vec()),
                font.index,
            );
            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));
            let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(&font_data)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
    Ok(())
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> VignetteResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| VignetteError::raster("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| VignetteError::raster("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(VignetteError::raster("pixmap byte len mismatch"));
    }
    // Pixmap stores PremulRgba8; our bytes are already premultiplied.
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

fn rgba_premul_to_image(
    bytes_premul: &[u8],
    width: u32,
    height: u32,
) -> VignetteResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}
