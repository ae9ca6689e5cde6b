use crate::{
    geometry::{Rect, Size},
    model::{Background, BackgroundFit},
    style::{AlignX, AlignY},
};

/// Where the backdrop media lands on the canvas, in canvas pixels. One
/// formula for image and video sources; the rect may overflow the canvas
/// (cover crops) or undershoot it (contain letterboxes).
///
/// The source size comes from outside the core (the shell probes the media);
/// degenerate sizes fall back to stretching over the whole canvas instead of
/// failing composition.
pub fn placement(bg: &Background, canvas: Size, source: Size) -> Rect {
    if !source.width.is_finite()
        || !source.height.is_finite()
        || source.width <= 0.0
        || source.height <= 0.0
    {
        return canvas.to_rect();
    }

    let wf = canvas.width / source.width;
    let hf = canvas.height / source.height;
    let factor = match bg.fit {
        BackgroundFit::Cover => wf.max(hf),
        BackgroundFit::Contain => wf.min(hf),
        BackgroundFit::FillWidth => wf,
        BackgroundFit::FillHeight => hf,
        BackgroundFit::CustomSize => 1.0,
    };
    let factor = factor * bg.scale;

    let w = source.width * factor;
    let h = source.height * factor;
    let x = align_offset(canvas.width, w, bg.align_x);
    let y = align_offset_y(canvas.height, h, bg.align_y);
    Rect::new(x, y, x + w, y + h)
}

fn align_offset(container: f64, content: f64, align: AlignX) -> f64 {
    let rem = container - content;
    match align {
        AlignX::Start => 0.0,
        AlignX::Center => rem * 0.5,
        AlignX::End => rem,
    }
}

fn align_offset_y(container: f64, content: f64, align: AlignY) -> f64 {
    let rem = container - content;
    match align {
        AlignY::Start => 0.0,
        AlignY::Center => rem * 0.5,
        AlignY::End => rem,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BackgroundSource;

    fn bg(fit: BackgroundFit, align_x: AlignX, align_y: AlignY, scale: f64) -> Background {
        Background {
            source: BackgroundSource::Image {
                file: "beach.png".to_string(),
            },
            fit,
            align_x,
            align_y,
            scale,
        }
    }

    const CANVAS: Size = Size::new(1000.0, 500.0);

    #[test]
    fn cover_fills_and_crops() {
        let bg = bg(BackgroundFit::Cover, AlignX::Center, AlignY::Center, 1.0);
        let rect = placement(&bg, CANVAS, Size::new(100.0, 200.0));
        // Factor 10 on both axes: 1000x2000, vertically centered.
        assert_eq!(rect, Rect::new(0.0, -750.0, 1000.0, 1250.0));
    }

    #[test]
    fn contain_letterboxes() {
        let bg = bg(BackgroundFit::Contain, AlignX::Center, AlignY::Start, 1.0);
        let rect = placement(&bg, CANVAS, Size::new(100.0, 200.0));
        // Factor 2.5: 250x500, horizontally centered, top-aligned.
        assert_eq!(rect, Rect::new(375.0, 0.0, 625.0, 500.0));
    }

    #[test]
    fn fill_one_axis_ignores_the_other() {
        let src = Size::new(100.0, 200.0);
        let w = placement(
            &bg(BackgroundFit::FillWidth, AlignX::Start, AlignY::Start, 1.0),
            CANVAS,
            src,
        );
        assert_eq!(w.width(), 1000.0);
        assert_eq!(w.height(), 2000.0);

        let h = placement(
            &bg(BackgroundFit::FillHeight, AlignX::Start, AlignY::Start, 1.0),
            CANVAS,
            src,
        );
        assert_eq!(h.height(), 500.0);
        assert_eq!(h.width(), 250.0);
    }

    #[test]
    fn custom_size_uses_natural_pixels_times_scale() {
        let bg = bg(BackgroundFit::CustomSize, AlignX::End, AlignY::End, 2.0);
        let rect = placement(&bg, CANVAS, Size::new(100.0, 100.0));
        assert_eq!(rect, Rect::new(800.0, 300.0, 1000.0, 500.0));
    }

    #[test]
    fn scale_multiplies_after_fit() {
        let plain = bg(BackgroundFit::Contain, AlignX::Center, AlignY::Center, 1.0);
        let zoomed = bg(BackgroundFit::Contain, AlignX::Center, AlignY::Center, 1.2);
        let src = Size::new(100.0, 200.0);
        let a = placement(&plain, CANVAS, src);
        let b = placement(&zoomed, CANVAS, src);
        assert!((b.width() - a.width() * 1.2).abs() < 1e-9);
        assert!((b.height() - a.height() * 1.2).abs() < 1e-9);
    }

    #[test]
    fn degenerate_source_stretches_over_canvas() {
        let bg = bg(BackgroundFit::Cover, AlignX::Center, AlignY::Center, 1.0);
        assert_eq!(placement(&bg, CANVAS, Size::new(0.0, 0.0)), CANVAS.to_rect());
        assert_eq!(
            placement(&bg, CANVAS, Size::new(f64::NAN, 100.0)),
            CANVAS.to_rect()
        );
    }
}
