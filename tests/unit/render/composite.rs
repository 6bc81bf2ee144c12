use super::*;

fn repeat_px(px: [u8; 4], n: usize) -> Vec<u8> {
    px.repeat(n)
}

fn quad(region: TexelRect, geom: [f64; 6]) -> Quad {
    Quad { region, geom }
}

const IDENT: [f64; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

#[test]
fn source_over_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(composite_px(CompositeOp::SourceOver, src, dst), src);
}

#[test]
fn source_over_transparent_src_is_noop() {
    let dst = [10, 20, 30, 40];
    assert_eq!(composite_px(CompositeOp::SourceOver, [0, 0, 0, 0], dst), dst);
}

#[test]
fn source_over_half_alpha() {
    let dst = [0, 0, 255, 255];
    let src = [128, 0, 0, 128];
    assert_eq!(
        composite_px(CompositeOp::SourceOver, src, dst),
        [128, 0, 127, 255]
    );
}

#[test]
fn porter_duff_extremes() {
    let dst = [0, 0, 255, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(composite_px(CompositeOp::Clear, src, dst), [0, 0, 0, 0]);
    assert_eq!(composite_px(CompositeOp::Destination, src, dst), dst);
    assert_eq!(composite_px(CompositeOp::DestinationOver, src, dst), dst);
    assert_eq!(composite_px(CompositeOp::SourceIn, src, [0, 0, 0, 0]), [0; 4]);
    assert_eq!(composite_px(CompositeOp::DestinationOut, src, dst), [0; 4]);
    assert_eq!(composite_px(CompositeOp::Xor, src, dst), [0; 4]);
    assert_eq!(
        composite_px(CompositeOp::Lighter, [100, 0, 0, 100], [200, 0, 0, 200]),
        [255, 0, 0, 255]
    );
}

#[test]
fn identity_quad_copies_whole_region() {
    let src_px = repeat_px([255, 0, 0, 255], 4);
    let mut dst_px = vec![0u8; 16];
    let mut dst = TexViewMut {
        data: &mut dst_px,
        width: 2,
        height: 2,
    };
    let src = TexView {
        data: &src_px,
        width: 2,
        height: 2,
    };
    let region = TexelRect {
        x0: 0,
        y0: 0,
        x1: 2,
        y1: 2,
    };
    let n = draw_quad(
        &mut dst,
        src,
        &quad(region, IDENT),
        &ColorM::new(),
        CompositeOp::SourceOver,
        TexFilter::Nearest,
    );
    assert_eq!(n, 4);
    assert_eq!(dst_px, src_px);
}

#[test]
fn region_offset_samples_only_region_texels() {
    // 2x1 source: left red, right green. Region selects the right texel only.
    let src_px = vec![255, 0, 0, 255, 0, 255, 0, 255];
    let mut dst_px = vec![0u8; 8];
    let mut dst = TexViewMut {
        data: &mut dst_px,
        width: 2,
        height: 1,
    };
    let src = TexView {
        data: &src_px,
        width: 2,
        height: 1,
    };
    let region = TexelRect {
        x0: 1,
        y0: 0,
        x1: 2,
        y1: 1,
    };
    draw_quad(
        &mut dst,
        src,
        &quad(region, IDENT),
        &ColorM::new(),
        CompositeOp::Copy,
        TexFilter::Linear,
    );
    assert_eq!(&dst_px[0..4], &[0, 255, 0, 255]);
    assert_eq!(&dst_px[4..8], &[0, 0, 0, 0]);
}

#[test]
fn scaled_quad_covers_scaled_area() {
    let src_px = repeat_px([0, 0, 255, 255], 1);
    let mut dst_px = vec![0u8; 4 * 4 * 4];
    let mut dst = TexViewMut {
        data: &mut dst_px,
        width: 4,
        height: 4,
    };
    let src = TexView {
        data: &src_px,
        width: 1,
        height: 1,
    };
    let region = TexelRect {
        x0: 0,
        y0: 0,
        x1: 1,
        y1: 1,
    };
    let n = draw_quad(
        &mut dst,
        src,
        &quad(region, [3.0, 0.0, 0.0, 2.0, 1.0, 1.0]),
        &ColorM::new(),
        CompositeOp::SourceOver,
        TexFilter::Nearest,
    );
    assert_eq!(n, 6);
    for y in 0..4usize {
        for x in 0..4usize {
            let idx = (y * 4 + x) * 4;
            let inside = (1..4).contains(&x) && (1..3).contains(&y);
            let expected = if inside { [0, 0, 255, 255] } else { [0, 0, 0, 0] };
            assert_eq!(&dst_px[idx..idx + 4], &expected, "pixel ({x},{y})");
        }
    }
}

#[test]
fn singular_geometry_draws_nothing() {
    let src_px = repeat_px([255, 255, 255, 255], 1);
    let mut dst_px = vec![0u8; 4];
    let mut dst = TexViewMut {
        data: &mut dst_px,
        width: 1,
        height: 1,
    };
    let src = TexView {
        data: &src_px,
        width: 1,
        height: 1,
    };
    let region = TexelRect {
        x0: 0,
        y0: 0,
        x1: 1,
        y1: 1,
    };
    let n = draw_quad(
        &mut dst,
        src,
        &quad(region, [0.0, 0.0, 0.0, 1.0, 0.0, 0.0]),
        &ColorM::new(),
        CompositeOp::SourceOver,
        TexFilter::Nearest,
    );
    assert_eq!(n, 0);
    assert_eq!(dst_px, vec![0, 0, 0, 0]);
}

#[test]
fn color_matrix_is_applied_to_samples() {
    let src_px = repeat_px([255, 255, 255, 255], 1);
    let mut dst_px = vec![0u8; 4];
    let mut dst = TexViewMut {
        data: &mut dst_px,
        width: 1,
        height: 1,
    };
    let src = TexView {
        data: &src_px,
        width: 1,
        height: 1,
    };
    let mut cm = ColorM::new();
    cm.scale(1.0, 0.0, 0.0, 1.0);
    let region = TexelRect {
        x0: 0,
        y0: 0,
        x1: 1,
        y1: 1,
    };
    draw_quad(
        &mut dst,
        src,
        &quad(region, IDENT),
        &cm,
        CompositeOp::Copy,
        TexFilter::Nearest,
    );
    assert_eq!(dst_px, vec![255, 0, 0, 255]);
}
