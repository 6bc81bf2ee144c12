use super::*;
use crate::render::cpu::{CpuTextures, TextureOpts};

fn backend() -> CpuTextures {
    CpuTextures::new(TextureOpts::default())
}

fn assert_all(backend: &mut CpuTextures, id: TextureId, expected: Rgba8Premul) {
    let (w, h) = backend.size(id).unwrap();
    let px = backend.read_pixels(id).unwrap();
    assert_eq!(px.len(), (w * h * 4) as usize);
    for (i, p) in px.chunks_exact(4).enumerate() {
        assert_eq!(p, expected.to_array(), "pixel {i}");
    }
}

#[test]
fn small_fill_uploads_without_drawing() {
    let mut b = backend();
    let source = FillSource::default();
    let dst = b.allocate(16, 16).unwrap();
    let c = Rgba8Premul::from_straight_rgba(255, 0, 0, 128);

    fill_texture(&mut b, &source, dst, (16, 16), c).unwrap();
    assert_all(&mut b, dst, c);
    assert_eq!(b.stats().draws_requested, 0);
    assert_eq!(b.stats().live_textures, 1, "fill source stays unallocated");
}

#[test]
fn large_fill_composites_from_shared_source() {
    let mut b = backend();
    let source = FillSource::default();
    let dst = b.allocate(17, 16).unwrap();
    let c = Rgba8Premul::from_straight_rgba(10, 200, 30, 77);

    fill_texture(&mut b, &source, dst, (17, 16), c).unwrap();
    assert_all(&mut b, dst, c);
    let st = b.stats();
    assert_eq!(st.draws_requested, 1);
    assert_eq!(st.live_textures, 2);
}

#[test]
fn both_paths_agree_for_many_colors() {
    let mut b = backend();
    let source = FillSource::default();
    let small = b.allocate(8, 8).unwrap();
    let large = b.allocate(40, 25).unwrap();

    for &(r, g, bl, a) in &[
        (0u8, 0u8, 0u8, 0u8),
        (255, 255, 255, 255),
        (1, 2, 3, 4),
        (200, 100, 50, 255),
        (255, 128, 64, 129),
        (7, 250, 99, 200),
    ] {
        let c = Rgba8Premul::from_straight_rgba(r, g, bl, a);
        fill_texture(&mut b, &source, small, (8, 8), c).unwrap();
        fill_texture(&mut b, &source, large, (40, 25), c).unwrap();
        assert_eq!(b.at(small, 3, 3).unwrap(), c);
        assert_all(&mut b, large, c);
    }
}

#[test]
fn large_fill_overwrites_instead_of_blending() {
    let mut b = backend();
    let source = FillSource::default();
    let dst = b.allocate(20, 20).unwrap();
    fill_texture(
        &mut b,
        &source,
        dst,
        (20, 20),
        Rgba8Premul::new(0, 0, 255, 255),
    )
    .unwrap();
    fill_texture(&mut b, &source, dst, (20, 20), Rgba8Premul::transparent()).unwrap();
    assert_all(&mut b, dst, Rgba8Premul::transparent());
}

#[test]
fn fill_source_is_reused_and_never_a_target() {
    let mut b = backend();
    let source = FillSource::default();
    let a = b.allocate(32, 32).unwrap();
    let c = b.allocate(64, 8).unwrap();
    fill_texture(&mut b, &source, a, (32, 32), Rgba8Premul::new(1, 1, 1, 1)).unwrap();
    fill_texture(&mut b, &source, c, (64, 8), Rgba8Premul::new(1, 1, 1, 1)).unwrap();
    assert_eq!(b.stats().live_textures, 3);

    let src_id = source.id.get().unwrap();
    assert!(matches!(
        fill_texture(&mut b, &source, src_id, (16, 16), Rgba8Premul::transparent()),
        Err(TesseraError::Misuse(_))
    ));
}
