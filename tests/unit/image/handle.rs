use super::*;

fn gfx() -> Graphics {
    Graphics::new(TextureOpts::default().with_max_texture_size(128))
}

#[test]
fn size_and_bounds_follow_allocation() {
    let g = gfx();
    let img = Image::new(&g, 7, 3).unwrap();
    assert_eq!(img.size(), (7, 3));
    assert_eq!(img.bounds(), Rect::new(0.0, 0.0, 7.0, 3.0));
    assert!(!img.is_volatile());
    assert!(!img.is_disposed());
}

#[test]
fn drop_releases_texture() {
    let g = gfx();
    {
        let _a = Image::new(&g, 2, 2).unwrap();
        let _b = Image::new(&g, 2, 2).unwrap();
        assert_eq!(g.stats().live_textures, 2);
    }
    let st = g.stats();
    assert_eq!(st.live_textures, 0);
    assert_eq!(st.textures_disposed, 2);
}

#[test]
fn dispose_is_idempotent_and_drop_does_not_release_twice() {
    let g = gfx();
    let mut img = Image::new(&g, 2, 2).unwrap();
    img.dispose();
    img.dispose();
    drop(img);
    assert_eq!(g.stats().textures_disposed, 1);
}

#[test]
fn size_after_dispose_is_zero() {
    let g = gfx();
    let mut img = Image::new(&g, 5, 5).unwrap();
    img.dispose();
    assert_eq!(img.size(), (0, 0));
    assert!(img.bounds().is_zero_area());
    assert!(img.pixels().unwrap().is_empty());
    assert_eq!(img.to_rgba_image().unwrap().dimensions(), (0, 0));
}

#[test]
fn failed_upload_releases_the_allocation() {
    let g = gfx();
    let err = Image::from_premul_pixels(&g, 2, 2, &[0u8; 3]).unwrap_err();
    assert!(matches!(err, TesseraError::SizeMismatch { expected: 16, actual: 3 }));
    assert_eq!(g.stats().live_textures, 0);
}

#[test]
fn rgba_image_roundtrip_premultiplies_on_upload() {
    let g = gfx();
    let mut src = ::image::RgbaImage::new(2, 1);
    src.put_pixel(0, 0, ::image::Rgba([255, 0, 0, 255]));
    src.put_pixel(1, 0, ::image::Rgba([0, 0, 255, 0]));
    let img = Image::from_rgba_image(&g, &src).unwrap();

    assert_eq!(img.at(0, 0).unwrap(), Rgba8Premul::new(255, 0, 0, 255));
    assert_eq!(img.at(1, 0).unwrap(), Rgba8Premul::transparent());

    let back = img.to_rgba_image().unwrap();
    assert_eq!(back.get_pixel(0, 0), &::image::Rgba([255, 0, 0, 255]));
    assert_eq!(back.get_pixel(1, 0), &::image::Rgba([0, 0, 0, 0]));
}

#[test]
fn images_from_different_contexts_cannot_be_mixed() {
    let g1 = gfx();
    let g2 = gfx();
    let mut dst = Image::new(&g1, 2, 2).unwrap();
    let src = Image::new(&g2, 2, 2).unwrap();
    assert!(matches!(
        dst.draw_image(&src, None),
        Err(TesseraError::Misuse(_))
    ));
}

#[test]
fn volatile_images_are_cleared_each_frame() {
    let g = gfx();
    let mut scratch = Image::new_volatile(&g, 2, 2).unwrap();
    let mut keep = Image::new(&g, 2, 2).unwrap();
    assert!(scratch.is_volatile());
    scratch.fill(Rgba8Premul::new(9, 9, 9, 9)).unwrap();
    keep.fill(Rgba8Premul::new(9, 9, 9, 9)).unwrap();

    g.begin_frame().unwrap();
    assert_eq!(scratch.at(0, 0).unwrap(), Rgba8Premul::transparent());
    assert_eq!(keep.at(0, 0).unwrap(), Rgba8Premul::new(9, 9, 9, 9));
}

#[test]
fn debug_output_mentions_context() {
    let g = gfx();
    let img = Image::new(&g, 1, 1).unwrap();
    let s = format!("{img:?}");
    assert!(s.contains("Graphics"));
}
