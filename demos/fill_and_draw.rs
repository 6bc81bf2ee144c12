use tessera::{CompositeMode, DrawImageOptions, Filter, Graphics, Image, Rgba8Premul, TextureOpts};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let gfx = Graphics::new(TextureOpts::from_env());
    let mut canvas = Image::new(&gfx, 256, 256)?;
    canvas.fill(Rgba8Premul::from_straight_rgba(20, 20, 30, 255))?;

    let mut tile = Image::new(&gfx, 8, 8)?;
    tile.fill(Rgba8Premul::from_straight_rgba(230, 90, 40, 200))?;

    let mut op = DrawImageOptions::default();
    for i in 0..16 {
        op.geo_m.reset();
        op.geo_m.scale(2.0, 2.0);
        op.geo_m.translate(f64::from(i) * 16.0, f64::from(i) * 12.0);
        canvas.draw_image(&tile, Some(&op))?;
    }

    op.geo_m.reset();
    op.geo_m.rotate(std::f64::consts::FRAC_PI_6);
    op.geo_m.scale(6.0, 6.0);
    op.geo_m.translate(128.0, 40.0);
    op.color_m.scale(0.3, 1.0, 1.0, 0.8);
    op.filter = Filter::Linear;
    op.composite_mode = CompositeMode::Lighter;
    canvas.draw_image(&tile, Some(&op))?;

    let out = canvas.to_rgba_image()?;
    let lit = out.pixels().filter(|p| p.0[0] > 100).count();
    println!("canvas {:?}: {lit} bright pixels", out.dimensions());
    println!("{:#?}", gfx.stats());
    Ok(())
}
