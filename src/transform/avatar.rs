use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use vello_cpu::kurbo::{Circle, Ellipse, Rect, Shape};
use vello_cpu::peniko::Color;

use crate::foundation::core::ArtifactIndex;
use crate::foundation::error::{ImprintError, ImprintResult};
use crate::foundation::math::Fnv1a64;
use crate::model::placeholder::AvatarGender;
use crate::render::raster::{pixmap_to_rgba_image, render_pixmap};

/// Edge of the square the avatar is drawn at before resampling.
pub const AVATAR_NATIVE_PX: u16 = 400;

const TOLERANCE: f64 = 0.1;

const BACKGROUNDS: [[u8; 3]; 6] = [
    [0x9b, 0xc8, 0xe8],
    [0xf4, 0xd3, 0x8a],
    [0xb8, 0xe0, 0xb0],
    [0xe8, 0xb4, 0xc8],
    [0xd0, 0xc4, 0xf0],
    [0xf0, 0xc0, 0xa0],
];
const SKIN: [[u8; 3]; 5] = [
    [0xff, 0xdb, 0xac],
    [0xf1, 0xc2, 0x7d],
    [0xe0, 0xac, 0x69],
    [0xc6, 0x86, 0x42],
    [0x8d, 0x55, 0x24],
];
const HAIR: [[u8; 3]; 5] = [
    [0x2c, 0x22, 0x2b],
    [0x71, 0x63, 0x5a],
    [0xb5, 0x52, 0x39],
    [0xe6, 0xbe, 0x8a],
    [0x4e, 0x43, 0x3f],
];
const CLOTHES: [[u8; 3]; 5] = [
    [0x34, 0x49, 0x5e],
    [0xc0, 0x39, 0x2b],
    [0x27, 0xae, 0x60],
    [0x8e, 0x44, 0xad],
    [0x2c, 0x3e, 0x50],
];

/// Avatar generation settings shared by a batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AvatarOpts {
    /// Gender used when a placeholder carries no override.
    pub gender: AvatarGender,
    /// Fixed seed for reproducible avatars. `None` draws fresh entropy per avatar.
    pub seed: Option<u64>,
}

impl AvatarOpts {
    /// Per-avatar seed derived from the batch seed, the row and the placeholder.
    pub fn seed_for(&self, row: ArtifactIndex, placeholder_id: i64) -> Option<u64> {
        self.seed.map(|seed| {
            let mut h = Fnv1a64::new_default();
            h.write_u64(seed);
            h.write_u64(row.0);
            h.write_u64(placeholder_id as u64);
            h.finish()
        })
    }
}

fn pick(rng: &mut StdRng, palette: &[[u8; 3]]) -> Color {
    let [r, g, b] = palette[rng.gen_range(0..palette.len())];
    Color::from_rgba8(r, g, b, 255)
}

/// Generate a synthetic face and resample it to `side_px` square with a Lanczos3 filter.
pub fn render_avatar(
    gender: AvatarGender,
    seed: Option<u64>,
    side_px: u32,
) -> ImprintResult<image::RgbaImage> {
    if side_px == 0 {
        return Err(ImprintError::transform("avatar: target side is zero"));
    }
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let n = AVATAR_NATIVE_PX;
    let mut ctx = vello_cpu::RenderContext::new(n, n);
    draw_face(&mut ctx, gender, &mut rng);
    let native = pixmap_to_rgba_image(&render_pixmap(&mut ctx, n, n))?;

    if side_px == u32::from(n) {
        return Ok(native);
    }
    Ok(image::imageops::resize(
        &native,
        side_px,
        side_px,
        image::imageops::FilterType::Lanczos3,
    ))
}

fn draw_face(ctx: &mut vello_cpu::RenderContext, gender: AvatarGender, rng: &mut StdRng) {
    let side = f64::from(AVATAR_NATIVE_PX);
    let background = pick(rng, &BACKGROUNDS);
    let skin = pick(rng, &SKIN);
    let hair = pick(rng, &HAIR);
    let clothes = pick(rng, &CLOTHES);

    ctx.set_paint(background);
    ctx.fill_rect(&Rect::new(0.0, 0.0, side, side));

    if gender == AvatarGender::Female {
        let length = rng.gen_range(150.0..190.0);
        ctx.set_paint(hair);
        ctx.fill_path(&Ellipse::new((200.0, 200.0), (125.0, length), 0.0).to_path(TOLERANCE));
    }

    ctx.set_paint(clothes);
    ctx.fill_path(&Ellipse::new((200.0, 440.0), (160.0, 120.0), 0.0).to_path(TOLERANCE));
    ctx.set_paint(skin);
    ctx.fill_rect(&Rect::new(172.0, 250.0, 228.0, 330.0));
    match gender {
        AvatarGender::Male => {
            ctx.set_paint(Color::from_rgba8(255, 255, 255, 255));
            ctx.fill_path(&Ellipse::new((200.0, 330.0), (40.0, 18.0), 0.0).to_path(TOLERANCE));
        }
        AvatarGender::Female => {
            ctx.set_paint(skin);
            ctx.fill_path(&Ellipse::new((200.0, 330.0), (45.0, 22.0), 0.0).to_path(TOLERANCE));
        }
    }

    let face_w = rng.gen_range(85.0..100.0);
    ctx.set_paint(skin);
    ctx.fill_path(&Ellipse::new((200.0, 185.0), (face_w, 110.0), 0.0).to_path(TOLERANCE));

    let cap_h = match gender {
        AvatarGender::Male => rng.gen_range(40.0..65.0),
        AvatarGender::Female => rng.gen_range(55.0..75.0),
    };
    ctx.set_paint(hair);
    ctx.fill_path(
        &Ellipse::new((200.0, 95.0 + cap_h / 2.0), (face_w + 6.0, cap_h), 0.0)
            .to_path(TOLERANCE),
    );

    let eye_dx = rng.gen_range(30.0..42.0);
    let pupil = rng.gen_range(7.0..11.0);
    for cx in [200.0 - eye_dx, 200.0 + eye_dx] {
        ctx.set_paint(Color::from_rgba8(255, 255, 255, 255));
        ctx.fill_path(&Circle::new((cx, 190.0), pupil + 7.0).to_path(TOLERANCE));
        ctx.set_paint(Color::from_rgba8(0x2a, 0x1f, 0x1a, 255));
        ctx.fill_path(&Circle::new((cx, 192.0), pupil).to_path(TOLERANCE));
    }

    let mouth_w = rng.gen_range(18.0..34.0);
    ctx.set_paint(Color::from_rgba8(0xb0, 0x3a, 0x3a, 255));
    ctx.fill_path(&Ellipse::new((200.0, 250.0), (mouth_w, 9.0), 0.0).to_path(TOLERANCE));
}

#[cfg(test)]
#[path = "../../tests/unit/transform/avatar.rs"]
mod tests;
