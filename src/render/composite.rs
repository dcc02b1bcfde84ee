use crate::foundation::error::{ImprintError, ImprintResult};
use crate::foundation::math::mul_div255_u8;

pub(crate) type PremulRgba8 = [u8; 4];

/// Source-over for one premultiplied pixel.
pub(crate) fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    let sa = src[3];
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(sa);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255_u8(u16::from(dst[i]), inv));
    }
    out
}

/// Premultiplied source image placed with its top-left corner at `(x, y)` on a destination buffer.
pub(crate) struct Blit<'a> {
    pub(crate) src: &'a [u8],
    pub(crate) src_w: u32,
    pub(crate) src_h: u32,
    pub(crate) x: i64,
    pub(crate) y: i64,
}

/// Source-over `blit` onto `dst`, clipping whatever falls outside the destination.
pub(crate) fn blit_over(dst: &mut [u8], dst_w: u32, dst_h: u32, blit: Blit<'_>) -> ImprintResult<()> {
    if dst.len() != (dst_w as usize) * (dst_h as usize) * 4 {
        return Err(ImprintError::validation("blit destination byte len mismatch"));
    }
    if blit.src.len() != (blit.src_w as usize) * (blit.src_h as usize) * 4 {
        return Err(ImprintError::validation("blit source byte len mismatch"));
    }

    let x0 = blit.x.max(0);
    let y0 = blit.y.max(0);
    let x1 = (blit.x + i64::from(blit.src_w)).min(i64::from(dst_w));
    let y1 = (blit.y + i64::from(blit.src_h)).min(i64::from(dst_h));
    if x0 >= x1 || y0 >= y1 {
        return Ok(());
    }

    let span = ((x1 - x0) as usize) * 4;
    for dy in y0..y1 {
        let sy = (dy - blit.y) as usize;
        let sx = (x0 - blit.x) as usize;
        let s_off = (sy * blit.src_w as usize + sx) * 4;
        let d_off = ((dy as usize) * dst_w as usize + x0 as usize) * 4;
        for (d, s) in dst[d_off..d_off + span]
            .chunks_exact_mut(4)
            .zip(blit.src[s_off..s_off + span].chunks_exact(4))
        {
            let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
            d.copy_from_slice(&out);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
