use image::GrayImage;

/// Contrast-limited adaptive histogram equalization
///
/// The image is split into `tiles` × `tiles` regions. Each region's histogram
/// is clipped at `clip_limit` times the flat-histogram bin height, the excess
/// is spread over all bins, and the resulting CDF becomes a lookup table.
/// Pixels are mapped by bilinear interpolation between the four nearest
/// tile tables. Images smaller than one sample per tile are returned as is.
pub fn clahe(gray: &GrayImage, tiles: usize, clip_limit: f32) -> GrayImage {
    let (w, h) = (gray.width() as usize, gray.height() as usize);
    if w == 0 || h == 0 || tiles == 0 {
        return gray.clone();
    }
    let tile_w = w / tiles;
    let tile_h = h / tiles;
    if tile_w == 0 || tile_h == 0 {
        return gray.clone();
    }

    let maps = tile_maps(gray, tiles, tile_w, tile_h, clip_limit);

    let tw = tile_w as f32;
    let th = tile_h as f32;
    let last = tiles as i32 - 1;

    GrayImage::from_fn(w as u32, h as u32, |x, y| {
        let pixel = gray.get_pixel(x, y).0[0] as usize;

        let fx = (x as f32 + 0.5) / tw - 0.5;
        let fy = (y as f32 + 0.5) / th - 0.5;

        let tx0 = (fx.floor() as i32).clamp(0, last) as usize;
        let tx1 = (fx.floor() as i32 + 1).clamp(0, last) as usize;
        let ty0 = (fy.floor() as i32).clamp(0, last) as usize;
        let ty1 = (fy.floor() as i32 + 1).clamp(0, last) as usize;

        let ax = fx - fx.floor();
        let ay = fy - fy.floor();

        let v00 = maps[ty0 * tiles + tx0][pixel] as f32;
        let v10 = maps[ty0 * tiles + tx1][pixel] as f32;
        let v01 = maps[ty1 * tiles + tx0][pixel] as f32;
        let v11 = maps[ty1 * tiles + tx1][pixel] as f32;

        let top = v00 * (1.0 - ax) + v10 * ax;
        let bottom = v01 * (1.0 - ax) + v11 * ax;
        let value = top * (1.0 - ay) + bottom * ay;

        image::Luma([value.round().clamp(0.0, 255.0) as u8])
    })
}

fn tile_maps(
    gray: &GrayImage,
    tiles: usize,
    tile_w: usize,
    tile_h: usize,
    clip_limit: f32,
) -> Vec<[u8; 256]> {
    let (w, h) = (gray.width() as usize, gray.height() as usize);
    let mut maps = vec![[0u8; 256]; tiles * tiles];

    for ty in 0..tiles {
        for tx in 0..tiles {
            let x0 = tx * tile_w;
            let y0 = ty * tile_h;
            // Last row/column of tiles absorbs the remainder
            let x1 = if tx == tiles - 1 { w } else { x0 + tile_w };
            let y1 = if ty == tiles - 1 { h } else { y0 + tile_h };
            let tile_pixels = (x1 - x0) * (y1 - y0);

            let mut hist = [0u32; 256];
            for y in y0..y1 {
                for x in x0..x1 {
                    hist[gray.get_pixel(x as u32, y as u32).0[0] as usize] += 1;
                }
            }

            let clip = ((clip_limit * tile_pixels as f32 / 256.0) as u32).max(1);
            let mut excess = 0u32;
            for bin in hist.iter_mut() {
                if *bin > clip {
                    excess += *bin - clip;
                    *bin = clip;
                }
            }
            let per_bin = excess / 256;
            let remainder = (excess % 256) as usize;
            for (i, bin) in hist.iter_mut().enumerate() {
                *bin += per_bin;
                if i < remainder {
                    *bin += 1;
                }
            }

            let mut cdf = [0u32; 256];
            let mut running = 0u32;
            for (c, &bin) in cdf.iter_mut().zip(hist.iter()) {
                running += bin;
                *c = running;
            }
            let cdf_min = cdf.iter().copied().find(|&v| v > 0).unwrap_or(0);
            let denom = cdf[255].saturating_sub(cdf_min);

            let map = &mut maps[ty * tiles + tx];
            for (i, slot) in map.iter_mut().enumerate() {
                *slot = if denom == 0 {
                    i as u8
                } else {
                    let scaled = cdf[i].saturating_sub(cdf_min) as f32 / denom as f32 * 255.0;
                    (scaled as u32).min(255) as u8
                };
            }
        }
    }

    maps
}
