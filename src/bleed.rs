//! Colour bleeding for the transparent corners of a masked photo.
//!
//! Fully transparent pixels take the average colour of their already coloured
//! neighbours, layer by layer outwards from the visible region. Alpha is left
//! at zero, so the image looks the same, but a widget host that scales the
//! bitmap with bilinear filtering no longer pulls black into the rounded edge.

use std::collections::VecDeque;

use bit_vec::BitVec;
use image::RgbaImage;

const NEIGHBOURS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Per-pixel flags over a `width * height` grid.
struct Flags {
    width: u32,
    bits: BitVec,
}

impl Flags {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            bits: BitVec::from_elem(width as usize * height as usize, false),
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    fn get(&self, x: u32, y: u32) -> bool {
        self.bits.get(self.index(x, y)).unwrap_or(false)
    }

    fn set(&mut self, x: u32, y: u32) {
        let i = self.index(x, y);
        self.bits.set(i, true);
    }
}

fn neighbours(img: &RgbaImage, x: u32, y: u32) -> impl Iterator<Item = (u32, u32)> {
    let (w, h) = img.dimensions();
    NEIGHBOURS.iter().filter_map(move |&(dx, dy)| {
        let nx = x as i64 + dx;
        let ny = y as i64 + dy;
        (nx >= 0 && ny >= 0 && nx < w as i64 && ny < h as i64).then_some((nx as u32, ny as u32))
    })
}

pub fn alpha_bleed(img: &mut RgbaImage) {
    let (w, h) = img.dimensions();

    // `coloured`: may be sampled. `queued`: coloured or already waiting.
    let mut coloured = Flags::new(w, h);
    let mut queued = Flags::new(w, h);
    let mut frontier = VecDeque::new();

    for (x, y, px) in img.enumerate_pixels() {
        if px[3] != 0 {
            coloured.set(x, y);
            queued.set(x, y);
        }
    }

    for y in 0..h {
        for x in 0..w {
            if queued.get(x, y) {
                continue;
            }
            if neighbours(img, x, y).any(|(nx, ny)| coloured.get(nx, ny)) {
                queued.set(x, y);
                frontier.push_back((x, y));
            }
        }
    }

    while !frontier.is_empty() {
        let layer: Vec<(u32, u32)> = frontier.drain(..).collect();

        for &(x, y) in &layer {
            let mut sum = [0u32; 3];
            let mut count = 0u32;

            for (nx, ny) in neighbours(img, x, y) {
                if coloured.get(nx, ny) {
                    let src = img.get_pixel(nx, ny);
                    sum[0] += src[0] as u32;
                    sum[1] += src[1] as u32;
                    sum[2] += src[2] as u32;
                    count += 1;
                } else if !queued.get(nx, ny) {
                    queued.set(nx, ny);
                    frontier.push_back((nx, ny));
                }
            }

            let count = count.max(1);
            let px = img.get_pixel_mut(x, y);
            px.0 = [
                (sum[0] / count) as u8,
                (sum[1] / count) as u8,
                (sum[2] / count) as u8,
                0,
            ];
        }

        // A layer only becomes sampleable once it is fully computed.
        for (x, y) in layer {
            coloured.set(x, y);
        }
    }
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;

    #[test]
    fn fills_transparent_pixels_keeping_alpha() {
        let mut img = RgbaImage::from_pixel(5, 5, Rgba([0, 0, 0, 0]));
        img.put_pixel(2, 2, Rgba([200, 100, 50, 255]));

        alpha_bleed(&mut img);

        assert_eq!(img.get_pixel(2, 2), &Rgba([200, 100, 50, 255]));
        assert_eq!(img.get_pixel(0, 0), &Rgba([200, 100, 50, 0]));
        assert_eq!(img.get_pixel(4, 1), &Rgba([200, 100, 50, 0]));
    }

    #[test]
    fn fully_transparent_image_is_untouched() {
        let mut img = RgbaImage::from_pixel(3, 3, Rgba([9, 9, 9, 0]));
        alpha_bleed(&mut img);
        assert!(img.pixels().all(|p| p.0 == [9, 9, 9, 0]));
    }
}
