use image::{GrayImage, Luma};

/// Compact bit matrix holding a binary image, `true` = ink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMatrix {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl BitMatrix {
    /// Create an all-background matrix with given dimensions
    pub fn new(width: usize, height: usize) -> Self {
        let bytes_needed = (width * height).div_ceil(8);
        Self {
            width,
            height,
            data: vec![0; bytes_needed],
        }
    }

    /// Build a matrix by classifying every pixel of a grayscale image
    pub fn from_gray<F>(gray: &GrayImage, mut is_ink: F) -> Self
    where
        F: FnMut(u8) -> bool,
    {
        let (width, height) = (gray.width() as usize, gray.height() as usize);
        let mut matrix = Self::new(width, height);
        for (x, y, pixel) in gray.enumerate_pixels() {
            if is_ink(pixel.0[0]) {
                matrix.set(x as usize, y as usize, true);
            }
        }
        matrix
    }

    /// Get matrix width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get matrix height
    pub fn height(&self) -> usize {
        self.height
    }

    /// Get bit at (x, y)
    pub fn get(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let index = y * self.width + x;
        (self.data[index / 8] >> (index % 8)) & 1 == 1
    }

    /// Set bit at (x, y)
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = y * self.width + x;
        let mask = 1 << (index % 8);
        if value {
            self.data[index / 8] |= mask;
        } else {
            self.data[index / 8] &= !mask;
        }
    }

    /// Toggle bit at (x, y)
    pub fn toggle(&mut self, x: usize, y: usize) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = y * self.width + x;
        self.data[index / 8] ^= 1 << (index % 8);
    }

    /// Copy with every sample flipped (ink becomes background)
    pub fn inverted(&self) -> Self {
        let mut out = self.clone();
        for y in 0..self.height {
            for x in 0..self.width {
                out.toggle(x, y);
            }
        }
        out
    }

    /// One row as 0/1 samples (1 = ink)
    pub fn row(&self, y: usize) -> Vec<u8> {
        (0..self.width).map(|x| self.get(x, y) as u8).collect()
    }

    /// Number of value changes between horizontally adjacent samples in a row
    pub fn row_transitions(&self, y: usize) -> usize {
        if y >= self.height || self.width < 2 {
            return 0;
        }
        let mut count = 0;
        let mut prev = self.get(0, y);
        for x in 1..self.width {
            let cur = self.get(x, y);
            if cur != prev {
                count += 1;
            }
            prev = cur;
        }
        count
    }

    /// Total number of ink samples
    pub fn count_ink(&self) -> usize {
        let total = self.width * self.height;
        let full_bytes = total / 8;
        let mut count: usize = self.data[..full_bytes]
            .iter()
            .map(|b| b.count_ones() as usize)
            .sum();
        let tail_bits = total % 8;
        if tail_bits > 0 {
            let mask = (1u8 << tail_bits) - 1;
            count += (self.data[full_bytes] & mask).count_ones() as usize;
        }
        count
    }

    /// Fraction of samples that are ink, 0.0 for an empty matrix
    pub fn ink_fraction(&self) -> f64 {
        let total = self.width * self.height;
        if total == 0 {
            return 0.0;
        }
        self.count_ink() as f64 / total as f64
    }

    /// Owned copy of rows `[y_min, y_max)`, clamped to the matrix
    pub fn crop_rows(&self, y_min: usize, y_max: usize) -> Self {
        let y_max = y_max.min(self.height);
        let y_min = y_min.min(y_max);
        let mut out = Self::new(self.width, y_max - y_min);
        for y in y_min..y_max {
            for x in 0..self.width {
                if self.get(x, y) {
                    out.set(x, y - y_min, true);
                }
            }
        }
        out
    }

    /// Render as an 8-bit image: ink = 0, background = 255
    pub fn to_gray(&self) -> GrayImage {
        GrayImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            if self.get(x as usize, y as usize) {
                Luma([0])
            } else {
                Luma([255])
            }
        })
    }
}

impl Default for BitMatrix {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_matrix() {
        let mut matrix = BitMatrix::new(8, 8);
        assert_eq!(matrix.width(), 8);
        assert_eq!(matrix.height(), 8);

        matrix.set(3, 4, true);
        assert!(matrix.get(3, 4));
        assert!(!matrix.get(3, 3));

        matrix.toggle(3, 4);
        assert!(!matrix.get(3, 4));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut matrix = BitMatrix::new(8, 8);
        matrix.set(10, 10, true); // Should not panic
        assert!(!matrix.get(10, 10));
        assert_eq!(matrix.row_transitions(20), 0);
    }

    #[test]
    fn test_count_ink_ignores_padding_bits() {
        // 3x3 = 9 bits, second byte holds a single valid bit
        let matrix = BitMatrix::new(3, 3).inverted();
        assert_eq!(matrix.count_ink(), 9);
        assert!((matrix.ink_fraction() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_row_and_transitions() {
        let mut matrix = BitMatrix::new(6, 2);
        matrix.set(1, 0, true);
        matrix.set(2, 0, true);
        matrix.set(4, 0, true);
        assert_eq!(matrix.row(0), vec![0, 1, 1, 0, 1, 0]);
        assert_eq!(matrix.row_transitions(0), 4);
        assert_eq!(matrix.row_transitions(1), 0);
    }

    #[test]
    fn test_crop_rows_copies_data() {
        let mut matrix = BitMatrix::new(4, 5);
        matrix.set(0, 3, true);
        let band = matrix.crop_rows(2, 10);
        assert_eq!(band.height(), 3);
        assert!(band.get(0, 1));

        let empty = matrix.crop_rows(7, 9);
        assert_eq!(empty.height(), 0);
    }

    #[test]
    fn test_gray_round_trip_polarity() {
        let mut matrix = BitMatrix::new(2, 1);
        matrix.set(0, 0, true);
        let gray = matrix.to_gray();
        assert_eq!(gray.get_pixel(0, 0).0[0], 0);
        assert_eq!(gray.get_pixel(1, 0).0[0], 255);
        assert_eq!(BitMatrix::from_gray(&gray, |v| v < 128), matrix);
    }
}
