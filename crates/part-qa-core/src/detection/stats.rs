//! Pixel statistics shared by the feature extractor and the detectors.

/// Population mean and variance of a sample.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Moments {
    /// Number of samples.
    pub count: usize,
    /// Arithmetic mean, 0 for an empty sample.
    pub mean: f64,
    /// Population variance, 0 for an empty sample.
    pub variance: f64,
}

impl Moments {
    /// Computes moments in one pass (Welford).
    #[allow(clippy::cast_precision_loss)]
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut count = 0usize;
        let mut mean = 0.0;
        let mut m2 = 0.0;
        for x in values {
            count += 1;
            let delta = x - mean;
            mean += delta / count as f64;
            m2 += delta * (x - mean);
        }
        if count == 0 {
            return Self::default();
        }
        Self {
            count,
            mean,
            variance: (m2 / count as f64).max(0.0),
        }
    }

    /// Moments of an 8-bit plane.
    pub fn from_bytes(values: &[u8]) -> Self {
        Self::from_values(values.iter().map(|&v| f64::from(v)))
    }

    /// Population standard deviation.
    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }
}

/// A rectangular block of pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Left column.
    pub x: u32,
    /// Top row.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Cell {
    /// Returns true when the cell holds no pixels.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Iterates the values of `plane` (row-major, `stride` wide) inside the cell.
    pub fn values<'a>(&self, plane: &'a [u8], stride: u32) -> impl Iterator<Item = u8> + 'a {
        let (x0, y0, w, h, stride) = (
            self.x as usize,
            self.y as usize,
            self.width as usize,
            self.height as usize,
            stride as usize,
        );
        (y0..y0 + h).flat_map(move |row| {
            let start = row * stride + x0;
            plane[start..start + w].iter().copied()
        })
    }
}

/// Splits an image into a `rows` x `cols` grid of equal cells.
///
/// Cell size is the floor of the image size over the grid size, so trailing
/// rows and columns that do not fill a whole cell are left out. Images smaller
/// than the grid produce empty cells.
#[must_use]
pub fn grid_cells(width: u32, height: u32, rows: u32, cols: u32) -> Vec<Cell> {
    let cell_w = width / cols.max(1);
    let cell_h = height / rows.max(1);
    (0..rows)
        .flat_map(|i| {
            (0..cols).map(move |j| Cell {
                x: j * cell_w,
                y: i * cell_h,
                width: cell_w,
                height: cell_h,
            })
        })
        .collect()
}

/// Maps an out-of-range index back into `0..len` by mirroring without
/// repeating the edge sample (`gfedcb|abcdefgh|gfedcba`).
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
fn reflect_101(mut i: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let last = len as isize - 1;
    loop {
        if i < 0 {
            i = -i;
        } else if i > last {
            i = 2 * last - i;
        } else {
            return i as usize;
        }
    }
}

/// Box filter (mean over a `kernel` x `kernel` window) with mirrored borders.
#[allow(clippy::cast_possible_wrap, clippy::cast_precision_loss)]
#[must_use]
pub fn box_filter(values: &[f64], width: usize, height: usize, kernel: usize) -> Vec<f64> {
    if values.is_empty() || kernel <= 1 {
        return values.to_vec();
    }
    let before = ((kernel - 1) / 2) as isize;
    let norm = kernel as f64;

    let mut horizontal = vec![0.0; values.len()];
    for y in 0..height {
        let row = &values[y * width..(y + 1) * width];
        for x in 0..width {
            let start = x as isize - before;
            let sum: f64 = (0..kernel)
                .map(|k| row[reflect_101(start + k as isize, width)])
                .sum();
            horizontal[y * width + x] = sum / norm;
        }
    }

    let mut out = vec![0.0; values.len()];
    for y in 0..height {
        let start = y as isize - before;
        for x in 0..width {
            let sum: f64 = (0..kernel)
                .map(|k| horizontal[reflect_101(start + k as isize, height) * width + x])
                .sum();
            out[y * width + x] = sum / norm;
        }
    }
    out
}

/// Mean of the local variance map of an 8-bit plane.
///
/// The local mean is a box filter of the plane; the local variance is a box
/// filter of the squared deviation from that mean.
#[must_use]
pub fn mean_local_variance(plane: &[u8], width: usize, height: usize, kernel: usize) -> f64 {
    let values: Vec<f64> = plane.iter().map(|&v| f64::from(v)).collect();
    let local_mean = box_filter(&values, width, height, kernel);
    let squared: Vec<f64> = values
        .iter()
        .zip(&local_mean)
        .map(|(v, m)| (v - m) * (v - m))
        .collect();
    let local_variance = box_filter(&squared, width, height, kernel);
    Moments::from_values(local_variance).mean
}
