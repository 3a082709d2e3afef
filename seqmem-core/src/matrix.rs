//! Dense row-major storage and the argmax/argmin scans the dial is built on.
//!
//! Every scan breaks ties toward the lowest index, so the same state always
//! picks the same cell.

/// Index of the largest value, lowest index on ties.
///
/// Returns `None` only for an empty slice.
#[must_use]
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Index of the smallest value, lowest index on ties.
///
/// Returns `None` only for an empty slice.
#[must_use]
pub fn argmin(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v >= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Index of the largest value if that value is strictly positive.
///
/// An all-zero (or all-negative) row has no edge to follow.
#[must_use]
pub fn argmax_positive(values: &[f64]) -> Option<usize> {
    argmax(values).filter(|&i| values[i] > 0.0)
}

/// Element count of a `rows × cols` buffer of `T`, or `None` if that many
/// elements could never be allocated.
#[must_use]
pub fn buffer_len<T>(rows: usize, cols: usize) -> Option<usize> {
    let len = rows.checked_mul(cols)?;
    let bytes = len.checked_mul(std::mem::size_of::<T>())?;
    isize::try_from(bytes).ok().map(|_| len)
}

/// Square `n × n` matrix of `f64`, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct SquareMatrix {
    n: usize,
    data: Vec<f64>,
}

impl SquareMatrix {
    /// All-zero `n × n` matrix. Callers check the size with [`buffer_len`].
    #[must_use]
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![0.0; n * n],
        }
    }

    /// Side length.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.n
    }

    /// Value at (`row`, `col`). Callers validate indices.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.n + col]
    }

    /// Overwrite (`row`, `col`).
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.n + col] = value;
    }

    /// Borrow one row.
    #[must_use]
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.n..(row + 1) * self.n]
    }

    /// Zero one row.
    pub fn clear_row(&mut self, row: usize) {
        let n = self.n;
        self.data[row * n..(row + 1) * n].fill(0.0);
    }

    /// Multiply every entry by `factor`.
    pub fn scale(&mut self, factor: f64) {
        for v in &mut self.data {
            *v *= factor;
        }
    }

    /// Number of strictly positive entries in column `col`.
    #[must_use]
    pub fn positive_in_column(&self, col: usize) -> usize {
        (0..self.n).filter(|&row| self.get(row, col) > 0.0).count()
    }

    /// Number of strictly positive entries overall.
    #[must_use]
    pub fn positive_count(&self) -> usize {
        self.data.iter().filter(|&&v| v > 0.0).count()
    }

    /// Matrix-vector product `self · v`.
    ///
    /// `v` must have length `dim()`.
    #[must_use]
    pub fn mul_vec(&self, v: &[f64]) -> Vec<f64> {
        debug_assert_eq!(v.len(), self.n);
        (0..self.n)
            .map(|row| self.row(row).iter().zip(v).map(|(a, b)| a * b).sum())
            .collect()
    }
}
