use rand::Rng;
use serde::{Serialize, Deserialize};

/// Dense row-major matrix. `data[i]` is row `i`; every row has `cols` entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    /// Draws every entry uniformly from `[low, high)`.
    pub fn uniform<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        low: f64,
        high: f64,
        rng: &mut R,
    ) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);

        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = low + rng.gen::<f64>() * (high - low);
            }
        }

        res
    }

    /// Euclidean norm of row `i`.
    pub fn row_norm(&self, i: usize) -> f64 {
        self.data[i].iter().map(|x| x * x).sum::<f64>().sqrt()
    }

    /// Rescales each row to unit Euclidean norm. All-zero rows are left alone.
    pub fn normalize_rows(&mut self) {
        for i in 0..self.rows {
            let norm = self.row_norm(i);
            if norm > 0.0 {
                for x in &mut self.data[i] {
                    *x /= norm;
                }
            }
        }
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    /// Returns true when `data` really is `rows × cols`.
    pub fn is_consistent(&self) -> bool {
        self.data.len() == self.rows && self.data.iter().all(|row| row.len() == self.cols)
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

/// `n` evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|k| start + step * k as f64).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn uniform_respects_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let m = Matrix::uniform(6, 9, -1.0, 1.0, &mut rng);
        assert!(m.is_consistent());
        assert!(m.data.iter().flatten().all(|&x| (-1.0..1.0).contains(&x)));
    }

    #[test]
    fn normalize_rows_gives_unit_norm() {
        let mut m = Matrix { rows: 2, cols: 2, data: vec![vec![3.0, 4.0], vec![0.0, 0.0]] };
        m.normalize_rows();
        assert!((m.row_norm(0) - 1.0).abs() < 1e-12);
        assert_eq!(m.data[1], vec![0.0, 0.0]);
    }

    #[test]
    fn linspace_endpoints() {
        assert_eq!(linspace(-1.0, 1.0, 5), vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
        assert_eq!(linspace(-1.0, 1.0, 1), vec![-1.0]);
        assert!(linspace(-1.0, 1.0, 0).is_empty());
    }
}
