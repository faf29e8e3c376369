use rand::Rng;

use crate::math::matrix::{linspace, Matrix};

/// Draws an `n × p` matrix uniform in [-1, 1) and rescales every row to
/// unit Euclidean norm. This is the Nguyen-Widrow direction matrix before
/// the `w_fix` magnitude is applied.
pub fn unit_rows<R: Rng + ?Sized>(neurons: usize, inputs: usize, rng: &mut R) -> Matrix {
    let mut w = Matrix::uniform(neurons, inputs, -1.0, 1.0, rng);
    w.normalize_rows();
    w
}

/// Magnitude factor `0.7 * n^(1/p)`.
pub fn scale_factor(neurons: usize, inputs: usize) -> f64 {
    0.7 * (neurons as f64).powf(1.0 / inputs as f64)
}

/// Nguyen-Widrow weights and biases for a hidden layer with `neurons`
/// units fed by `inputs` values.
///
/// Biases are spread over `w_fix * linspace(-1, 1, n)`, signed by the
/// first weight of each row. A single-neuron layer gets a zero bias.
pub fn nguyen_widrow<R: Rng + ?Sized>(
    neurons: usize,
    inputs: usize,
    rng: &mut R,
) -> (Matrix, Vec<f64>) {
    let w_fix = scale_factor(neurons, inputs);
    let weights = unit_rows(neurons, inputs, rng).map(|x| x * w_fix);

    let biases = if neurons == 1 {
        vec![0.0]
    } else {
        linspace(-1.0, 1.0, neurons)
            .into_iter()
            .zip(weights.data.iter())
            .map(|(spread, row)| w_fix * spread * sign(row[0]))
            .collect()
    };

    (weights, biases)
}

/// Output unit: weights and the bias scalar uniform in [0, 1), no scaling.
pub fn uniform_output<R: Rng + ?Sized>(inputs: usize, rng: &mut R) -> (Vec<f64>, f64) {
    let weights = (0..inputs).map(|_| rng.gen::<f64>()).collect();
    let bias = rng.gen::<f64>();
    (weights, bias)
}

// Zero maps to zero, unlike f64::signum.
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn unit_rows_have_norm_one() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let w = unit_rows(8, 15, &mut rng);
        for i in 0..w.rows {
            assert!((w.row_norm(i) - 1.0).abs() < 1e-9, "row {i}");
        }
    }

    #[test]
    fn scaled_rows_have_norm_w_fix() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let (w, _) = nguyen_widrow(4, 8, &mut rng);
        let w_fix = scale_factor(4, 8);
        assert_eq!((w.rows, w.cols), (4, 8));
        for i in 0..w.rows {
            assert!((w.row_norm(i) - w_fix).abs() < 1e-9);
        }
    }

    #[test]
    fn biases_follow_signed_linspace() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let (w, b) = nguyen_widrow(5, 3, &mut rng);
        let w_fix = scale_factor(5, 3);
        let spread = linspace(-1.0, 1.0, 5);
        for k in 0..5 {
            assert_eq!(b[k], w_fix * spread[k] * sign(w.data[k][0]));
        }
        // The centre neuron always lands on zero.
        assert_eq!(b[2].abs(), 0.0);
    }

    #[test]
    fn single_neuron_layer_has_zero_bias() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let (w, b) = nguyen_widrow(1, 4, &mut rng);
        assert_eq!((w.rows, w.cols), (1, 4));
        assert_eq!(b, vec![0.0]);
    }

    #[test]
    fn output_unit_draws_from_unit_interval() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let (w, b) = uniform_output(6, &mut rng);
        assert_eq!(w.len(), 6);
        assert!(w.iter().all(|x| (0.0..1.0).contains(x)));
        assert!((0.0..1.0).contains(&b));
    }

    #[test]
    fn same_seed_same_weights() {
        let a = nguyen_widrow(3, 15, &mut ChaCha8Rng::seed_from_u64(42));
        let b = nguyen_widrow(3, 15, &mut ChaCha8Rng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
