//! Dataset preparation for the driver: parsing, min-max normalization and
//! the per-class train/test split. The training core never calls into this
//! module; it only consumes the resulting [`LabeledExample`]s.

use std::path::Path;

use rand::{seq::SliceRandom, Rng};
use thiserror::Error;

use crate::data::example::LabeledExample;

/// Test examples taken for each label 1..=7.
pub const DEFAULT_TEST_COUNTS: [usize; 7] = [8, 4, 1, 2, 1, 2, 2];

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("row {row}: {reason}")]
    Parse { row: usize, reason: String },
}

/// Parses comma-separated rows of `name, feature..., label`.
///
/// The first column is an identifier and is skipped. Blank lines are
/// ignored. Every row must have the same number of columns.
pub fn parse_records(text: &str) -> Result<Vec<LabeledExample>, DatasetError> {
    let mut examples = Vec::new();
    let mut width: Option<usize> = None;

    for (idx, line) in text.lines().enumerate() {
        let row = idx + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let cells: Vec<&str> = line.split(',').map(str::trim).collect();
        if cells.len() < 3 {
            return Err(DatasetError::Parse {
                row,
                reason: format!("expected name, features and label, got {} columns", cells.len()),
            });
        }
        match width {
            Some(w) if w != cells.len() => {
                return Err(DatasetError::Parse {
                    row,
                    reason: format!("expected {} columns, got {}", w, cells.len()),
                });
            }
            _ => width = Some(cells.len()),
        }

        let values = cells[1..]
            .iter()
            .map(|cell| {
                cell.parse::<f64>().map_err(|_| DatasetError::Parse {
                    row,
                    reason: format!("'{cell}' is not a number"),
                })
            })
            .collect::<Result<Vec<f64>, _>>()?;

        let (label, features) = values.split_last().ok_or_else(|| DatasetError::Parse {
            row,
            reason: "row has no label".into(),
        })?;
        examples.push(LabeledExample::new(features.to_vec(), *label));
    }

    Ok(examples)
}

pub fn read_records<P: AsRef<Path>>(path: P) -> Result<Vec<LabeledExample>, DatasetError> {
    let text = std::fs::read_to_string(path)?;
    parse_records(&text)
}

/// Rescales every feature column to [-1, 1] with `2 (x - min) / (max - min) - 1`.
/// A constant column becomes all zeros.
pub fn normalize(examples: &mut [LabeledExample]) {
    let width = examples.first().map(|e| e.features.len()).unwrap_or(0);
    for col in 0..width {
        let (min, max) = examples.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), e| {
            (lo.min(e.features[col]), hi.max(e.features[col]))
        });
        let range = max - min;
        for e in examples.iter_mut() {
            e.features[col] = if range > 0.0 {
                2.0 * (e.features[col] - min) / range - 1.0
            } else {
                0.0
            };
        }
    }
}

/// Shuffles `examples`, then moves the first `per_class[k - 1]` examples
/// of each label `k` into the test set. The test set comes back sorted by
/// label; the training set too when `sort_train` is set.
pub fn stratified_split<R: Rng + ?Sized>(
    mut examples: Vec<LabeledExample>,
    per_class: &[usize],
    sort_train: bool,
    rng: &mut R,
) -> (Vec<LabeledExample>, Vec<LabeledExample>) {
    examples.shuffle(rng);

    let mut taken = vec![0usize; per_class.len()];
    let mut train = Vec::with_capacity(examples.len());
    let mut test = Vec::new();
    for example in examples {
        let class = example.label.round() as i64;
        let slot = usize::try_from(class - 1).ok().filter(|&s| s < per_class.len());
        match slot {
            Some(s) if taken[s] < per_class[s] => {
                taken[s] += 1;
                test.push(example);
            }
            _ => train.push(example),
        }
    }

    // stable sort keeps the shuffled order within a class
    test.sort_by(|a, b| a.label.total_cmp(&b.label));
    if sort_train {
        train.sort_by(|a, b| a.label.total_cmp(&b.label));
    }
    (train, test)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn parses_named_rows() {
        let text = "aardvark,1,0,4,1\n\nbass,0,1,0,4\n";
        let rows = parse_records(text).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].features, vec![1.0, 0.0, 4.0]);
        assert_eq!(rows[1].label, 4.0);
    }

    #[test]
    fn rejects_ragged_and_non_numeric_rows() {
        assert!(matches!(
            parse_records("a,1,2,3\nb,1,2\n"),
            Err(DatasetError::Parse { row: 2, .. })
        ));
        assert!(matches!(parse_records("a,1,x,3\n"), Err(DatasetError::Parse { row: 1, .. })));
    }

    #[test]
    fn normalize_maps_columns_to_unit_range() {
        let mut rows = vec![
            LabeledExample::new(vec![0.0, 5.0, 2.0], 1.0),
            LabeledExample::new(vec![4.0, 5.0, 6.0], 2.0),
            LabeledExample::new(vec![2.0, 5.0, 4.0], 3.0),
        ];
        normalize(&mut rows);
        assert_eq!(rows[0].features, vec![-1.0, 0.0, -1.0]);
        assert_eq!(rows[1].features, vec![1.0, 0.0, 1.0]);
        assert_eq!(rows[2].features, vec![0.0, 0.0, 0.0]);
        assert_eq!(rows[2].label, 3.0);
    }

    #[test]
    fn split_takes_requested_counts_per_class() {
        let rows: Vec<LabeledExample> = (0..70)
            .map(|i| LabeledExample::new(vec![i as f64], (i % 7 + 1) as f64))
            .collect();
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let (train, test) = stratified_split(rows, &DEFAULT_TEST_COUNTS, true, &mut rng);

        assert_eq!(test.len(), DEFAULT_TEST_COUNTS.iter().sum::<usize>());
        assert_eq!(train.len() + test.len(), 70);
        for (k, &count) in DEFAULT_TEST_COUNTS.iter().enumerate() {
            let label = (k + 1) as f64;
            assert_eq!(test.iter().filter(|e| e.label == label).count(), count);
        }
        assert!(test.windows(2).all(|w| w[0].label <= w[1].label));
        assert!(train.windows(2).all(|w| w[0].label <= w[1].label));
    }

    #[test]
    fn split_keeps_unknown_labels_in_training() {
        let rows = vec![LabeledExample::new(vec![0.0], 9.0), LabeledExample::new(vec![0.0], 0.0)];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let (train, test) = stratified_split(rows, &DEFAULT_TEST_COUNTS, false, &mut rng);
        assert_eq!(train.len(), 2);
        assert!(test.is_empty());
    }
}
