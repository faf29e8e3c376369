pub mod example;
pub mod dataset;

pub use example::LabeledExample;
pub use dataset::{
    normalize, parse_records, read_records, stratified_split, DatasetError, DEFAULT_TEST_COUNTS,
};
