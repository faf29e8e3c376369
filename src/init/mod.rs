pub mod nguyen_widrow;

pub use nguyen_widrow::{nguyen_widrow, uniform_output};
