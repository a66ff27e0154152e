pub mod scenario;
pub mod util;

pub use util::{FileSource, parse_seeds, run_stamp, split_csv};
