pub mod progress_utils;
pub mod simulation;
pub mod test_utils;
