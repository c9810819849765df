pub mod answer;
pub mod attendance;
pub mod classifier;
pub mod completion;
