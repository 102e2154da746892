#[macro_use]
extern crate clap;

pub mod microbenchmarks;
pub use microbenchmarks::args::MicroBenchmarkArgs;
pub use microbenchmarks::MicroBenchmark;
