use byos::Stream;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io::{SeekFrom, Write};
use std::time::Instant;

pub mod args;

/// Sizes of reads of the `ReadMultiple` benchmark, from 1 byte to
/// `max` bytes.
fn increasing_sizes(max: usize) -> impl Iterator<Item = usize> {
    std::iter::successors(Some(1usize), |n| n.checked_mul(2))
        .take_while(move |n| *n <= max)
}

#[derive(Clone, Copy)]
pub enum MicroBenchmark {
    Read,
    ReadMultiple,
    Seek,
}

impl MicroBenchmark {
    pub fn print_result(line: String, file: &mut Option<File>) {
        match file {
            None => println!("{}", line),
            Some(f) => writeln!(f, "{}", line).unwrap(),
        }
    }

    pub fn header(self) -> &'static str {
        match self {
            MicroBenchmark::Read => "# stream stream.position nanoseconds",
            MicroBenchmark::ReadMultiple => "# stream read.size nanoseconds",
            MicroBenchmark::Seek => "# stream seek.offset nanoseconds",
        }
    }

    /// Read a fresh stream to its end `chunk` bytes at a time and measure
    /// each read.
    pub fn bench_read<F>(
        name: &str,
        mut stream: F,
        chunk: usize,
        file: &mut Option<File>,
    ) where
        F: FnMut() -> Box<dyn Stream>,
    {
        let mut stream = stream();
        loop {
            let t = Instant::now();
            let bytes = stream.read(chunk).unwrap();
            let t = t.elapsed().as_nanos();
            if bytes.is_empty() {
                break;
            }
            MicroBenchmark::print_result(
                format!("{} {} {}", name, stream.tell().unwrap(), t),
                file,
            );
        }
    }

    /// Read increasing amounts of bytes, each out of a fresh stream, and
    /// measure the time to get them all.
    pub fn bench_read_multiple<F>(
        name: &str,
        mut stream: F,
        size: usize,
        file: &mut Option<File>,
    ) where
        F: FnMut() -> Box<dyn Stream>,
    {
        for n in increasing_sizes(size) {
            let mut stream = stream();
            let t = Instant::now();
            let bytes =
                byos::utils::copy_to_string(&mut stream, Some(n)).unwrap();
            let t = t.elapsed().as_nanos();
            MicroBenchmark::print_result(
                format!("{} {} {}", name, bytes.len(), t),
                file,
            );
        }
    }

    /// Seek a stream to random offsets and measure each seek followed
    /// by a read of `chunk` bytes.
    pub fn bench_seek<F>(
        name: &str,
        mut stream: F,
        chunk: usize,
        size: usize,
        file: &mut Option<File>,
    ) where
        F: FnMut() -> Box<dyn Stream>,
    {
        let mut stream = stream();
        let mut rng = rand::rngs::StdRng::from_seed([0u8; 32]);
        let n = std::cmp::max(1, size / std::cmp::max(1, chunk));
        for _ in 0..n {
            let offset = rng.gen_range(0..=size as u64);
            let t = Instant::now();
            stream.seek(SeekFrom::Start(offset)).unwrap();
            stream.read(chunk).unwrap();
            let t = t.elapsed().as_nanos();
            MicroBenchmark::print_result(
                format!("{} {} {}", name, offset, t),
                file,
            );
        }
    }
}

/// Run the benchmark selected in a
/// [`MicroBenchmarkArgs`](struct.MicroBenchmarkArgs.html) on the streams
/// built by `$stream`, a closure returning a fresh `Box<dyn Stream>`.
#[macro_export]
macro_rules! microbenchmark {
    ($name: expr, $stream: expr, $args: expr) => {
        let args: &mut MicroBenchmarkArgs = $args;
        let name: &str = $name;
        let bench: MicroBenchmark = args.bench;

        if args.header {
            MicroBenchmark::print_result(
                String::from(bench.header()),
                &mut args.file,
            );
        }

        match bench {
            MicroBenchmark::Read => MicroBenchmark::bench_read(
                name,
                $stream,
                args.chunk,
                &mut args.file,
            ),
            MicroBenchmark::ReadMultiple => {
                MicroBenchmark::bench_read_multiple(
                    name,
                    $stream,
                    args.size,
                    &mut args.file,
                )
            }
            MicroBenchmark::Seek => MicroBenchmark::bench_seek(
                name,
                $stream,
                args.chunk,
                args.size,
                &mut args.file,
            ),
        }
    };
}
