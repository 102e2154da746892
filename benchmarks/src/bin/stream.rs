#[macro_use]
extern crate byos_benchmarks;
use byos::{
    stream_for, AppendStream, CachingStream, Element, MultipartStream,
    PumpStream, Stream,
};
use byos_benchmarks::{MicroBenchmark, MicroBenchmarkArgs};

/// Payload of `size` bytes delivered by a pump, in chunks of at most
/// `chunk` bytes.
fn pump(size: usize, chunk: usize) -> PumpStream {
    let mut remaining = size;
    PumpStream::new(move |length| {
        if remaining == 0 {
            return None;
        }
        let n = std::cmp::min(remaining, std::cmp::max(1, length.min(chunk)));
        remaining -= n;
        Some(vec![0x42u8; n])
    })
    .with_size(size as u64)
}

fn append(size: usize, chunk: usize) -> AppendStream {
    let parts = (0..size)
        .step_by(std::cmp::max(1, chunk))
        .map(|offset| stream_for(vec![0x42u8; chunk.min(size - offset)]));
    AppendStream::from_streams(parts).unwrap()
}

fn multipart(size: usize) -> MultipartStream {
    let half = size / 2;
    MultipartStream::new(vec![
        Element::new().name("first").contents(vec![0x42u8; half]),
        Element::new()
            .name("second")
            .filename("second.bin")
            .contents(vec![0x42u8; size - half]),
    ])
    .unwrap()
}

fn main() {
    let mut args = MicroBenchmarkArgs::default("Stream");
    let (size, chunk) = (args.size, args.chunk);
    let name = args.stream.clone();
    if name == "pump" && matches!(args.bench, MicroBenchmark::Seek) {
        panic!("A pump stream cannot seek, benchmark 'caching' instead.");
    }

    match name.as_str() {
        "append" => {
            microbenchmark!(
                "append",
                move || -> Box<dyn Stream> { Box::new(append(size, chunk)) },
                &mut args
            );
        }
        "pump" => {
            microbenchmark!(
                "pump",
                move || -> Box<dyn Stream> { Box::new(pump(size, chunk)) },
                &mut args
            );
        }
        "caching" => {
            microbenchmark!(
                "caching",
                move || -> Box<dyn Stream> {
                    Box::new(CachingStream::new(pump(size, chunk)))
                },
                &mut args
            );
        }
        "multipart" => {
            microbenchmark!(
                "multipart",
                move || -> Box<dyn Stream> { Box::new(multipart(size)) },
                &mut args
            );
        }
        other => panic!("Unexpected stream name {}.", other),
    }
}
