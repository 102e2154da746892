use crate::microbenchmarks::MicroBenchmark;
use clap::{Arg, ArgGroup, ArgMatches, Command};
use std::fs::{File, OpenOptions};

pub struct MicroBenchmarkArgs {
    pub bench: MicroBenchmark,
    pub stream: String,
    pub size: usize,
    pub chunk: usize,
    pub file: Option<File>,
    pub header: bool,
}

impl MicroBenchmarkArgs {
    fn opt_arg(app: Command) -> Command {
        let g = ArgGroup::new("bench")
            .arg("read")
            .arg("read_multiple")
            .arg("seek")
            .required(true)
            .multiple(false);

        let read = Arg::new("read")
            .long("read")
            .help("Read a stream to its end and measure each read.");
        let read_multiple = Arg::new("read_multiple")
            .long("read-multiple")
            .help(
                "Read increasing amounts of bytes out of fresh streams and \
                 measure the time to read each amount.",
            );
        let seek = Arg::new("seek").long("seek").help(
            "Seek a stream to random offsets and measure the time of each \
             seek followed by a read.",
        );

        app.arg(read).arg(read_multiple).arg(seek).group(g)
    }

    fn from_arg(args: &ArgMatches) -> MicroBenchmark {
        if args.is_present("read_multiple") {
            MicroBenchmark::ReadMultiple
        } else if args.is_present("seek") {
            MicroBenchmark::Seek
        } else {
            MicroBenchmark::Read
        }
    }

    pub fn base_app(app_name: &str) -> Command {
        let app = Command::new(app_name)
            .version(crate_version!())
            .author(crate_authors!());
        let stream_arg = Arg::new("stream")
            .help("Stream to benchmark.")
            .possible_values(["append", "pump", "caching", "multipart"])
            .required(true);
        let size_arg = Arg::new("size")
            .short('s')
            .long("size")
            .help("Size in bytes of the stream contents.")
            .takes_value(true)
            .default_value("1048576");
        let chunk_arg = Arg::new("chunk")
            .short('c')
            .long("chunk")
            .help("Number of bytes of each read.")
            .takes_value(true)
            .default_value("8192");
        let file_arg = Arg::new("output-file")
            .short('o')
            .help(
                "File where to write results. If not provided, results \
                 are written to stdout.",
            )
            .takes_value(true)
            .required(false);
        let header_arg = Arg::new("with-header")
            .short('t')
            .help("Whether or not to print benchmark header.")
            .takes_value(false)
            .required(false);

        MicroBenchmarkArgs::opt_arg(app)
            .arg(stream_arg)
            .arg(size_arg)
            .arg(chunk_arg)
            .arg(file_arg)
            .arg(header_arg)
    }

    pub fn build(app: Command) -> (Self, ArgMatches) {
        let matches = app.get_matches();

        let margs = MicroBenchmarkArgs {
            bench: MicroBenchmarkArgs::from_arg(&matches),
            stream: String::from(matches.value_of("stream").unwrap()),
            size: matches
                .value_of("size")
                .unwrap()
                .parse::<usize>()
                .expect("Invalid format for arg 'size'"),
            chunk: matches
                .value_of("chunk")
                .unwrap()
                .parse::<usize>()
                .expect("Invalid format for arg 'chunk'"),
            file: matches.value_of("output-file").map(|f| {
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(f)
                    .unwrap()
            }),
            header: matches.is_present("with-header"),
        };

        (margs, matches)
    }

    pub fn default(app_name: &str) -> Self {
        let about =
            format!("Run a microbenchmark of {} decorators.", app_name);
        let app =
            MicroBenchmarkArgs::base_app(app_name).about(about.as_str());
        MicroBenchmarkArgs::build(app).0
    }
}
