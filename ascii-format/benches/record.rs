use ascii_format::AsciiStreamWriter;
use callrec::{
    AddressTable, CallSpan, Category, Clock, NoSymbols, Request, Status, TimeInterval,
};
use divan::Bencher;
use std::hint::black_box;

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn span() -> CallSpan {
    CallSpan {
        thread: 0,
        wall: TimeInterval {
            start: Clock::new(12, 100_000_000),
            stop: Clock::new(12, 900_000_000),
        },
        cpu: TimeInterval {
            start: Clock::new(3, 50_000_000),
            stop: Clock::new(3, 700_000_000),
        },
        perf: None,
    }
}

#[divan::bench]
fn send_record(bencher: Bencher) {
    let functions = AddressTable::new();
    let span = span();
    bencher.bench_local(|| {
        let mut writer =
            AsciiStreamWriter::new(Vec::with_capacity(256), &NoSymbols, &functions);
        for _ in 0..1000 {
            writer.begin_record("MPI_Send", &span).unwrap();
            writer.int("count", 4).unwrap();
            writer.labeled("datatype", Category::Datatype, 3).unwrap();
            writer.dest("dest", 1).unwrap();
            writer.tag("tag", 7).unwrap();
            writer.labeled("comm", Category::Comm, 2).unwrap();
            writer.end_record(&span).unwrap();
        }
        black_box(writer.into_inner());
    });
}

#[divan::bench(args = [0, 4, 16, 64])]
fn waitall_record(bencher: Bencher, count: usize) {
    let functions = AddressTable::new();
    let span = span();
    let requests: Vec<Request> = (0..count as i32).map(Request).collect();
    let statuses: Vec<Status> = (0..count as i32)
        .map(|i| Status {
            bytes: 16,
            cancelled: 0,
            source: i,
            tag: 7,
            error: 0,
        })
        .collect();
    bencher.bench_local(|| {
        let mut writer =
            AsciiStreamWriter::new(Vec::with_capacity(4096), &NoSymbols, &functions);
        for _ in 0..1000 {
            writer.begin_record("MPI_Waitall", &span).unwrap();
            writer.int("count", count as i32).unwrap();
            writer
                .request_array("requests", Some(&requests), count as i32)
                .unwrap();
            writer
                .status_array("statuses", Some(&statuses), count as i32)
                .unwrap();
            writer.end_record(&span).unwrap();
        }
        black_box(writer.into_inner());
    });
}

fn main() {
    divan::main();
}
