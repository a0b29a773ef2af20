//! Example exercising every field shape the record writer supports.
//!
//! Writes a handful of synthetic call records to a text file: point-to-point
//! sends and receives, a wait-all with statuses, a spawn with jagged command
//! lines, and an errhandler registration with a resolved callback address.
//!
//! Usage: all_field_types <output_file>

use ascii_format::AsciiStreamWriter;
use callrec::{
    AddressTable, CallSpan, Category, Clock, Len, PerfCounter, PerfInfo, Request, Status,
    StrArray, StrMatrix, SymbolTable, TimeInterval, ANY_SOURCE, ANY_TAG, ROOT,
};
use std::borrow::Cow;
use std::env;
use std::fs::File;
use std::io::BufWriter;

struct DemoSymbols;

impl SymbolTable for DemoSymbols {
    fn resolve(&self, category: Category, value: i32) -> Cow<'_, str> {
        match (category, value) {
            (Category::Comm, 2) => Cow::Borrowed("MPI_COMM_WORLD"),
            (Category::Comm, 3) => Cow::Borrowed("MPI_COMM_SELF"),
            (Category::Datatype, 3) => Cow::Borrowed("MPI_INT"),
            (Category::Datatype, 9) => Cow::Borrowed("MPI_DOUBLE"),
            (Category::Op, 1) => Cow::Borrowed("MPI_SUM"),
            (Category::Errhandler, 4) => Cow::Borrowed("user_errhandler_4"),
            _ => Cow::Borrowed("unknown"),
        }
    }
}

fn span(thread: i32, start_sec: i32, perf: Option<PerfInfo>) -> CallSpan {
    CallSpan {
        thread,
        wall: TimeInterval {
            start: Clock::new(start_sec, 100_000_000),
            stop: Clock::new(start_sec, 900_000_000),
        },
        cpu: TimeInterval {
            start: Clock::new(0, 50_000_000),
            stop: Clock::new(0, 700_000_000),
        },
        perf,
    }
}

fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    let output_file = if args.len() > 1 {
        &args[1]
    } else {
        eprintln!("Usage: {} <output_file>", args[0]);
        std::process::exit(1);
    };

    let mut functions = AddressTable::new();
    functions.push(0x4011a0, "comm_error_callback");
    functions.push(0x4013f8, "win_error_callback");

    let file = BufWriter::new(File::create(output_file)?);
    let mut writer = AsciiStreamWriter::new(file, &DemoSymbols, &functions);

    // Plain send: scalars, labeled handles, a rank and a tag.
    writer.begin_record("MPI_Send", &span(0, 10, None))?;
    writer.int("count", 4)?;
    writer.labeled("datatype", Category::Datatype, 3)?;
    writer.dest("dest", 1)?;
    writer.tag("tag", 7)?;
    writer.labeled("comm", Category::Comm, 2)?;
    writer.end_record(&span(0, 10, None))?;

    // Wildcard receive with a completion status.
    let status = Status {
        bytes: 16,
        cancelled: 0,
        source: 3,
        tag: 7,
        error: 0,
    };
    writer.begin_record("MPI_Recv", &span(0, 11, None))?;
    writer.int("count", 4)?;
    writer.labeled("datatype", Category::Datatype, 3)?;
    writer.source("source", ANY_SOURCE)?;
    writer.tag("tag", ANY_TAG)?;
    writer.labeled("comm", Category::Comm, 2)?;
    writer.status("status", Some(&status))?;
    writer.end_record(&span(0, 11, None))?;

    // Intercommunicator broadcast from the reserved root rank, with perf
    // counters sampled at entry and exit.
    let perf = PerfInfo {
        counters: vec![
            PerfCounter {
                tag: "PAPI_TOT_CYC".to_string(),
                invalue: 1_200_000,
                outvalue: 1_950_000,
            },
            PerfCounter {
                tag: "PAPI_L1_DCM".to_string(),
                invalue: 310,
                outvalue: 480,
            },
        ],
    };
    writer.begin_record("MPI_Bcast", &span(0, 12, Some(perf.clone())))?;
    writer.int("count", 1024)?;
    writer.labeled("datatype", Category::Datatype, 9)?;
    writer.source("root", ROOT)?;
    writer.labeled("comm", Category::Comm, 2)?;
    writer.end_record(&span(0, 12, Some(perf)))?;

    // Wait-all: request handles in, statuses out.
    let requests = [Request(11), Request(12), Request(13)];
    let statuses = [
        Status {
            bytes: 16,
            cancelled: 0,
            source: 1,
            tag: 7,
            error: 0,
        },
        Status {
            bytes: 16,
            cancelled: 0,
            source: 2,
            tag: 7,
            error: 0,
        },
        Status {
            bytes: 0,
            cancelled: 1,
            source: 3,
            tag: 7,
            error: 0,
        },
    ];
    writer.begin_record("MPI_Waitall", &span(1, 13, None))?;
    writer.int("count", 3)?;
    writer.request_array("requests", Some(&requests), 3)?;
    writer.status_array("statuses", Some(&statuses), 3)?;
    writer.end_record(&span(1, 13, None))?;

    // Spawn-multiple: a command list plus jagged per-command argument rows.
    let commands = StrArray::from_len(
        vec![Some("solver".to_string()), Some("monitor".to_string())],
        Len::from_raw(2),
    );
    let argvs = StrMatrix::from_len(
        vec![
            Some(StrArray::NullTerm(vec![
                Some("--mesh".to_string()),
                Some("coarse".to_string()),
                None,
            ])),
            Some(StrArray::from_len(
                vec![Some("--quiet".to_string())],
                Len::from_raw(1),
            )),
        ],
        Len::Counted(2),
    );
    let procs = [4, 1];
    let errcodes = vec![vec![0, 0, 0, 0], vec![0]];
    writer.begin_record("MPI_Comm_spawn_multiple", &span(0, 14, None))?;
    writer.int("count", 2)?;
    writer.string_array("commands", &commands)?;
    writer.string_matrix("argvs", &argvs)?;
    writer.int_array("maxprocs", Some(&procs), 2)?;
    writer.source("root", 0)?;
    writer.labeled("comm", Category::Comm, 3)?;
    writer.int_array_2d("errcodes", Some(&errcodes), 2, 4)?;
    writer.end_record(&span(0, 14, None))?;

    // Errhandler creation: a resolved callback address and a miss.
    writer.begin_record("MPI_Comm_create_errhandler", &span(0, 15, None))?;
    writer.func("function", 0x4011a0)?;
    writer.func("unregistered", 0xdeadbeef)?;
    writer.labeled("errhandler", Category::Errhandler, 4)?;
    writer.string("note", None)?;
    writer.int64("window_size", 1 << 33)?;
    writer.end_record(&span(0, 15, None))?;

    writer.flush()?;
    println!("call records written to {}", output_file);
    Ok(())
}
