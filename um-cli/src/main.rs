//! Universal Machine CLI: run, disassemble, and dump the codex.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Usage, file, or image decode error
//! - 2: Machine fault
//!
//! Diagnostics go to stderr. Log verbosity defaults to warnings and can be
//! raised with `RUST_LOG` (e.g. `RUST_LOG=debug um run prog.um`).

mod commands;

use std::process;

fn main() {
    if let Err(e) = simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Warn)
        .env()
        .init()
    {
        eprintln!("warning: logging disabled: {e}");
    }

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "run" => commands::run(&args[2..]),
        "disassemble" => commands::disassemble(&args[2..]),
        "dump" => commands::dump(&args[2..]),
        "--help" | "-h" | "help" => {
            print_usage();
            process::exit(0);
        }
        other => {
            eprintln!("error: unknown command '{other}'");
            eprintln!();
            print_usage();
            process::exit(1);
        }
    };

    if let Err(code) = result {
        process::exit(code);
    }
}

fn print_usage() {
    eprintln!("Usage: um <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  run <prog.um>... [--input FILE] [--max-segment-words N]");
    eprintln!("                                           Concatenate images and execute them");
    eprintln!("  disassemble <prog.um>... [-o OUT]        Write a .asm listing per image");
    eprintln!("  dump <codex.umz> --key FILE [-o OUT] [--intro-bytes N]");
    eprintln!("                                           Decrypt the codex into a UM image");
}
