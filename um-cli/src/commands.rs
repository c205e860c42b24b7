//! CLI command implementations.

use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use um_cli::{codex_input, uber_program, SwitchSink, CODEX_INTRO_BYTES};
use um_common::Program;
use um_vm::{Machine, RuntimeError};

/// Concatenate one or more images and execute them on stdin/stdout.
pub fn run(args: &[String]) -> Result<(), i32> {
    const USAGE: &str = "Usage: um run <prog.um>... [--input FILE] [--max-segment-words N]";

    let mut files = Vec::new();
    let mut input_path = None;
    let mut max_segment_words = usize::MAX;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => input_path = Some(flag_value(args, &mut i, USAGE)?),
            "--max-segment-words" => {
                let value = flag_value(args, &mut i, USAGE)?;
                max_segment_words = value.parse().map_err(|_| {
                    eprintln!(
                        "error: --max-segment-words expects a non-negative integer, got '{value}'"
                    );
                    1
                })?;
            }
            _ => files.push(args[i].as_str()),
        }
        i += 1;
    }

    if files.is_empty() {
        eprintln!("error: run requires at least one program file");
        eprintln!("{USAGE}");
        return Err(1);
    }

    let program = read_programs(&files)?;
    log::info!("loaded {} words from {} file(s)", program.len(), files.len());

    let input: Box<dyn Read> = match input_path {
        Some(path) => {
            let file = File::open(path).map_err(|e| {
                eprintln!("error: cannot read '{path}': {e}");
                1
            })?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    };

    let outcome = Machine::new(program, input, io::stdout().lock())
        .with_max_segment_words(max_segment_words)
        .run()
        .map_err(report_fault)?;
    log::info!("halted after {} steps", outcome.steps);
    Ok(())
}

/// Write a `.asm` listing next to each image, or to `-o OUT` for one image.
pub fn disassemble(args: &[String]) -> Result<(), i32> {
    const USAGE: &str = "Usage: um disassemble <prog.um>... [-o OUT]";

    let mut files = Vec::new();
    let mut output = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-o" => output = Some(flag_value(args, &mut i, USAGE)?),
            _ => files.push(args[i].as_str()),
        }
        i += 1;
    }

    if files.is_empty() {
        eprintln!("error: disassemble requires at least one program file");
        eprintln!("{USAGE}");
        return Err(1);
    }
    if output.is_some() && files.len() > 1 {
        eprintln!("error: -o can only be used with a single input file");
        return Err(1);
    }

    for file in files {
        let program = read_program(file)?;
        let target = match output {
            Some(out) => PathBuf::from(out),
            None => listing_path(Path::new(file)),
        };
        let listing = um_disassembler::disassemble(&program);
        fs::write(&target, listing).map_err(|e| {
            eprintln!("error: cannot write '{}': {e}", target.display());
            1
        })?;
        eprintln!(
            "disassembled {} words -> {}",
            program.len(),
            target.display()
        );
    }
    Ok(())
}

/// Run the codex with a decryption key, sending its introduction to stdout
/// and the dumped image to a file.
pub fn dump(args: &[String]) -> Result<(), i32> {
    const USAGE: &str = "Usage: um dump <codex.umz> --key FILE [-o OUT] [--intro-bytes N]";

    let mut codex = None;
    let mut key_path = None;
    let mut output = "umix.um";
    let mut intro_bytes = CODEX_INTRO_BYTES;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--key" => key_path = Some(flag_value(args, &mut i, USAGE)?),
            "-o" => output = flag_value(args, &mut i, USAGE)?,
            "--intro-bytes" => {
                let value = flag_value(args, &mut i, USAGE)?;
                intro_bytes = value.parse().map_err(|_| {
                    eprintln!("error: --intro-bytes expects a non-negative integer, got '{value}'");
                    1
                })?;
            }
            other if codex.is_none() => codex = Some(other),
            other => {
                eprintln!("error: unexpected argument '{other}'");
                eprintln!("{USAGE}");
                return Err(1);
            }
        }
        i += 1;
    }

    let (Some(codex), Some(key_path)) = (codex, key_path) else {
        eprintln!("error: dump requires a codex file and --key");
        eprintln!("{USAGE}");
        return Err(1);
    };

    let program = read_program(codex)?;
    let key = fs::read_to_string(key_path).map_err(|e| {
        eprintln!("error: cannot read '{key_path}': {e}");
        1
    })?;
    let file = File::create(output).map_err(|e| {
        eprintln!("error: cannot write '{output}': {e}");
        1
    })?;

    eprintln!("running the codex on the Universal Machine...");
    // Unbuffered: the machine flushes after every byte.
    let sink = SwitchSink::new(intro_bytes, io::stdout().lock(), file);
    let input = io::Cursor::new(codex_input(&key));
    let outcome = um_vm::run(program, input, sink).map_err(report_fault)?;
    log::info!("codex halted after {} steps", outcome.steps);
    eprintln!("<redirected to '{output}'>");
    Ok(())
}

/// Take the value following a flag at `args[*i]`, advancing `i` past it.
fn flag_value<'a>(args: &'a [String], i: &mut usize, usage: &str) -> Result<&'a str, i32> {
    let flag = &args[*i];
    *i += 1;
    match args.get(*i) {
        Some(value) => Ok(value.as_str()),
        None => {
            eprintln!("error: {flag} requires a value");
            eprintln!("{usage}");
            Err(1)
        }
    }
}

/// Read and decode a single program image.
fn read_program(path: &str) -> Result<Program, i32> {
    read_programs(&[path])
}

/// Read every image and concatenate them in argument order.
fn read_programs(paths: &[&str]) -> Result<Program, i32> {
    let mut images = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = fs::read(path).map_err(|e| {
            eprintln!("error: cannot read '{path}': {e}");
            1
        })?;
        log::debug!("read {} bytes from '{path}'", bytes.len());
        images.push(bytes);
    }
    uber_program(&images).map_err(|e| {
        eprintln!("error: {e}");
        1
    })
}

/// `prog.um` -> `prog.asm`, in the same directory.
fn listing_path(input: &Path) -> PathBuf {
    input.with_extension("asm")
}

fn report_fault(e: RuntimeError) -> i32 {
    eprintln!("error: {}: {e}", e.category());
    2
}
