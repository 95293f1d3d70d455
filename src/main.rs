use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::exit;

use clap::{Arg, ArgAction, command, value_parser};

use sequencer::{debug_enabled, set_debug, ByteSource, Error, Interpreter, NumericInput, RawInput};


fn main() {
    let argv = command!()
        .next_line_help(true)
        .arg(Arg::new("program")
            .value_name("PROGRAM")
            .help("The Sequence program file.")
            .required(true)
            .value_parser(value_parser!(PathBuf)))
        .arg(Arg::new("input")
            .value_name("INPUT")
            .help("File to read input from. [default: stdin]")
            .required(false)
            .value_parser(value_parser!(PathBuf)))
        .arg(Arg::new("output")
            .value_name("OUTPUT")
            .help("File to write output to. [default: stdout]")
            .required(false)
            .value_parser(value_parser!(PathBuf)))
        .arg(Arg::new("numeric_input")
            .short('n')
            .long("numeric-input")
            .action(ArgAction::SetTrue)
            .help("Read input as whitespace-separated decimal byte values instead of raw bytes."))
        .arg(Arg::new("print_memory")
            .short('m')
            .long("print-memory")
            .action(ArgAction::SetTrue)
            .help("Print the final tape to stderr after execution."))
        .arg(Arg::new("debug")
            .short('d')
            .long("debug")
            .action(ArgAction::SetTrue)
            .help("Trace execution to stderr."))
        .get_matches();

    set_debug(argv.get_flag("debug"));

    let Some(program) = argv.get_one::<PathBuf>("program").cloned() else {
        eprintln!("Error: no program file given.");
        exit(1);
    };

    let options = Options {
        program,
        input: argv.get_one::<PathBuf>("input").cloned(),
        output: argv.get_one::<PathBuf>("output").cloned(),
        numeric_input: argv.get_flag("numeric_input"),
        print_memory: argv.get_flag("print_memory"),
    };

    if let Err(err) = run(&options) {
        eprintln!("Error: {}", err);
        exit(1);
    }
}


struct Options {
    program: PathBuf,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    numeric_input: bool,
    print_memory: bool,
}

/// Read the program and open every other source first, so nothing runs and
/// no output file is touched unless all of them are usable.
fn run(options: &Options) -> Result<(), Error> {
    let program = fs::read(&options.program).map_err(|source| Error::ProgramUnreadable {
        path: options.program.clone(),
        source,
    })?;

    let input: Box<dyn BufRead> = match &options.input {
        Some(path) => Box::new(BufReader::new(open_input(path)?)),
        None => Box::new(io::stdin().lock()),
    };

    let output: Box<dyn Write> = match &options.output {
        Some(path) => Box::new(File::create(path).map_err(|source| Error::OutputUncreatable {
            path: path.clone(),
            source,
        })?),
        None => Box::new(io::stdout().lock()),
    };
    let output = BufWriter::new(output);

    if options.numeric_input {
        execute(&program[..], NumericInput::new(input), output, options.print_memory)
    } else {
        execute(&program[..], RawInput::new(input), output, options.print_memory)
    }
}

fn open_input(path: &Path) -> Result<File, Error> {
    File::open(path).map_err(|source| Error::InputUnreadable {
        path: path.to_path_buf(),
        source,
    })
}

fn execute<I: ByteSource, W: Write>(program: impl BufRead, input: I, output: W, print_memory: bool) -> Result<(), Error> {
    let mut interpreter = Interpreter::new(input, output);
    let result = interpreter.run(program);

    if print_memory {
        eprintln!("{}", interpreter.tape());
    }
    if debug_enabled() {
        eprintln!("read {} lines, {} commands; pointer at cell {} of {}",
            interpreter.lines_read(),
            interpreter.stream().len(),
            interpreter.tape().pointer(),
            interpreter.tape().len());
    }

    // flush whatever was written even if the run failed
    let flushed = interpreter.into_output();
    result?;
    flushed.map(|_| ())
}
