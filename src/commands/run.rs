use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use clap::Args;
use tapebf::cli_util::print_execution_error;
use tapebf::config::Settings;
use tapebf::{trace, Interpreter, OutputEncoding};
use tracing_subscriber::EnvFilter;

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct RunArgs {
    /// Log interpreter state before each instruction to stderr
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// How '.' renders a cell (fallback TAPEBF_OUTPUT, then config file; default byte)
    #[arg(long = "output", value_name = "ENC", value_enum)]
    pub output: Option<OutputEncoding>,

    /// Read the program from PATH instead of positional "<code>"
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Concatenated program parts
    #[arg(value_name = "code", trailing_var_arg = true, allow_hyphen_values = true)]
    pub code: Vec<String>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

pub fn run(program: &str, args: RunArgs) -> i32 {
    if args.help {
        usage_and_exit(program, 0);
    }

    let RunArgs {
        debug,
        output,
        file,
        code,
        ..
    } = args;

    if file.is_none() && code.is_empty() {
        usage_and_exit(program, 2);
    }

    if file.is_some() && !code.is_empty() {
        eprintln!("{program}: cannot use positional code together with --file");
        usage_and_exit(program, 2);
    }

    // Resolve settings: flags -> env -> config file -> defaults
    let (settings, warnings) = Settings::load();
    let debug = debug || settings.debug;
    let encoding = output.unwrap_or(settings.output);

    init_logging(debug);
    for w in warnings {
        tracing::warn!("{w}");
    }

    let code_bytes = if let Some(path) = file {
        match fs::read(&path) {
            Ok(b) => b,
            Err(e) => {
                eprintln!("{program}: failed to read program file {}: {e}", path.display());
                let _ = io::stderr().flush();
                return 1;
            }
        }
    } else {
        code.join("").into_bytes()
    };

    // Programs such as "+[]" never halt; make ctrl+c leave cleanly.
    if let Err(e) = ctrlc::set_handler(|| {
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();
        std::process::exit(130);
    }) {
        tracing::warn!(error = %e, "failed to set ctrl+c handler");
    }

    let mut bf = Interpreter::new().with_encoding(encoding);
    if debug {
        bf.set_tracer(trace::log_event);
    }
    bf.load(code_bytes.as_slice());
    tracing::debug!(bytes = code_bytes.len(), %encoding, "program loaded");

    match bf.execute() {
        Ok(()) => {
            tracing::debug!(tape_len = bf.tape().len(), "program finished");
            0
        }
        Err(err) => {
            print_execution_error(Some(program), &code_bytes, &err);
            1
        }
    }
}

/// Log to stderr; stdout carries program output only.
fn init_logging(debug: bool) {
    let default_filter = if debug { "tapebf=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .without_time()
        .try_init();
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} run [--debug|-d] [--output byte|codepoint] "<code>"
  {0} run [--debug|-d] [--output byte|codepoint] --file <PATH>

Options:
  --file,   -f <PATH>  Read the program from PATH instead of positional "<code>"
  --debug,  -d         Log interpreter state before each instruction to stderr
  --output <ENC>       Render '.' as a raw byte (default) or a UTF-8 code point
  --help,   -h         Show this help

Notes:
- Input (`,`) reads a single byte from stdin; end of input is an error.
- Characters outside of ><+-.,[] are ignored.
- Settings fall back to TAPEBF_OUTPUT / TAPEBF_DEBUG, then the config file
  ($TAPEBF_CONFIG or tapebf.toml in the XDG config directory).

Examples:
- Load a program from a file:
    {0} run --file ./program.bf
- Echo the first byte of a file:
    {0} run ",." < input.txt
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}
