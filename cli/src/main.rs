use std::path::PathBuf;
use std::rc::Rc;
use std::{fs, process};

use clap::Parser;
use tracing::{debug, info};

use amber_eval::{Runtime, Value};
use amber_wrap::{PersistedClosure, WrappedClosure};

mod assignment;
mod repl;

#[derive(Parser)]
struct Args {
    /// Path to a script to evaluate
    script: Option<PathBuf>,

    /// Evaluate the given expression instead of a script file
    #[clap(long, short = 'E')]
    expr: Option<String>,

    /// Wrap the closure the script evaluates to and write its
    /// persisted JSON form to this path
    #[clap(long, requires = "script")]
    freeze: Option<PathBuf>,

    /// Reconstruct a closure from a persisted JSON file
    #[clap(long, conflicts_with_all = ["script", "expr"])]
    thaw: Option<PathBuf>,

    /// Arguments to apply the thawed closure to, as Amber expressions
    #[clap(long = "call", requires = "thaw", num_args = 1..)]
    call: Vec<String>,

    /// Print "raw" (unquoted) output
    #[clap(long)]
    raw: bool,
}

fn println_result(result: &Value, raw: bool) {
    if raw {
        match result {
            Value::String(s) => println!("{}", s),
            other => println!("{}", other),
        }
    } else {
        println!("{}", result)
    }
}

/// Interprets the given code snippet, printing out errors and the
/// result itself. The return value indicates whether evaluation
/// succeeded.
fn interpret(runtime: &Runtime, code: &str, path: Option<PathBuf>, args: &Args) -> bool {
    match runtime.evaluate(code, path) {
        Ok(result) => {
            println_result(&result, args.raw);
            true
        }

        Err(err) => {
            eprintln!("{}", err.fancy_format_str(&runtime.source_map()));
            false
        }
    }
}

fn run_file(mut path: PathBuf, args: &Args) {
    if path.is_dir() {
        path.push("main.amb");
    }
    let contents = fs::read_to_string(&path).expect("failed to read the input file");
    debug!(path = %path.display(), "evaluating script");

    let runtime = Rc::new(Runtime::new());

    match &args.freeze {
        None => {
            if !interpret(&runtime, &contents, Some(path), args) {
                process::exit(1);
            }
        }

        Some(out) => {
            if let Err(err) = freeze(&runtime, &contents, path, out) {
                eprintln!("{}", err);
                process::exit(1);
            }
        }
    }
}

/// Evaluate the script, wrap the closure it produces and write the
/// persisted form to `out`.
fn freeze(
    runtime: &Rc<Runtime>,
    code: &str,
    path: PathBuf,
    out: &PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let value = runtime
        .evaluate(code, Some(path))
        .map_err(|err| err.fancy_format_str(&runtime.source_map()))?;

    let wrapper = WrappedClosure::wrap(runtime, value)?;
    fs::write(out, wrapper.persist().to_json()?)?;

    info!(path = %out.display(), "froze closure");
    eprintln!("froze {} captured variable(s) to {}", wrapper.used_variables().len(), out.display());
    Ok(())
}

/// Reconstruct a closure from a persisted JSON file and, if `--call`
/// arguments were given, apply it to them.
fn thaw(path: &PathBuf, args: &Args) {
    let result = (|| -> Result<(), Box<dyn std::error::Error>> {
        let form = PersistedClosure::from_json(&fs::read_to_string(path)?)?;

        let runtime = Rc::new(Runtime::new());
        let wrapper = WrappedClosure::from_persisted(&runtime, &form)?;
        debug!(code = wrapper.code(), "reconstructed closure");

        if args.call.is_empty() {
            println_result(wrapper.closure(), args.raw);
            return Ok(());
        }

        let call_args = args
            .call
            .iter()
            .map(|expr| {
                runtime
                    .evaluate(expr, None)
                    .map_err(|err| err.fancy_format_str(&runtime.source_map()).into())
            })
            .collect::<Result<Vec<_>, Box<dyn std::error::Error>>>()?;

        let result = wrapper
            .invoke(call_args)
            .map_err(|err| err.fancy_format_str(&runtime.source_map()))?;
        println_result(&result, args.raw);
        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("{}", err);
        process::exit(1);
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_env_var("AMBER_LOG")
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Some(path) = &args.thaw {
        thaw(path, &args);
    } else if let Some(file) = &args.script {
        run_file(file.clone(), &args);
    } else if let Some(expr) = &args.expr {
        let runtime = Runtime::new();
        if !interpret(&runtime, expr, None, &args) {
            process::exit(1);
        }
    } else {
        repl::run_prompt(&args);
    }
}
