use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

use rustyline::{error::ReadlineError, Editor};
use smol_str::SmolStr;

use amber_eval::{Runtime, Value};
use amber_wrap::WrappedClosure;

use crate::assignment::Assignment;
use crate::Args;

fn state_dir() -> Option<PathBuf> {
    let mut path = dirs::data_dir();
    if let Some(p) = path.as_mut() {
        p.push("amber")
    }
    path
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ReplCommand<'a> {
    Expr(&'a str),
    Assign(Assignment<'a>),
    Code(&'a str),
    Vars(&'a str),
    Freeze(&'a str),
    Quit,
    Help,
}

impl<'a> ReplCommand<'a> {
    const HELP: &'static str = "
Welcome to the Amber REPL!

The following commands are supported:

  <expr>       Evaluate an Amber expression and print the result
  <x> = <expr> Bind the result of an expression to a variable
  :c <expr>    Evaluate to a closure and print its literal source text
  :v <expr>    Evaluate to a closure and print its captured variables
  :f <expr>    Evaluate to a closure and print its persisted JSON form
  :q           Exit the REPL
  :?, :h       Display this help text
";

    fn parse(input: &'a str) -> Self {
        if input.starts_with(':') {
            if let Some(without_prefix) = input.strip_prefix(":c ") {
                return Self::Code(without_prefix);
            } else if let Some(without_prefix) = input.strip_prefix(":v ") {
                return Self::Vars(without_prefix);
            } else if let Some(without_prefix) = input.strip_prefix(":f ") {
                return Self::Freeze(without_prefix);
            }

            match input.trim_end() {
                ":q" => return Self::Quit,
                ":h" | ":?" => return Self::Help,
                _ => {}
            }
        }

        if let Some(assignment) = Assignment::parse(input) {
            return Self::Assign(assignment);
        }

        Self::Expr(input)
    }
}

struct Repl {
    rl: Editor<()>,
    runtime: Rc<Runtime>,

    /// Local variables defined at the top-level in the repl
    env: HashMap<SmolStr, Value>,
}

impl Repl {
    fn new() -> Self {
        let rl = Editor::<()>::new().expect("should be able to launch rustyline");
        Self {
            rl,
            runtime: Rc::new(Runtime::new()),
            env: HashMap::new(),
        }
    }

    fn evaluate(&self, code: &str) -> Option<Value> {
        let bindings: Vec<_> = self
            .env
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        match self.runtime.evaluate_with(code, None, &bindings) {
            Ok(value) => Some(value),
            Err(err) => {
                eprintln!("{}", err.fancy_format_str(&self.runtime.source_map()));
                None
            }
        }
    }

    fn wrap(&self, code: &str) -> Option<WrappedClosure> {
        let value = self.evaluate(code)?;
        match WrappedClosure::wrap(&self.runtime, value) {
            Ok(wrapper) => Some(wrapper),
            Err(err) => {
                eprintln!("error: {}", err);
                None
            }
        }
    }

    fn run(&mut self, args: &Args) {
        let history_path = match state_dir() {
            // Attempt to set up these paths, but do not hard fail if
            // it doesn't work.
            Some(mut path) => {
                let _ = std::fs::create_dir_all(&path);
                path.push("history.txt");
                let _ = self.rl.load_history(&path);
                Some(path)
            }

            None => None,
        };

        loop {
            let readline = self.rl.readline("amber> ");
            match readline {
                Ok(line) => {
                    if line.is_empty() {
                        continue;
                    }

                    match ReplCommand::parse(&line) {
                        ReplCommand::Quit => break,
                        ReplCommand::Help => println!("{}", ReplCommand::HELP),

                        ReplCommand::Expr(input) => {
                            if let Some(value) = self.evaluate(input) {
                                match value {
                                    Value::String(ref s) if args.raw => println!("{}", s),
                                    value => println!("{}", value),
                                }
                            }
                        }

                        ReplCommand::Assign(Assignment { ident, value }) => {
                            if let Some(value) = self.evaluate(value) {
                                self.env.insert(ident.into(), value);
                            }
                        }

                        ReplCommand::Code(input) => {
                            if let Some(wrapper) = self.wrap(input) {
                                println!("{}", wrapper.code());
                            }
                        }

                        ReplCommand::Vars(input) => {
                            if let Some(wrapper) = self.wrap(input) {
                                for (name, captured) in wrapper.used_variables() {
                                    let nested = wrapper.nested_names().contains(name);
                                    println!(
                                        "{} = {}{}",
                                        name,
                                        captured.value(),
                                        if nested { " (nested closure)" } else { "" },
                                    );
                                }
                            }
                        }

                        ReplCommand::Freeze(input) => {
                            if let Some(wrapper) = self.wrap(input) {
                                match wrapper.persist().to_json() {
                                    Ok(json) => println!("{}", json),
                                    Err(err) => eprintln!("error: {}", err),
                                }
                            }
                        }
                    }

                    self.rl.add_history_entry(&line);
                }

                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,

                Err(err) => {
                    eprintln!("error: {}", err);
                    break;
                }
            }
        }

        if let Some(path) = history_path {
            let _ = self.rl.save_history(&path);
        }
    }
}

pub(crate) fn run_prompt(args: &Args) {
    Repl::new().run(args)
}
