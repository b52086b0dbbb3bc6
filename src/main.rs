use std::fs::File;
use std::io::{self, Cursor, Read};
use std::process::ExitCode;

use slisp::{Interpreter, InterpreterError, ParseError};

const USAGE: &str = "usage: slisp [FILE | -e EXPRESSION]";

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (source_name, reader): (String, Box<dyn Read>) = match args.as_slice() {
        [] => ("<stdin>".to_string(), Box::new(io::stdin())),
        [flag, expression] if flag == "-e" => (
            "<expression>".to_string(),
            Box::new(Cursor::new(expression.clone())),
        ),
        [path] if !path.starts_with('-') => match File::open(path) {
            Ok(file) => (path.clone(), Box::new(file)),
            Err(err) => {
                eprintln!("Error: could not read {}: {}", path, err);
                return ExitCode::FAILURE;
            }
        },
        _ => {
            eprintln!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    };

    let mut interp = Interpreter::new();
    match interp.parse_reader(reader) {
        Ok(()) => {}
        Err(InterpreterError::Io(err)) => {
            eprintln!("Error: could not read {}: {}", source_name, err);
            return ExitCode::FAILURE;
        }
        Err(InterpreterError::Parse { error, program }) => {
            report_parse_error(&error, &source_name, &program);
            return ExitCode::from(1);
        }
    }

    match interp.try_eval() {
        Ok(result) => {
            println!("{}", result);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::from(2)
        }
    }
}

fn report_parse_error(err: &ParseError, source_name: &str, program: &str) {
    log::debug!("parse failed: {:?}", err);
    if let Err(io_err) = err.pretty_print(source_name, program) {
        log::warn!("could not render diagnostic: {}", io_err);
    }
    eprintln!("Error: invalid syntax");
}
