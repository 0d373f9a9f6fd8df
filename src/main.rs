/// Main entry point for the thicket interpreter.
///
/// Usage:
///   thicket <file.thicket>            Run a program, print the emitted forest
///   thicket <file.thicket> -d         Run with evaluator debug tracing

use std::env;
use std::fs;
use std::path::Path;
use std::process;

use thicket_lang::{Interpreter, Lexer, Parser};

fn main() {
    let args: Vec<String> = env::args().collect();

    let filename = match args.get(1) {
        Some(filename) => filename,
        None => {
            eprintln!("usage: thicket <file.thicket> [-d|--debug]");
            process::exit(1);
        }
    };

    let debug = args.iter().any(|a| a == "-d" || a == "--debug");

    let source = match fs::read_to_string(filename) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("error reading '{filename}': {e}");
            process::exit(1);
        }
    };

    let tokens = match Lexer::new(&source).tokenize() {
        Ok(tokens) => tokens,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    let program = match Parser::new(tokens).parse_program() {
        Ok(program) => program,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    if debug {
        eprintln!("{program:#?}");
    }

    let base_dir = Path::new(filename)
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let mut interpreter = Interpreter::with_base_dir(base_dir);
    interpreter.set_debug(debug);
    match interpreter.run(&program, &[]) {
        Ok(forest) => print!("{forest}"),
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    }
}
