use std::env;
use std::fs;
use std::process::ExitCode;

use robots::{compile, diagnostics};

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("usage: robotsc <grid-file> [-o <output>]");
        return ExitCode::FAILURE;
    }

    let input_path = &args[1];
    let output_path = args
        .iter()
        .position(|a| a == "-o")
        .and_then(|i| args.get(i + 1))
        .cloned()
        .unwrap_or_else(|| format!("{input_path}.jed"));

    let source = match fs::read_to_string(input_path) {
        Ok(source) => source,
        Err(err) => {
            diagnostics::error(format!("reading {input_path}: {err}"));
            return ExitCode::FAILURE;
        }
    };

    let image = match compile(&source) {
        Ok(image) => image,
        Err(err) => {
            diagnostics::error(err);
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = fs::write(&output_path, &image) {
        diagnostics::error(format!("writing {output_path}: {err}"));
        return ExitCode::FAILURE;
    }

    diagnostics::info(format!(
        "compiled {input_path} -> {output_path} ({} bytes)",
        image.len()
    ));
    ExitCode::SUCCESS
}
