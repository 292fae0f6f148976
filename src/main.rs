use std::{env, fs, path::PathBuf, process::ExitCode, rc::Rc, time::Instant};

use stackc::{
    compiler::compiler::compile,
    lexer::lexer::tokenize,
    options::{is_identifier, CompileOptions},
    parser::parser::parse, render_error, type_checker::type_checker::type_check,
};

struct Args {
    input: PathBuf,
    output: Option<PathBuf>,
    options: CompileOptions,
}

const USAGE: &str = "usage: stackc <input> [-o <output.wat>] [--strict] [--entry <name>]";

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut input = None;
    let mut output = None;
    let mut options = CompileOptions::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-o" => {
                let path = iter.next().ok_or("`-o` needs a path")?;
                output = Some(PathBuf::from(path));
            }
            "--strict" => options = options.with_auto_declare(false),
            "--entry" => {
                let name = iter.next().ok_or("`--entry` needs a name")?;
                if !is_identifier(name) {
                    return Err(format!("`--entry` name `{}` is not an identifier", name));
                }
                options = options.with_entry_name(name.as_str());
            }
            flag if flag.starts_with('-') => return Err(format!("unknown flag `{}`", flag)),
            path if input.is_none() => input = Some(PathBuf::from(path)),
            extra => return Err(format!("unexpected argument `{}`", extra)),
        }
    }

    Ok(Args {
        input: input.ok_or("no input file given")?,
        output,
        options,
    })
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    let args = match parse_args(&args) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}\n{}", message, USAGE);
            return ExitCode::FAILURE;
        }
    };

    let file_name = args
        .input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.input.to_string_lossy().into_owned());

    let source = match fs::read_to_string(&args.input) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Failed to read {}: {}", args.input.display(), error);
            return ExitCode::FAILURE;
        }
    };

    let start = Instant::now();

    let tokens = match tokenize(source.clone(), Some(file_name.clone())) {
        Ok(tokens) => tokens,
        Err(error) => {
            eprint!("{}", render_error(&error, &source, &file_name));
            return ExitCode::FAILURE;
        }
    };
    eprintln!("Tokenized in {:?}", start.elapsed());

    let parse_start = Instant::now();
    let (_, program) = parse(tokens, Rc::new(file_name.clone()));
    let program = match program {
        Ok(program) => program,
        Err(error) => {
            eprint!("{}", render_error(&error, &source, &file_name));
            return ExitCode::FAILURE;
        }
    };
    eprintln!("Parsed in {:?}", parse_start.elapsed());

    let type_check_start = Instant::now();
    let typed = match type_check(&program, &args.options) {
        Ok(typed) => typed,
        Err(error) => {
            eprint!("{}", render_error(&error, &source, &file_name));
            return ExitCode::FAILURE;
        }
    };
    eprintln!("Type checked in {:?}", type_check_start.elapsed());

    let compile_start = Instant::now();
    let module = match compile(&typed, &args.options) {
        Ok(module) => module,
        Err(error) => {
            eprint!("{}", render_error(&error, &source, &file_name));
            return ExitCode::FAILURE;
        }
    };
    eprintln!("Compiled in {:?}", compile_start.elapsed());

    match &args.output {
        Some(path) => {
            if let Err(error) = fs::write(path, &module) {
                eprintln!("Failed to write {}: {}", path.display(), error);
                return ExitCode::FAILURE;
            }
            eprintln!("Wrote {}", path.display());
        }
        None => print!("{}", module),
    }

    eprintln!("Total time: {:?}", start.elapsed());
    ExitCode::SUCCESS
}
