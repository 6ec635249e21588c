use clap::value_parser;
use clap::{Arg, ArgAction, ArgMatches, Command};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::path::Path;
use tracing::{debug, info, Level};

use heexfmt::formatting::{self, Expressions, External, Identity, Passthrough, Render, Terminal};
use heexfmt::language::*;
use heexfmt::parsing;

mod problem;

fn main() {
    const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

    let matches = Command::new("heexfmt")
        .version(VERSION)
        .propagate_version(true)
        .about("A canonical formatter for HEEx templates.")
        .disable_help_subcommand(true)
        .arg(
            Arg::new("debug")
                .long("debug")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log what the tokenizer and formatter are doing to standard error."),
        )
        .subcommand(
            Command::new("format")
                .about("Code format the given template")
                .arg(width())
                .arg(tokens())
                .arg(expression_formatter())
                .arg(
                    Arg::new("write")
                        .short('w')
                        .long("write")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("raw-control-chars")
                        .help("Rewrite the file in place instead of printing the result."),
                )
                .arg(
                    Arg::new("raw-control-chars")
                        .short('R')
                        .long("raw-control-chars")
                        .action(ArgAction::SetTrue)
                        .help("Emit ANSI escape codes for syntax highlighting even if output is redirected to a pipe or file."),
                )
                .arg(filename("The file containing the template you want to format, or - for standard input.")),
        )
        .subcommand(
            Command::new("check")
                .about("Check that the given template is already formatted")
                .arg(width())
                .arg(expression_formatter())
                .arg(filename("The file containing the template you want to check.")),
        )
        .subcommand(
            Command::new("tokens")
                .about("Print the tokens of the given template as JSON")
                .arg(filename("The file containing the template you want to tokenize.")),
        )
        .get_matches();

    let level = if matches.get_flag("debug") {
        Level::DEBUG
    } else {
        Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting heexfmt");

    match matches.subcommand() {
        Some(("format", submatches)) => {
            let filename = Path::new(required(submatches, "filename"));
            let options = options(submatches);
            let expressions = expressions(submatches);
            let tokens = read(filename, submatches.get_flag("tokens"));

            if submatches.get_flag("write") {
                if filename.to_str() == Some("-") {
                    fail(&format!(
                        "{}: {}",
                        "error".bright_red(),
                        "Cannot write standard input in place".bold()
                    ));
                }

                let result = render(&Identity, &tokens, expressions.as_ref(), &options, filename);

                if let Err(error) = std::fs::write(filename, result) {
                    debug!(?error);
                    let error = LoadingError {
                        problem: "Failed writing".to_string(),
                        details: error
                            .kind()
                            .to_string(),
                        filename,
                    };
                    fail(&problem::concise_loading_error(&error));
                }
                return;
            }

            let raw_output = submatches.get_flag("raw-control-chars");
            let result = if raw_output || std::io::stdout().is_terminal() {
                render(&Terminal, &tokens, expressions.as_ref(), &options, filename)
            } else {
                render(&Identity, &tokens, expressions.as_ref(), &options, filename)
            };

            print!("{}", result);
        }
        Some(("check", submatches)) => {
            let filename = Path::new(required(submatches, "filename"));
            let options = options(submatches);
            let expressions = expressions(submatches);

            let content = load(filename);
            let tokens = tokenize(filename, &content);
            let result = render(&Identity, &tokens, expressions.as_ref(), &options, filename);

            if result != content {
                eprintln!(
                    "{}: {}: {}",
                    "warning".bright_yellow(),
                    filename.to_string_lossy(),
                    "not in canonical form".bold()
                );
                std::process::exit(1);
            }
        }
        Some(("tokens", submatches)) => {
            let filename = Path::new(required(submatches, "filename"));
            let content = load(filename);
            let tokens = tokenize(filename, &content);

            match parsing::encode(&tokens) {
                Ok(json) => println!("{}", json),
                Err(error) => fail(&format!("{}: {}", "error".bright_red(), error)),
            }
        }
        Some(_) => {
            println!("No valid subcommand was used")
        }
        None => {
            println!("usage: heexfmt [COMMAND] ...");
            println!("Try '--help' for more information.");
        }
    }
}

fn width() -> Arg {
    Arg::new("width")
        .long("width")
        .value_parser(value_parser!(usize))
        .default_value("98")
        .help("The line length beyond which the attributes of a tag are wrapped one per line.")
}

fn tokens() -> Arg {
    Arg::new("tokens")
        .long("tokens")
        .action(ArgAction::SetTrue)
        .help("Treat the input as a stream of tokens in JSON, as printed by the tokens command.")
}

fn expression_formatter() -> Arg {
    Arg::new("expression-formatter")
        .long("expression-formatter")
        .value_name("COMMAND")
        .help("A program that reads embedded code on standard input and writes it back formatted. The line length is exported to it as LINE_LENGTH.")
}

fn filename(help: &'static str) -> Arg {
    Arg::new("filename")
        .required(true)
        .help(help)
}

fn required<'a>(submatches: &'a ArgMatches, id: &str) -> &'a str {
    match submatches.get_one::<String>(id) {
        Some(value) => value.as_str(),
        None => fail(&format!("{}: missing argument {}", "error".bright_red(), id)),
    }
}

fn options(submatches: &ArgMatches) -> Options {
    match submatches.get_one::<usize>("width") {
        Some(width) => Options::with_line_length(*width),
        None => Options::default(),
    }
}

fn expressions(submatches: &ArgMatches) -> Box<dyn Expressions> {
    match submatches.get_one::<String>("expression-formatter") {
        Some(command) => {
            debug!("Using expression formatter {}", command);
            Box::new(External::new(command))
        }
        None => Box::new(Passthrough),
    }
}

fn load(filename: &Path) -> String {
    match parsing::load(filename) {
        Ok(content) => content,
        Err(error) => fail(&problem::concise_loading_error(&error)),
    }
}

fn tokenize(filename: &Path, content: &str) -> Vec<Token> {
    match parsing::parse(content) {
        Ok(tokens) => tokens,
        Err(error) => {
            if std::io::stderr().is_terminal() {
                fail(&problem::full_parsing_error(&error, filename, content, &Terminal))
            } else {
                fail(&problem::concise_parsing_error(&error, filename, content))
            }
        }
    }
}

fn decode(filename: &Path, content: &str) -> Vec<Token> {
    match parsing::decode(content) {
        Ok(tokens) => tokens,
        Err(error) => fail(&format!(
            "{}: {}:{}:{} {}",
            "error".bright_red(),
            filename.to_string_lossy(),
            error.line(),
            error.column(),
            "Invalid token stream".bold()
        )),
    }
}

fn read(filename: &Path, tokens: bool) -> Vec<Token> {
    let content = load(filename);
    if tokens {
        decode(filename, &content)
    } else {
        tokenize(filename, &content)
    }
}

fn render(
    renderer: &impl Render,
    tokens: &[Token],
    expressions: &dyn Expressions,
    options: &Options,
    filename: &Path,
) -> String {
    match formatting::render(renderer, tokens, expressions, options) {
        Ok(text) => text,
        Err(error) => {
            debug!(?error);
            fail(&problem::concise_formatting_error(&error, filename))
        }
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}
