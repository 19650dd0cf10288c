use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use sable::errors::{Diagnostic, DiagnosticSink, Reporter};
use sable::options::{AnalyzerOptions, BuildOptions, DEFAULT_RUNTIME_LIBRARY};
use sable::parser::{self, tokenize};
use sable::source::InputSpanFile;
use sable::Driver;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const VERSION: &'static str = env!("CARGO_PKG_VERSION");

/// Environment variable holding the log filter.
const LOG_ENV_VAR: &str = "SABLE_LOG";

pub struct Config {
    pub source_path: String,

    /// The expected compiler behavior.
    pub target: Target,

    /// Compile without the prelude.
    pub no_prelude: bool,

    /// Log compilation progress.
    pub verbose: bool,

    /// A flag for integration tests: this allows to better capture output. There is
    /// no way to set it through command-line.
    pub plaintext_diagnostics: bool,
}

/// Expected result of running the compiler.
pub enum Target {
    /// Run all checks without generating code.
    Check,

    /// Compile the program and write the assembly listing to disk.
    Build {
        /// Output path without extension. Defaults to the source path.
        output: Option<String>,
        runtime_library: String,
    },

    /// Print the token stream.
    Tokens,

    /// Print the syntax tree.
    Ast,
}

impl Config {
    pub fn new() -> Config {
        let program = || {
            Arg::with_name("PROGRAM")
                .help("Path to the Sable program")
                .required(true)
                .index(1)
        };

        let matches = App::new("sable")
            .version(VERSION)
            .about("Compiler front-end for the Sable language")
            .setting(AppSettings::SubcommandRequiredElseHelp)
            .arg(
                Arg::with_name("no-prelude")
                    .long("--no-prelude")
                    .help("Do not load the prelude")
                    .global(true),
            )
            .arg(
                Arg::with_name("verbose")
                    .short("v")
                    .long("--verbose")
                    .help("Log compilation progress")
                    .global(true),
            )
            .subcommand(
                SubCommand::with_name("check")
                    .about("Checks the program for errors without generating code")
                    .arg(program()),
            )
            .subcommand(
                SubCommand::with_name("build")
                    .about("Compiles the program into an assembly listing")
                    .arg(program())
                    .arg(
                        Arg::with_name("output")
                            .short("o")
                            .long("--output")
                            .takes_value(true)
                            .help("Path of the produced assembly, without extension"),
                    )
                    .arg(
                        Arg::with_name("runtime")
                            .long("--runtime")
                            .takes_value(true)
                            .help("Runtime library referenced by the assembly"),
                    ),
            )
            .subcommand(
                SubCommand::with_name("tools")
                    .about("Various language-level tools most useful for Sable devs")
                    .setting(AppSettings::SubcommandRequiredElseHelp)
                    .subcommand(
                        SubCommand::with_name("tokens")
                            .about("Displays the tokens produced by the lexer")
                            .arg(program()),
                    )
                    .subcommand(
                        SubCommand::with_name("ast")
                            .about("Displays the AST obtained from the parser")
                            .arg(program()),
                    ),
            )
            .get_matches();

        let config_from_leaf_matches = |matches: &ArgMatches, target| Config {
            source_path: matches.value_of("PROGRAM").unwrap().to_string(),
            no_prelude: matches.is_present("no-prelude"),
            verbose: matches.is_present("verbose"),
            plaintext_diagnostics: false,
            target,
        };

        match matches.subcommand() {
            ("check", Some(matches)) => config_from_leaf_matches(matches, Target::Check),
            ("build", Some(matches)) => config_from_leaf_matches(
                matches,
                Target::Build {
                    output: matches.value_of("output").map(String::from),
                    runtime_library: matches
                        .value_of("runtime")
                        .unwrap_or(DEFAULT_RUNTIME_LIBRARY)
                        .to_string(),
                },
            ),
            ("tools", Some(matches)) => match matches.subcommand() {
                ("tokens", Some(matches)) => config_from_leaf_matches(matches, Target::Tokens),
                ("ast", Some(matches)) => config_from_leaf_matches(matches, Target::Ast),
                _ => unreachable!(),
            },
            _ => unreachable!(),
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum RunResult {
    Ok,
    CompilerError,
    IoError,
}

/// Installs the global log subscriber. `SABLE_LOG` takes precedence unless `verbose` is set.
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // Fails only if a subscriber is already installed, e.g. by an earlier test.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Executes the configured action.
pub fn run(config: Config) -> RunResult {
    let source_code = match fs::read_to_string(&config.source_path) {
        Ok(source_code) => source_code,
        Err(error) => {
            eprintln!(
                "Error while reading the source file:\n{}",
                error.to_string()
            );
            return RunResult::IoError;
        }
    };

    let reporter = TerminalReporter {
        file_name: config.source_path.clone(),
        source_code: source_code.clone(),
        plaintext: config.plaintext_diagnostics,
    };
    let mut sink = DiagnosticSink::with_reporter(Box::new(reporter));
    let analyzer_options = AnalyzerOptions {
        no_prelude: config.no_prelude,
    };

    match config.target {
        Target::Tokens => {
            for token in tokenize(&source_code, InputSpanFile::UserProgram) {
                let position = token.span.position();
                println!(
                    "{}:{}\t{}\t{}",
                    position.line, position.column, token.payload, token.lexeme
                );
            }
            RunResult::Ok
        }
        Target::Ast => {
            match parser::parse(tokenize(&source_code, InputSpanFile::UserProgram)) {
                Ok(program) => {
                    println!("{:#?}", program);
                    RunResult::Ok
                }
                Err(errors) => {
                    for error in &errors {
                        sink.push(sable::errors::syntax_error(error));
                    }
                    sink.flush();
                    RunResult::CompilerError
                }
            }
        }
        Target::Check => {
            let mut driver = Driver::new(analyzer_options, BuildOptions::default());
            match driver.compile(&source_code, &mut sink) {
                Ok(_) => {
                    info!(warnings = sink.warning_count(), "no errors found");
                    RunResult::Ok
                }
                Err(()) => RunResult::CompilerError,
            }
        }
        Target::Build {
            output,
            runtime_library,
        } => {
            let output_path = output_path(&config.source_path, output.as_deref());
            let output_name = output_path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| String::from("main"));

            let build_options = BuildOptions::new(runtime_library, output_name);
            let mut driver = Driver::new(analyzer_options, build_options);
            let artifact = match driver.compile(&source_code, &mut sink) {
                Ok(artifact) => artifact,
                Err(()) => return RunResult::CompilerError,
            };

            match fs::write(&output_path, &artifact.image) {
                Ok(()) => {
                    debug!(path = %output_path.display(), bytes = artifact.image.len(), "wrote assembly");
                    RunResult::Ok
                }
                Err(error) => {
                    eprintln!(
                        "Error while writing {}:\n{}",
                        output_path.display(),
                        error.to_string()
                    );
                    RunResult::IoError
                }
            }
        }
    }
}

/// Path of the assembly listing: `output` if given, the source path otherwise, with an `il`
/// extension.
fn output_path(source_path: &str, output: Option<&str>) -> PathBuf {
    Path::new(output.unwrap_or(source_path)).with_extension("il")
}

/// Renders diagnostics to the terminal.
struct TerminalReporter {
    file_name: String,
    source_code: String,
    plaintext: bool,
}

impl Reporter for TerminalReporter {
    fn render(&mut self, diagnostics: &[Diagnostic]) {
        if !self.plaintext {
            let mut files = SimpleFiles::new();
            let user_program_id = files.add(self.file_name.as_str(), self.source_code.as_str());
            let prelude_id = files.add("prelude.sbl", sable::stdlib::PRELUDE_SOURCE);

            let writer = StandardStream::stderr(ColorChoice::Auto);
            let config = codespan_reporting::term::Config::default();

            for diagnostic in diagnostics {
                codespan_reporting::term::emit(
                    &mut writer.lock(),
                    &config,
                    &files,
                    &diagnostic.to_codespan(user_program_id, prelude_id),
                )
                .unwrap();
            }
        } else {
            for diagnostic in diagnostics {
                println!("{}", diagnostic);
            }
        }
    }
}
