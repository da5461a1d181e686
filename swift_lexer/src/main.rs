use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;
use std::sync::Arc;
use swift_lexer::lexical::LexerTables;
use swift_lexer::report::{self, ReportFormat};
use swift_lexer::{batch, logging, pipeline, PipelineError};

/// Files listed individually after a batch; the rest are counted
const LISTED_FILES: usize = 10;

#[derive(Debug)]
struct CliOptions {
    input: Option<PathBuf>,
    help: bool,
    batch: batch::BatchConfig,
    format: ReportFormat,
    vocabulary: Option<PathBuf>,
}

fn main() -> ExitCode {
    if let Err(error) = logging::init_global_logging().and_then(|()| pipeline::validate_pipeline()) {
        eprintln!("error: {}", error);
        return ExitCode::FAILURE;
    }

    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());
    let options = parse_options(args);

    if options.help {
        print!("{}", usage(&program));
        return ExitCode::SUCCESS;
    }
    let Some(input) = options.input.as_deref() else {
        eprint!("{}", usage(&program));
        return ExitCode::FAILURE;
    };

    let tables = match pipeline::load_tables(options.vocabulary.as_deref()) {
        Ok(tables) => tables,
        Err(error) => {
            eprintln!("error[{}]: {}", error.error_code(), error);
            return ExitCode::FAILURE;
        }
    };

    let succeeded = if input.is_dir() {
        lex_directory(input, &options.batch, tables)
    } else {
        lex_file(input, tables, options.format)
    };
    logging::print_cargo_style_summary();

    if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn usage(program: &str) -> String {
    format!(
        "swift_lexer {version}
Line-oriented lexical analysis of Swift sources

USAGE:
    {program} <file.swift> [options]    print every token and invalid fragment
    {program} <directory> [options]     lex every .swift file below the directory

OPTIONS:
    --help              Show this message
    --json              Print the single-file report as JSON
    --vocab DIR         Load keywords.txt and operators.txt from DIR
    --sequential        Lex on the calling thread only
    --threads N         Worker threads for a directory (default: available cores, max 8)
    --no-recursive      Only lex files directly inside the directory
    --max-files N       Stop discovery after N files
    --fail-fast         Stop a directory run at the first failed file
    --quiet             No per-file progress lines

EXAMPLES:
    {program} Sources/App/main.swift
    {program} Sources/ --threads 4 --fail-fast
    {program} main.swift --json --vocab vocab/
",
        version = env!("CARGO_PKG_VERSION"),
        program = program,
    )
}

/// Unknown flags and bad values are reported and skipped
fn parse_options<I>(args: I) -> CliOptions
where
    I: IntoIterator<Item = String>,
{
    let mut options = CliOptions {
        input: None,
        help: false,
        batch: batch::BatchConfig {
            progress_reporting: true,
            ..batch::BatchConfig::default()
        },
        format: ReportFormat::Text,
        vocabulary: None,
    };

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => options.help = true,
            "--json" => options.format = ReportFormat::Json,
            "--vocab" => options.vocabulary = value(&mut args, "--vocab"),
            "--sequential" => options.batch.max_threads = 1,
            "--threads" => {
                if let Some(threads) = value::<usize>(&mut args, "--threads") {
                    options.batch.max_threads = threads.max(1);
                }
            }
            "--no-recursive" => options.batch.recursive = false,
            "--max-files" => {
                if let Some(max_files) = value(&mut args, "--max-files") {
                    options.batch.max_files = Some(max_files);
                }
            }
            "--fail-fast" => options.batch.fail_fast = true,
            "--quiet" => options.batch.progress_reporting = false,
            flag if flag.starts_with('-') => eprintln!("warning: ignoring unknown option '{}'", flag),
            path if options.input.is_none() => options.input = Some(PathBuf::from(path)),
            extra => eprintln!("warning: ignoring extra argument '{}'", extra),
        }
    }

    options
}

/// Next argument parsed as the value of `flag`
fn value<T: FromStr>(args: &mut impl Iterator<Item = String>, flag: &str) -> Option<T> {
    let Some(raw) = args.next() else {
        eprintln!("warning: {} expects a value", flag);
        return None;
    };
    let parsed = raw.parse().ok();
    if parsed.is_none() {
        eprintln!("warning: ignoring {} '{}'", flag, raw);
    }
    parsed
}

fn lex_file(file_path: &Path, tables: Arc<LexerTables>, format: ReportFormat) -> bool {
    let result = match pipeline::process_file_with_tables(file_path, tables) {
        Ok(result) => result,
        Err(error) => {
            eprintln!("error[{}]: {} failed: {}", error.error_code(), stage(&error), error);
            return false;
        }
    };

    match report::render_named(&file_path.display().to_string(), &result.output, format) {
        Ok(rendered) if format == ReportFormat::Json => println!("{}", rendered),
        Ok(rendered) => print!("{}", rendered),
        Err(error) => {
            eprintln!("error: cannot render report: {}", error);
            return false;
        }
    }
    true
}

/// False when discovery fails or any file fails
fn lex_directory(dir_path: &Path, config: &batch::BatchConfig, tables: Arc<LexerTables>) -> bool {
    println!(
        "Lexing {} ({} threads{}{})",
        dir_path.display(),
        config.effective_threads(),
        if config.recursive { "" } else { ", top level only" },
        if config.fail_fast { ", fail-fast" } else { "" },
    );

    match batch::process_directory_with_tables(dir_path, config, tables) {
        Ok(results) => {
            print_batch_results(&results);
            results.failure_count() == 0
        }
        Err(error) => {
            eprintln!("error[{}]: {}", error.error_code(), error);
            false
        }
    }
}

fn print_batch_results(results: &batch::BatchResults) {
    println!();
    println!("{}", results.summary());
    println!(
        "  discovered {}, success rate {:.1}%",
        results.files_discovered,
        results.success_rate() * 100.0
    );

    let seconds = results.processing_duration.as_secs_f64();
    if seconds > 0.0 && results.success_count() > 0 {
        let bytes: u64 = results
            .successful_files
            .iter()
            .map(|(_, result)| result.file_metadata.size)
            .sum();
        println!(
            "  throughput {:.0} bytes/s, {:.0} tokens/s",
            bytes as f64 / seconds,
            results.total_tokens() as f64 / seconds
        );
    }

    let diagnostics = logging::get_processing_summary();
    if diagnostics.total_errors + diagnostics.total_warnings > 0 {
        println!(
            "  {} errors and {} warnings in {} files",
            diagnostics.total_errors, diagnostics.total_warnings, diagnostics.total_files
        );
    }

    for (file_path, error) in &results.failed_files {
        println!("  FAILED {} ({}): {}", file_path.display(), stage(error), error);
    }
    for (file_path, result) in results.successful_files.iter().take(LISTED_FILES) {
        println!(
            "  ok     {} ({} tokens, {} invalid)",
            file_path.display(),
            result.token_count(),
            result.invalid_count()
        );
    }
    if results.success_count() > LISTED_FILES {
        println!("  ... {} more", results.success_count() - LISTED_FILES);
    }
}

/// Pipeline stage an error came from
fn stage(error: &PipelineError) -> &'static str {
    match error {
        PipelineError::FileProcessing(_) => "reading",
        PipelineError::LexicalAnalysis(_) => "lexing",
        PipelineError::Vocabulary(_) => "vocabulary",
        PipelineError::Pipeline { .. } => "pipeline",
    }
}
