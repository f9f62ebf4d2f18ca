use clap::Parser;
use geojson_aperio::{config, convert_file, ConversionError, ConversionReport};
use std::path::{Path, PathBuf};

const ABOUT: &str = "GeoJSON to Aperio Converter\n\n\
This tool converts QuPath GeoJSON annotations to Aperio ImageScope XML format.";

#[derive(Parser)]
#[command(name = "geojson2aperio")]
#[command(version, about = "Convert QuPath GeoJSON annotations to Aperio XML", long_about = ABOUT)]
struct Cli {
    /// Input GeoJSON file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output XML file (defaults to INPUT with an .xml extension)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// YAML file overriding MicronsPerPixel and the region placeholders
    #[arg(short, long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| determine_output_path(&cli.input));

    match run(&cli.input, &output, cli.settings.as_deref()) {
        Ok(report) => println!("{}", summary(&report, &output)),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(input: &Path, output: &Path, settings: Option<&Path>) -> Result<ConversionReport, ConversionError> {
    let settings = config::load_or_default(settings)?;
    convert_file(input, output, &settings)
}

/// `<stem>.xml` next to the input, or `<stem>.aperio.xml` when that would be the input itself
fn determine_output_path(input: &Path) -> PathBuf {
    match input.extension() {
        Some(ext) if ext.eq_ignore_ascii_case("xml") => input.with_extension("aperio.xml"),
        _ => input.with_extension("xml"),
    }
}

fn summary(report: &ConversionReport, output: &Path) -> String {
    let mut line = format!(
        "Conversion complete: {} annotation(s) written to {}",
        report.annotations,
        output.display()
    );
    if !report.skipped.is_empty() {
        line.push_str(&format!(" ({} non-polygon feature(s) skipped)", report.skipped.len()));
    }
    line
}
