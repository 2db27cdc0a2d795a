use crate::cli::{load_methods, write_output};
use crate::description::MethodReport;
use crate::error::Result;
use crate::processor::TryCatchProcessor;
use crate::structuring::ProcessOptions;
use std::fmt::Write as _;
use std::path::PathBuf;

/// Output format of the `process` command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown format '{}', expected text or json", other)),
        }
    }
}

/// Arguments for the process command
#[derive(Debug, Clone)]
pub struct ProcessArgs {
    pub input_path: PathBuf,
    pub method: Option<String>,
    pub output_path: Option<PathBuf>,
    pub format: OutputFormat,
    pub options: ProcessOptions,
}

/// Run try/catch reconstruction over every method of the input file
pub fn process(args: &ProcessArgs) -> Result<()> {
    let mut methods = load_methods(&args.input_path, args.method.as_deref())?;
    log::info!(
        "Processing {} methods from {}",
        methods.len(),
        args.input_path.display()
    );

    let processor = TryCatchProcessor::new(args.options.clone());
    let outcomes = processor.process_all(&mut methods);

    let reports: Vec<MethodReport> = methods
        .iter()
        .zip(&outcomes)
        .map(|(method, outcome)| MethodReport::new(method, &outcome.result))
        .collect();

    let content = match args.format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&reports)?;
            json.push('\n');
            json
        }
        OutputFormat::Text => {
            let mut text = String::new();
            for (method, report) in methods.iter().zip(&reports) {
                render_text(&mut text, report, &method.regions.to_string());
            }
            text
        }
    };

    write_output(args.output_path.as_deref(), &content)
}

fn render_text(out: &mut String, report: &MethodReport, tree: &str) {
    let _ = writeln!(out, "method {}", report.name);
    match &report.error {
        Some(error) => {
            let _ = writeln!(out, "  error: {}", error);
        }
        None => {
            let _ = writeln!(
                out,
                "  wrapped: {}, failed: {}, dropped: {}, passes: {}",
                report.wrapped, report.failed, report.dropped_overlaps, report.passes
            );
        }
    }
    if !report.flags.is_empty() {
        let _ = writeln!(out, "  flags: {}", report.flags.join(", "));
    }
    for warning in &report.warnings {
        let _ = writeln!(out, "  warning: {}", warning);
    }
    for line in tree.lines() {
        let _ = writeln!(out, "  {}", line);
    }
}
