use flowlens::render::{
    LayoutStrategy, SvgRenderOptions, Viewport, ViewportController, layout, render_scene_svg,
};
use flowlens::{
    AnalysisResult, Dataset, EdgeListFormat, MetricsReport, NarratorConfig, PathLimits, analyze_sync,
    validate,
};
use serde::Serialize;
use std::io::Read;
use std::str::FromStr;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Core(flowlens::Error),
    Render(flowlens::render::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Core(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<flowlens::Error> for CliError {
    fn from(value: flowlens::Error) -> Self {
        Self::Core(value)
    }
}

impl From<flowlens::render::Error> for CliError {
    fn from(value: flowlens::render::Error) -> Self {
        Self::Render(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Parse,
    Analyze,
    Layout,
    Render,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    format: Option<EdgeListFormat>,
    pretty: bool,
    narrate: bool,
    narrator_url: Option<String>,
    strategy: LayoutStrategy,
    viewport_width: f64,
    viewport_height: f64,
    out: Option<String>,
}

#[derive(Serialize)]
struct AnalyzeOut<'a> {
    metrics: &'a flowlens::MetricsSnapshot,
    report: MetricsReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    narration: Option<NarrationOut>,
}

#[derive(Serialize)]
struct NarrationOut {
    text: String,
    used_fallback: bool,
}

impl From<AnalysisResult> for NarrationOut {
    fn from(value: AnalysisResult) -> Self {
        Self {
            text: value.text,
            used_fallback: value.used_fallback,
        }
    }
}

fn usage() -> &'static str {
    "flowlens-cli\n\
\n\
USAGE:\n\
  flowlens-cli parse [--format whitespace|csv] [--pretty] [<path>|-]\n\
  flowlens-cli analyze [--format whitespace|csv] [--pretty] [--narrate] [--narrator-url <url>] [<path>|-]\n\
  flowlens-cli layout [--strategy grid|circular] [--viewport-width <w>] [--viewport-height <h>] [--pretty] [<path>|-]\n\
  flowlens-cli render [--strategy grid|circular] [--viewport-width <w>] [--viewport-height <h>] [--out <path>] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - Without --format, the format is inferred from the file extension (.csv is CSV, anything else whitespace).\n\
  - analyze prints metrics and the breakdown report; --narrate adds a narration (local fallback when the\n\
    summarization service is unreachable).\n\
  - render prints SVG to stdout by default; use --out to write a file.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        viewport_width: 800.0,
        viewport_height: 600.0,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "parse" => args.command = Command::Parse,
            "analyze" => args.command = Command::Analyze,
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "--pretty" => args.pretty = true,
            "--narrate" => args.narrate = true,
            "--format" => {
                let Some(raw) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.format =
                    Some(EdgeListFormat::from_str(raw).map_err(|()| CliError::Usage(usage()))?);
            }
            "--strategy" => {
                let Some(raw) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.strategy =
                    LayoutStrategy::from_str(raw).map_err(|()| CliError::Usage(usage()))?;
            }
            "--narrator-url" => {
                let Some(url) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.narrator_url = Some(url.clone());
            }
            "--viewport-width" => {
                args.viewport_width = parse_dimension(it.next())?;
            }
            "--viewport-height" => {
                args.viewport_height = parse_dimension(it.next())?;
            }
            "--out" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(path.clone());
            }
            other if args.input.is_none() => args.input = Some(other.to_string()),
            _ => return Err(CliError::Usage(usage())),
        }
    }
    Ok(args)
}

fn parse_dimension(raw: Option<&String>) -> Result<f64, CliError> {
    let Some(raw) = raw else {
        return Err(CliError::Usage(usage()));
    };
    raw.parse().map_err(|_| CliError::Usage(usage()))
}

fn read_input(args: &Args) -> Result<(String, String), CliError> {
    match args.input.as_deref() {
        None | Some("-") => {
            let mut raw = String::new();
            std::io::stdin().read_to_string(&mut raw)?;
            validate::validate_upload("stdin.txt", validate::MIME_PLAIN, raw.len() as u64)?;
            Ok((raw, "stdin.txt".to_string()))
        }
        Some(path) => {
            let size = std::fs::metadata(path)?.len();
            validate::validate_upload(path, validate::mime_for_filename(path), size)?;
            Ok((std::fs::read_to_string(path)?, path.to_string()))
        }
    }
}

fn load_dataset(args: &Args) -> Result<Dataset, CliError> {
    let (raw, filename) = read_input(args)?;
    let format = args
        .format
        .unwrap_or_else(|| EdgeListFormat::from_filename(&filename));
    Ok(analyze_sync(&raw, format, &PathLimits::default())?)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), CliError> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}

fn run() -> Result<(), CliError> {
    let argv: Vec<String> = std::env::args().collect();
    let args = parse_args(&argv)?;

    match args.command {
        Command::Parse => {
            let dataset = load_dataset(&args)?;
            print_json(&dataset.graph, args.pretty)?;
        }
        Command::Analyze => {
            let dataset = load_dataset(&args)?;
            let report = flowlens::report::dataset_report(&dataset.graph, &dataset.paths);
            let narration = if args.narrate {
                let config = match &args.narrator_url {
                    Some(url) => NarratorConfig {
                        base_url: url.clone(),
                        ..NarratorConfig::default()
                    },
                    None => NarratorConfig::default(),
                };
                let narrator = flowlens::AnalysisNarrator::new(config)?;
                Some(narrator.narrate_sync(&dataset.graph).into())
            } else {
                None
            };
            print_json(
                &AnalyzeOut {
                    metrics: &dataset.metrics,
                    report,
                    narration,
                },
                args.pretty,
            )?;
        }
        Command::Layout => {
            let dataset = load_dataset(&args)?;
            let viewport = Viewport::new(args.viewport_width, args.viewport_height);
            let placed = layout::layout(&dataset.graph, &viewport, args.strategy)?;
            print_json(&placed, args.pretty)?;
        }
        Command::Render => {
            let dataset = load_dataset(&args)?;
            let viewport = Viewport::new(args.viewport_width, args.viewport_height);
            let placed = layout::layout(&dataset.graph, &viewport, args.strategy)?;
            let controller = ViewportController::new(dataset.graph, &placed, viewport)?;
            let svg = render_scene_svg(
                &controller.scene(),
                &SvgRenderOptions {
                    width: viewport.width,
                    height: viewport.height,
                    background: None,
                },
            );
            match &args.out {
                Some(path) => std::fs::write(path, svg)?,
                None => println!("{svg}"),
            }
        }
    }
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(if matches!(err, CliError::Usage(_)) { 2 } else { 1 });
    }
}
