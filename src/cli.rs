use crate::config::{Config, StepStrategy, load_config};
use crate::parser::parse_problem;
use crate::placement::Layout;
use crate::placement_dump::{PlacementDump, write_placement_dump};
use crate::render::{render_svg, write_output_svg};
use anyhow::Result;
use clap::{ArgAction, Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "lplace",
    version,
    about = "Moves labels off each other and off keepout areas"
)]
pub struct Args {
    /// Problem file (.json5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for SVG and JSON if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (solver settings, theme, canvas)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Step strategy, overriding the config and problem files
    #[arg(short = 's', long = "strategy", value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Iteration budget, overriding the config and problem files
    #[arg(long = "maxIterations")]
    pub max_iterations: Option<usize>,

    /// Canvas width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Canvas height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,

    /// Include the cost Hessian at the solution in JSON output
    #[arg(long = "hessian")]
    pub hessian: bool,

    /// More logging on stderr (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyArg {
    Adaptive,
    Bisection,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose)?;

    let mut config = load_config(args.config.as_deref())?;
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }

    let input = read_input(args.input.as_deref())?;
    let problem = parse_problem(&input)?;
    let mut layout = problem.into_layout(&config.solver)?;
    apply_overrides(&mut layout, &args)?;

    if args.verbose > 0 {
        layout.cost(true)?;
    }
    let report = layout.run()?;
    if !report.converged {
        tracing::warn!(
            iterations = report.iterations,
            final_cost = report.final_cost,
            "solver did not converge; writing the best layout found"
        );
    }
    if args.verbose > 0 {
        layout.cost(true)?;
    }

    write_result(&mut layout, report, &config, &args)
}

fn init_logging(verbose: u8) -> Result<()> {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("Failed to install logger: {err}"))
}

/// Command-line solver flags win over both the config file and the
/// problem's own `solver` block.
fn apply_overrides(layout: &mut Layout, args: &Args) -> Result<()> {
    let mut solver = layout.config().clone();
    match (args.strategy, solver.strategy) {
        (Some(StrategyArg::Adaptive), _) => solver.strategy = StepStrategy::Adaptive,
        (Some(StrategyArg::Bisection), StepStrategy::Adaptive) => {
            solver.strategy = StepStrategy::bisection();
        }
        _ => {}
    }
    if let Some(max_iterations) = args.max_iterations {
        solver.max_iteration_count = max_iterations;
    }
    layout.set_config(solver)?;
    Ok(())
}

fn write_result(
    layout: &mut Layout,
    report: crate::solver::SolveReport,
    config: &Config,
    args: &Args,
) -> Result<()> {
    match args.output_format {
        OutputFormat::Svg => {
            let svg = render_svg(layout, &config.theme, &config.render);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => write_png(layout, config, args)?,
        OutputFormat::Json => {
            let hessian = if args.hessian {
                Some(layout.hessian()?)
            } else {
                None
            };
            let dump = PlacementDump::from_layout(layout, Some(report), hessian)?;
            write_placement_dump(&dump, args.output.as_deref())?;
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
fn write_png(layout: &Layout, config: &Config, args: &Args) -> Result<()> {
    let output = ensure_output(&args.output, "png")?;
    let svg = render_svg(layout, &config.theme, &config.render);
    crate::render::write_output_png(&svg, &output, &config.render, &config.theme)
}

#[cfg(not(feature = "png"))]
fn write_png(_layout: &Layout, _config: &Config, _args: &Args) -> Result<()> {
    Err(anyhow::anyhow!(
        "PNG output requires building with the `png` feature"
    ))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

#[cfg(feature = "png")]
fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
