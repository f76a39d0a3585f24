//! reportbook CLI - bind dated text reports into one PDF

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use reportbook::{
    load_reports, locate_reports, persist, render_book, Config, Margins, PageSize,
    TwoPassRenderer,
};

#[derive(Parser)]
#[command(name = "reportbook")]
#[command(version)]
#[command(about = "Bind date-named text reports into one PDF with a table of contents", long_about = None)]
struct Cli {
    /// Directory containing the reports
    #[arg(value_name = "DIR")]
    input: Option<PathBuf>,

    /// Output PDF
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the PDF
    Build(BuildArgs),

    /// List dated reports in the order they will be bound
    #[command(alias = "ls")]
    List {
        /// Directory containing the reports
        #[arg(value_name = "DIR")]
        input: Option<PathBuf>,

        /// JSON configuration file
        #[arg(short, long, value_name = "FILE", env = "REPORTBOOK_CONFIG")]
        config: Option<PathBuf>,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

#[derive(Args, Default)]
struct BuildArgs {
    /// Directory containing the reports
    #[arg(value_name = "DIR")]
    input: Option<PathBuf>,

    /// Output PDF
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long, value_name = "FILE", env = "REPORTBOOK_CONFIG")]
    config: Option<PathBuf>,

    /// Page size
    #[arg(long, value_enum)]
    page_size: Option<PageSizeArg>,

    /// Margin on all four sides, in centimetres
    #[arg(long, value_name = "CM")]
    margin_cm: Option<f32>,

    /// Regex locating the date in file names (first group is parsed)
    #[arg(long, value_name = "REGEX")]
    date_pattern: Option<String>,

    /// chrono format of the captured date [default: %Y-%m-%d]
    #[arg(long, value_name = "FORMAT")]
    date_format: Option<String>,

    /// Title template ({min}, {max} and {today} are replaced)
    #[arg(long, value_name = "TEMPLATE")]
    title: Option<String>,

    /// Heading of the index page
    #[arg(long, value_name = "TEXT")]
    index_title: Option<String>,

    /// Skip unreadable reports instead of aborting
    #[arg(long)]
    lenient: bool,

    /// Keep report text as written instead of normalizing it to NFC
    #[arg(long)]
    no_unicode_normalization: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum PageSizeArg {
    /// ISO A4
    A4,
    /// US Letter
    Letter,
}

impl From<PageSizeArg> for PageSize {
    fn from(size: PageSizeArg) -> Self {
        match size {
            PageSizeArg::A4 => PageSize::A4,
            PageSizeArg::Letter => PageSize::Letter,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Build(args)) => cmd_build(&args),
        Some(Commands::List {
            input,
            config,
            json,
        }) => cmd_list(input.as_deref(), config.as_deref(), json),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: build if input is provided
            if let Some(input) = cli.input {
                let args = BuildArgs {
                    input: Some(input),
                    output: cli.output,
                    ..BuildArgs::default()
                };
                cmd_build(&args)
            } else {
                println!("{}", "Usage: reportbook <DIR> [OUTPUT]".yellow());
                println!("       reportbook --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Start from the config file (if any) and apply the input directory.
fn base_config(
    input: Option<&Path>,
    config_file: Option<&Path>,
) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match config_file {
        Some(path) => Config::from_json_file(path)?,
        None if input.is_none() => {
            return Err("no input directory given (pass DIR or --config)".into());
        }
        None => Config::default(),
    };

    if let Some(dir) = input {
        config = config.with_input_dir(dir);
    }
    Ok(config)
}

fn build_config(args: &BuildArgs) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = base_config(args.input.as_deref(), args.config.as_deref())?;

    if let Some(ref output) = args.output {
        config = config.with_output_path(output);
    }
    if let Some(size) = args.page_size {
        config = config.with_page_size(size.into());
    }
    if let Some(cm) = args.margin_cm {
        config = config.with_margins(Margins::cm(cm));
    }
    if args.date_pattern.is_some() || args.date_format.is_some() {
        let pattern = args
            .date_pattern
            .clone()
            .unwrap_or_else(|| config.date_pattern.clone());
        let format = args
            .date_format
            .clone()
            .unwrap_or_else(|| config.date_format.clone());
        config = config.with_date_pattern(pattern, format);
    }
    if let Some(ref title) = args.title {
        config = config.with_title_template(title);
    }
    if let Some(ref index_title) = args.index_title {
        config = config.with_index_title(index_title);
    }
    if args.lenient {
        config = config.lenient();
    }
    if args.no_unicode_normalization {
        config = config.with_unicode_normalization(false);
    }

    config.validate()?;
    log::debug!("Configuration: {:?}", config);
    Ok(config)
}

fn cmd_build(args: &BuildArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = build_config(args)?;
    let renderer = TwoPassRenderer::from_config(&config)?;

    let pb = ProgressBar::new(4);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    pb.set_message("Locating reports...");
    let sources = locate_reports(&config.input_dir, &config)?;
    pb.inc(1);

    pb.set_message(format!("Reading {} reports...", sources.len()));
    let reports = load_reports(&sources, &config)?;
    pb.inc(1);

    pb.set_message("Laying out pages...");
    let today = chrono::Local::now().date_naive();
    let book = render_book(&reports, &config, &renderer, today)?;
    pb.inc(1);

    pb.set_message("Writing PDF...");
    persist(&book.pdf, &config.output_path)?;
    pb.inc(1);

    pb.finish_and_clear();

    if book.rendered.toc_is_stale() {
        println!(
            "{}",
            "Warning: some index page numbers may be off by the index length".yellow()
        );
    }
    println!(
        "{}: {}",
        "PDF written".green().bold(),
        config.output_path.display()
    );

    Ok(())
}

fn cmd_list(
    input: Option<&Path>,
    config_file: Option<&Path>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = base_config(input, config_file)?;
    let sources = locate_reports(&config.input_dir, &config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sources)?);
        return Ok(());
    }

    println!(
        "{} ({})",
        "Reports".cyan().bold(),
        config.input_dir.display()
    );
    println!("{}", "─".repeat(40).dimmed());
    for source in &sources {
        println!("{}  {}", source.date.to_string().bold(), source.name);
    }
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Total".bold(), sources.len());

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "reportbook".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Dated report binder");
    println!();
    println!("License: MIT");
}
