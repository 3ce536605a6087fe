use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use planreport::config::RunConfig;
use planreport::model::Status;
use planreport::{PlanSession, logging, render, view};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "planreport")]
#[command(about = "Migration planning report: dependency graphs, status roll-ups and exports", long_about = None)]
struct Cli {
    /// Logging level. Falls back to PLANREPORT_LOG, then info.
    #[arg(long, value_enum, global = true, value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// Run configuration (TOML). Flags below override its values.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Product sheet (tab-separated).
    #[arg(long, value_name = "PATH")]
    associations: Option<PathBuf>,

    /// Task template (JSON).
    #[arg(long, value_name = "PATH")]
    template: Option<PathBuf>,

    /// Status sheet(s), merged in the order given.
    #[arg(long = "status", value_name = "PATH")]
    statuses: Vec<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate all inputs, print counts and orphaned updates.
    Check {
        #[command(flatten)]
        inputs: InputArgs,
    },

    /// Write every report page plus the TSV export into a directory.
    Report {
        #[command(flatten)]
        inputs: InputArgs,

        /// Output directory (default: [output].dir from the config, else ./out).
        #[arg(short = 'o', long)]
        out: Option<PathBuf>,
    },

    /// Write the flat task export.
    Export {
        #[command(flatten)]
        inputs: InputArgs,

        #[arg(short = 'o', long)]
        out: PathBuf,

        /// Keep only tasks with this status (repeatable), e.g. `--only blocked`.
        #[arg(long, value_name = "STATUS")]
        only: Vec<Status>,
    },

    /// Write the subgraph page of one product.
    Product {
        id: String,

        #[command(flatten)]
        inputs: InputArgs,

        #[arg(short = 'o', long)]
        out: PathBuf,
    },

    /// Write the subgraph page of one source.
    Source {
        id: String,

        #[command(flatten)]
        inputs: InputArgs,

        #[arg(short = 'o', long)]
        out: PathBuf,
    },
}

#[derive(Debug, Copy, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(lvl: LogLevel) -> Self {
        match lvl {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level.map(Into::into));

    match cli.cmd {
        Commands::Check { inputs } => {
            let (session, _) = open_session(inputs)?;
            let g = session.graph();
            println!(
                "{} sources, {} products, {} tasks",
                g.sources().len(),
                g.products().len(),
                g.tasks().len()
            );
            for status in Status::ALL {
                println!("  {:<12} {}", status.label(), g.summaries().overall.get(status));
            }
            report_orphans(&session);
        }

        Commands::Report { inputs, out } => {
            let (session, cfg) = open_session(inputs)?;
            let out = out.unwrap_or_else(|| cfg.output.dir.clone());
            fs::create_dir_all(&out)
                .with_context(|| format!("create output directory {}", out.display()))?;

            let g = session.graph();
            write(&out.join("template.html"), &render::render_graph_html(&view::template_graph(g))?)?;
            write(&out.join("graph.html"), &render::render_graph_html(&view::full_graph(g))?)?;
            write(
                &out.join("product-sources.html"),
                &render::render_graph_html(&view::product_source_overview(g))?,
            )?;
            write(&out.join("dashboard.html"), &render::render_dashboard_html(&view::dashboard(g))?)?;
            write(&out.join("export.tsv"), &render::render_export_tsv(&view::export_rows(g))?)?;
            report_orphans(&session);
        }

        Commands::Export { inputs, out, only } => {
            let (session, _) = open_session(inputs)?;
            let rows = if only.is_empty() {
                view::export_rows(session.graph())
            } else {
                view::rows_with_status(session.graph(), &only)
            };
            write(&out, &render::render_export_tsv(&rows)?)?;
            report_orphans(&session);
        }

        Commands::Product { id, inputs, out } => {
            let (session, _) = open_session(inputs)?;
            let sub = view::product_subgraph(session.graph(), &id)?;
            write(&out, &render::render_graph_html(&sub)?)?;
        }

        Commands::Source { id, inputs, out } => {
            let (session, _) = open_session(inputs)?;
            let sub = view::source_subgraph(session.graph(), &id)?;
            write(&out, &render::render_graph_html(&sub)?)?;
        }
    }

    Ok(())
}

fn open_session(args: InputArgs) -> anyhow::Result<(PlanSession, RunConfig)> {
    let cfg = match &args.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    let inputs = cfg.resolve(args.associations, args.template, args.statuses)?;
    info!(
        associations = %inputs.associations.display(),
        template = %inputs.template.display(),
        statuses = inputs.statuses.len(),
        "loading inputs"
    );
    let session = PlanSession::load(&inputs)?;
    Ok((session, cfg))
}

fn report_orphans(session: &PlanSession) {
    let orphans: Vec<_> = session.orphans().collect();
    if orphans.is_empty() {
        return;
    }
    warn!(count = orphans.len(), "status updates referenced unknown tasks");
    for o in orphans {
        println!("orphaned update: {} -> {}", o.record.task, o.record.status);
    }
}

fn write(path: &Path, contents: &str) -> anyhow::Result<()> {
    fs::write(path, contents).with_context(|| format!("write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}
