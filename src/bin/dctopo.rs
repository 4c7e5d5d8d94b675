use clap::{Parser, ValueEnum};
use dctopo_rs::emu::{self, MininetDriver, TopologyDoc};
use dctopo_rs::net::{LinkOpts, Tier, TopologyGraph};
use dctopo_rs::topo::{TopoConfig, TopoOpts, build_topology};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    FatTree,
    Tree,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Summary,
    Json,
    Mininet,
}

#[derive(Debug, Parser)]
#[command(
    name = "dctopo",
    about = "Generate data-center tree / fat-tree topologies for a network emulator"
)]
struct Args {
    /// Topology kind
    #[arg(long, value_enum, default_value = "fat-tree")]
    kind: KindArg,

    /// Fat-tree radix (must be even)
    #[arg(long, allow_negative_numbers = true)]
    k: Option<i64>,

    /// Tree fan-out
    #[arg(long, allow_negative_numbers = true)]
    fan_out: Option<i64>,

    /// Topology config JSON; replaces --kind, conflicts with --k/--fan-out.
    /// Link flags override the matching fields of its "link" block
    #[arg(long)]
    config: Option<PathBuf>,

    /// Leave core switches unconnected
    #[arg(long)]
    no_core_links: bool,

    /// Link bandwidth (Mbps)
    #[arg(long)]
    bw: Option<f64>,

    /// Link delay, e.g. 5ms
    #[arg(long)]
    delay: Option<String>,

    /// Link loss (percent)
    #[arg(long)]
    loss: Option<f64>,

    /// Link max queue size (packets)
    #[arg(long)]
    max_queue_size: Option<u32>,

    /// Shape links with traffic control
    #[arg(long)]
    use_tc: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "summary")]
    format: Format,

    /// Output file; defaults to stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

fn opts_from_args(args: &Args) -> Result<TopoOpts, String> {
    let mut opts = match &args.config {
        Some(path) => {
            if args.k.is_some() || args.fan_out.is_some() {
                return Err("--k/--fan-out cannot be combined with --config".into());
            }
            TopoConfig::load(path).map_err(|e| e.to_string())?.to_opts()
        }
        None => match args.kind {
            KindArg::FatTree => {
                if args.fan_out.is_some() {
                    return Err("--fan-out applies to --kind tree; use --k for fat-tree".into());
                }
                TopoOpts::fat_tree(args.k.unwrap_or(4))
            }
            KindArg::Tree => {
                if args.k.is_some() {
                    return Err("--k applies to --kind fat-tree; use --fan-out for tree".into());
                }
                TopoOpts::tree(args.fan_out.unwrap_or(2))
            }
        },
    };
    if args.no_core_links {
        opts.core_links = false;
    }
    // 命令行上给出的链路参数逐项覆盖配置文件中的值
    opts.link.merge(&LinkOpts {
        bandwidth_mbps: args.bw,
        delay: args.delay.clone(),
        loss: args.loss,
        max_queue_size: args.max_queue_size,
        use_tc: args.use_tc.then_some(true),
    });
    Ok(opts)
}

fn summary(graph: &TopologyGraph) -> String {
    let c = graph.counts();
    let mut out = format!(
        "topology {} {}={}\n",
        graph.kind(),
        graph.kind().param_name(),
        graph.param()
    );
    for tier in [Tier::Core, Tier::Aggregation, Tier::Edge] {
        out.push_str(&format!("{}_switches {}\n", tier, graph.switches(tier).count()));
    }
    out.push_str(&format!("pods {}\n", c.pods));
    out.push_str(&format!("hosts {}\n", graph.hosts().count()));
    out.push_str(&format!("links {}\n", graph.links().len()));
    out.push_str(&format!("core_links {}\n", graph.core_links_wired()));
    out
}

fn render(graph: &TopologyGraph, format: Format) -> Result<String, String> {
    match format {
        Format::Summary => Ok(summary(graph)),
        Format::Json => serde_json::to_string_pretty(&TopologyDoc::from_graph(graph))
            .map_err(|e| format!("serialize topology: {e}")),
        Format::Mininet => {
            let mut driver = MininetDriver::new(graph);
            emu::export(graph, &mut driver).map_err(|e| format!("render mininet script: {e}"))?;
            Ok(driver.finish())
        }
    }
}

fn run(args: &Args) -> Result<(), String> {
    let opts = opts_from_args(args)?;
    info!(kind = %opts.kind, param = opts.param, core_links = opts.core_links, "构建拓扑");
    let graph = build_topology(&opts).map_err(|e| e.to_string())?;
    let text = render(&graph, args.format)?;

    match &args.out {
        Some(path) => {
            fs::write(path, text).map_err(|e| format!("write {}: {e}", path.display()))?;
            eprintln!("wrote topology to {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            error!("{msg}");
            eprintln!("error: {msg}");
            ExitCode::from(2)
        }
    }
}

