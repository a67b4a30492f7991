use std::process;
use std::time::Instant;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use sssp_delta_step::options::Cli;
use sssp_delta_step::printer::{self, PrintEvents};
use sssp_delta_step::{delta_step, dijkstra, generate, Coordinator, EdgeHooks};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{e}");
            process::exit(0);
        }
        Err(e) => {
            eprint!("{e}");
            process::exit(1);
        }
    };
    if cli.usage {
        Cli::command().print_help().ok();
        process::exit(0);
    }
    if let Err(message) = cli.validate() {
        eprintln!("{message}");
        process::exit(1);
    }

    init_logging();
    cli.describe();

    let mut graph = generate(&cli.graph_params());
    let coordinator = Coordinator::new();

    let mut print_events = PrintEvents;
    let hooks: Option<&mut dyn EdgeHooks> = match cli.animate {
        1 => Some(&mut print_events),
        2 | 3 => {
            warn!("graphical animation is not built into this binary; running timing only");
            None
        }
        _ => None,
    };

    let start = Instant::now();
    let outcome = if cli.threads == 0 {
        dijkstra::solve(&mut graph, &coordinator, hooks)
    } else {
        delta_step::solve(&mut graph, cli.threads, cli.degree, &coordinator, hooks)
    };
    match outcome {
        Ok(()) => {
            printer::print_distances(&graph);
            printer::print_elapsed(start.elapsed());
        }
        Err(e) => {
            error!(error = %e, "solve failed");
            process::exit(1);
        }
    }
}
