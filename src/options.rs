//! Command-line surface of the solver binary.

use clap::Parser;
use tracing::debug;

use crate::generator::GraphParams;

/// Single-source shortest paths over a generated geometric graph.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Number of vertices
    #[arg(short = 'n', long = "vertices", default_value_t = 50)]
    pub num_vertices: usize,

    /// Expected vertex degree, for vertices near the middle of large graphs
    #[arg(short = 'd', long = "degree", default_value_t = 5)]
    pub degree: usize,

    /// Degree of geometric realism, a real number between 0 and 1
    #[arg(short = 'g', long = "geom", default_value_t = 1.0)]
    pub geom: f64,

    /// Random number seed
    #[arg(short = 's', long = "seed", default_value_t = 0)]
    pub seed: u64,

    /// Number of worker threads; 0 runs the priority-queue solver on one thread
    #[arg(short = 't', long = "threads", default_value_t = 0)]
    pub threads: usize,

    /// Animation mode: 0 timing only, 1 print events, 2 show result, 3 full animation
    #[arg(short = 'a', long = "animate", default_value_t = 0)]
    pub animate: u32,

    /// Print this message
    #[arg(short = 'v', long = "usage")]
    pub usage: bool,
}

impl Cli {
    /// Reject values clap cannot rule out on its own. The messages mirror
    /// the argument names so a bad invocation reads naturally.
    pub fn validate(&self) -> Result<(), String> {
        if self.num_vertices == 0 {
            return Err(format!(
                "number of vertices ({}) must be positive",
                self.num_vertices
            ));
        }
        if self.degree == 0 {
            return Err(format!("expected degree ({}) must be positive", self.degree));
        }
        if !(0.0..=1.0).contains(&self.geom) {
            return Err(format!(
                "geometry factor ({}) must be between 0 and 1",
                self.geom
            ));
        }
        if self.animate > 3 {
            return Err(format!(
                "animation level ({}) must be between 0 and 3",
                self.animate
            ));
        }
        Ok(())
    }

    /// Announce the run on stdout and log the remaining knobs.
    pub fn describe(&self) {
        println!("{} vertices, seed {}", self.num_vertices, self.seed);
        debug!(
            degree = self.degree,
            geom = self.geom,
            threads = self.threads,
            animate = self.animate,
            "run configuration"
        );
    }

    pub fn graph_params(&self) -> GraphParams {
        GraphParams {
            num_vertices: self.num_vertices,
            seed: self.seed,
            degree: self.degree,
            geom: self.geom,
        }
    }
}
