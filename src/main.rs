//! Benchmark runner for the semiring kernels.

use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use semiring_kernels::kernels::SimdLevel;
use semiring_kernels::validate::element_count;
use semiring_kernels::{
    AlignedBuffer, KernelConfig, Result, SENTINEL, apsp_naive, apsp_with, matmul_naive_ijk,
    matmul_with,
};
use std::process;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(
    name = "semiring-kernels",
    version,
    about = "Time the i32 matmul and all-pairs shortest-path kernels"
)]
struct Cli {
    #[command(flatten)]
    run: RunArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Maximum worker threads (defaults to available parallelism)
    #[arg(long, global = true)]
    threads: Option<usize>,

    /// Force the scalar inner loop
    #[arg(long, global = true)]
    scalar: bool,

    /// Use every thread even for small problems
    #[arg(long, global = true)]
    no_adaptive: bool,

    /// Check the result against the single-threaded scalar reference
    #[arg(long, global = true)]
    verify: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Res (m×k) = A (m×n) × B (n×k)
    Matmul {
        #[arg(long, default_value = "2000")]
        m: usize,
        #[arg(long, default_value = "1000")]
        n: usize,
        #[arg(long, default_value = "3000")]
        k: usize,
        /// Value every element of A is set to
        #[arg(long, default_value = "100")]
        a_fill: i32,
        /// Value every element of B is set to
        #[arg(long, default_value = "50")]
        b_fill: i32,
    },

    /// Shortest paths over a random symmetric graph
    Apsp {
        /// Vertices
        #[arg(long, default_value = "3000")]
        n: usize,
        #[arg(long, default_value = "8")]
        seed: u64,
        /// Edge weights are drawn uniformly from 1..=max_weight
        #[arg(long, default_value = "100")]
        max_weight: i32,
        /// Probability that an edge exists
        #[arg(long, default_value = "1.0")]
        edge_prob: f64,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = KernelConfig::default().with_adaptive(!cli.run.no_adaptive);
    if let Some(threads) = cli.run.threads {
        config = config.with_threads(threads);
    }
    if cli.run.scalar {
        config = config.with_simd(SimdLevel::Scalar);
    }

    println!(
        "Threads: up to {}, inner loop: {}",
        config.num_threads,
        config.simd_level()
    );

    let outcome = match cli.command {
        Commands::Matmul {
            m,
            n,
            k,
            a_fill,
            b_fill,
        } => run_matmul(m, n, k, a_fill, b_fill, &config, cli.run.verify),
        Commands::Apsp {
            n,
            seed,
            max_weight,
            edge_prob,
        } => run_apsp(n, seed, max_weight, edge_prob, &config, cli.run.verify),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run_matmul(
    m: usize,
    n: usize,
    k: usize,
    a_fill: i32,
    b_fill: i32,
    config: &KernelConfig,
    verify: bool,
) -> Result<()> {
    println!("Matmul: {}×{} × {}×{}", m, n, n, k);

    let a = AlignedBuffer::filled(element_count(m, n)?, a_fill)?;
    let b = AlignedBuffer::filled(element_count(n, k)?, b_fill)?;
    let mut res = AlignedBuffer::zeroed(element_count(m, k)?)?;

    let start = Instant::now();
    matmul_with(&a, &b, &mut res, m, n, k, config)?;
    report(start);

    if verify {
        let mut expected = AlignedBuffer::zeroed(m * k)?;
        matmul_naive_ijk(&a, &b, &mut expected, m, n, k);
        print_verdict(&expected, &res);
    }
    Ok(())
}

fn run_apsp(
    n: usize,
    seed: u64,
    max_weight: i32,
    edge_prob: f64,
    config: &KernelConfig,
    verify: bool,
) -> Result<()> {
    println!(
        "APSP: {} vertices, weights 1..={}, edge probability {}",
        n, max_weight, edge_prob
    );

    let d = random_graph(n, seed, max_weight, edge_prob)?;
    let mut r = AlignedBuffer::filled(n * n, SENTINEL)?;

    let start = Instant::now();
    apsp_with(&mut r, &d, n, config)?;
    report(start);

    if verify {
        let mut expected = AlignedBuffer::zeroed(n * n)?;
        apsp_naive(&mut expected, &d, n);
        print_verdict(&expected, &r);
    }
    Ok(())
}

/// Symmetric graph with a zero diagonal. Each edge exists with probability
/// `edge_prob` and weighs `1..=max_weight`; absent edges are the sentinel.
fn random_graph(
    n: usize,
    seed: u64,
    max_weight: i32,
    edge_prob: f64,
) -> Result<AlignedBuffer<i32>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let max_weight = max_weight.max(1);
    let edge_prob = edge_prob.clamp(0.0, 1.0);

    let mut d = AlignedBuffer::filled(element_count(n, n)?, SENTINEL)?;
    for i in 0..n {
        d[i * n + i] = 0;
        for j in i + 1..n {
            if rng.gen_bool(edge_prob) {
                let w = rng.gen_range(1..=max_weight);
                d[i * n + j] = w;
                d[j * n + i] = w;
            }
        }
    }
    Ok(d)
}

fn report(start: Instant) {
    let elapsed = start.elapsed();
    println!("Time taken: {} milliseconds", elapsed.as_millis());
}

fn print_verdict(expected: &[i32], actual: &[i32]) {
    match expected.iter().zip(actual).position(|(e, a)| e != a) {
        None => println!("Verified against scalar reference"),
        Some(idx) => {
            eprintln!(
                "MISMATCH at index {}: expected {}, got {}",
                idx, expected[idx], actual[idx]
            );
            process::exit(2);
        }
    }
}
