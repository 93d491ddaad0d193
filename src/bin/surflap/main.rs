//! surflap CLI - Laplacians and mass matrices on triangulated surfaces.
//!
//! Usage: surflap <COMMAND> [OPTIONS] <SURFACE> ...
//!
//! Run `surflap --help` for available commands.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};

use surflap::algo::evaluate::{evaluate, EvaluateOptions};
use surflap::algo::functions::TestFunction;
use surflap::algo::mass::{mass_matrix, MassMatrixKind, MassMatrixOptions};
use surflap::io;
use surflap::mesh::VertexTriangles;

#[derive(Parser)]
#[command(name = "surflap")]
#[command(author, version, about = "Discrete Laplacians on triangulated surfaces", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a function on a surface and apply the Laplace-Beltrami operator to it
    Laplacian {
        /// Surface file (.obj, .stl, .ply)
        surface: PathBuf,

        /// Output for the function values u (.ply, .txt, .csv)
        u_out: PathBuf,

        /// Output for the Laplacian of u
        lu_out: PathBuf,

        /// Speed at which the function varies
        #[arg(short, long, default_value = "1.0")]
        speed: f64,

        /// Mass matrix type (voronoi, barycentric, mayer)
        #[arg(short, long, default_value = "voronoi")]
        mass_matrix: String,

        /// Function to evaluate (sumsincos, sumsincosxy, sumsincosxz, sumsincosyz)
        #[arg(short, long, default_value = "sumsincos")]
        function: String,

        /// Also apply the graph Laplacian and save the result here
        #[arg(long)]
        glu: Option<PathBuf>,

        /// Compare against the analytic Laplacian and save it here
        #[arg(short, long)]
        analytic: Option<PathBuf>,

        /// Number of worker threads (defaults to all cores)
        #[arg(short = 'j', long)]
        workers: Option<usize>,
    },

    /// Compute the lumped mass matrix and save its diagonal
    Mass {
        /// Surface file (.obj, .stl, .ply)
        surface: PathBuf,

        /// Output for the per-vertex areas (.ply, .txt, .csv)
        output: PathBuf,

        /// Mass matrix type (voronoi, barycentric, mayer)
        #[arg(short, long, default_value = "voronoi")]
        mass_matrix: String,

        /// Number of worker threads (defaults to all cores)
        #[arg(short = 'j', long)]
        workers: Option<usize>,
    },

    /// Display surface information
    Info {
        /// Surface file (.obj, .stl, .ply)
        surface: PathBuf,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Laplacian {
            surface,
            u_out,
            lu_out,
            speed,
            mass_matrix,
            function,
            glu,
            analytic,
            workers,
        } => {
            let options = EvaluateOptions {
                function: function.parse::<TestFunction>()?,
                speed,
                mass: mass_options(&mass_matrix, workers)?,
                graph_laplacian: glu.is_some(),
                analytic: analytic.is_some(),
            };
            cmd_laplacian(&surface, &u_out, &lu_out, glu.as_deref(), analytic.as_deref(), &options)?;
        }

        Commands::Mass {
            surface,
            output,
            mass_matrix,
            workers,
        } => {
            let options = mass_options(&mass_matrix, workers)?;
            cmd_mass(&surface, &output, &options)?;
        }

        Commands::Info { surface } => {
            cmd_info(&surface)?;
        }
    }

    Ok(())
}

fn mass_options(name: &str, workers: Option<usize>) -> surflap::error::Result<MassMatrixOptions> {
    let kind: MassMatrixKind = name.parse()?;
    let mut options = MassMatrixOptions::new(kind);
    if let Some(workers) = workers {
        options = options.with_workers(workers);
    }
    Ok(options)
}

fn cmd_laplacian(
    surface: &Path,
    u_out: &Path,
    lu_out: &Path,
    glu_out: Option<&Path>,
    analytic_out: Option<&Path>,
    options: &EvaluateOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = io::load(surface)?;
    println!("Loaded: {} vertices, {} triangles", mesh.num_vertices(), mesh.num_triangles());

    let start = Instant::now();
    let result = evaluate(&mesh, options)?;
    let elapsed = start.elapsed();
    println!(
        "Applied Laplace-Beltrami ({} mass matrix, {} workers) to {} in {:.2?}",
        options.mass.kind, options.mass.workers, options.function, elapsed
    );

    io::save_vertex_data(u_out, &mesh, &result.u)?;
    println!("Saved: {}", u_out.display());
    io::save_vertex_data(lu_out, &mesh, &result.lu)?;
    println!("Saved: {}", lu_out.display());

    if let (Some(path), Some(glu)) = (glu_out, &result.glu) {
        io::save_vertex_data(path, &mesh, glu)?;
        println!("Saved: {}", path.display());
    }

    if let (Some(path), Some(exact)) = (analytic_out, &result.analytic) {
        io::save_vertex_data(path, &mesh, exact)?;
        println!("Saved: {}", path.display());
    }

    if let Some(stats) = result.error {
        println!("\nError against analytic Laplacian:");
        println!("  Mean absolute: {:.6e}", stats.mean_abs);
        println!("  Max absolute:  {:.6e}", stats.max_abs);
        println!("  RMSE:          {:.6e}", stats.rmse);
    }

    Ok(())
}

fn cmd_mass(surface: &Path, output: &Path, options: &MassMatrixOptions) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = io::load(surface)?;
    println!("Loaded: {} vertices, {} triangles", mesh.num_vertices(), mesh.num_triangles());

    let start = Instant::now();
    let mass = mass_matrix(&mesh, options)?;
    let elapsed = start.elapsed();

    let (lo, hi) = mass
        .diagonal()
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &m| (lo.min(m), hi.max(m)));
    println!("Mass matrix: {} ({} workers, {:.2?})", options.kind, options.workers, elapsed);
    println!("Total area: {:.6} (surface area {:.6})", mass.total(), mesh.surface_area());
    println!("Vertex area range: [{:.6e}, {:.6e}]", lo, hi);

    io::save_vertex_data(output, &mesh, mass.diagonal())?;
    println!("Saved: {}", output.display());

    Ok(())
}

fn cmd_info(surface: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = io::load(surface)?;

    println!("File: {}", surface.display());
    println!("Vertices: {}", mesh.num_vertices());
    println!("Triangles: {}", mesh.num_triangles());

    let (min_area, max_area) = (0..mesh.num_triangles())
        .map(|t| mesh.triangle_area(t))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), a| (lo.min(a), hi.max(a)));
    println!("Surface area: {:.6}", mesh.surface_area());
    println!("Triangle area range: [{:.6}, {:.6}]", min_area, max_area);

    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
        let diag = max - min;
        println!("Dimensions: {:.3} x {:.3} x {:.3}", diag.x, diag.y, diag.z);
    }

    println!("Average edge length: {:.6}", mesh.average_edge_length());

    let obtuse = mesh.obtuse_triangles();
    println!(
        "Obtuse triangles: {} ({:.1}%)",
        obtuse,
        100.0 * obtuse as f64 / mesh.num_triangles() as f64
    );

    let incidence = VertexTriangles::new(&mesh);
    let max_degree = (0..mesh.num_vertices()).map(|v| incidence.degree(v)).max().unwrap_or(0);
    println!("Max triangles per vertex: {}", max_degree);

    let unreferenced = mesh.unreferenced_vertices();
    if unreferenced.is_empty() {
        println!("Unreferenced vertices: none");
    } else {
        println!(
            "Unreferenced vertices: {} (Laplace-Beltrami needs every vertex in a triangle)",
            unreferenced.len()
        );
    }

    Ok(())
}
