//! Shapekey CLI - shape-key inspection and cleanup tool.
//!
//! Usage: shapekey <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! The input mesh provides the basis. Shape keys come from the input itself
//! (glTF morph targets) or from extra files with the same topology passed via
//! `--key`. Commands act on the active shape key, which defaults to the last
//! one loaded and can be chosen with `--active`.
//!
//! Run `shapekey --help` for available commands.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Args, Parser, Subcommand, ValueEnum};

use shapekey::algo::cleanup::{DEFAULT_DISTANCE_THRESHOLD, DEFAULT_PERCENTAGE};
use shapekey::algo::displacement::{compute_displacements, DisplacementStats, DEFAULT_EPSILON};
use shapekey::io;
use shapekey::mesh::ShapeKeyMesh;
use shapekey::ops::{
    self, BlendFromVertexGroup, CleanSmallMovements, Operator, SelectAffectedFaces,
    SelectAffectedVertices, ToolSettings, DEFAULT_SELECT_THRESHOLD,
};

#[derive(Parser)]
#[command(name = "shapekey")]
#[command(author, version, about = "Shape-key inspection and cleanup CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where the mesh and its shape keys come from.
#[derive(Args)]
struct Source {
    /// Input mesh file (basis)
    input: PathBuf,

    /// Additional shape-key mesh file with the same vertex order (repeatable)
    #[arg(short, long = "key")]
    keys: Vec<PathBuf>,

    /// Index of the shape key to operate on (0 is the basis)
    #[arg(short, long)]
    active: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh, vertex group and shape-key information
    Info {
        #[command(flatten)]
        source: Source,
    },

    /// Select vertices moved by the active shape key
    SelectVertices {
        #[command(flatten)]
        source: Source,

        /// Minimum distance a vertex must move to be selected
        #[arg(short, long, default_value_t = DEFAULT_SELECT_THRESHOLD)]
        threshold: f64,

        /// Print the selected vertex indices
        #[arg(long)]
        list: bool,
    },

    /// Select faces touching a vertex moved by the active shape key
    SelectFaces {
        #[command(flatten)]
        source: Source,

        /// Minimum distance a vertex must move to affect its faces
        #[arg(short, long, default_value_t = DEFAULT_SELECT_THRESHOLD)]
        threshold: f64,

        /// Print the selected face indices
        #[arg(long)]
        list: bool,
    },

    /// Blend the active shape key toward the basis by vertex-group weights
    Blend {
        #[command(flatten)]
        source: Source,

        /// Output mesh file
        output: PathBuf,

        /// Vertex group supplying the weights
        #[arg(short, long)]
        group: String,

        /// Invert the vertex group influence
        #[arg(long)]
        invert: bool,

        /// Use single-threaded execution (for benchmarking)
        #[arg(long)]
        sequential: bool,
    },

    /// Reset least-moved vertices of the active shape key to the basis
    Clean {
        #[command(flatten)]
        source: Source,

        /// Output mesh file
        output: PathBuf,

        /// Cleanup method
        #[arg(short, long, value_enum, default_value = "percentage")]
        mode: CleanMethod,

        /// Percentage of moving vertices to reset (percentage mode)
        #[arg(short, long, default_value_t = DEFAULT_PERCENTAGE)]
        percentage: f64,

        /// Maximum displacement to reset (threshold mode)
        #[arg(short, long, default_value_t = DEFAULT_DISTANCE_THRESHOLD)]
        threshold: f64,

        /// Number of cleanup passes
        #[arg(short, long, default_value = "1")]
        iterations: usize,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum CleanMethod {
    /// Reset the bottom N% of moving vertices
    Percentage,
    /// Reset every vertex moving less than a distance
    Threshold,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { source } => {
            cmd_info(&source)?;
        }

        Commands::SelectVertices {
            source,
            threshold,
            list,
        } => {
            let settings = ToolSettings::default().with_select_threshold(threshold);
            let mut mesh = load_source(&source)?;
            run_operator(&SelectAffectedVertices::from_settings(&settings), &mut mesh)?;
            if list {
                print_indices(mesh.selected_vertices().iter().map(|v| v.index()));
            }
        }

        Commands::SelectFaces {
            source,
            threshold,
            list,
        } => {
            let settings = ToolSettings::default().with_select_threshold(threshold);
            let mut mesh = load_source(&source)?;
            run_operator(&SelectAffectedFaces::from_settings(&settings), &mut mesh)?;
            if list {
                print_indices(mesh.selected_faces().iter().map(|f| f.index()));
            }
        }

        Commands::Blend {
            source,
            output,
            group,
            invert,
            sequential,
        } => {
            let settings = ToolSettings::default()
                .with_vertex_group(group)
                .with_invert(invert)
                .with_parallel(!sequential);
            cmd_blend(&source, &output, &settings)?;
        }

        Commands::Clean {
            source,
            output,
            mode,
            percentage,
            threshold,
            iterations,
        } => {
            let settings = match mode {
                CleanMethod::Percentage => ToolSettings::default().with_cleanup_percentage(percentage),
                CleanMethod::Threshold => ToolSettings::default().with_cleanup_threshold(threshold),
            };
            cmd_clean(&source, &output, &settings, iterations)?;
        }
    }

    Ok(())
}

fn load_source(source: &Source) -> Result<ShapeKeyMesh, Box<dyn std::error::Error>> {
    let mut mesh = io::load(&source.input)?;

    for path in &source.keys {
        let positions = io::load_positions(path)?;
        mesh.add_shape_key(key_name(path), positions)?;
    }

    if let Some(active) = source.active {
        mesh.set_active_shape_key_index(active)?;
    }

    println!(
        "Loaded: {} vertices, {} faces, {} shape keys",
        mesh.num_vertices(),
        mesh.num_faces(),
        mesh.shape_keys().len()
    );
    Ok(mesh)
}

fn key_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Key")
        .to_string()
}

fn run_operator(
    op: &dyn Operator,
    mesh: &mut ShapeKeyMesh,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(key) = mesh.active_shape_key() {
        println!("{} on '{}'...", op.label(), key.name);
    }
    let report = ops::run(op, mesh)?;
    println!("{}", report);
    Ok(())
}

fn print_indices(indices: impl Iterator<Item = usize>) {
    let line: Vec<String> = indices.map(|i| i.to_string()).collect();
    println!("{}", line.join(" "));
}

fn cmd_info(source: &Source) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = load_source(source)?;

    println!("File: {}", source.input.display());
    println!("Vertices: {}", mesh.num_vertices());
    println!("Faces: {}", mesh.num_faces());

    if mesh.vertex_groups().is_empty() {
        println!("Vertex groups: none");
    } else {
        println!("Vertex groups:");
        for group in mesh.vertex_groups() {
            println!("  {} ({} vertices)", group.name, group.len());
        }
    }

    let Some(basis) = mesh.basis() else {
        println!("Shape keys: none");
        return Ok(());
    };

    println!("Shape keys:");
    for (i, key) in mesh.shape_keys().iter().enumerate() {
        let marker = if i == mesh.active_shape_key_index() { '*' } else { ' ' };
        if i == 0 {
            println!("{} [0] {} (basis)", marker, key.name);
            continue;
        }
        let displacements = compute_displacements(&basis.positions, &key.positions)?;
        let stats = DisplacementStats::from_displacements(&displacements, DEFAULT_EPSILON);
        println!(
            "{} [{}] {}: {} affected, max {:.6}, mean {:.6}",
            marker, i, key.name, stats.affected_count, stats.max_magnitude, stats.mean_magnitude
        );
    }

    Ok(())
}

fn cmd_blend(
    source: &Source,
    output: &Path,
    settings: &ToolSettings,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh = load_source(source)?;

    let start = Instant::now();
    run_operator(&BlendFromVertexGroup::from_settings(settings), &mut mesh)?;
    let elapsed = start.elapsed();

    io::save(&mesh, output)?;
    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    Ok(())
}

fn cmd_clean(
    source: &Source,
    output: &Path,
    settings: &ToolSettings,
    iterations: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh = load_source(source)?;
    let op = CleanSmallMovements::from_settings(settings);

    let start = Instant::now();
    for _ in 0..iterations {
        run_operator(&op, &mut mesh)?;
    }
    let elapsed = start.elapsed();

    io::save(&mesh, output)?;
    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    Ok(())
}
