use anyhow::Context as _;
use clap::{Parser, Subcommand};
use polarboard::config::{self, Config};
use polarboard::protocol::{self, Request};
use polarboard::render::{OutputFormat, Scene, write_scene};
use polarboard::sys::runtime::{self, ServeOptions};
use polargeom::{CellCoordinate, Direction, Point};
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "polarboard", version, about, long_about = None)]
struct Cli {
    /// Config file to use instead of the platform default
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Write the default config file (never overwrites)
    Init,
    /// Draw the board to an SVG or PNG file
    Render {
        #[arg(short, long, default_value = "board.svg")]
        out: PathBuf,
        /// Output format; guessed from the file extension when omitted
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
        /// Cell to highlight together with its neighbors, as RING:SECTOR
        #[arg(long, value_name = "RING:SECTOR")]
        highlight: Option<CellCoordinate>,
    },
    /// Print the wedge covered by a cell
    Cell { cell: CellCoordinate },
    /// Print the cell under a point
    Hit {
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
    },
    /// Print the cells adjacent to a cell
    Neighbors { cell: CellCoordinate },
    /// Print the cell one step away (cw, ccw, out, in)
    Step {
        cell: CellCoordinate,
        direction: Direction,
    },
    /// Print every cell reached by stepping repeatedly
    Ray {
        cell: CellCoordinate,
        direction: Direction,
    },
    /// Answer queries on the board socket, reloading the config on change
    Serve {
        /// Keep this SVG/PNG file rendered from the current config
        #[arg(long, value_name = "PATH")]
        preview: Option<PathBuf>,
    },
    /// Send one request line to a running `serve` and print the reply
    Query {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let explicit = cli.config.as_deref();

    match cli.command {
        Commands::Init => {
            let path = config::write_default_config(explicit)?;
            println!("{}", path.display());
            Ok(())
        }
        Commands::Render {
            out,
            format,
            highlight,
        } => {
            let config = load(explicit)?;
            let format = format.unwrap_or_else(|| OutputFormat::from_path(&out));
            render(&config, &out, format, highlight)
        }
        Commands::Cell { cell } => ask(explicit, Request::Cell(cell)),
        Commands::Hit { x, y } => ask(explicit, Request::Hit(Point::new(x, y))),
        Commands::Neighbors { cell } => ask(explicit, Request::Neighbors(cell)),
        Commands::Step { cell, direction } => ask(explicit, Request::Step(cell, direction)),
        Commands::Ray { cell, direction } => ask(explicit, Request::Ray(cell, direction)),
        Commands::Serve { preview } => {
            let config = load(explicit)?;
            runtime::serve(
                config,
                ServeOptions {
                    config_path: cli.config.clone(),
                    preview,
                },
            )
        }
        Commands::Query { words } => {
            let config = load(explicit)?;
            send_request(&config.server.socket, &words.join(" "))
        }
    }
}

fn load(explicit: Option<&Path>) -> anyhow::Result<Config> {
    config::load_config(explicit).context("Failed to load config")
}

fn render(
    config: &Config,
    out: &Path,
    format: OutputFormat,
    highlight: Option<CellCoordinate>,
) -> anyhow::Result<()> {
    let colors = config.colors()?;
    let scene = Scene::build(&config.board, &colors, &config.canvas, highlight)?;
    write_scene(&scene, out, format)
        .with_context(|| format!("Failed to write {}", out.display()))?;
    println!("{}", out.display());
    Ok(())
}

/// Answers a request locally, printing the same line the socket would send.
fn ask(explicit: Option<&Path>, request: Request) -> anyhow::Result<()> {
    let config = load(explicit)?;
    match protocol::respond(&config.board, &request) {
        protocol::Response::Error(msg) => anyhow::bail!(msg),
        response => println!("{response}"),
    }
    Ok(())
}

fn send_request(socket: &Path, line: &str) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(socket).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to polarboard at {}: {}. Is `polarboard serve` running?",
            socket.display(),
            e
        )
    })?;

    writeln!(stream, "{}", line)?;
    let mut reply = String::new();
    BufReader::new(&stream).read_line(&mut reply)?;
    print!("{reply}");
    Ok(())
}
