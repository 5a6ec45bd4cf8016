use clap::Parser;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

use csmacd_rs::mac::SimEvent;
use csmacd_rs::sim::{
    Command, JsonLinesSink, Runner, SimConfig, Simulation, TracingSink, spawn_ticker,
};
use csmacd_rs::ui::progress::{ProgressManager, templates};
use csmacd_rs::ui::{self, render_nodes};
use csmacd_rs::utils::consts::TICK_INTERVAL_MS;
use csmacd_rs::utils::logging::init_logging;

#[derive(Parser)]
#[command(author, version, about = "CSMA/CD shared-medium simulation", long_about = None)]
struct Cli {
    /// JSON config file (num_nodes, collision_probability, max_backoff)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of nodes
    #[arg(short, long)]
    nodes: Option<usize>,

    /// Chance of a collision per transmitting tick (0.0-1.0)
    #[arg(short = 'p', long)]
    collision_probability: Option<f64>,

    /// Exclusive upper bound of a backoff draw
    #[arg(short = 'b', long)]
    max_backoff: Option<u32>,

    /// RNG seed, for reproducible runs
    #[arg(short, long)]
    seed: Option<u64>,

    /// Tick interval (ms)
    #[arg(short, long, default_value_t = TICK_INTERVAL_MS)]
    tick_ms: u64,

    /// Stop after this many ticks (0 = until Ctrl-C)
    #[arg(long, default_value_t = 0)]
    ticks: u64,

    /// Send a packet automatically every N ticks (0 = never)
    #[arg(long, default_value_t = 0)]
    send_every: u64,

    /// Read stdin: each line sends a packet, "q" quits
    #[arg(short, long)]
    interactive: bool,

    /// Print events as JSON lines on stdout
    #[arg(long)]
    json: bool,
}

fn load_config(cli: &Cli) -> Result<SimConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => SimConfig::from_json_file(path)?,
        None => SimConfig::default(),
    };
    if let Some(n) = cli.nodes {
        config.num_nodes = n;
    }
    if let Some(p) = cli.collision_probability {
        config.collision_probability = p;
    }
    if let Some(b) = cli.max_backoff {
        config.max_backoff = b;
    }
    config.validate()?;
    Ok(config)
}

fn spawn_stdin_reader(tx: crossbeam_channel::Sender<Command>) {
    thread::spawn(move || {
        info!("Press Enter to send a packet, \"q\" to quit.");
        for line in io::stdin().lock().lines() {
            let command = match line {
                Ok(line) if line.trim() == "q" => Command::Shutdown,
                Ok(_) => Command::SendPacket,
                Err(err) => {
                    warn!("stdin closed: {}", err);
                    break;
                }
            };
            if tx.send(command).is_err() || command == Command::Shutdown {
                break;
            }
        }
    });
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let cli = Cli::parse();
    if !cli.json {
        ui::print_banner();
    }

    let config = load_config(&cli)?;
    let mut sim = match cli.seed {
        Some(seed) => {
            info!("Using seed {}", seed);
            Simulation::with_seed(config, seed)?
        }
        None => Simulation::from_entropy(config)?,
    };
    let show_bar = cli.ticks > 0 && !cli.json;
    // With a bar on screen, events are logged from the frame callback under
    // `suspend` so they don't overwrite it.
    let (event_tx, event_rx) = crossbeam_channel::unbounded::<SimEvent>();
    if cli.json {
        sim.subscribe(JsonLinesSink::new(io::stdout()));
    } else if show_bar {
        sim.subscribe(event_tx);
    } else {
        sim.subscribe(TracingSink);
    }

    let (tx, rx) = crossbeam_channel::unbounded::<Command>();
    let running = Arc::new(AtomicBool::new(true));

    let r = running.clone();
    let ctrlc_tx = tx.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
        let _ = ctrlc_tx.send(Command::Shutdown);
    })?;

    let ticker = spawn_ticker(
        tx.clone(),
        Duration::from_millis(cli.tick_ms),
        running.clone(),
    );
    if cli.interactive {
        spawn_stdin_reader(tx.clone());
    }
    drop(tx);

    let progress_manager = ProgressManager::new();
    if show_bar {
        progress_manager.create_bar(
            "ticks",
            cli.ticks,
            templates::TICKS,
            &render_nodes(&sim.snapshot()),
        )?;
    }

    let runner = Runner::new(sim, rx)
        .send_every(cli.send_every)
        .max_ticks(cli.ticks);
    let sim = runner.run(|sim| {
        let row = render_nodes(&sim.snapshot());
        if show_bar {
            progress_manager.suspend(|| {
                for event in event_rx.try_iter() {
                    info!("{}", event);
                }
            });
            let _ = progress_manager.set_position("ticks", sim.ticks());
            let _ = progress_manager.set_message("ticks", &row);
        } else if !cli.json {
            info!("{}", row);
        }
    })?;

    running.store(false, Ordering::SeqCst);
    if ticker.join().is_err() {
        warn!("Ticker thread panicked");
    }
    progress_manager.finish_all();

    let stats = sim.stats();
    if cli.json {
        println!("{}", serde_json::to_string(&stats)?);
    } else {
        info!(
            "Done: {} ticks, {} transmissions, {} successes, {} collisions, {} dropped send requests",
            stats.ticks,
            stats.transmissions_started,
            stats.successes,
            stats.collisions,
            stats.injections_dropped
        );
    }
    Ok(())
}
