use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use midimix_core::midi::{self, MidimixSurface};
use midimix_core::osc::OscClient;
use midimix_core::{BridgeResult, Config, Dispatcher, TraceFlags};

#[derive(Parser, Debug)]
#[command(name = "midimix-bridge")]
#[command(about = "AKAI MIDIMIX control surface for the Ardour mixer and the x42 EQ")]
struct Args {
    /// Log at debug level
    #[arg(long)]
    debug: bool,

    /// Log every control event from the surface
    #[arg(long)]
    debug_controls: bool,

    /// Log every OSC message sent and received
    #[arg(long)]
    debug_osc: bool,

    /// All of the above
    #[arg(long)]
    debug_all: bool,

    /// Print the available MIDI ports and exit
    #[arg(long)]
    list_ports: bool,

    /// MIDI input port (substring match)
    #[arg(long, value_name = "NAME")]
    midimix_in: Option<String>,

    /// MIDI output port (substring match)
    #[arg(long, value_name = "NAME")]
    midimix_out: Option<String>,

    /// Ardour OSC address for both the mixer and the EQ
    #[arg(long, value_name = "HOST:PORT")]
    ardour: Option<String>,

    /// Config file instead of the one in the user config directory
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

impl Args {
    fn trace(&self) -> TraceFlags {
        TraceFlags {
            controls: self.debug_controls || self.debug_all,
            osc: self.debug_osc || self.debug_all,
        }
    }

    fn verbose(&self) -> bool {
        self.debug || self.debug_controls || self.debug_osc || self.debug_all
    }
}

fn init_logging(verbose: bool) {
    use simplelog::{
        ColorChoice, CombinedLogger, Config as LogConfig, LevelFilter, SharedLogger, TermLogger,
        TerminalMode, WriteLogger,
    };

    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };

    let log_path = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("midimix")
        .join("midimix.log");

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        log_level,
        LogConfig::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];
    match File::create(&log_path) {
        Ok(file) => loggers.push(WriteLogger::new(log_level, LogConfig::default(), file)),
        Err(e) => eprintln!("cannot write {}: {}", log_path.display(), e),
    }
    if let Err(e) = CombinedLogger::init(loggers) {
        eprintln!("logger already initialised: {}", e);
    }

    log::info!("midimix-bridge starting (log level: {:?})", log_level);
}

fn print_ports(config: &Config) -> BridgeResult {
    let (inputs, outputs) = midi::list_ports(config.client_name())?;
    println!("MIDI inputs:");
    for port in inputs {
        println!("  {}: {}", port.index, port.name);
    }
    println!("MIDI outputs:");
    for port in outputs {
        println!("  {}: {}", port.index, port.name);
    }
    Ok(())
}

fn load_config(args: &Args) -> Config {
    let mut config = match &args.config {
        Some(path) => Config::load_from(Some(path.as_path())),
        None => Config::load(),
    };
    if let Some(name) = &args.midimix_in {
        config.set_input_port(name);
    }
    if let Some(name) = &args.midimix_out {
        config.set_output_port(name);
    }
    if let Some(addr) = &args.ardour {
        config.set_ardour_addr(addr);
    }
    config
}

fn run(args: &Args, config: &Config) -> BridgeResult {
    let surface =
        MidimixSurface::connect(config.client_name(), config.input_port(), config.output_port())?;
    let transport = OscClient::new(
        config.bind_addr()?,
        config.mixer_addr()?,
        config.eq_addr()?,
        config.poll_timeout(),
    )?;

    let running = Arc::new(AtomicBool::new(true));
    let handler_flag = Arc::clone(&running);
    if let Err(e) = ctrlc::set_handler(move || handler_flag.store(false, Ordering::SeqCst)) {
        log::warn!("cannot install signal handler: {}", e);
    }

    let mut dispatcher =
        Dispatcher::new(config.mapping(), surface, transport, config.announcement())
            .with_trace(args.trace());
    dispatcher.run(&running);
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose());

    let config = load_config(&args);

    let result = if args.list_ports {
        print_ports(&config)
    } else {
        run(&args, &config)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("midimix-bridge: {}", e);
            ExitCode::FAILURE
        }
    }
}
