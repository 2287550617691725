use clap::Parser;
use relm4::prelude::*;
use rondel::config;
use rondel::gui::app::AppModel;
use rondel::gui::knob::{LabelText, State};
use rondel::sys::runtime;

#[derive(Parser, Debug)]
#[command(name = "rondel", version, about = "Rotary knob selector", long_about = None)]
struct Cli {
    /// Comma-separated label list, overriding the config file
    #[arg(short, long, value_delimiter = ',')]
    labels: Option<Vec<String>>,

    /// Caption shown below the dial
    #[arg(short, long)]
    caption: Option<String>,

    /// Initially selected index, clamped into range
    #[arg(short, long)]
    initial: Option<usize>,

    /// Write the commented default config file and exit
    #[arg(long)]
    write_config: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if cli.write_config {
        match config::write_default_config() {
            Ok(path) => println!("{}", path.display()),
            Err(e) => {
                log::error!("Failed to write default config: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let mut cfg = config::load_or_setup();
    if let Some(labels) = cli.labels {
        cfg.labels = labels.into_iter().map(LabelText::new).collect();
    }
    if let Some(caption) = cli.caption {
        cfg.caption = caption;
    }
    if let Some(initial) = cli.initial {
        cfg.initial = initial;
    }

    let state = State::new(cfg.labels.clone(), cfg.initial);

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx);

    let app = RelmApp::new("dev.rondel.rondel");

    // GTK must not see our own CLI arguments.
    app.with_args(Vec::new()).run::<AppModel>((state, cfg, rx));
}
