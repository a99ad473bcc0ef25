//! armonizador: drive armonizador instances from a message script

mod config;
mod script;

use std::io::{Read, Write};

use anyhow::Context;
use armonizador_services::{InstanceId, Runtime};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::HostConfig;
use script::Command;

fn main() -> anyhow::Result<()> {
    let config = config::load_config();

    // Logs go to stderr; stdout carries outlet values
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(config.logging.filter.parse().context("invalid logging filter")?))
        .init();

    info!(config = %config::config_path().display(), "Starting armonizador");

    let text = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).context("reading stdin")?;
            buf
        }
    };
    let commands = script::parse_script(&text)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(&commands, &config.host, &mut out)
}

fn run<W: Write>(commands: &[Command], host: &HostConfig, out: &mut W) -> anyhow::Result<()> {
    let mut runtime = Runtime::new();
    runtime.setup();
    let mut id = runtime.create(&host.class)?;

    for command in commands {
        match command {
            Command::Send(text) => {
                if host.echo_messages {
                    writeln!(out, "> {text}")?;
                }
                if let Err(e) = runtime.send_text(id, text) {
                    error!("{e}");
                }
            }
            Command::Wait(ms) => {
                runtime.advance(*ms);
            }
            Command::State => {
                let state = runtime.state(id)?;
                writeln!(out, "{}", serde_json::to_string(state)?)?;
            }
            Command::Reset => {
                id = recreate(&mut runtime, id, &host.class)?;
            }
        }
        for event in runtime.take_events() {
            writeln!(out, "out {}", event.value)?;
        }
    }

    runtime.destroy(id)?;
    Ok(())
}

fn recreate(runtime: &mut Runtime, id: InstanceId, class: &str) -> anyhow::Result<InstanceId> {
    runtime.destroy(id)?;
    Ok(runtime.create(class)?)
}
