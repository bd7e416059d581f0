//! The pion server binary: mounts the volume, then serves the line
//! protocol over TCP with one worker thread per connected client.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use clap::Parser;
use pion::{FileDisk, FsManager, Reply, VOLUME_SIZE, handle_line};

#[derive(Parser)]
#[command(about = "A tiny single-volume file store served over TCP.")]
struct Args {
    /// Backing volume file; created zero-filled if absent.
    #[arg(short, long, default_value = "pion.vol")]
    volume: PathBuf,

    #[arg(short, long, default_value_t = 12345)]
    port: u16,

    /// Total volume size in bytes; must match the fixed geometry.
    #[arg(long, default_value_t = VOLUME_SIZE)]
    size: usize,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let fs = match FsManager::open(&args.volume, args.size) {
        Ok(fs) => Arc::new(fs),
        Err(err) => {
            log::error!("cannot mount volume {}: {err}", args.volume.display());
            std::process::exit(1);
        }
    };

    let listener = match TcpListener::bind(("0.0.0.0", args.port)) {
        Ok(listener) => listener,
        Err(err) => {
            log::error!("cannot listen on port {}: {err}", args.port);
            std::process::exit(1);
        }
    };
    log::info!(
        "serving {} on port {}",
        args.volume.display(),
        args.port
    );

    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                let fs = Arc::clone(&fs);
                thread::spawn(move || {
                    if let Err(err) = serve_client(&fs, stream) {
                        log::debug!("client connection ended with error: {err}");
                    }
                });
            }
            Err(err) => log::warn!("accept failed: {err}"),
        }
    }
}

fn serve_client(fs: &FsManager<FileDisk>, mut stream: TcpStream) -> std::io::Result<()> {
    let peer = stream.peer_addr()?;
    log::info!("client connected: {peer}");

    let mut reader = BufReader::new(stream.try_clone()?);
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        let reply = handle_line(fs, line.trim_end_matches(['\r', '\n']));
        stream.write_all(reply.text().as_bytes())?;
        stream.write_all(b"\n")?;
        if matches!(reply, Reply::Quit(_)) {
            break;
        }
    }

    log::info!("client disconnected: {peer}");
    Ok(())
}
