//! modes1090 feed decoder
//!
//! Reads AVR-framed Mode S replies from a file, stdin, or TCP clients,
//! decodes them, and prints the result per frame.

mod config;

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{Receiver, Sender, bounded};
use tokio::io::AsyncBufReadExt;
use tokio::net::TcpListener;
use tracing::{Level, debug, error, info};
use tracing_subscriber::FmtSubscriber;

use modes1090::feed::{AvrFrame, parse_avr_frame};
use modes1090::{ModeSTranslator, ReceiverStatistics};

use crate::config::Config;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_args();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    if config.filename.is_none() && config.listen_port.is_none() {
        eprintln!("Nothing to decode: pass --ifile or --listen-port");
        std::process::exit(1);
    }

    let statistics = Arc::new(ReceiverStatistics::new());
    let (frame_tx, frame_rx): (Sender<AvrFrame>, Receiver<AvrFrame>) = bounded(1024);

    // One translator per decode thread; the statistics are the shared part.
    let decoder_statistics = Arc::clone(&statistics);
    let decoder_config = config.clone();
    let decoder = thread::spawn(move || {
        decode_frames(frame_rx, decoder_statistics, decoder_config);
    });

    if let Some(port) = config.listen_port {
        let rt = tokio::runtime::Runtime::new()?;
        let tx = frame_tx.clone();
        rt.block_on(async {
            tokio::select! {
                result = run_raw_input_server(port, tx) => {
                    if let Err(e) = result {
                        error!("Raw input server error: {}", e);
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutting down");
                }
            }
        });
    } else if let Some(ref filename) = config.filename {
        read_frames_from_file(filename, &frame_tx)?;
    }

    drop(frame_tx);
    decoder.join().expect("decode thread panicked");

    if config.stats {
        print!("{}", statistics.snapshot());
    }

    Ok(())
}

fn decode_frames(rx: Receiver<AvrFrame>, statistics: Arc<ReceiverStatistics>, config: Config) {
    let mut translator = ModeSTranslator::new();
    translator.set_statistics(statistics);

    while let Ok(frame) = rx.recv() {
        let decoded = match translator.translate(&frame.bytes, 0, None, frame.is_mlat) {
            Ok(decoded) => decoded,
            Err(e) => {
                // Wiring bug, not bad input; nothing downstream can recover.
                error!("Decoder misconfigured: {}", e);
                break;
            }
        };

        let Some(message) = decoded else {
            debug!("Dropped truncated frame of {} bytes", frame.bytes.len());
            continue;
        };

        if config.raw {
            println!("{}", raw_string(&frame.bytes));
        }
        if config.json {
            match serde_json::to_string(&message) {
                Ok(json) => println!("{}", json),
                Err(e) => error!("JSON encoding failed: {}", e),
            }
        } else {
            print!("{}", message);
        }
    }
}

fn read_frames_from_file(
    filename: &str,
    tx: &Sender<AvrFrame>,
) -> Result<(), Box<dyn std::error::Error>> {
    let reader: Box<dyn BufRead> = if filename == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        info!("Reading from file: {}", filename);
        Box::new(BufReader::new(File::open(filename)?))
    };

    for line in reader.lines() {
        let line = line?;
        if let Some(frame) = parse_avr_frame(&line) {
            if tx.send(frame).is_err() {
                break;
            }
        }
    }
    Ok(())
}

async fn run_raw_input_server(
    port: u16,
    tx: Sender<AvrFrame>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let listener = TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("Raw input server listening on port {}", port);

    loop {
        let (socket, addr) = listener.accept().await?;
        debug!("Raw input client connected: {}", addr);
        let tx = tx.clone();

        tokio::spawn(async move {
            let reader = tokio::io::BufReader::new(socket);
            let mut lines = reader.lines();

            while let Ok(Some(line)) = lines.next_line().await {
                if let Some(frame) = parse_avr_frame(&line) {
                    if tx.try_send(frame).is_err() {
                        debug!("Decode queue full, dropping frame from {}", addr);
                    }
                }
            }
            debug!("Raw input client disconnected: {}", addr);
        });
    }
}

fn raw_string(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2 + 2);
    s.push('*');
    for b in bytes {
        s.push_str(&format!("{:02X}", b));
    }
    s.push(';');
    s
}
