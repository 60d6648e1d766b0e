//! Command-line argument parsing for the feed decoder binary

use std::env;

#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Read AVR lines from this file; '-' for stdin.
    pub filename: Option<String>,
    /// Accept AVR lines from TCP clients on this port.
    pub listen_port: Option<u16>,
    /// Emit decoded messages as JSON instead of text.
    pub json: bool,
    /// Echo the raw frame hex alongside each decoded message.
    pub raw: bool,
    /// Print receiver statistics when the input is exhausted.
    pub stats: bool,
}

impl Config {
    pub fn from_args() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut config = Config::default();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--ifile" => {
                    i += 1;
                    config.filename = args.get(i).cloned();
                }
                "--listen-port" => {
                    i += 1;
                    config.listen_port = args.get(i).and_then(|s| s.parse().ok());
                }
                "--json" => config.json = true,
                "--raw" => config.raw = true,
                "--stats" => config.stats = true,
                "--help" => {
                    print_help();
                    std::process::exit(0);
                }
                _ => {
                    eprintln!("Unknown option: {}", args[i]);
                    print_help();
                    std::process::exit(1);
                }
            }
            i += 1;
        }

        config
    }
}

fn print_help() {
    println!(
        r#"modes1090 - Mode S downlink format decoder

Usage: modes1090 [OPTIONS]

Options:
  --ifile <filename>    Read AVR frames from a file (use '-' for stdin)
  --listen-port <port>  Accept AVR frames from TCP clients (e.g. 30001)
  --json                Emit decoded messages as JSON
  --raw                 Echo the raw frame hex with each message
  --stats               Print receiver statistics at exit
  --help                Show this help
"#
    );
}
