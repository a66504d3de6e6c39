//! geopeer-ctl: command-line client for the geopeer daemon.

mod cmd;

use anyhow::{Context, Result};

use cmd::peer::{PutOptions, cmd_put, cmd_read, parse_coord};
use cmd::status::cmd_status;

const DEFAULT_URL: &str = "http://127.0.0.1:8000";

fn print_usage() {
    println!("Usage: geopeer-ctl [--url <base>] <command>");
    println!();
    println!("Commands:");
    println!("  status                                 Show registry status");
    println!("  put <peer_id> <longitude> <latitude>   Register a peer");
    println!("      [--addr <addr>] [--credential <c>]");
    println!("  read <longitude> <latitude> <radius>   List peers within radius (meters)");
    println!();
    println!("Options:");
    println!("  --url <base>   Daemon base URL (default: {})", DEFAULT_URL);
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let mut base = std::env::var("GEOPEER_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());
    let mut remaining: Vec<&str> = Vec::new();
    let mut i = 0;
    while i < args.len() {
        if args[i] == "--url" {
            i += 1;
            base = args.get(i).context("--url requires a value")?.clone();
        } else {
            remaining.push(&args[i]);
        }
        i += 1;
    }

    match remaining.as_slice() {
        ["status"] | [] => cmd_status(&base).await,
        ["put", peer_id, lng, lat, rest @ ..] => {
            let opts = PutOptions::parse(rest)?;
            cmd_put(
                &base,
                peer_id,
                parse_coord("longitude", lng)?,
                parse_coord("latitude", lat)?,
                &opts,
            )
            .await
        }
        ["read", lng, lat, radius] => {
            cmd_read(
                &base,
                parse_coord("longitude", lng)?,
                parse_coord("latitude", lat)?,
                parse_coord("radius", radius)?,
            )
            .await
        }
        ["help"] | ["--help"] | ["-h"] => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {}", other.join(" "));
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}
