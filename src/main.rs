// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! kscapture CLI - offline replay and inspection
//!
//! Runs recorded traffic events through the capture pipeline and inspects
//! the argument parser, cookie aggregation and the JSON store.

use std::env;
use std::process::ExitCode;

use anyhow::{bail, Context};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use kscapture::http::canonicalize;
use kscapture::{
    CaptureConfig, CapturePipeline, CookieOptions, JsonFileStore, LogNotifier, ReplayContext,
    SaltOptions, TrafficEvent,
};

const DEFAULT_STORE: &str = "kscapture-store.json";

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = "kscapture=info".parse::<Directive>() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    let result = match args[1].as_str() {
        "replay" => {
            if args.len() < 3 {
                eprintln!("Usage: kscapture replay <event.json> [--args <string>] [--store <path>]");
                return ExitCode::from(1);
            }
            replay(&args[2], &args[3..]).await
        }
        "args" => {
            if args.len() < 3 {
                eprintln!("Usage: kscapture args <string>");
                return ExitCode::from(1);
            }
            show_args(&args[2]);
            Ok(())
        }
        "cookie" => {
            if args.len() < 3 {
                eprintln!("Usage: kscapture cookie <header-value>...");
                return ExitCode::from(1);
            }
            show_cookie(&args[2..]);
            Ok(())
        }
        "show" => show_store(&args[2..]),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-v" | "version" => {
            println!("kscapture {}", kscapture::VERSION);
            Ok(())
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            return ExitCode::from(1);
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"kscapture - Proxy-script capture of Kuaishou salts and cookies

USAGE:
    kscapture <COMMAND> [OPTIONS]

COMMANDS:
    replay <event.json>     Run a recorded traffic event through the pipeline
        --args <string>     Script argument string (default: empty)
        --store <path>      JSON store file (default: kscapture-store.json)
    args <string>           Show how an argument string is decoded
    cookie <value>...       Merge cookie header values into one cookie string
    show [--store <path>]   List stored keys and values
    help                    Show this help message
    version                 Show version information

EXAMPLES:
    kscapture replay login.json --args "notifyAlways=on&clipboard=off"
    kscapture args "cookie_storeKey=KS_ALT&delay=1500"
    kscapture cookie "a=1; b=2" "a=9; c"
    kscapture show --store ./kscapture-store.json
"#
    );
}

/// Parse `--args` / `--store` flags
fn parse_flags(flags: &[String]) -> anyhow::Result<(String, String)> {
    let mut argument = String::new();
    let mut store = DEFAULT_STORE.to_string();

    let mut iter = flags.iter();
    while let Some(flag) = iter.next() {
        match flag.as_str() {
            "--args" => {
                argument = iter.next().context("--args needs a value")?.clone();
            }
            "--store" => {
                store = iter.next().context("--store needs a value")?.clone();
            }
            other => bail!("Unknown option: {}", other),
        }
    }

    Ok((argument, store))
}

async fn replay(event_path: &str, flags: &[String]) -> anyhow::Result<()> {
    let (argument, store_path) = parse_flags(flags)?;

    let event = TrafficEvent::from_file(event_path)
        .with_context(|| format!("Failed to load event {}", event_path))?;
    let store = JsonFileStore::open(&store_path)
        .with_context(|| format!("Failed to open store {}", store_path))?;

    println!("Replaying: {}", event.url);

    let pipeline = CapturePipeline::new(store, LogNotifier);
    let mut ctx = ReplayContext::new(event, argument);
    let report = pipeline.handle(&mut ctx).await;

    println!("\n=== Capture ===");
    println!("Kind: {}", report.kind);
    match report.changed {
        Some(changed) => println!("Changed: {}", changed),
        None => println!("Changed: - (nothing stored)"),
    }

    if let Some(payload) = &report.notification {
        println!("\n=== Notification ===");
        println!("Title: {}", payload.title);
        if !payload.subtitle.is_empty() {
            println!("Subtitle: {}", payload.subtitle);
        }
        println!("Body: {}", payload.body);
        if let Some(clipboard) = payload.clipboard() {
            println!("Clipboard: {} chars", clipboard.chars().count());
        }
        if payload.delay_ms > 0.0 {
            println!("Delay: {}ms", payload.delay_ms);
        }
    }

    if let Some(error) = &report.error {
        println!("\n=== Error ===");
        println!("{}", error);
    }

    println!("\n=== Done ===");
    match &report.done.body {
        Some(body) => println!("Forwarded body: {} bytes", body.len()),
        None => println!("Forwarded body: none"),
    }
    println!("Store: {}", pipeline.store().inner().path().display());

    Ok(())
}

fn show_args(raw: &str) {
    let config = CaptureConfig::parse(raw);

    println!("=== Arguments ({}) ===", config.len());
    for (key, value) in config.iter() {
        println!("  {} = {:?}", key, value);
    }

    let salt = SaltOptions::from_config(&config);
    println!("\n=== Salt ===");
    println!("{:#?}", salt);

    let cookie = CookieOptions::from_config(&config);
    println!("\n=== Cookie ===");
    println!("{:#?}", cookie);
}

fn show_cookie(segments: &[String]) {
    let cookie = canonicalize(segments);
    if cookie.is_empty() {
        println!("(empty)");
    } else {
        println!("{}", cookie);
    }
}

fn show_store(flags: &[String]) -> anyhow::Result<()> {
    let (_, store_path) = parse_flags(flags)?;
    let store = JsonFileStore::open(&store_path)
        .with_context(|| format!("Failed to open store {}", store_path))?;

    let entries = store.entries();
    println!("=== {} ({} keys) ===", store_path, entries.len());
    for (key, value) in entries {
        println!("  {} = {}", key, value);
    }

    Ok(())
}
