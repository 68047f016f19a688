//! tau CLI: inspect codec tables and stored recording URLs.
//!
//! Commands:
//!   tau codecs [--json]         List every codec table row
//!   tau mime <codec|index>      MIME type for a codec
//!   tau format <codec|index>    Container tag for a codec
//!   tau infer <file>            Guess a recording's codec from its name
//!   tau encoder <codec|index> <mime>...
//!                               Can a recorder with these MIME types encode it?
//!   tau decoder <codec|index> <mime>...
//!                               Can a player with these MIME types decode it?
//!   tau url </path>             Stored URL for a recording path
//!   tau save </path> <url>      Store a recording URL
//!   tau delete </path>          Delete a stored recording URL
//!   tau version                 Print the release version
//!
//! Record paths must start with `/` and live in the persistent store under
//! `$TAU_SOUND_ROOT` (default `~/.tau_sound`). Session-scoped paths and
//! the last URL path only last for one process, so the CLI rejects them.

use tau_core::registry::{self, CodecRef, MimeList};
use tau_core::{Codec, Config, RecordSession, StorageScope};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        print_usage();
        return;
    }

    match args[0].as_str() {
        "codecs" => cmd_codecs(&args[1..]),
        "mime" => cmd_mime(&args[1..]),
        "format" => cmd_format(&args[1..]),
        "infer" => cmd_infer(&args[1..]),
        "encoder" => cmd_supported(&args[1..], "encoder"),
        "decoder" => cmd_supported(&args[1..], "decoder"),
        "url" => {
            if let Some(path) = record_path(&args[1..], "url </path>") {
                with_session(|s| cmd_url(s, path));
            }
        }
        "save" => {
            let url = args.get(2);
            match (record_path(&args[1..], "save </path> <url>"), url) {
                (Some(path), Some(url)) => with_session(|s| cmd_save(s, path, url)),
                (Some(_), None) => eprintln!("usage: tau save </path> <url>"),
                (None, _) => {}
            }
        }
        "delete" => {
            if let Some(path) = record_path(&args[1..], "delete </path>") {
                with_session(|s| cmd_delete(s, path));
            }
        }
        "version" => println!("tau {}", tau_core::VERSION),
        other => {
            eprintln!("unknown command: {}", other);
            print_usage();
        }
    }
}

// ---------------------------------------------------------------------------
// Codec commands
// ---------------------------------------------------------------------------

fn cmd_codecs(args: &[String]) {
    let entries = registry::entries();
    if args.first().map(String::as_str) == Some("--json") {
        println!("{}", serde_json::to_string_pretty(&entries).unwrap_or_default());
        return;
    }
    for entry in entries {
        let format = if entry.format.is_empty() { "-" } else { entry.format.as_str() };
        println!(
            "{:>2}  {:<12} {:<26} {}",
            entry.index,
            entry.codec.name(),
            entry.mime_type,
            format,
        );
    }
}

fn cmd_mime(args: &[String]) {
    let Some(codec) = parse_codec_arg(args, "mime") else { return };
    match registry::mime_for(codec) {
        Ok(mime) => println!("{}", mime),
        Err(e) => eprintln!("{}", e),
    }
}

fn cmd_format(args: &[String]) {
    let Some(codec) = parse_codec_arg(args, "format") else { return };
    match registry::format_for(codec) {
        Ok("") => println!("(none)"),
        Ok(format) => println!("{}", format),
        Err(e) => eprintln!("{}", e),
    }
}

fn cmd_infer(args: &[String]) {
    if args.is_empty() {
        eprintln!("usage: tau infer <file>");
        return;
    }
    match registry::codec_for_path(&args[0]) {
        Some(codec) => println!(
            "{}  {}",
            codec,
            registry::mime_for(codec).unwrap_or_default()
        ),
        None => println!("unknown codec for: {}", args[0]),
    }
}

/// `tau encoder|decoder <codec|index> <mime>...`: the MIME types are what
/// the host reports it can handle.
fn cmd_supported(args: &[String], cmd: &str) {
    let Some(codec) = parse_codec_arg(args, cmd) else { return };
    let host = MimeList(args[1..].to_vec());
    let result = if cmd == "encoder" {
        registry::is_encoder_supported(codec, &host)
    } else {
        registry::is_decoder_supported(codec, &host)
    };
    match result {
        Ok(true) => println!("supported"),
        Ok(false) => println!("unsupported"),
        Err(e) => eprintln!("{}", e),
    }
}

// ---------------------------------------------------------------------------
// Record commands
// ---------------------------------------------------------------------------

fn cmd_url(session: &RecordSession, path: &str) {
    match session.get_record_url(Some(path)) {
        Some(url) => println!("{}", url),
        None => println!("no record for: {}", path),
    }
}

fn cmd_save(session: &RecordSession, path: &str, url: &str) {
    if let Err(e) = session.save_record_url(path, url) {
        eprintln!("save failed: {}", e);
    }
}

fn cmd_delete(session: &RecordSession, path: &str) {
    match session.delete_record(Some(path)) {
        Ok(true) => println!("deleted"),
        Ok(false) => println!("no record for: {}", path),
        Err(e) => eprintln!("delete failed: {}", e),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn with_session(f: impl FnOnce(&RecordSession)) {
    let config = Config::from_env(tau_core::config::DEFAULT_APP);
    log::debug!("tau: store root {}", config.root.display());
    match RecordSession::open(&config) {
        Ok(session) => f(&session),
        Err(e) => eprintln!("failed to open store under {}: {}", config.root.display(), e),
    }
}

/// First argument as a persistent record path. Missing, empty and
/// session-scoped paths are reported on stderr.
fn record_path<'a>(args: &'a [String], usage: &str) -> Option<&'a str> {
    match args.first().map(String::as_str) {
        None | Some("") => {
            eprintln!("usage: tau {}", usage);
            None
        }
        Some(path) if StorageScope::of_path(path) == StorageScope::Session => {
            eprintln!(
                "{}: session paths do not outlive one run; use a path starting with '/'",
                path
            );
            None
        }
        Some(path) => Some(path),
    }
}

/// Accepts a table index or a codec name.
fn parse_codec_arg(args: &[String], cmd: &str) -> Option<CodecRef> {
    let Some(arg) = args.first() else {
        eprintln!("usage: tau {} <codec|index>", cmd);
        return None;
    };
    if let Ok(i) = arg.parse::<usize>() {
        return Some(CodecRef::Index(i));
    }
    match arg.parse::<Codec>() {
        Ok(codec) => Some(CodecRef::Codec(codec)),
        Err(e) => {
            eprintln!("{}", e);
            None
        }
    }
}

fn print_usage() {
    println!("tau - codec and recording lookup");
    println!();
    println!("usage: tau <command> [args]");
    println!();
    println!("commands:");
    println!("  codecs [--json]        List every codec table row");
    println!("  mime <codec|index>     MIME type for a codec");
    println!("  format <codec|index>   Container tag for a codec");
    println!("  infer <file>           Guess a recording's codec from its name");
    println!("  encoder <codec|index> <mime>...");
    println!("                         Can a recorder with these MIME types encode it?");
    println!("  decoder <codec|index> <mime>...");
    println!("                         Can a player with these MIME types decode it?");
    println!("  url </path>            Stored URL for a recording path");
    println!("  save </path> <url>     Store a recording URL");
    println!("  delete </path>         Delete a stored recording URL");
    println!("  version                Print the release version");
    println!();
    println!("record paths must start with '/'");
}
