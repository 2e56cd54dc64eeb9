//! recapify CLI: transcribe a recording and produce time-windowed summaries.
//!
//! Usage:
//!   recapify --file meeting.wav --user u-42 --title "Weekly sync" [--diarize]
//!   recapify --url https://host/audio.mp3 --summary-id <pending id>
//!   recapify --pending u-42 --title "Weekly sync"
//!   recapify --list u-42 | --titles u-42 | --show <id> | --delete <id>

use std::path::Path;

use recapify::config::PipelineConfig;
use recapify::pipeline::{Orchestrator, PersistenceTarget};
use recapify::store::{ResultStore, SqliteStore};
use recapify::summarizer::{OpenAiAdapter, Summarizer};
use recapify::transcription::{AudioSource, DeepgramAdapter};
use recapify::TranscriptionOverrides;

#[derive(Debug, Default)]
struct CliArgs {
    file: Option<String>,
    url: Option<String>,
    title: Option<String>,
    user: Option<String>,
    summary_id: Option<String>,
    diarize: bool,
    language: Option<String>,
    model: Option<String>,
    no_smart_format: bool,
    pending: Option<String>,
    list: Option<String>,
    titles: Option<String>,
    show: Option<String>,
    delete: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let args = parse_args(std::env::args().skip(1));
    let Some(args) = args else {
        print_usage();
        return Ok(());
    };

    let store = SqliteStore::open_default()?;

    // Record CRUD paths run without provider credentials.
    if let Some(user_id) = &args.pending {
        let title = args.title.as_deref().unwrap_or("Untitled");
        let record = store.create_pending(user_id, title)?;
        println!(
            "{}",
            serde_json::json!({ "id": record.id, "status": record.status })
        );
        return Ok(());
    }
    if let Some(user_id) = &args.list {
        let records = store.list_by_owner(user_id)?;
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }
    if let Some(user_id) = &args.titles {
        let titles = store.list_titles(user_id)?;
        println!("{}", serde_json::to_string_pretty(&titles)?);
        return Ok(());
    }
    if let Some(id) = &args.show {
        match store.get(id)? {
            Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
            None => eprintln!("No record with id {}", id),
        }
        return Ok(());
    }
    if let Some(id) = &args.delete {
        store.delete(id)?;
        println!("Deleted {}", id);
        return Ok(());
    }

    let source = match (&args.file, &args.url) {
        (Some(path), None) => {
            let bytes = std::fs::read(path)?;
            AudioSource::File {
                bytes,
                mime_type: mime_for_path(path).to_string(),
            }
        }
        (None, Some(url)) => AudioSource::RemoteUrl(url.clone()),
        _ => {
            eprintln!("Provide exactly one of --file or --url.");
            print_usage();
            std::process::exit(2);
        }
    };

    let transcriber =
        DeepgramAdapter::from_env().ok_or("DEEPGRAM_API_KEY is not set")?;
    let llm = OpenAiAdapter::from_env().ok_or("OPENAI_API_KEY is not set")?;

    let orchestrator = Orchestrator::new(
        Box::new(transcriber),
        Summarizer::new(Box::new(llm)),
        Box::new(store),
        PipelineConfig::from_env(),
    );

    let overrides = TranscriptionOverrides {
        diarize: if args.diarize { Some(true) } else { None },
        language: args.language.clone(),
        model: args.model.clone(),
        smart_format: if args.no_smart_format { Some(false) } else { None },
    };

    let target = match (&args.summary_id, &args.user) {
        (Some(id), _) => PersistenceTarget::Record(id.clone()),
        (None, Some(user_id)) => PersistenceTarget::Owner {
            user_id: user_id.clone(),
            title: args.title.clone().unwrap_or_else(|| "Untitled".to_string()),
        },
        (None, None) => PersistenceTarget::None,
    };

    let output = orchestrator.run(&source, &overrides, &target).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Option<CliArgs> {
    let mut parsed = CliArgs::default();
    let mut any = false;

    while let Some(arg) = args.next() {
        any = true;
        match arg.as_str() {
            "--file" => parsed.file = args.next(),
            "--url" => parsed.url = args.next(),
            "--title" => parsed.title = args.next(),
            "--user" => parsed.user = args.next(),
            "--summary-id" => parsed.summary_id = args.next(),
            "--diarize" => parsed.diarize = true,
            "--language" => parsed.language = args.next(),
            "--model" => parsed.model = args.next(),
            "--no-smart-format" => parsed.no_smart_format = true,
            "--pending" => parsed.pending = args.next(),
            "--list" => parsed.list = args.next(),
            "--titles" => parsed.titles = args.next(),
            "--show" => parsed.show = args.next(),
            "--delete" => parsed.delete = args.next(),
            other => {
                eprintln!("Unknown argument: {}", other);
                return None;
            }
        }
    }

    if any {
        Some(parsed)
    } else {
        None
    }
}

fn print_usage() {
    eprintln!("recapify - audio recording summarizer");
    eprintln!("  --file PATH          Transcribe and summarize a local audio file");
    eprintln!("  --url URL            Let the provider fetch a remote audio URL");
    eprintln!("  --title TITLE        Record title (default: Untitled)");
    eprintln!("  --user USER          Owner id; creates a completed record");
    eprintln!("  --summary-id ID      Update an existing pending record instead");
    eprintln!("  --diarize            Enable speaker diarization");
    eprintln!("  --language CODE      Language code (default: en)");
    eprintln!("  --model MODEL        Transcription model (default: general)");
    eprintln!("  --no-smart-format    Disable smart formatting");
    eprintln!();
    eprintln!("  --pending USER       Create a pending record and print its id");
    eprintln!("  --list USER          List a user's records");
    eprintln!("  --titles USER        List a user's record titles");
    eprintln!("  --show ID            Print one record");
    eprintln!("  --delete ID          Delete a record");
    eprintln!();
    eprintln!("Requires DEEPGRAM_API_KEY and OPENAI_API_KEY for pipeline runs.");
    eprintln!("Database: RECAP_DB_PATH or ./data/recapify.sqlite");
}

fn mime_for_path(path: &str) -> &'static str {
    match Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("wav") => "audio/wav",
        Some("mp3") => "audio/mpeg",
        Some("m4a") => "audio/mp4",
        Some("ogg") => "audio/ogg",
        Some("flac") => "audio/flac",
        Some("webm") => "audio/webm",
        _ => "application/octet-stream",
    }
}
