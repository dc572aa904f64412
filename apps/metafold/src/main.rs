//! Command-line front end: runs one engine operation against captured
//! backend output and prints the result as JSON.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use app_settings::ReconcilerSettings;
use clap::Parser;
use engine::exif_reader::KamadakExifReader;
use engine::snapshot::Snapshot;
use engine::{Backends, FetchError, MetadataFetcher, MetadataRequest, Operation};
use serde::Serialize;
use tracing::{debug, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "metafold")]
#[command(about = "Aggregates media metadata from several extraction backends")]
#[command(version)]
struct Args {
    /// all-metadata, catalog-metadata, overlay-metadata, multi-page-info,
    /// panorama-info, iptc, xmp or date
    operation: Operation,

    #[arg(short, long)]
    mime_type: Option<String>,

    /// Defaults to the EXIF file or the snapshot path
    #[arg(short, long)]
    uri: Option<String>,

    /// Local path of the item, used to recognize TIFF files by extension
    #[arg(long)]
    path: Option<String>,

    #[arg(long)]
    size: Option<u64>,

    /// Date field for the `date` operation, e.g. DateTimeOriginal
    #[arg(long)]
    field: Option<String>,

    /// JSON capture of the extraction backends' output
    #[arg(short, long)]
    snapshot: Option<PathBuf>,

    /// Image file read by the built-in EXIF reader
    #[arg(long)]
    exif_file: Option<PathBuf>,

    /// Reconciler settings file; the user settings are used otherwise
    #[arg(long, env = "METAFOLD_SETTINGS")]
    settings: Option<PathBuf>,
}

#[derive(Serialize)]
struct Failure {
    code: String,
    message: String,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "metafold=info,engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(Outcome::Success(value)) => {
            println!("{}", pretty(&value));
            ExitCode::SUCCESS
        }
        Ok(Outcome::Failure(err)) => {
            let failure = Failure {
                code: err.code(),
                message: err.to_string(),
            };
            println!("{}", pretty(&failure));
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("metafold: {err:#}");
            ExitCode::from(2)
        }
    }
}

enum Outcome {
    Success(serde_json::Value),
    Failure(FetchError),
}

fn run(args: &Args) -> Result<Outcome> {
    let settings = load_settings(args.settings.as_deref())?;
    let backends = load_backends(args)?;
    let fetcher = MetadataFetcher::new(backends, settings);
    let request = build_request(args);
    debug!("running {} with {request:?}", args.operation);

    let result = match args.operation {
        Operation::AllMetadata => fetcher.all_metadata(&request).map(to_json),
        Operation::CatalogMetadata => fetcher.catalog_metadata(&request).map(to_json),
        Operation::OverlayMetadata => fetcher.overlay_metadata(&request).map(to_json),
        Operation::MultiPageInfo => fetcher.multi_page_info(&request).map(to_json),
        Operation::PanoramaInfo => fetcher.panorama_info(&request).map(to_json),
        Operation::Iptc => fetcher.iptc(&request).map(to_json),
        Operation::Xmp => fetcher.xmp(&request).map(to_json),
        Operation::Date => fetcher.date(&request).map(to_json),
    };
    Ok(match result {
        Ok(value) => Outcome::Success(value?),
        Err(err) => Outcome::Failure(err),
    })
}

fn load_settings(path: Option<&Path>) -> Result<ReconcilerSettings> {
    match path {
        Some(path) => ReconcilerSettings::load_from(path)
            .with_context(|| format!("failed to load settings from {}", path.display())),
        None => Ok(ReconcilerSettings::load().unwrap_or_else(|err| {
            warn!("using default settings: {err}");
            ReconcilerSettings::default()
        })),
    }
}

fn load_backends(args: &Args) -> Result<Backends> {
    let mut backends = match &args.snapshot {
        Some(path) => Snapshot::from_path(path)?.into_backends(),
        None => Backends::new(),
    };
    if args.exif_file.is_some() {
        backends = backends.with_exif(Arc::new(KamadakExifReader::new()));
    }
    Ok(backends)
}

fn build_request(args: &Args) -> MetadataRequest {
    let exif_path = args.exif_file.as_ref().map(|p| p.to_string_lossy().into_owned());
    let snapshot_path = args.snapshot.as_ref().map(|p| p.to_string_lossy().into_owned());
    MetadataRequest {
        mime_type: args.mime_type.clone(),
        uri: args.uri.clone().or_else(|| exif_path.clone()).or(snapshot_path),
        size_bytes: args.size,
        path: args.path.clone().or(exif_path),
        field: args.field.clone(),
    }
}

fn to_json<T: Serialize>(value: T) -> Result<serde_json::Value> {
    serde_json::to_value(value).context("failed to serialize result")
}

fn pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|err| format!("{{\"error\":\"{err}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["metafold"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    fn snapshot_file(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    fn settings_file() -> tempfile::NamedTempFile {
        snapshot_file(&serde_json::to_string(&ReconcilerSettings::default()).unwrap())
    }

    #[test]
    fn operation_is_parsed_from_its_name() {
        let parsed = args(&["multi-page-info", "--mime-type", "image/heic", "--size", "10"]);
        assert_eq!(parsed.operation, Operation::MultiPageInfo);
        assert_eq!(parsed.size, Some(10));
        assert!(Args::try_parse_from(["metafold", "thumbnail"]).is_err());
    }

    #[test]
    fn exif_file_is_the_default_uri_and_path() {
        let parsed = args(&["catalog-metadata", "-m", "image/jpeg", "--exif-file", "/tmp/a.jpg"]);
        let request = build_request(&parsed);
        assert_eq!(request.uri.as_deref(), Some("/tmp/a.jpg"));
        assert_eq!(request.path.as_deref(), Some("/tmp/a.jpg"));
    }

    #[test]
    fn catalog_from_snapshot() {
        let snapshot = snapshot_file(
            r#"{"directories":[{"name":"GIF Animation","kind":{"type":"gif_animation"},
                "tags":[{"id":1,"name":"Iteration Count","description":"Infinite"}]}]}"#,
        );
        let settings = settings_file();
        let snapshot_path = snapshot.path().to_string_lossy().into_owned();
        let settings_path = settings.path().to_string_lossy().into_owned();
        let parsed = args(&[
            "catalog-metadata",
            "-m",
            "image/gif",
            "-s",
            &snapshot_path,
            "--settings",
            &settings_path,
        ]);
        match run(&parsed).unwrap() {
            Outcome::Success(value) => assert_eq!(value, serde_json::json!({ "flags": 1 })),
            Outcome::Failure(err) => panic!("unexpected failure {}", err.code()),
        }
    }

    #[test]
    fn empty_snapshot_reports_failure_code() {
        let snapshot = snapshot_file(r#"{"directories":[]}"#);
        let settings = settings_file();
        let snapshot_path = snapshot.path().to_string_lossy().into_owned();
        let settings_path = settings.path().to_string_lossy().into_owned();
        let parsed = args(&[
            "all-metadata",
            "-m",
            "image/png",
            "-s",
            &snapshot_path,
            "--settings",
            &settings_path,
        ]);
        match run(&parsed).unwrap() {
            Outcome::Failure(err) => assert_eq!(err.code(), "all-metadata-failure"),
            Outcome::Success(value) => panic!("unexpected success {value}"),
        }
    }
}
