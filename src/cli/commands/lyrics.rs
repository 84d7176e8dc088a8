//! Lyrics commands: batch runs over a directory and single lookups.

use std::path::PathBuf;

use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::{self, Error};
use crate::lyrics::{
    BatchRunner, BatchSummary, Disposition, GeniusClient, HttpFetcher, LyricsError,
    LyricsResolver, LyricsifyClient, RunPolicy, TrackQuery,
};
use crate::metadata::LoftyStore;

use super::{ProviderArgs, RunArgs, collect_tracks, report};

const BLOCKED_MESSAGE: &str = "Scraping encountered an anti-bot challenge and cannot continue";

/// Find and embed lyrics for every file under a directory
pub fn cmd_run(rt: &Runtime, mut config: Config, args: &RunArgs) -> anyhow::Result<()> {
    args.providers.apply(&mut config);

    let dir = match &args.dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };
    let files = match collect_tracks(&dir) {
        Ok(files) => files,
        Err(Error::EmptyDirectory(_)) => {
            println!("Directory is empty or does not exist.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let policy = run_policy(&config, args);
    ensure_sources(&config, &policy)?;

    tracing::info!("Processing {} files in {}", files.len(), dir.display());
    if args.dry_run {
        println!("Dry run - no files will be modified.");
    }

    let cancel = CancellationToken::new();
    let resolver = build_resolver(&config, policy, cancel.clone())?;
    let store = LoftyStore;
    let runner = BatchRunner::new(resolver, &store)
        .dry_run(args.dry_run)
        .request_delay(config.request_delay())
        .cancel_token(cancel.clone());

    let result = rt.block_on(async {
        let interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupted, stopping the run");
                interrupt.cancel();
            }
        });

        runner
            .run(&files, |track| {
                println!("{}", report::format_line(track, args.dry_run))
            })
            .await
    });

    match result {
        Ok(summary) => {
            println!();
            println!("{}", summary_line(&summary, args.dry_run));
            Ok(())
        }
        Err(e) => Err(fatal(e)),
    }
}

/// Look up lyrics for one artist/title and print them
pub fn cmd_search(
    rt: &Runtime,
    mut config: Config,
    providers: &ProviderArgs,
    artist: &str,
    title: &str,
) -> anyhow::Result<()> {
    providers.apply(&mut config);
    let policy = config.run_policy();
    ensure_sources(&config, &policy)?;

    let query = TrackQuery::new(artist, title);
    println!("Searching for: {}", query.search_string);
    println!();

    let resolver = build_resolver(&config, policy, CancellationToken::new())?;
    let resolution = rt
        .block_on(resolver.resolve(&query, None))
        .map_err(fatal)?;

    let provider = resolution
        .provider_used
        .map_or("?", |source| source.name());
    match resolution.disposition {
        Disposition::Success | Disposition::Inexact => {
            let kind = match resolution.provider_used {
                Some(source) if source.is_synced() => "synced",
                _ => "plain",
            };
            if resolution.disposition == Disposition::Inexact {
                println!("✓ Inexact match from {} ({})", provider, kind);
            } else {
                println!("✓ Match from {} ({})", provider, kind);
            }
            if let Some(url) = &resolution.reference_url {
                println!("  {}", url);
            }
            println!();
            println!("{}", resolution.lyrics.as_deref().unwrap_or_default());
        }
        Disposition::Instrumental => {
            println!("✓ {} says song is an instrumental", provider);
        }
        Disposition::NotFound | Disposition::Skip(_) => {
            println!("✗ Lyrics not found.");
            if policy.require_exact_match {
                println!("  Inexact matches were discarded; see require_exact_match in the config.");
            }
        }
    }
    Ok(())
}

/// Config policy with this run's flags applied.
fn run_policy(config: &Config, args: &RunArgs) -> RunPolicy {
    let mut policy = config.run_policy();
    policy.overwrite |= args.overwrite;
    policy.allow_unsynced_overwrite |= args.even_if_unsynced;
    if args.allow_inexact {
        policy.require_exact_match = false;
    }
    // Without the synced source every replacement is unsynced
    if !policy.synced_source_enabled && policy.overwrite {
        policy.allow_unsynced_overwrite = true;
    }
    policy
}

/// Fail early when neither provider can run; warn when Genius is off.
fn ensure_sources(config: &Config, policy: &RunPolicy) -> anyhow::Result<()> {
    if config.genius_token().is_some() {
        return Ok(());
    }
    if !policy.synced_source_enabled {
        anyhow::bail!(
            "No lyrics source available: set a Genius access token (--token or GENIUS_ACCESS_TOKEN) or enable --synced"
        );
    }
    eprintln!("Warning: no Genius access token set (--token or GENIUS_ACCESS_TOKEN).");
    eprintln!("         Genius searches are disabled; only synced lyrics will be found.");
    Ok(())
}

/// Providers for this run, sharing one HTTP client.
fn build_resolver(
    config: &Config,
    policy: RunPolicy,
    cancel: CancellationToken,
) -> error::Result<LyricsResolver> {
    let http = HttpFetcher::new(
        &config.http.user_agent,
        config.timeout(),
        config.retry_policy(),
        cancel,
    )?;

    let mut resolver = LyricsResolver::new(policy);
    if policy.synced_source_enabled {
        resolver = resolver.with_primary(Box::new(LyricsifyClient::with_base_url(
            http.clone(),
            &config.providers.lyricsify_base_url,
        )));
    }
    if let Some(token) = config.genius_token() {
        let genius =
            GeniusClient::with_api_url(http, token, &config.providers.genius_api_url)
                .require_exact(policy.require_exact_match);
        resolver = resolver.with_fallback(Box::new(genius));
    }
    Ok(resolver)
}

/// Turn a run-ending error into the message the user sees.
fn fatal(error: LyricsError) -> anyhow::Error {
    match error {
        LyricsError::Blocked { .. } => {
            tracing::error!("{}", error);
            anyhow::anyhow!(BLOCKED_MESSAGE)
        }
        LyricsError::Cancelled => anyhow::anyhow!("Run cancelled"),
        other => other.into(),
    }
}

fn summary_line(summary: &BatchSummary, dry_run: bool) -> String {
    let saved = if dry_run {
        format!("{} found", summary.found)
    } else {
        format!("{} written", summary.written)
    };
    format!(
        "Done: {} tracks, {}, {} instrumental, {} skipped, {} not found, {} failed",
        summary.total(),
        saved,
        summary.instrumental,
        summary.skipped,
        summary.not_found,
        summary.failed
    )
}
