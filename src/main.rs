use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use twl_generator::books::Book;
use twl_generator::cache::{ArchiveStore, DiskStore};
use twl_generator::cli::{Cli, Mode};
use twl_generator::error::{Result, UsfmError};
use twl_generator::fetch::{Fetcher, HttpQuoteServices};
use twl_generator::pipeline::{EnglishFirstPipeline, StrongsFirstPipeline};
use twl_generator::row::{self, Row};
use twl_generator::vocab::{self, StrongsIndex, Vocabulary};

#[tokio::main]
async fn main() {
    let default_level = if cfg!(debug_assertions) {
        "twl_generator=debug,warn"
    } else {
        "twl_generator=info,warn"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let books: Vec<&'static Book> = if cli.all {
        Book::all().iter().collect()
    } else {
        // clap guarantees --book when --all is absent.
        vec![Book::from_code(cli.book.as_deref().unwrap_or_default())?]
    };

    let mut fetcher = Fetcher::new();
    if let Some(url) = &cli.archive_url {
        fetcher.archive_url = url.clone();
    }
    if let Some(url) = &cli.strongs_list_url {
        fetcher.strongs_list_url = url.clone();
    }
    if let Some(base) = &cli.content_base {
        fetcher.content_base = base.clone();
    }

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Cancellation requested");
                cancel.cancel();
            }
        });
    }

    let vocab = load_vocabulary(&cli, &fetcher, &cancel).await?;
    let index = StrongsIndex::build(&vocab);
    let services = cli
        .add_gl_url
        .as_ref()
        .zip(cli.convert_url.as_ref())
        .map(|(add_gl, convert)| HttpQuoteServices::new(add_gl, convert));

    let batch = books.len() > 1;
    for book in books {
        if cancel.is_cancelled() {
            tracing::info!("Cancelled; stopping before {}", book.code());
            break;
        }
        let result = process_book(&cli, &fetcher, &vocab, &index, services.as_ref(), book, &cancel)
            .await;
        match result {
            Ok(()) => {}
            // Batch mode keeps going past per-book translation failures; the
            // book is simply missing from the output set.
            Err(error) if batch && error.downcast_ref::<UsfmError>().is_some() => {
                tracing::warn!(book = book.code(), %error, "Skipping book");
            }
            Err(error) => return Err(error),
        }
    }
    Ok(())
}

async fn load_vocabulary(
    cli: &Cli,
    fetcher: &Fetcher,
    cancel: &CancellationToken,
) -> Result<Vocabulary> {
    let store = if cli.no_cache {
        None
    } else {
        DiskStore::default_location()
    };
    // The archive URL doubles as the version key: release branches get their
    // own cache entries.
    let version = fetcher.archive_url.clone();

    let cached = store.as_ref().and_then(|s| s.get(&version));
    let (bytes, fresh) = match cached {
        Some(bytes) => (bytes, false),
        None => {
            let bytes = tokio::select! {
                result = fetcher.fetch_archive() => result?,
                () = cancel.cancelled() => anyhow::bail!("cancelled"),
            };
            (bytes, true)
        }
    };

    let mut vocab = match vocab::from_archive_bytes(&bytes) {
        Ok(vocab) => vocab,
        Err(error) if !fresh => {
            // A corrupt cache entry is not fatal; refetch once.
            tracing::warn!(%error, "Cached archive unreadable; refetching");
            if let Some(store) = &store {
                store.clear();
            }
            let bytes = fetcher.fetch_archive().await?;
            let vocab = vocab::from_archive_bytes(&bytes)?;
            if let Some(store) = &store {
                store.put(&version, &bytes);
            }
            return finish_vocabulary(vocab, fetcher).await;
        }
        Err(error) => return Err(error),
    };
    if fresh {
        if let Some(store) = &store {
            store.put(&version, &bytes);
        }
    }
    vocab = finish_vocabulary(vocab, fetcher).await?;
    Ok(vocab)
}

async fn finish_vocabulary(mut vocab: Vocabulary, fetcher: &Fetcher) -> Result<Vocabulary> {
    match fetcher.fetch_strongs_list().await {
        Ok(json) => vocab.apply_strongs_list(&json)?,
        Err(error) => {
            tracing::warn!(%error, "Strong's list unavailable; articles carry no lemma data");
        }
    }
    tracing::info!(articles = vocab.len(), "Vocabulary ready");
    Ok(vocab)
}

#[allow(clippy::too_many_arguments)]
async fn process_book(
    cli: &Cli,
    fetcher: &Fetcher,
    vocab: &Vocabulary,
    index: &StrongsIndex,
    services: Option<&HttpQuoteServices>,
    book: &'static Book,
    cancel: &CancellationToken,
) -> Result<()> {
    let usfm = tokio::select! {
        result = fetcher.fetch_book(book) => result?,
        () = cancel.cancelled() => anyhow::bail!("cancelled"),
    };

    match cli.mode {
        Mode::English => {
            let pipeline = EnglishFirstPipeline::new(vocab, cli.rich_conjugations);
            let rows = match services {
                Some(services) => pipeline.run(&usfm, services).await?,
                None => {
                    let mut rows = pipeline.scan_book(&usfm)?;
                    offline_fallback(&mut rows);
                    rows
                }
            };
            write_tsv(main_output_path(cli, book), &row::to_output_tsv(&rows)).await?;
        }
        Mode::Strongs => {
            let pipeline = StrongsFirstPipeline::new(vocab, index, cli.rich_conjugations);
            let output = match services {
                Some(services) => pipeline.run(&usfm, services).await?,
                None => {
                    // Refinement needs only the English quotes, so it still
                    // runs offline over the copied columns.
                    let mut emitted = pipeline.emit_rows(&usfm)?;
                    offline_fallback(emitted.iter_mut().map(|e| &mut e.row));
                    pipeline.refine(emitted)
                }
            };
            write_tsv(main_output_path(cli, book), &row::to_output_tsv(&output.rows)).await?;
            let no_match_path = cli
                .out_dir
                .join(format!("twl_{}_nomatch.tsv", book.code().to_uppercase()));
            write_tsv(no_match_path, &row::to_output_tsv(&output.no_match)).await?;
        }
    }
    Ok(())
}

/// Without service endpoints the GL columns are filled by the documented
/// fallback: English quotations copied in place.
fn offline_fallback<'a>(rows: impl IntoIterator<Item = &'a mut Row>) {
    for row in rows {
        row.gl_quote = row.orig_words.clone();
        row.gl_occurrence = Some(row.occurrence);
    }
}

fn main_output_path(cli: &Cli, book: &Book) -> PathBuf {
    if let Some(out) = &cli.out {
        return out.clone();
    }
    cli.out_dir
        .join(format!("twl_{}.tsv", book.code().to_uppercase()))
}

async fn write_tsv(path: PathBuf, tsv: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    tokio::fs::write(&path, tsv)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(path = %path.display(), "Wrote output");
    Ok(())
}
