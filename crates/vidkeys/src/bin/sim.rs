//! Remote control simulation
//!
//! Builds a page with a few videos (one inside a same-origin frame, one
//! behind a cross-origin frame), starts the remote and replays keys.
//!
//! Usage: `vidkeys-sim [KEY ...]` where each KEY is a DOM key value
//! such as `ArrowDown`, `m` or `Space`. Set `RUST_LOG=debug` to watch
//! discovery and scheduling.

use std::time::{Duration, Instant};

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use vidkeys::{Config, RemoteController, TracingNotifier};
use vidkeys_dom::{Document, Key, Page};

const DEFAULT_KEYS: &[&str] = &[" ", "ArrowDown", "ArrowDown", "m", "m", "d", "d", "ArrowRight", "f"];

/// Time between replayed keys
const KEY_INTERVAL: Duration = Duration::from_millis(250);

fn build_page() -> anyhow::Result<Page> {
    let mut page = Page::parse("https://video.example.com/watch")?;
    let doc = page.document_mut();
    let body = doc.body();

    let main = doc.create_element("video");
    doc.set_attribute(main, "src", "/media/feature.mp4")?;
    doc.append_child(body, main)?;
    if let Some(media) = doc.media_mut(main) {
        media.duration = 5400.0;
    }

    let search = doc.create_element("input");
    doc.set_attribute(search, "type", "search")?;
    doc.append_child(body, search)?;

    let embed = doc.create_element("iframe");
    doc.append_child(body, embed)?;
    let mut inner = Document::parse("https://video.example.com/embed/42")?;
    let inner_body = inner.body();
    let trailer = inner.create_element("video");
    let source = inner.create_element("source");
    inner.set_attribute(source, "src", "trailer.webm")?;
    inner.append_child(trailer, source)?;
    inner.append_child(inner_body, trailer)?;
    doc.set_frame_document(embed, inner)?;

    let ad = doc.create_element("iframe");
    doc.append_child(body, ad)?;
    let mut foreign = Document::parse("https://ads.example.net/slot")?;
    let foreign_body = foreign.body();
    let promo = foreign.create_element("video");
    foreign.set_attribute(promo, "src", "promo.mp4")?;
    foreign.append_child(foreign_body, promo)?;
    doc.set_frame_document(ad, foreign)?;

    Ok(page)
}

/// Mount a player the way lazy-loading sites do: container first
fn mount_late_player(page: &mut Page) -> anyhow::Result<()> {
    let doc = page.document_mut();
    let body = doc.body();
    let container = doc.create_element("div");
    doc.set_attribute(container, "class", "late-player")?;
    let video = doc.create_element("video");
    doc.set_attribute(video, "src", "https://cdn.example.com/clips/bonus.mp4")?;
    doc.append_child(container, video)?;
    doc.append_child(body, container)?;
    Ok(())
}

/// Sleep on the smol timer and move the page clock by the time that
/// actually passed
async fn sleep(page: &mut Page, interval: Duration) {
    let started = Instant::now();
    smol::Timer::after(interval).await;
    page.advance(started.elapsed());
}

fn print_picker(remote: &RemoteController, page: &Page) {
    for entry in remote.picker_entries(page) {
        let marker = if entry.active { '>' } else { ' ' };
        println!("  {marker} {}", entry.label);
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let keys: Vec<Key> = if args.is_empty() {
        DEFAULT_KEYS.iter().map(|k| Key::parse(k)).collect()
    } else {
        args.iter().map(|k| Key::parse(k)).collect()
    };

    let mut page = build_page().context("building sample page")?;
    let mut remote = RemoteController::new(Config::default(), Box::new(TracingNotifier))?;
    remote.start(&mut page)?;

    println!("Videos:");
    print_picker(&remote, &page);

    smol::block_on(async {
        for key in keys {
            let (down, _) = page.press(key.clone());
            println!(
                "{:<12} {}",
                format!("{key:?}"),
                if down.is_default_prevented() { "handled" } else { "passed to page" }
            );
            sleep(&mut page, KEY_INTERVAL).await;
        }

        mount_late_player(&mut page)?;
        page.run_until_idle();
        let settle = Duration::from_millis(Config::default().settle_delay_ms);
        sleep(&mut page, settle).await;
        anyhow::Ok(())
    })?;

    println!("Videos after late mount:");
    print_picker(&remote, &page);

    let active = remote.active_video();
    if let Some(media) = active.as_ref().and_then(|video| video.media(page.document())) {
        println!(
            "Active video: paused={} t={}s volume={} rate={}x",
            media.paused, media.current_time, media.volume, media.playback_rate
        );
    }

    page.unload();
    remote.stop(&mut page);
    Ok(())
}
