//! Terminal front end
//!
//! Thin view glue over the library: prompts for the two endpoints, fetches
//! and normalizes the route, optionally rewrites the step texts, then
//! drives the playback machine from single-letter commands. All service
//! failures are converted to status lines here; none of them escape.

use crate::config::AppConfig;
use crate::export;
use crate::narrate::StyleTransformer;
use crate::playback::{Advance, PlaybackPhase, StepPlayback, DISMISS_COUNTDOWN_SECS};
use crate::route::{build_map_embed_url, extract_route, ExtractedRoute, RoutingClient};
use crate::search::{Poi, SearchClient};
use crate::speech::{SessionOptions, SpeechClient, SpeechSession};
use crate::{Result, WayfinderError};
use std::io::Write as _;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{info, warn};

type InputLines = Lines<BufReader<Stdin>>;

/// Route data as presented to the user.
struct RouteView {
    extracted: ExtractedRoute,
    embed_url: String,
    map_only: bool,
}

pub struct App {
    config: AppConfig,
    search: SearchClient,
    routing: RoutingClient,
    transformer: StyleTransformer,
    speech: SpeechClient,
    playback: StepPlayback,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        Self {
            search: SearchClient::new(config.search.clone()),
            routing: RoutingClient::new(config.routing.clone()),
            transformer: StyleTransformer::new(config.narrate.clone()),
            speech: SpeechClient::new(config.speech.clone()),
            playback: StepPlayback::new(),
            config,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        println!("Campus Wayfinder");
        println!("Find routes between any locations on campus.\n");

        let mut input = BufReader::new(tokio::io::stdin()).lines();

        loop {
            let start = self.pick_endpoint(&mut input, "Start location").await?;
            let end = self.pick_endpoint(&mut input, "Destination").await?;

            println!("Finding the best route...");
            match self.find_route(&start, &end).await {
                Ok(view) => {
                    self.present_route(&mut input, &start, &end, view).await?;
                }
                Err(e) => {
                    warn!("routing failed: {}", e);
                    println!("Could not find route: {}", e.user_message());
                }
            }

            let line = prompt(&mut input, "\nChart a new course? [y/N] ").await?;
            if !line.trim().eq_ignore_ascii_case("y") {
                return Ok(());
            }
        }
    }

    /// Search-and-pick loop for one endpoint.
    async fn pick_endpoint(&self, input: &mut InputLines, label: &str) -> Result<Poi> {
        loop {
            let query = prompt(input, &format!("{}: ", label)).await?;
            if query.trim().chars().count() < 2 {
                println!("Type at least two characters.");
                continue;
            }

            let pois = match self.search.search(&query).await {
                Ok(pois) => pois,
                Err(e) => {
                    warn!("search failed: {}", e);
                    println!("{}", e.user_message());
                    continue;
                }
            };
            if pois.is_empty() {
                println!("No results found.");
                continue;
            }

            for (i, poi) in pois.iter().enumerate() {
                println!("  {}. {}", i + 1, poi.detail_label());
            }
            let choice = prompt(input, "Pick a number: ").await?;
            match choice.trim().parse::<usize>() {
                Ok(n) if n >= 1 && n <= pois.len() => return Ok(pois[n - 1].clone()),
                _ => {
                    let e = WayfinderError::SelectionError(format!("'{}' is not a result", choice));
                    println!("{}", e.user_message());
                }
            }
        }
    }

    /// Fetch and normalize; a transport failure degrades to a map-only view
    /// when both endpoints still resolve to coordinates.
    async fn find_route(&self, start: &Poi, end: &Poi) -> Result<RouteView> {
        match self.routing.fetch_route(start, end).await {
            Ok(fetched) => {
                let extracted = extract_route(Some(&fetched.trip), start, end);
                let embed_url = build_map_embed_url(
                    &self.config.routing,
                    fetched.start_coords,
                    fetched.end_coords,
                    fetched.start_z,
                    fetched.end_z,
                );
                Ok(RouteView {
                    extracted,
                    embed_url,
                    map_only: false,
                })
            }
            Err(e) => {
                let start_coords = crate::geo::poi_lat_lng(start);
                let end_coords = crate::geo::poi_lat_lng(end);
                if let (Some(sc), Some(ec)) = (start_coords, end_coords) {
                    info!("routing degraded to map-only view: {}", e);
                    let embed_url =
                        build_map_embed_url(&self.config.routing, sc, ec, start.z, end.z);
                    Ok(RouteView {
                        extracted: ExtractedRoute::failed(
                            "Turn-by-turn instructions could not be loaded for this route.",
                        ),
                        embed_url,
                        map_only: true,
                    })
                } else {
                    Err(e)
                }
            }
        }
    }

    async fn present_route(
        &mut self,
        input: &mut InputLines,
        start: &Poi,
        end: &Poi,
        view: RouteView,
    ) -> Result<()> {
        println!("\nMap: {}", view.embed_url);

        if view.map_only {
            println!("Route shown on map. Turn-by-turn instructions unavailable for this route.");
            return Ok(());
        }
        if let Some(error) = &view.extracted.error {
            println!("{}", error);
            return Ok(());
        }

        println!("Route found! Follow the instructions below.");
        if let Some(label) = export::distance_label(view.extracted.total_distance) {
            println!(
                "Distance: {}   Walking: ~{} min   Steps: {}",
                label,
                export::walking_minutes(view.extracted.total_time),
                view.extracted.steps.len()
            );
        }

        let mut extracted = view.extracted;
        if self.config.enable_transform {
            let texts: Vec<String> = extracted.steps.iter().map(|s| s.text.clone()).collect();
            let transformed = self.transformer.transform(&texts, self.config.style).await;
            for (step, text) in extracted.steps.iter_mut().zip(transformed) {
                step.text = text;
            }
        }

        self.playback.load(extracted.steps.clone());
        self.show_current().await;
        self.playback_loop(input, start, end, &extracted).await
    }

    async fn playback_loop(
        &mut self,
        input: &mut InputLines,
        start: &Poi,
        end: &Poi,
        extracted: &ExtractedRoute,
    ) -> Result<()> {
        loop {
            if self.playback.phase() == PlaybackPhase::Completed {
                println!("\nX marks the spot! Ye've followed all the clues.");
            }
            let command =
                prompt(input, "[n]ext [p]rev [r]eset [e]xport [q]uit > ").await?;
            match command.trim() {
                "n" => match self.playback.next() {
                    Advance::Deferred(card) => {
                        println!("\n--- A word from our sponsors ---");
                        println!("[{}] {} {}", card.tag, card.icon, card.headline);
                        println!("{}", card.body);
                        println!("{}", card.fine);
                        tokio::time::sleep(std::time::Duration::from_secs(
                            DISMISS_COUNTDOWN_SECS,
                        ))
                        .await;
                        prompt(input, "Press Enter to continue... ").await?;
                        self.playback.dismiss_interstitial();
                        self.show_current().await;
                    }
                    Advance::Moved(_) => self.show_current().await,
                    Advance::Completed | Advance::Ignored => {}
                },
                "p" => {
                    if let Advance::Moved(_) = self.playback.prev() {
                        self.show_current().await;
                    }
                }
                "r" => {
                    self.playback.reset();
                    println!("Playback reset.");
                    return Ok(());
                }
                "e" => {
                    let doc = export::render_document(
                        &start.title,
                        &end.title,
                        &extracted.steps,
                        extracted.total_distance,
                        extracted.total_time,
                    );
                    let filename = export::export_filename(&start.title, &end.title);
                    std::fs::write(&filename, doc)?;
                    println!("Saved {}", filename);
                }
                "q" => {
                    self.playback.reset();
                    return Ok(());
                }
                _ => {}
            }
        }
    }

    /// Print the displayed step and start its narration.
    async fn show_current(&mut self) {
        let Some(step) = self.playback.current_step() else {
            return;
        };
        let position = self.playback.cursor() + 1;
        let total = self.playback.steps().len();
        println!("\nClue {} of {}", position, total);
        println!("  {}", step.text);
        if let Some(label) = export::paces_label(step.distance_meters) {
            println!("  ({})", label);
        }

        if !self.config.enable_audio_output {
            return;
        }
        let client = self.speech.clone();
        let text = step.text.clone();
        let session = SpeechSession::start(
            async move { client.synthesize(&text).await },
            SessionOptions { play_audio: true },
        );
        self.playback.attach_speech(session.control());
        // Narration failures are logged, never surfaced
        tokio::spawn(async move {
            if let Err(e) = session.done().await {
                warn!("narration failed: {}", e);
            }
        });
    }
}

async fn prompt(input: &mut InputLines, text: &str) -> Result<String> {
    print!("{}", text);
    std::io::stdout()
        .flush()
        .map_err(|e| WayfinderError::IOError(e.to_string()))?;
    match input
        .next_line()
        .await
        .map_err(|e| WayfinderError::IOError(e.to_string()))?
    {
        Some(line) => Ok(line),
        None => Err(WayfinderError::IOError("stdin closed".to_string())),
    }
}
