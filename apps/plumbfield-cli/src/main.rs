use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use plumbfield_common::Size;
use plumbfield_content::{ContentFactory, LevelDocument, PlacementContext, RuntimeInstantiator};
use plumbfield_input::Action;
use plumbfield_kernel::{Simulation, World};
use plumbfield_persist::SavegameStore;
use plumbfield_render::{DrawList, Playfield};
use plumbfield_session::{
    MemoryResultStore, ResultStore, SessionConfig, SessionController, SessionExit, SilentSound,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "plumbfield", about = "CLI tool for plumbfield levels")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and registered object kinds
    Info,
    /// Load a level and report every diagnostic
    Validate {
        level: PathBuf,
        /// Display size used for placement, as WIDTHxHEIGHT
        #[arg(long, default_value = "800x600", value_parser = parse_size)]
        viewport: Size,
    },
    /// Load a level and write it back out in canonical form
    Roundtrip {
        level: PathBuf,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Play a level headless at a fixed frame rate
    Play {
        level: PathBuf,
        /// Session config file (YAML)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Override the world seed
        #[arg(long)]
        seed: Option<u64>,
        /// Start in fast-forward
        #[arg(long)]
        fast_forward: bool,
        /// Frame delta in seconds
        #[arg(long, default_value = "0.016")]
        frame: f32,
        /// Give up after this many frames
        #[arg(long, default_value = "100000")]
        max_frames: u64,
        /// Scripted action as FRAME:ACTION, e.g. 120:armageddon
        #[arg(long = "action", value_parser = parse_scripted_action)]
        actions: Vec<(u64, Action)>,
        /// Record the result in this savegame directory
        #[arg(long)]
        savegames: Option<PathBuf>,
        /// Print the world event log as JSON
        #[arg(long)]
        events: bool,
        #[arg(long, default_value = "800x600", value_parser = parse_size)]
        viewport: Size,
    },
    /// Step a level and print its draw commands
    Draw {
        level: PathBuf,
        /// Ticks to simulate before drawing
        #[arg(short, long, default_value = "0")]
        ticks: u64,
        #[arg(long, default_value = "800x600", value_parser = parse_size)]
        display: Size,
    },
    /// List recorded progress
    Progress { savegames: PathBuf },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let factory = ContentFactory::new();
    match cli.command {
        Commands::Info => {
            println!("plumbfield v{}", env!("CARGO_PKG_VERSION"));
            for tag in factory.tags() {
                println!("kind: {tag}");
            }
        }
        Commands::Validate { level, viewport } => {
            let document = load(&factory, &level, true)?;
            let world = document.header.world;
            let built = RuntimeInstantiator::new(PlacementContext::new(viewport, world))
                .instantiate_level(&document);
            for (node, err) in &built.skipped {
                println!("node {node}: {err}");
            }
            println!(
                "{}: {} objects, {} instantiated",
                document.header.id,
                document.len(),
                built.objects.len()
            );
            if !built.skipped.is_empty() {
                bail!("{} objects could not be instantiated", built.skipped.len());
            }
        }
        Commands::Roundtrip { level, out } => {
            let document = load(&factory, &level, false)?;
            let text = factory.serialize(&document)?;
            let reparsed = factory.parse(&text)?.document;
            if reparsed != document {
                bail!("level did not survive a round trip");
            }
            match out {
                Some(path) => std::fs::write(&path, text)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => print!("{text}"),
            }
        }
        Commands::Play {
            level,
            config,
            seed,
            fast_forward,
            frame,
            max_frames,
            mut actions,
            savegames,
            events,
            viewport,
        } => {
            let mut session = match config {
                Some(path) => SessionConfig::load(&path)?,
                None => SessionConfig::default(),
            };
            if let Some(seed) = seed {
                session = session.with_seed(seed);
            }
            if fast_forward {
                actions.insert(0, (0, Action::SetFastForward(true)));
            }
            let document = load(&factory, &level, false)?;
            let world = build_world(&document, viewport, session.seed);
            let run = PlayRun {
                frame,
                max_frames,
                actions,
                events,
            };
            let music = document.header.music.clone();
            match savegames {
                Some(dir) => {
                    let store = SavegameStore::open(&dir)?;
                    run.play(world, music, &session, store)?;
                }
                None => run.play(world, music, &session, MemoryResultStore::new())?,
            }
        }
        Commands::Draw {
            level,
            ticks,
            display,
        } => {
            let document = load(&factory, &level, false)?;
            let mut world = build_world(&document, display, 0);
            for _ in 0..ticks {
                world.step()?;
            }
            let mut list = DrawList::new();
            Playfield::centered(display, document.header.world).draw_border(&mut list);
            world.draw(&mut list);
            print!("{}", list.to_text());
        }
        Commands::Progress { savegames } => {
            let store = SavegameStore::open(&savegames)?;
            for s in store.savegames() {
                println!(
                    "{}: {:?} saved={} time={}",
                    s.level_id, s.status, s.saved, s.time_used
                );
            }
        }
    }

    Ok(())
}

fn load(factory: &ContentFactory, path: &Path, strict: bool) -> anyhow::Result<LevelDocument> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let report = factory.parse(&text)?;
    for diagnostic in &report.diagnostics {
        println!("warning: {diagnostic}");
    }
    if strict && !report.is_clean() {
        bail!("{} diagnostics", report.diagnostics.len());
    }
    Ok(report.document)
}

fn build_world(document: &LevelDocument, viewport: Size, seed: u64) -> World {
    let built = RuntimeInstantiator::new(PlacementContext::new(viewport, document.header.world))
        .instantiate_level(document);
    tracing::debug!(
        level = %document.header.id,
        objects = built.objects.len(),
        skipped = built.skipped.len(),
        "world built"
    );
    World::new(&document.header, built.objects, seed)
}

struct PlayRun {
    frame: f32,
    max_frames: u64,
    actions: Vec<(u64, Action)>,
    events: bool,
}

impl PlayRun {
    fn play<R: ResultStore>(
        &self,
        world: World,
        music: String,
        config: &SessionConfig,
        store: R,
    ) -> anyhow::Result<()> {
        let mut controller = SessionController::new(world, music, config, store, SilentSound)?;
        controller.on_startup();
        let mut exit = None;
        for frame in 0..self.max_frames {
            for (_, action) in self.actions.iter().filter(|(at, _)| *at == frame) {
                controller.handle(*action);
            }
            if let Some(done) = controller.update(self.frame)? {
                exit = Some(done);
                break;
            }
        }
        controller.on_shutdown();

        if self.events {
            println!("{}", serde_json::to_string_pretty(controller.world().events())?);
        }
        let Some(exit) = exit else {
            bail!("level still running after {} frames", self.max_frames);
        };
        if let SessionExit::ShowResult(outcome) = &exit {
            println!(
                "{}",
                if outcome.succeeded() {
                    "level solved"
                } else {
                    "level failed"
                }
            );
        }
        println!("{}", serde_json::to_string_pretty(exit.outcome())?);
        Ok(())
    }
}

fn parse_size(s: &str) -> Result<Size, String> {
    let (w, h) = s
        .split_once('x')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got `{s}`"))?;
    let w = w.parse().map_err(|e| format!("bad width: {e}"))?;
    let h = h.parse().map_err(|e| format!("bad height: {e}"))?;
    Ok(Size::new(w, h))
}

fn parse_scripted_action(s: &str) -> Result<(u64, Action), String> {
    let (frame, action) = s
        .split_once(':')
        .ok_or_else(|| format!("expected FRAME:ACTION, got `{s}`"))?;
    let frame = frame.parse().map_err(|e| format!("bad frame: {e}"))?;
    let action = action.parse().map_err(|e: plumbfield_input::ParseActionError| e.to_string())?;
    Ok((frame, action))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_parse() {
        assert_eq!(parse_size("320x200"), Ok(Size::new(320, 200)));
        assert!(parse_size("320").is_err());
        assert!(parse_size("ax200").is_err());
    }

    #[test]
    fn scripted_actions_parse() {
        assert_eq!(
            parse_scripted_action("120:armageddon"),
            Ok((120, Action::Armageddon))
        );
        assert!(parse_scripted_action("armageddon").is_err());
        assert!(parse_scripted_action("5:fly").is_err());
    }

    #[test]
    fn cli_parses_play_flags() {
        let cli = Cli::try_parse_from([
            "plumbfield",
            "play",
            "level.yaml",
            "--action",
            "10:pause",
            "--action",
            "20:pause",
            "--viewport",
            "640x480",
        ])
        .unwrap();
        match cli.command {
            Commands::Play {
                actions, viewport, ..
            } => {
                assert_eq!(actions.len(), 2);
                assert_eq!(viewport, Size::new(640, 480));
            }
            _ => panic!("expected play"),
        }
    }
}
