use anyhow::{anyhow, bail, Context};
use mapguess::{
    ControlAction, GameEvent, GameOptions, GameSession, GeoPoint, InputEvent, LocationSet,
    PanDirection, Point, RoundPhase,
};
use std::io::{self, BufRead, Write};

const HELP: &str = "\
commands:
  click X Y             press and release at a viewport pixel
  drag X0 Y0 X1 Y1      drag the map between two pixels
  zoom + | -            zoom in or out
  pan left|right|up|down
  resize W H            change the viewport size
  select LAT LNG        pick a position directly
  guess                 pin the selected position
  next                  start the next round
  restart               play again
  tiles                 list the visible tile grid
  status                show round, score and markers
  quit";

/// Terminal driver for the guessing game
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let locations = match args.next() {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading locations from {}", path))?;
            LocationSet::from_json(&json)?
        }
        None => LocationSet::builtin(),
    };
    let options = match args.next() {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading options from {}", path))?;
            GameOptions::from_json(&json)?
        }
        None => GameOptions::default(),
    };

    let mut app = GuessApp::new(options, locations)?;
    app.run(io::stdin().lock(), io::stdout().lock())
}

struct GuessApp {
    session: GameSession,
}

impl GuessApp {
    fn new(options: GameOptions, locations: LocationSet) -> anyhow::Result<Self> {
        let session = GameSession::new(options, locations, Point::new(800.0, 600.0))?;
        Ok(Self { session })
    }

    fn run(&mut self, input: impl BufRead, mut out: impl Write) -> anyhow::Result<()> {
        writeln!(out, "{}", HELP)?;
        self.print_round(&mut out)?;

        for line in input.lines() {
            let line = line?;
            let words: Vec<&str> = line.split_whitespace().collect();
            match words.as_slice() {
                [] => continue,
                ["quit"] | ["exit"] => break,
                ["help"] => writeln!(out, "{}", HELP)?,
                ["tiles"] => self.print_tiles(&mut out)?,
                ["status"] => self.print_status(&mut out)?,
                command => match parse_command(command) {
                    Ok(inputs) => {
                        let events = self.session.handle_events(inputs);
                        self.print_events(&events, &mut out)?;
                    }
                    Err(e) => writeln!(out, "error: {}", e)?,
                },
            }
        }
        Ok(())
    }

    fn print_round(&self, out: &mut impl Write) -> io::Result<()> {
        let rounds = self.session.rounds();
        writeln!(
            out,
            "Round {}/{}  score {}  hint: {}",
            rounds.round(),
            rounds.total_rounds(),
            rounds.score(),
            rounds.current_location().hint
        )
    }

    fn print_events(&self, events: &[GameEvent], out: &mut impl Write) -> anyhow::Result<()> {
        for event in events {
            match event {
                GameEvent::ViewChanged { center, zoom } => writeln!(
                    out,
                    "view: ({:.4}, {:.4}) zoom {}",
                    center.lat, center.lng, zoom
                )?,
                GameEvent::TilesUpdated { columns, rows } => {
                    writeln!(out, "tiles: {}x{}", columns, rows)?
                }
                GameEvent::DragStarted | GameEvent::DragEnded { .. } => {}
                GameEvent::DragCanceled => writeln!(out, "drag canceled")?,
                GameEvent::PositionSelected { position } => writeln!(
                    out,
                    "selected ({:.4}, {:.4})",
                    position.lat, position.lng
                )?,
                GameEvent::GuessCommitted { result } => writeln!(
                    out,
                    "It was {}! You were {:.1} km away: {} points",
                    result.target.name, result.distance_km, result.points
                )?,
                GameEvent::RoundStarted { .. } => self.print_round(out)?,
                GameEvent::GameOver { summary } => {
                    writeln!(
                        out,
                        "Game over! Final score {} (average {})",
                        summary.final_score, summary.average_score
                    )?;
                    writeln!(out, "{}", serde_json::to_string_pretty(summary)?)?;
                }
                GameEvent::GameRestarted => writeln!(out, "new game")?,
            }
        }
        Ok(())
    }

    fn print_tiles(&self, out: &mut impl Write) -> io::Result<()> {
        let viewport = self.session.viewport();
        let grid = viewport.tiles();
        writeln!(
            out,
            "{}x{} tiles at zoom {}",
            grid.columns(),
            grid.rows(),
            grid.zoom()
        )?;
        for tile in grid.iter() {
            let at = viewport.tile_screen_position(tile);
            writeln!(out, "  [{:>4.0},{:>4.0}] {}", at.x, at.y, tile.url)?;
        }
        Ok(())
    }

    fn print_status(&self, out: &mut impl Write) -> io::Result<()> {
        self.print_round(out)?;
        let phase = match self.session.phase() {
            RoundPhase::Guessing => "guessing",
            RoundPhase::Revealed => "revealed",
            RoundPhase::GameOver => "game over",
        };
        let center = self.session.viewport().center();
        writeln!(
            out,
            "phase: {}  view: ({:.4}, {:.4}) zoom {}",
            phase,
            center.lat,
            center.lng,
            self.session.viewport().zoom()
        )?;
        for marker in self.session.markers() {
            writeln!(
                out,
                "  {:?} '{}' at ({:.4}, {:.4}) pixel ({:.0}, {:.0})",
                marker.kind,
                marker.label,
                marker.position.lat,
                marker.position.lng,
                marker.screen.x,
                marker.screen.y
            )?;
        }
        Ok(())
    }
}

fn parse_command(words: &[&str]) -> anyhow::Result<Vec<InputEvent>> {
    let inputs = match words {
        ["click", x, y] => {
            let position = Point::new(number(x)?, number(y)?);
            vec![
                InputEvent::PointerDown { position },
                InputEvent::PointerUp { position },
            ]
        }
        ["drag", x0, y0, x1, y1] => {
            let start = Point::new(number(x0)?, number(y0)?);
            let end = Point::new(number(x1)?, number(y1)?);
            vec![
                InputEvent::PointerDown { position: start },
                InputEvent::PointerMove { position: end },
                InputEvent::PointerUp { position: end },
            ]
        }
        ["zoom", "+"] | ["zoom", "in"] => vec![InputEvent::Control(ControlAction::ZoomIn)],
        ["zoom", "-"] | ["zoom", "out"] => vec![InputEvent::Control(ControlAction::ZoomOut)],
        ["pan", direction] => {
            let direction: PanDirection = direction.parse()?;
            vec![InputEvent::Control(ControlAction::Pan(direction))]
        }
        ["resize", w, h] => vec![InputEvent::Resize {
            size: Point::new(number(w)?, number(h)?),
        }],
        ["select", lat, lng] => vec![InputEvent::Control(ControlAction::Select(GeoPoint::new(
            number(lat)?,
            number(lng)?,
        )))],
        ["guess"] | ["pin"] => vec![InputEvent::Control(ControlAction::PinIt)],
        ["next"] => vec![InputEvent::Control(ControlAction::NextRound)],
        ["restart"] => vec![InputEvent::Control(ControlAction::PlayAgain)],
        _ => bail!("unknown command '{}', try 'help'", words.join(" ")),
    };
    Ok(inputs)
}

fn number(word: &str) -> anyhow::Result<f64> {
    word.parse()
        .map_err(|_| anyhow!("'{}' is not a number", word))
}
