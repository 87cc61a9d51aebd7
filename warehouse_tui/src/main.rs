use anyhow::Result;
use clap::Parser;
use ratatui::{
    crossterm::{
        self,
        event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
    prelude::*,
    widgets::*,
};
use std::{
    collections::VecDeque,
    io::{self, Stdout},
    path::PathBuf,
    time::{Duration, Instant},
};
use warehouse_core::{
    Position,
    delivery::{self, MovementReporter, RunResult},
    map::Grid,
    warehouse::{CellKind, load_warehouse_from_string, locate_agent_start, locate_dropoff},
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Map file to load
    #[arg(short, long, value_name = "MAP_FILE")]
    map: Option<PathBuf>,

    /// Print the movement trace to stdout instead of animating it
    #[arg(long)]
    headless: bool,

    /// Milliseconds between animation steps
    #[arg(long, default_value_t = 250)]
    tick_ms: u64,
}

/// One line of the end-of-run tally.
fn tally_line(result: RunResult) -> String {
    if result.packages_delivered == 0 && result.packages_found > 0 {
        "No packages could be delivered.".to_string()
    } else {
        format!(
            "Delivered {} of {} package(s).",
            result.packages_delivered, result.packages_found
        )
    }
}

/// Prints every notice of the run as a line on stdout.
struct ConsoleReporter;

impl MovementReporter for ConsoleReporter {
    fn path(&mut self, path: &[Position]) {
        let mut steps = path.iter();
        if let Some(first) = steps.next() {
            println!("Agent departs from ({}, {})", first.row, first.col);
        }
        for step in steps {
            println!("Agent moves to ({}, {})", step.row, step.col);
        }
    }

    fn pickup_unreachable(&mut self, pickup: Position) {
        println!("No route to the package at ({}, {})", pickup.row, pickup.col);
    }

    fn pickup_collected(&mut self, pickup: Position) {
        println!("Package collected at ({}, {})", pickup.row, pickup.col);
    }

    fn dropoff_unreachable(&mut self, from: Position) {
        println!(
            "No route to the drop-off zone from ({}, {})",
            from.row, from.col
        );
    }

    fn package_delivered(&mut self, dropoff: Position) {
        println!("Package delivered at ({}, {})", dropoff.row, dropoff.col);
    }

    fn finished(&mut self, result: RunResult) {
        println!("{}", tally_line(result));
    }
}

/// One unit of playback: the agent advancing one cell, a cell losing its
/// package, or a notice for the log pane.
enum PlaybackEvent {
    AgentAt(Position),
    CellCleared(Position),
    Notice(String),
}

/// Records the run as playback events so the UI can replay it one step at
/// a time after the simulation has already finished.
#[derive(Default)]
struct PlaybackRecorder {
    events: Vec<PlaybackEvent>,
}

impl MovementReporter for PlaybackRecorder {
    fn path(&mut self, path: &[Position]) {
        self.events
            .extend(path.iter().map(|step| PlaybackEvent::AgentAt(*step)));
    }

    fn pickup_unreachable(&mut self, pickup: Position) {
        self.events.push(PlaybackEvent::Notice(format!(
            "No route to the package at ({}, {})",
            pickup.row, pickup.col
        )));
    }

    fn pickup_collected(&mut self, pickup: Position) {
        self.events.push(PlaybackEvent::CellCleared(pickup));
        self.events.push(PlaybackEvent::Notice(format!(
            "Package collected at ({}, {})",
            pickup.row, pickup.col
        )));
    }

    fn dropoff_unreachable(&mut self, from: Position) {
        self.events.push(PlaybackEvent::Notice(format!(
            "No route to the drop-off zone from ({}, {})",
            from.row, from.col
        )));
    }

    fn package_delivered(&mut self, dropoff: Position) {
        self.events.push(PlaybackEvent::Notice(format!(
            "Package delivered at ({}, {})",
            dropoff.row, dropoff.col
        )));
    }

    fn finished(&mut self, result: RunResult) {
        self.events.push(PlaybackEvent::Notice(tally_line(result)));
    }
}

struct App {
    /// Floor as it looked when the run started; packages disappear from it
    /// as playback catches up with the recorded run.
    grid: Grid<CellKind>,
    agent: Position,
    events: VecDeque<PlaybackEvent>,
    log: Vec<String>,
    /// Flag to control the main loop.
    should_quit: bool,
    /// Set once every recorded event has been replayed.
    done: bool,
}

impl App {
    fn new(grid: Grid<CellKind>, start: Position, dropoff: Position) -> Self {
        // Run the whole simulation up front; the UI replays the recording.
        let mut recorder = PlaybackRecorder::default();
        let mut working = grid.clone();
        delivery::run(&mut working, start, dropoff, &mut recorder);

        App {
            grid,
            agent: start,
            events: recorder.events.into(),
            log: Vec::new(),
            should_quit: false,
            done: false,
        }
    }

    /// Advances playback to the next agent movement, applying any cell
    /// clears and log notices queued before it.
    fn tick(&mut self) {
        if self.done {
            return;
        }
        loop {
            match self.events.pop_front() {
                Some(PlaybackEvent::AgentAt(step)) => {
                    self.agent = step;
                    break;
                }
                Some(PlaybackEvent::CellCleared(cell)) => self.grid[cell] = CellKind::Empty,
                Some(PlaybackEvent::Notice(line)) => self.log.push(line),
                None => {
                    self.done = true;
                    break;
                }
            }
        }
    }

    /// Sets the quit flag.
    fn quit(&mut self) {
        self.should_quit = true;
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();
    // If no map file is provided, use the default map
    let map_file = args.map.unwrap_or(PathBuf::from("maps/warehouse01.txt"));
    // Ensure the map file exists
    if !map_file.exists() {
        return Err(anyhow::anyhow!(
            "Map file does not exist: {}",
            map_file.display()
        ));
    }

    let map_string = std::fs::read_to_string(&map_file)?;
    let grid = load_warehouse_from_string(&map_string)?;
    let start = locate_agent_start(&grid)?;
    let dropoff = locate_dropoff(&grid)?;

    if args.headless {
        let mut working = grid;
        delivery::run(&mut working, start, dropoff, &mut ConsoleReporter);
        return Ok(());
    }

    // Set up the terminal
    let mut terminal = setup_terminal()?;

    // Create the application state
    let mut app = App::new(grid, start, dropoff);

    // Run the main application loop
    run_app(&mut terminal, &mut app, Duration::from_millis(args.tick_ms))?;

    // Restore the terminal state
    restore_terminal(&mut terminal)?;

    Ok(())
}

/// Configures the terminal for TUI interaction.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    enable_raw_mode()?; // Put terminal in raw mode
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?; // Use alternate screen and enable mouse capture
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(Into::into) // Map io::Error to anyhow::Error
}

/// Restores the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Runs the main loop of the TUI application.
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    tick_rate: Duration,
) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        // Draw the UI
        terminal.draw(|f| ui(f, app))?;

        // Calculate timeout for event polling
        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        // Poll for events (keyboard, mouse, etc.)
        if crossterm::event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => app.quit(),
                    _ => {}
                }
            }
        }

        // Update application state if enough time has passed
        if last_tick.elapsed() >= tick_rate {
            app.tick(); // Replay the next recorded step
            last_tick = Instant::now();
        }

        // Exit loop if requested
        if app.should_quit {
            break;
        }
    }
    Ok(())
}

/// Renders the user interface.
fn ui(frame: &mut Frame, app: &App) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(70), // Area for the floor map
            Constraint::Percentage(20), // Area for the run log
            Constraint::Percentage(10), // Area for status/help
        ])
        .split(frame.area());

    // Render the floor
    render_floor(frame, main_layout[0], app);

    // Render the run log
    render_log(frame, main_layout[1], &app.log);

    // Render status/help text
    let status = if app.done {
        "Run complete. Press 'q' or 'Esc' to quit."
    } else {
        "Press 'q' or 'Esc' to quit."
    };
    let help_text = Paragraph::new(status)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(help_text, main_layout[2]);
}

/// Renders the most recent run notices onto the frame.
fn render_log(frame: &mut Frame, area: Rect, log: &[String]) {
    let visible = area.height.saturating_sub(2) as usize;
    let skip = log.len().saturating_sub(visible);
    let lines: Vec<ListItem> = log[skip..].iter().map(|line| ListItem::new(line.as_str())).collect();

    let log_widget =
        List::new(lines).block(Block::default().borders(Borders::ALL).title("Run log"));
    frame.render_widget(log_widget, area);
}

/// Renders the warehouse floor onto the frame.
fn render_floor(frame: &mut Frame, area: Rect, app: &App) {
    let grid = &app.grid;
    let mut lines: Vec<Line> = Vec::with_capacity(grid.rows());

    for row in 0..grid.rows() {
        let mut spans: Vec<Span> = Vec::with_capacity(grid.cols());
        for col in 0..grid.cols() {
            let cell = Position { row, col };
            if cell == app.agent {
                // Display the agent character '@' with color
                spans.push(Span::styled("@", Style::default().fg(Color::Red).bold()));
                continue;
            }
            let (glyph, style) = match grid[cell] {
                CellKind::Empty => (" ", Style::default()),
                CellKind::Obstacle => ("#", Style::default().fg(Color::DarkGray)),
                CellKind::AgentStart => ("s", Style::default().fg(Color::DarkGray)),
                CellKind::Pickup => ("P", Style::default().fg(Color::Yellow)),
                CellKind::Dropoff => ("D", Style::default().fg(Color::Green)),
            };
            spans.push(Span::styled(glyph, style));
        }
        lines.push(Line::from(spans));
    }

    let floor_paragraph = Paragraph::new(lines)
        .block(Block::default().title("Warehouse").borders(Borders::ALL))
        .alignment(Alignment::Center);

    frame.render_widget(floor_paragraph, area);
}
