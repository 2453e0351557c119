//! Browse a unified diff in the terminal.
//!
//! ```text
//! git diff > /tmp/change.patch
//! cargo run -p patchview --example browse --features crossterm -- /tmp/change.patch src/lib.rs
//! ```
//!
//! With a file path the full working-tree file is read so unchanged lines between hunks show up.
//! Keys: `j/k` scroll, `PgUp/PgDn` page, `g/G` top/bottom, `n/]` next change, `p/[` previous
//! change, `q` quit. The minimap on the right accepts clicks, drags and the wheel.

use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableMouseCapture;
use crossterm::event::Event;
use crossterm::event::KeyCode;
use crossterm::event::KeyEventKind;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use patchview::DiffView;
use patchview::Theme;
use patchview::core::engine::ReadOutcome;
use patchview::core::source::FileKey;
use patchview::core::source::WorkdirSource;
use patchview::crossterm_input::input_event_from_crossterm;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Constraint;
use ratatui::layout::Layout;
use ratatui::style::Stylize;
use ratatui::text::Line;
use std::io;
use std::time::Duration;

fn main() -> io::Result<()> {
    let mut args = std::env::args().skip(1);
    let Some(patch_path) = args.next() else {
        eprintln!("usage: browse <patch-file> [path-in-patch]");
        return Ok(());
    };
    let patch = std::fs::read_to_string(&patch_path)?;
    let key = args.next().map(FileKey::working_tree);

    let mut view = DiffView::new();
    view.set_patch(key, &patch);
    let source = WorkdirSource::new(std::env::current_dir()?);
    let status = match futures::executor::block_on(view.load_full_file(&source)) {
        Some(ReadOutcome::Applied) => "full file",
        Some(_) => "patch only (file unavailable)",
        None => "patch only",
    };

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    let result = run(&mut terminal, &mut view, status);

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    view: &mut DiffView,
    status: &str,
) -> io::Result<()> {
    let theme = Theme::default();
    loop {
        let mut body = ratatui::layout::Rect::default();
        terminal.draw(|f| {
            let [main, footer] =
                Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(f.area());
            body = main;
            view.render_ref(main, f.buffer_mut(), &theme);

            let stats = view.engine().stats();
            let block = view
                .engine()
                .current_block()
                .map(|i| format!("change {}/{}", i + 1, view.engine().blocks().len()))
                .unwrap_or_else(|| format!("{} changes", view.engine().blocks().len()));
            let position = view
                .engine()
                .viewport()
                .percent()
                .map_or_else(|| "all".to_string(), |p| format!("{p}%"));
            let text = format!(
                " +{} -{} ~{}  {block}  {position}  {status}  q quit",
                stats.added, stats.deleted, stats.modified
            );
            f.render_widget(Line::from(text).dark_gray(), footer);
        })?;

        if !crossterm::event::poll(Duration::from_millis(250))? {
            continue;
        }
        let ev = crossterm::event::read()?;
        if let Event::Key(k) = &ev
            && k.kind == KeyEventKind::Press
            && matches!(k.code, KeyCode::Char('q') | KeyCode::Esc)
        {
            return Ok(());
        }
        if let Some(input) = input_event_from_crossterm(ev) {
            view.handle_event_in_area(body, input);
        }
    }
}
