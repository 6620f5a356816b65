use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tracing::{info, warn};

use quicklearn::app::{App, AppScreen};
use quicklearn::config::Config;
use quicklearn::engine::{Catalog, TimingTracker};
use quicklearn::engine::timing::format_average;
use quicklearn::event::{EventPump, TermEvent};
use quicklearn::logging::{self, Verbosity};
use quicklearn::store::JsonStore;
use quicklearn::ui::components::card_view::CardView;
use quicklearn::ui::components::template_menu::{MenuRow, TemplateMenu};
use quicklearn::ui::layout::{AppLayout, centered_box, pack_hint_lines};
use quicklearn::ui::theme::Theme;

#[derive(Parser)]
#[command(
    name = "quicklearn",
    version,
    about = "Keypad flashcards for arithmetic, algebra and calculus"
)]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short = 'T', long, help = "Open this template directly")]
    template: Option<String>,

    #[arg(long, help = "Seed the problem generator for reproducible rounds")]
    seed: Option<u64>,

    #[arg(short, long, help = "Print the template catalog with averages and exit")]
    list: bool,

    #[arg(long, value_name = "PATH", help = "Write saved timings and config to PATH")]
    export: Option<PathBuf>,

    #[arg(long, value_name = "PATH", help = "Replace saved timings from an export file")]
    import: Option<PathBuf>,

    #[arg(short, long, help = "Debug logging to the log file")]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = Config::load();
    let mut config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => Config::default(),
    };

    if let Err(e) = logging::init_subscriber(&config.data_path(), Verbosity::from_flag(cli.verbose))
    {
        eprintln!("warning: logging disabled: {e:#}");
    }
    if let Err(e) = &loaded {
        warn!(error = %e, "config unreadable, using defaults");
    }

    let catalog = Catalog::builtin().context("built-in template catalog")?;
    config.normalize_start_template(&catalog);

    if let Some(theme) = cli.theme {
        if Theme::load(&theme).is_none() {
            bail!(
                "unknown theme {theme:?} (available: {})",
                Theme::available_themes().join(", ")
            );
        }
        config.theme = theme;
    }
    if let Some(title) = cli.template {
        if catalog.find(&title).is_none() {
            bail!("unknown template {title:?}; see --list");
        }
        config.start_template = Some(title);
    }

    let store = match JsonStore::new(&config) {
        Ok(store) => Some(store),
        Err(e) => {
            warn!(error = %e, "timings will not be saved");
            None
        }
    };

    if let Some(path) = cli.export {
        let store = store.context("data directory unavailable")?;
        JsonStore::write_export(&path, &store.export_all(&config))?;
        println!("Exported to {}", path.display());
        return Ok(());
    }
    if let Some(path) = cli.import {
        let store = store.context("data directory unavailable")?;
        import(&store, &config, &path)?;
        println!("Imported from {}", path.display());
        return Ok(());
    }
    if cli.list {
        print_catalog(&catalog, store.as_ref());
        return Ok(());
    }

    info!(theme = %config.theme, seed = ?cli.seed, "starting");
    let mut app = App::new(config, catalog, store, cli.seed);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventPump::spawn(Duration::from_millis(100));
    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }
    Ok(())
}

/// Apply an export file: timings replace the stored ones; the exported
/// config is saved except for `data_dir`, which stays machine-local.
fn import(store: &JsonStore, config: &Config, path: &Path) -> Result<()> {
    let data = JsonStore::read_export(path)?;
    store.import_all(&data)?;

    let mut imported = data.config;
    imported.data_dir = config.data_dir.clone();
    imported.save()?;
    info!(path = %path.display(), "imported export");
    Ok(())
}

fn print_catalog(catalog: &Catalog, store: Option<&JsonStore>) {
    let averages = store.map(|s| s.load_timings().averages).unwrap_or_default();
    let timings = TimingTracker::new(averages);
    for template in catalog.iter() {
        println!(
            "{:<24} {:<11} {:>8}",
            template.title,
            template.category.as_str(),
            format_average(timings.read_average(template.title))
        );
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventPump,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            TermEvent::Key(key) => app.handle_key(key),
            TermEvent::Tick | TermEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let layout = AppLayout::new(area);

    let header_info = match (app.screen, &app.session) {
        (AppScreen::Card, Some(session)) => {
            format!(" {} ", session.template().category.as_str())
        }
        _ => format!(" {} templates ", app.catalog.len()),
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " quicklearn ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            header_info,
            Style::default().fg(colors.muted()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout.header);

    let hints: &[&str] = match app.screen {
        AppScreen::Menu if app.searching => &["[type] filter", "[Enter] done", "[Esc] clear"],
        AppScreen::Menu => &[
            "[↑↓/jk] move",
            "[Enter] open",
            "[/] search",
            "[q] quit",
        ],
        AppScreen::Card => &["[Esc] back to menu", "[Ctrl-C] quit"],
    };

    match app.screen {
        AppScreen::Menu => render_menu(frame, app, &layout),
        AppScreen::Card => render_card(frame, app, &layout),
    }

    let mut footer_lines: Vec<Line> = Vec::new();
    if let Some(status) = &app.status {
        footer_lines.push(Line::from(Span::styled(
            format!(" {status}"),
            Style::default().fg(colors.warning()),
        )));
    }
    footer_lines.extend(
        pack_hint_lines(hints, layout.footer.width as usize)
            .into_iter()
            .map(|h| Line::from(Span::styled(h, Style::default().fg(colors.muted())))),
    );
    frame.render_widget(Paragraph::new(footer_lines), layout.footer);
}

fn render_menu(frame: &mut ratatui::Frame, app: &App, layout: &AppLayout) {
    let rows: Vec<MenuRow> = app
        .visible_templates()
        .into_iter()
        .filter_map(|i| app.catalog.get(i))
        .map(|template| MenuRow {
            template,
            average: app.average_for(template.title),
        })
        .collect();

    let width = layout.main.width.min(64);
    let menu_area = centered_box(width, layout.main.height, layout.main);
    let menu = TemplateMenu::new(rows, app.menu_selected, &app.theme)
        .search(&app.search_query, app.searching)
        .show_category(layout.tier.show_category());
    frame.render_widget(menu, menu_area);
}

fn render_card(frame: &mut ratatui::Frame, app: &App, layout: &AppLayout) {
    let Some(session) = &app.session else {
        return;
    };
    let Some(round) = session.round() else {
        return;
    };
    let title = session.template().title;

    let card_area = centered_box(64, 16, layout.main);
    let card = CardView::new(title, round, &app.theme)
        .stats(app.average_for(title), session.solved())
        .last_solve(app.last_solve.as_ref())
        .show_hints(app.config.show_keypad_hints);
    frame.render_widget(card, card_area);
}
