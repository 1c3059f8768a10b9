use std::io::stdout;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use ratatui::DefaultTerminal;
use ratatui::crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use ratatui::crossterm::execute;
use ratatui::style::Color;
use tracing::{debug, info, warn};

mod cells;
mod controller;
mod domain;
mod editor;
mod icons;
mod inputter;
mod logging;
mod model;
mod records;
mod renderers;
mod store;
mod theme;
mod ui;

use cells::{Align, TextCellStyle};
use controller::Controller;
use domain::{GridConfig, GridError, Message};
use model::{Model, Status};
use icons::HeaderIcon;
use records::{COLUMN_FIELDS, Field, RecordGenerator};
use store::ContactStore;
use theme::{Rgba, Theme};
use ui::TableUI;

/// Contact grid with synthetic data, inline editing and custom cell renderers.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Number of generated contacts
    #[arg(long, default_value_t = 2000)]
    records: usize,

    /// Fields to generate, unknown names are skipped
    #[arg(long, value_delimiter = ',', default_value = "name,email,phone,company")]
    fields: Vec<String>,

    /// Seed for reproducible data
    #[arg(long)]
    seed: Option<u64>,

    /// Show this field with the styled text renderer (repeatable)
    #[arg(long, value_enum)]
    styled: Vec<Field>,

    #[arg(long, value_enum, default_value = "left")]
    align: Align,

    #[arg(long)]
    bold: bool,

    #[arg(long)]
    italic: bool,

    /// Text colour of styled cells, a name or #rrggbb
    #[arg(long)]
    color: Option<Color>,

    #[arg(long, default_value_t = 2)]
    freeze_columns: usize,

    #[arg(long, default_value_t = 2)]
    freeze_trailing_rows: usize,

    /// Draw a separator after the frozen columns
    #[arg(long)]
    shadow_x: bool,

    #[arg(long)]
    no_shadow_y: bool,

    #[arg(long, default_value_t = 2)]
    header_height: u16,

    /// Write logs to this file, `~` and environment variables are expanded
    #[arg(long)]
    log_file: Option<String>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a header icon as SVG, or list the icon keys
    Icon {
        key: Option<String>,
        #[arg(long)]
        fg: Option<String>,
        #[arg(long)]
        bg: Option<String>,
    },
}

impl Cli {
    fn grid_config(&self) -> GridConfig {
        let mut text_style = TextCellStyle::default()
            .align(self.align)
            .bold(self.bold)
            .italic(self.italic);
        if let Some(color) = self.color {
            text_style = text_style.color(color);
        }
        GridConfig::default()
            .header_height(self.header_height)
            .freeze_columns(self.freeze_columns)
            .freeze_trailing_rows(self.freeze_trailing_rows)
            .fixed_shadow_x(self.shadow_x)
            .fixed_shadow_y(!self.no_shadow_y)
            .styled_columns(self.styled.clone())
            .text_style(text_style)
    }
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

fn run(cli: Cli) -> Result<(), GridError> {
    logging::init(cli.log_file.as_deref(), &cli.log_level)?;

    if let Some(Command::Icon { key, fg, bg }) = &cli.command {
        return print_icon(key.as_deref(), fg.as_deref(), bg.as_deref());
    }

    let config = cli.grid_config();
    debug!("Grid config: {config:?}");

    let mut generator = match cli.seed {
        Some(seed) => RecordGenerator::with_seed(seed),
        None => RecordGenerator::from_entropy(),
    };
    let store = ContactStore::new(generator.generate(&cli.fields, cli.records));

    let mut terminal = ratatui::init();
    let result = execute!(stdout(), EnableMouseCapture)
        .map_err(GridError::from)
        .and_then(|_| event_loop(&mut terminal, &config, store));

    // Restore the terminal on every path, errors are reported afterwards
    if let Err(e) = execute!(stdout(), DisableMouseCapture) {
        warn!("Failed to disable mouse capture: {e}");
    }
    ratatui::restore();
    result
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    config: &GridConfig,
    store: ContactStore,
) -> Result<(), GridError> {
    let size = terminal.size()?;
    let mut model = Model::init(config, store, size.width, size.height);
    let mut ui = TableUI::new();
    let controller = Controller::new(config);

    info!("Starting cgrid");
    while model.status != Status::QUITTING {
        // The frame follows the terminal immediately, the Resize event may
        // still be queued
        let size = terminal.size()?;
        if model.ui_size() != (size.width, size.height) {
            model.update(Some(Message::Resize(size.width, size.height)));
        }

        // Render the current view
        terminal.draw(|f| ui.draw(&model, f))?;

        // Handle events and map to a Message
        let message = controller.handle_event(&model)?;
        model.update(message);
    }
    info!("Quitting cgrid");
    Ok(())
}

fn print_icon(key: Option<&str>, fg: Option<&str>, bg: Option<&str>) -> Result<(), GridError> {
    let Some(key) = key else {
        for field in COLUMN_FIELDS {
            println!("{}", HeaderIcon::for_field(field).key());
        }
        return Ok(());
    };
    let theme = Theme::default();
    let icon = icons::icon_fn(key)?;
    let fg = fg.unwrap_or(theme.icon_fg);
    let bg = bg.unwrap_or(theme.icon_bg);
    for color in [fg, bg] {
        if Rgba::parse(color).is_none() {
            return Err(GridError::InvalidColor(color.to_string()));
        }
    }
    println!("{}", icon(fg, bg));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_flags() {
        let cli = Cli::try_parse_from(["cgrid"]).unwrap();
        assert_eq!(cli.records, 2000);
        assert_eq!(cli.fields, ["name", "email", "phone", "company"]);
        let config = cli.grid_config();
        assert_eq!(config.freeze_columns, 2);
        assert_eq!(config.freeze_trailing_rows, 2);
        assert!(!config.fixed_shadow_x);
        assert!(config.fixed_shadow_y);
        assert!(config.styled_columns.is_empty());
    }

    #[test]
    fn styled_flags_build_text_style() {
        let cli = Cli::try_parse_from([
            "cgrid", "--styled", "company", "--styled", "email", "--align", "right", "--bold",
            "--color", "red", "--shadow-x", "--no-shadow-y", "--fields", "name,company",
        ])
        .unwrap();
        let config = cli.grid_config();
        assert_eq!(config.styled_columns, [Field::Company, Field::Email]);
        assert_eq!(
            config.text_style,
            TextCellStyle::default().align(Align::Right).bold(true).color(Color::Red)
        );
        assert!(config.fixed_shadow_x);
        assert!(!config.fixed_shadow_y);
        assert_eq!(cli.fields, ["name", "company"]);
    }

    #[test]
    fn icon_subcommand() {
        let cli = Cli::try_parse_from(["cgrid", "icon", "header-phone", "--fg", "#000000"]).unwrap();
        let Some(Command::Icon { key, fg, bg }) = cli.command else {
            panic!("expected icon subcommand");
        };
        assert_eq!(key.as_deref(), Some("header-phone"));
        assert_eq!(fg.as_deref(), Some("#000000"));
        assert!(bg.is_none());
        assert!(print_icon(None, None, None).is_ok());
        assert!(matches!(
            print_icon(Some("header-age"), None, None),
            Err(GridError::UnknownIcon(_))
        ));
        assert!(matches!(
            print_icon(Some("header-phone"), Some("white"), None),
            Err(GridError::InvalidColor(c)) if c == "white"
        ));
    }
}
