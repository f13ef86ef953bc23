//! Line commands understood by the terminal front end

use crate::models::{BadgeStyle, COLOR_PALETTE, SnippetKind};

pub const HELP: &str = "\
Commands:
  url <text>          set the URL you want to track (empty clears it)
  label <text>        set the badge label
  color <hex>         set the color (default style only)
  palette [n]         list preset colors, or pick preset n
  style <name>        default | maple | rabbit
  font-size [n]       legacy font size; no value switches back to styleType
  show                print the form and the result panel
  json                print configuration and request as JSON
  copy <what>         url | markdown | html
  store               list badge styles
  buy <style>         purchase a style (sign-in required)
  reset               restore the empty form
  help                this text
  quit                leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    TrackedUrl(String),
    Label(String),
    Color(String),
    ListPalette,
    PickPalette(usize),
    Style(BadgeStyle),
    FontSize(Option<u32>),
    Show,
    Json,
    Copy(SnippetKind),
    Store,
    Buy(String),
    Reset,
    Help,
    Quit,
}

impl Command {
    /// Whether running the command may change the configuration
    pub fn edits_configuration(&self) -> bool {
        matches!(
            self,
            Self::TrackedUrl(_)
                | Self::Label(_)
                | Self::Color(_)
                | Self::PickPalette(_)
                | Self::Style(_)
                | Self::FontSize(_)
                | Self::Reset
        )
    }
}

pub fn parse(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim()));

    let command = match word.to_ascii_lowercase().as_str() {
        "url" => Command::TrackedUrl(rest.to_string()),
        "label" => Command::Label(rest.to_string()),
        "color" => Command::Color(rest.to_string()),
        "palette" if rest.is_empty() => Command::ListPalette,
        "palette" => {
            let index: usize = rest
                .parse()
                .map_err(|_| format!("palette expects a number, got `{rest}`"))?;
            if index >= COLOR_PALETTE.len() {
                return Err(format!(
                    "palette has {} colors (0-{})",
                    COLOR_PALETTE.len(),
                    COLOR_PALETTE.len() - 1
                ));
            }
            Command::PickPalette(index)
        }
        "style" => Command::Style(rest.parse().map_err(|e| format!("{e}"))?),
        "font-size" if rest.is_empty() => Command::FontSize(None),
        "font-size" => Command::FontSize(Some(
            rest.parse()
                .map_err(|_| format!("font-size expects a number, got `{rest}`"))?,
        )),
        "show" => Command::Show,
        "json" => Command::Json,
        "copy" => Command::Copy(rest.parse()?),
        "store" => Command::Store,
        "buy" if !rest.is_empty() => Command::Buy(rest.to_ascii_lowercase()),
        "buy" => return Err("buy expects a style id".to_string()),
        "reset" => Command::Reset,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "" => return Err("type `help` for commands".to_string()),
        other => return Err(format!("unknown command `{other}`, type `help`")),
    };
    Ok(command)
}
