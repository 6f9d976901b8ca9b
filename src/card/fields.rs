use crate::{card::color::ColorIdentity, input::csv::CardRow};

/// Title used when a row has no `Cards` value.
pub const UNTITLED: &str = "Untitled";
/// Rarity code used when a row has no `R` value.
pub const DEFAULT_RARITY: &str = "c";
/// Default location of rarity set symbols; `{rarity}` is substituted.
pub const DEFAULT_SET_SYMBOL_PATTERN: &str = "img/setSymbols/private/di-{rarity}.svg";

/// Text content of one card, rebuilt from scratch for every row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CardContent {
    /// Card name.
    pub title: String,
    /// Type and subtype joined by an em-dash.
    pub type_line: String,
    /// Mana cost markup, e.g. `{2}{R}{G}`.
    pub mana_cost: String,
    /// Uppercased mana symbols in cost order.
    pub mana_symbols: Vec<char>,
    /// Power/toughness, e.g. `2/2`.
    pub power_toughness: String,
    /// Rules text with `{i}` / `{bold}` tags and `\n` separators.
    pub rules_text: String,
    /// Lowercase rarity code.
    pub rarity: String,
    /// Source of the rarity set symbol.
    pub set_symbol_src: String,
}

impl CardContent {
    /// Colors referenced by the mana cost.
    pub fn color_identity(&self) -> ColorIdentity {
        ColorIdentity::from_symbols(self.mana_symbols.iter().copied())
    }

    /// Whether the type line marks the card as legendary.
    pub fn is_legendary(&self) -> bool {
        is_legendary(&self.type_line)
    }
}

/// Inline styling applied to one rules-text column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextWrap {
    /// Inserted as-is.
    #[default]
    Plain,
    /// Wrapped in `{i}…{/i}`.
    Italic,
    /// Wrapped in `{bold}…{/bold}`.
    Bold,
}

impl TextWrap {
    fn apply(self, text: &str) -> String {
        match self {
            Self::Plain => text.to_string(),
            Self::Italic => format!("{{i}}{text}{{/i}}"),
            Self::Bold => format!("{{bold}}{text}{{/bold}}"),
        }
    }
}

/// A source column contributing to the rules text box.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RulesColumn {
    /// CSV column name.
    pub column: String,
    /// Styling for the column's value.
    #[serde(default)]
    pub wrap: TextWrap,
    /// Remove embedded `"` characters before wrapping.
    #[serde(default = "strip_quotes_default")]
    pub strip_quotes: bool,
}

fn strip_quotes_default() -> bool {
    true
}

impl RulesColumn {
    /// Build a column entry that strips embedded quotes.
    pub fn new(column: impl Into<String>, wrap: TextWrap) -> Self {
        Self {
            column: column.into(),
            wrap,
            strip_quotes: true,
        }
    }

    /// Keep embedded quotes verbatim.
    pub fn keep_quotes(mut self) -> Self {
        self.strip_quotes = false;
        self
    }
}

/// Known rules-text column layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RulesPreset {
    /// `Ability`, `Passive`, `Active`, then `Quote` in italics.
    #[default]
    Quote,
    /// Bold `Std Ability`, `Ability`, `Passive`, `Active`, then `Flavour Text` in italics.
    Flavour,
}

impl RulesPreset {
    /// Ordered column list for this preset.
    pub fn columns(self) -> Vec<RulesColumn> {
        use TextWrap::*;
        match self {
            Self::Quote => vec![
                RulesColumn::new("Ability", Plain),
                RulesColumn::new("Passive", Plain),
                RulesColumn::new("Active", Plain),
                RulesColumn::new("Quote", Italic).keep_quotes(),
            ],
            Self::Flavour => vec![
                RulesColumn::new("Std Ability", Bold).keep_quotes(),
                RulesColumn::new("Ability", Plain),
                RulesColumn::new("Passive", Plain),
                RulesColumn::new("Active", Plain),
                RulesColumn::new("Flavour Text", Italic),
            ],
        }
    }
}

impl std::str::FromStr for RulesPreset {
    type Err = crate::CardforgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quote" => Ok(Self::Quote),
            "flavour" | "flavor" => Ok(Self::Flavour),
            other => Err(crate::CardforgeError::validation(format!(
                "unknown rules preset '{other}' (expected 'quote' or 'flavour')"
            ))),
        }
    }
}

/// Per-batch settings for turning rows into [`CardContent`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldMapping {
    /// Ordered rules-text columns.
    pub rules: Vec<RulesColumn>,
    /// Set symbol source pattern; `{rarity}` is replaced by the rarity code.
    pub set_symbol_pattern: String,
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            rules: RulesPreset::default().columns(),
            set_symbol_pattern: DEFAULT_SET_SYMBOL_PATTERN.to_string(),
        }
    }
}

/// Map a CSV row to card content. Every field is assigned; nothing is carried over.
pub fn map_row(row: &CardRow, mapping: &FieldMapping) -> CardContent {
    let title = row.non_empty("Cards").unwrap_or(UNTITLED).to_string();
    let type_line = format_type_line(row.get("Type"), row.non_empty("Subtype"));
    let raw_cost = row.get("Mana cost").unwrap_or("");
    let rarity = row
        .non_empty("R")
        .map(str::to_lowercase)
        .unwrap_or_else(|| DEFAULT_RARITY.to_string());

    CardContent {
        title,
        type_line,
        mana_cost: format_mana_cost(raw_cost),
        mana_symbols: raw_cost
            .to_uppercase()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect(),
        power_toughness: row.get("p/t").unwrap_or("").trim().to_string(),
        rules_text: assemble_rules_text(row, &mapping.rules),
        set_symbol_src: mapping.set_symbol_pattern.replace("{rarity}", &rarity),
        rarity,
    }
}

fn format_type_line(ty: Option<&str>, subtype: Option<&str>) -> String {
    let mut line = ty.unwrap_or("").to_string();
    if let Some(sub) = subtype {
        line.push_str(" \u{2014} ");
        line.push_str(sub);
    }
    line.trim().to_string()
}

/// Wrap each character of a raw mana cost as an uppercase symbol token.
///
/// `format_mana_cost("2rg") == "{2}{R}{G}"`.
pub fn format_mana_cost(raw: &str) -> String {
    raw.to_uppercase().chars().map(|c| format!("{{{c}}}")).collect()
}

/// Concatenate the configured rules columns in order, one per line.
pub fn assemble_rules_text(row: &CardRow, columns: &[RulesColumn]) -> String {
    let mut parts = Vec::new();
    for col in columns {
        let Some(raw) = row.get(&col.column) else {
            continue;
        };
        let text = if col.strip_quotes {
            raw.replace('"', "")
        } else {
            raw.to_string()
        };
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        parts.push(col.wrap.apply(text));
    }
    parts.join("\n")
}

/// Case-insensitive check for the word `legendary` in a type line.
pub fn is_legendary(type_line: &str) -> bool {
    type_line.to_lowercase().contains("legendary")
}

/// Custom art source for a row: `image_file_path`, falling back to `Image`.
pub fn art_source(row: &CardRow) -> Option<&str> {
    row.non_empty("image_file_path")
        .or_else(|| row.non_empty("Image"))
}

#[cfg(test)]
#[path = "../../tests/unit/card/fields.rs"]
mod tests;
