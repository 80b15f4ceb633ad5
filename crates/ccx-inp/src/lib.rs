//! Keyword-deck tokenizer for CalculiX/Abaqus `.inp` files.
//!
//! A deck is split into [`Card`]s: the `*KEYWORD, KEY=value, ...` header line
//! and the raw data lines that follow it. Interpretation of the data lines is
//! left to the consumer (see `ccx-model`).

use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deck {
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub keyword: String,
    pub parameters: Vec<Parameter>,
    pub data_lines: Vec<String>,
    pub line_start: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub key: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl ParseError {
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ParseError {}

impl Card {
    /// Value of a header parameter, looked up case-insensitively.
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|p| p.key.eq_ignore_ascii_case(key))
            .and_then(|p| p.value.as_deref())
    }

    /// True when a bare flag such as `GENERATE` is present.
    pub fn has_flag(&self, key: &str) -> bool {
        self.parameters.iter().any(|p| p.key.eq_ignore_ascii_case(key))
    }

    /// Keyword with blanks and underscores removed, e.g. `END STEP` -> `ENDSTEP`.
    pub fn normalized_keyword(&self) -> String {
        self.keyword
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_')
            .collect::<String>()
            .to_ascii_uppercase()
    }
}

impl Deck {
    pub fn parse_file(path: impl AsRef<Path>) -> Result<Self, ParseError> {
        let path = path.as_ref();
        let raw = read_deck_text(path)?;
        Self::parse_str(&raw)
    }

    pub fn parse_str(raw: &str) -> Result<Self, ParseError> {
        let lines: Vec<&str> = raw.lines().collect();
        let mut cards = Vec::new();
        let mut i = 0usize;

        while i < lines.len() {
            let trimmed = lines[i].trim();
            if trimmed.is_empty() || is_comment(trimmed) {
                i += 1;
                continue;
            }
            if !trimmed.starts_with('*') {
                return Err(ParseError::new(i + 1, "expected card starting with '*'"));
            }

            let line_start = i + 1;
            let mut header = trimmed.trim_start_matches('*').trim().to_string();
            i += 1;
            if header.is_empty() {
                // A bare "*" is used as a visual separator in some decks.
                continue;
            }

            while let Some(next) = lines.get(i).map(|l| l.trim()) {
                if !next.starts_with(',') {
                    break;
                }
                header.push_str(next);
                i += 1;
            }

            let (keyword, parameters) = parse_header(&header, line_start)?;

            let mut data_lines = Vec::new();
            while let Some(candidate) = lines.get(i).map(|l| l.trim()) {
                if candidate.starts_with('*') && !is_comment(candidate) {
                    break;
                }
                if !candidate.is_empty() && !is_comment(candidate) {
                    data_lines.push(candidate.to_string());
                }
                i += 1;
            }

            cards.push(Card {
                keyword,
                parameters,
                data_lines,
                line_start,
            });
        }

        Ok(Deck { cards })
    }

    /// Parses `path` and splices the cards of every `*INCLUDE` in after the
    /// include card itself.
    ///
    /// A file that cannot be read, the top-level one included, is logged and
    /// contributes no cards.
    pub fn parse_file_with_includes(path: impl AsRef<Path>) -> Result<Self, ParseError> {
        let path = path.as_ref();
        let raw = match read_deck_text(path) {
            Ok(raw) => raw,
            Err(err) => {
                error!("File not found: {} ({})", path.display(), err.message);
                return Ok(Deck::default());
            }
        };
        let mut expander = IncludeExpander::default();
        expander.expand(path, &raw)
    }
}

#[derive(Default)]
struct IncludeExpander {
    chain: Vec<PathBuf>,
    active: HashSet<PathBuf>,
}

impl IncludeExpander {
    fn expand(&mut self, path: &Path, raw: &str) -> Result<Deck, ParseError> {
        let key = normalize_path(path);
        if self.active.contains(&key) {
            let mut chain: Vec<String> =
                self.chain.iter().map(|p| p.display().to_string()).collect();
            chain.push(key.display().to_string());
            return Err(ParseError::new(
                0,
                format!("include cycle detected: {}", chain.join(" -> ")),
            ));
        }

        self.chain.push(key.clone());
        self.active.insert(key);
        let result = self.expand_cards(path, raw);
        if let Some(done) = self.chain.pop() {
            self.active.remove(&done);
        }
        result
    }

    fn expand_cards(&mut self, path: &Path, raw: &str) -> Result<Deck, ParseError> {
        let parsed = Deck::parse_str(raw).map_err(|err| ParseError {
            line: err.line,
            message: format!("{} (in {})", err.message, path.display()),
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let mut cards = Vec::with_capacity(parsed.cards.len());

        for card in parsed.cards {
            if card.normalized_keyword() != "INCLUDE" {
                cards.push(card);
                continue;
            }

            let target = card.parameter("INPUT").map(str::to_string).ok_or_else(|| {
                ParseError::new(card.line_start, "missing INPUT parameter in *INCLUDE card")
            })?;
            cards.push(card);

            let include_path = resolve_include_path(base_dir, &target);
            let text = match read_deck_text(&include_path) {
                Ok(text) => text,
                Err(err) => {
                    error!("File not found: {} ({})", include_path.display(), err.message);
                    continue;
                }
            };
            debug!("including {}", include_path.display());
            let included = self.expand(&include_path, &text)?;
            cards.extend(included.cards);
        }

        Ok(Deck { cards })
    }
}

fn read_deck_text(path: &Path) -> Result<String, ParseError> {
    fs::read(path)
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .map_err(|e| ParseError::new(0, format!("failed to read {}: {e}", path.display())))
}

fn is_comment(line: &str) -> bool {
    line.trim_start_matches('>').trim_start().starts_with("**")
}

fn parse_header(header: &str, line: usize) -> Result<(String, Vec<Parameter>), ParseError> {
    let fields = split_header_fields(header);
    let keyword = fields.first().map(|s| s.trim()).unwrap_or_default();
    if keyword.is_empty() {
        return Err(ParseError::new(line, "empty card keyword"));
    }

    let parameters = fields[1..]
        .iter()
        .map(|field| field.trim())
        .filter(|field| !field.is_empty())
        .map(|field| match field.split_once('=') {
            Some((k, v)) => Parameter {
                key: k.trim().to_ascii_uppercase(),
                value: Some(v.trim().to_string()),
            },
            None => Parameter {
                key: field.to_ascii_uppercase(),
                value: None,
            },
        })
        .collect();

    Ok((keyword.to_ascii_uppercase(), parameters))
}

fn split_header_fields(header: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for ch in header.chars() {
        match (ch, quote) {
            ('\'' | '"', None) => {
                quote = Some(ch);
                current.push(ch);
            }
            (c, Some(open)) if c == open => {
                quote = None;
                current.push(ch);
            }
            (',', None) => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

fn resolve_include_path(base_dir: &Path, include: &str) -> PathBuf {
    let cleaned = include.trim().trim_matches('"').trim_matches('\'');
    let raw_path = Path::new(cleaned);
    if raw_path.is_absolute() {
        raw_path.to_path_buf()
    } else {
        base_dir.join(raw_path)
    }
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
