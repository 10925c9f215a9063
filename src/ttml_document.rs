use once_cell::sync::Lazy;
use regex::Regex;
use log::warn;

use crate::errors::DocumentError;
use crate::time_resolver::{ClockMode, TimeBase, TimingContext};

// @module: TTML document parsing and cue extraction

// @const: Encoding declaration in the XML prolog
static ENCODING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*<\?xml[^>]*\bencoding\s*=\s*["']([^"']+)["']"#).unwrap()
});

/// One timed paragraph extracted from the document, timing still unresolved.
#[derive(Debug, Clone)]
pub struct Paragraph {
    /// Raw begin attribute, any of the recognized time notations
    pub begin: String,

    /// Raw end attribute
    pub end: String,

    /// Dialogue text with br elements already folded to line breaks
    pub text: String,
}

/// A parsed TTML document: timing metadata plus the timed paragraphs.
#[derive(Debug)]
pub struct TtmlDocument {
    /// Frame rate declared via ttp:frameRate, if any
    pub frame_rate: Option<f64>,

    /// Tick rate declared via ttp:tickRate, if any
    pub tick_rate: Option<u64>,

    /// Clock mode declared via ttp:clockMode, if any
    pub clock_mode: Option<ClockMode>,

    /// Time base declared via ttp:timeBase, if any
    pub time_base: Option<TimeBase>,

    /// Every p element that carries a begin attribute, in document order
    pub paragraphs: Vec<Paragraph>,
}

impl TtmlDocument {
    /// Parse a TTML document from its textual content.
    ///
    /// Documents that declare a non-UTF-8 encoding in the XML prolog are
    /// rejected up front; everything downstream assumes UTF-8 text.
    pub fn parse(content: &str) -> Result<Self, DocumentError> {
        check_encoding(content)?;

        let doc = roxmltree::Document::parse(content)
            .map_err(|e| DocumentError::MalformedXml(e.to_string()))?;

        // Assume the file contains a single subtitle document under one tt
        // root; match on local names so namespace prefixes don't matter.
        let root = doc.root_element();
        if root.tag_name().name() != "tt" {
            return Err(DocumentError::MissingRoot);
        }

        let frame_rate = parse_attr(&root, "frameRate", |v| v.parse::<f64>().ok());
        let tick_rate = parse_attr(&root, "tickRate", |v| v.parse::<u64>().ok());
        let clock_mode = parse_attr(&root, "clockMode", |v| v.parse::<ClockMode>().ok());
        let time_base = parse_attr(&root, "timeBase", |v| v.parse::<TimeBase>().ok());

        let mut paragraphs = Vec::new();
        collect_paragraphs(&root, &mut paragraphs);

        Ok(TtmlDocument {
            frame_rate,
            tick_rate,
            clock_mode,
            time_base,
            paragraphs,
        })
    }

    /// Build the timing context for this document.
    ///
    /// Document metadata wins where declared; the caller's defaults fill the
    /// gaps (the CLI frame rate applies only when the document does not
    /// declare its own).
    pub fn timing_context(&self, defaults: &TimingContext) -> TimingContext {
        TimingContext {
            frame_rate: self.frame_rate.unwrap_or(defaults.frame_rate),
            tick_rate: self.tick_rate.or(defaults.tick_rate),
            clock_mode: self.clock_mode.unwrap_or(defaults.clock_mode),
            time_base: self.time_base.unwrap_or(defaults.time_base),
            scale: defaults.scale,
            shift_ms: defaults.shift_ms,
        }
    }
}

fn check_encoding(content: &str) -> Result<(), DocumentError> {
    if let Some(caps) = ENCODING_REGEX.captures(content) {
        let declared = caps[1].to_lowercase();
        if declared != "utf-8" && declared != "utf8" {
            return Err(DocumentError::UnsupportedEncoding(declared));
        }
    }
    // A missing declaration is assumed to mean UTF-8
    Ok(())
}

fn parse_attr<T>(
    node: &roxmltree::Node,
    name: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    // TTML parameter attributes live in the ttp namespace; matching on the
    // local attribute name keeps prefix variations out of the picture.
    let value = node
        .attributes()
        .find(|a| a.name() == name)
        .map(|a| a.value())?;
    let parsed = parse(value.trim());
    if parsed.is_none() {
        warn!("Ignoring unparseable {} attribute: '{}'", name, value);
    }
    parsed
}

fn collect_paragraphs(node: &roxmltree::Node, out: &mut Vec<Paragraph>) {
    for child in node.children().filter(|n| n.is_element()) {
        if child.tag_name().name() == "p" {
            let begin = child.attributes().find(|a| a.name() == "begin");
            let end = child.attributes().find(|a| a.name() == "end");
            // Paragraphs without a begin attribute carry no timing
            if let Some(begin) = begin {
                out.push(Paragraph {
                    begin: begin.value().to_string(),
                    end: end.map(|a| a.value().to_string()).unwrap_or_default(),
                    text: extract_dialogue(&child),
                });
                continue;
            }
        }
        collect_paragraphs(&child, out);
    }
}

/// Concatenate a paragraph's dialogue text, folding br elements into line
/// breaks and descending into nested spans.
fn extract_dialogue(node: &roxmltree::Node) -> String {
    let mut dialogue = String::new();
    for child in node.children() {
        if child.is_element() && child.tag_name().name() == "br" {
            dialogue.push('\n');
        } else if child.is_text() {
            if let Some(text) = child.text() {
                dialogue.push_str(text);
            }
        }
        if child.is_element() {
            dialogue.push_str(&extract_dialogue(&child));
        }
    }
    dialogue
}
