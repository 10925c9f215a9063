use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use anyhow::anyhow;

use crate::errors::TimeExpressionError;

// @module: TTML time expression classification and resolution

// @const: Clock time with a trailing frame field (HH:MM:SS:FF, optional subframe)
static CLOCK_FRAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+):(\d{1,2}):(\d{1,2}):(\d+)(?:\.(\d+))?$").unwrap()
});

// @const: Clock time with a fractional second (HH:MM:SS.fff); SRT uses ',' so both delimiters are accepted
static CLOCK_FRACTION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+):(\d{1,2}):(\d{1,2})[.,](\d+)$").unwrap()
});

// @const: Offset time with a metric suffix; 'ms' must be tried before 'm' and 's'
static OFFSET_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+(?:\.\d+)?)(ms|[hmsft])$").unwrap()
});

/// Clock mode declared by the document (ttp:clockMode).
///
/// Only affects how wall-clock hours are interpreted for display purposes;
/// it never changes conversion arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockMode {
    #[default]
    Local,
    Utc,
}

impl FromStr for ClockMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "utc" => Ok(Self::Utc),
            _ => Err(anyhow!("Invalid clock mode: {}", s)),
        }
    }
}

/// Time base declared by the document (ttp:timeBase).
///
/// Records whether colon-separated sub-second fields in the source count
/// frames (smpte) or are plain media clock values. The four-field clock
/// grammar already encodes this distinction syntactically, so the value is
/// carried as document metadata only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeBase {
    #[default]
    Media,
    Smpte,
}

impl FromStr for TimeBase {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "media" => Ok(Self::Media),
            "smpte" => Ok(Self::Smpte),
            _ => Err(anyhow!("Invalid time base: {}", s)),
        }
    }
}

/// Timing parameters for one document's conversion run.
///
/// Built once per document from TTML metadata plus caller overrides, then
/// passed by reference into every conversion call. There is deliberately no
/// global default frame rate anywhere else in the crate.
#[derive(Debug, Clone)]
pub struct TimingContext {
    /// Frames per second used by frame-based expressions
    pub frame_rate: f64,

    /// Ticks per second, required only by tick-based expressions
    pub tick_rate: Option<u64>,

    /// Document clock mode
    pub clock_mode: ClockMode,

    /// Document time base
    pub time_base: TimeBase,

    /// Multiplicative retiming factor applied to every converted value
    pub scale: f64,

    /// Signed millisecond offset applied after conversion
    pub shift_ms: i64,
}

impl Default for TimingContext {
    fn default() -> Self {
        TimingContext {
            frame_rate: 23.976,
            tick_rate: None,
            clock_mode: ClockMode::default(),
            time_base: TimeBase::default(),
            scale: 1.0,
            shift_ms: 0,
        }
    }
}

/// The recognized time expression grammars.
///
/// Classification returns exactly one variant per raw string; conversion
/// dispatches on the variant with an exhaustive match so that adding a
/// grammar without a converter fails to compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeNotation {
    /// `HH:MM:SS:FF[.subframe]` - wall clock plus a frame index
    ClockFrame,
    /// `HH:MM:SS.fff` - wall clock with a fractional second
    ClockFraction,
    /// `<digits>t` - elapsed ticks since zero
    OffsetTicks,
    /// `<decimal>s` - elapsed seconds since zero
    OffsetSeconds,
    /// `<decimal>m` - elapsed minutes since zero
    OffsetMinutes,
    /// `<decimal>h` - elapsed hours since zero
    OffsetHours,
    /// `<decimal>ms` - elapsed milliseconds since zero
    OffsetMilliseconds,
    /// `<decimal>f` - elapsed frames since zero
    OffsetFrames,
}

impl fmt::Display for TimeNotation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::ClockFrame => "clock+frame",
            Self::ClockFraction => "clock+fraction",
            Self::OffsetTicks => "offset ticks",
            Self::OffsetSeconds => "offset seconds",
            Self::OffsetMinutes => "offset minutes",
            Self::OffsetHours => "offset hours",
            Self::OffsetMilliseconds => "offset milliseconds",
            Self::OffsetFrames => "offset frames",
        };
        write!(f, "{}", name)
    }
}

/// Classify a raw timestamp string into its notation variant.
///
/// A bare numeric string with no unit suffix and no colon structure is
/// ambiguous (raw milliseconds? truncated expression?) and fails rather
/// than being guessed at.
pub fn classify(raw: &str) -> Result<TimeNotation, TimeExpressionError> {
    if CLOCK_FRAME_REGEX.is_match(raw) {
        return Ok(TimeNotation::ClockFrame);
    }
    if CLOCK_FRACTION_REGEX.is_match(raw) {
        return Ok(TimeNotation::ClockFraction);
    }
    if let Some(caps) = OFFSET_REGEX.captures(raw) {
        let notation = match caps.get(2).map_or("", |m| m.as_str()) {
            "t" => TimeNotation::OffsetTicks,
            "s" => TimeNotation::OffsetSeconds,
            "m" => TimeNotation::OffsetMinutes,
            "h" => TimeNotation::OffsetHours,
            "ms" => TimeNotation::OffsetMilliseconds,
            "f" => TimeNotation::OffsetFrames,
            other => {
                return Err(TimeExpressionError::UnrecognizedTimeExpression(format!(
                    "{} (unknown unit '{}')",
                    raw, other
                )))
            }
        };
        return Ok(notation);
    }
    Err(TimeExpressionError::UnrecognizedTimeExpression(raw.to_string()))
}

impl TimeNotation {
    /// Convert a raw expression of this notation to milliseconds.
    ///
    /// The context's scale factor is applied as the final step, truncating
    /// toward zero like the rest of the frame arithmetic.
    pub fn to_ms(self, raw: &str, ctx: &TimingContext) -> Result<i64, TimeExpressionError> {
        let ms = match self {
            Self::ClockFrame => clock_frame_to_ms(raw, ctx)?,
            Self::ClockFraction => clock_fraction_to_ms(raw)?,
            Self::OffsetTicks => offset_ticks_to_ms(raw, ctx)?,
            Self::OffsetSeconds => offset_to_ms(raw, 1_000.0)?,
            Self::OffsetMinutes => offset_to_ms(raw, 60_000.0)?,
            Self::OffsetHours => offset_to_ms(raw, 3_600_000.0)?,
            Self::OffsetMilliseconds => offset_to_ms(raw, 1.0)?,
            Self::OffsetFrames => offset_frames_to_ms(raw, ctx)?,
        };
        Ok(apply_scale(ms, ctx.scale))
    }
}

/// Classify and convert in one step.
pub fn time_expression_to_ms(raw: &str, ctx: &TimingContext) -> Result<i64, TimeExpressionError> {
    classify(raw)?.to_ms(raw, ctx)
}

/// Resolve one raw expression to a final, shifted millisecond offset.
///
/// A negative result after shifting clamps to zero; shifting a cue before
/// time zero is common retiming practice, not an error.
pub fn resolve_time(raw: &str, ctx: &TimingContext) -> Result<u64, TimeExpressionError> {
    let ms = time_expression_to_ms(raw, ctx)?;
    Ok(ms.saturating_add(ctx.shift_ms).max(0) as u64)
}

/// Resolve a cue's begin/end pair independently.
///
/// Either side may fail; the error is local to this cue and the caller
/// decides whether to skip it or abort the run.
pub fn resolve_cue_times(
    begin: &str,
    end: &str,
    ctx: &TimingContext,
) -> Result<(u64, u64), TimeExpressionError> {
    let start_ms = resolve_time(begin, ctx)?;
    let end_ms = resolve_time(end, ctx)?;
    Ok((start_ms, end_ms))
}

/// Resolve one raw expression to both milliseconds and SubRip text.
pub fn resolve_to_subrip(
    raw: &str,
    ctx: &TimingContext,
) -> Result<(u64, String), TimeExpressionError> {
    let ms = resolve_time(raw, ctx)?;
    Ok((ms, format_timestamp(ms as i64)?))
}

/// Format milliseconds as a SubRip timestamp (HH:MM:SS,mmm).
///
/// Hours are intentionally not taken modulo anything: a 100+ hour offset
/// widens the field instead of wrapping. Minutes and seconds stay inside
/// their natural bounds. Negative input is a caller error.
pub fn format_timestamp(ms: i64) -> Result<String, TimeExpressionError> {
    if ms < 0 {
        return Err(TimeExpressionError::InvalidTimestamp(format!(
            "negative milliseconds: {}",
            ms
        )));
    }
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;

    Ok(format!(
        "{:02}:{:02}:{:02},{:03}",
        hours, minutes, seconds, millis
    ))
}

// Scale multiplies in f64 and truncates toward zero, same as the frame math.
fn apply_scale(ms: i64, scale: f64) -> i64 {
    if scale == 1.0 {
        return ms;
    }
    (ms as f64 * scale) as i64
}

fn parse_field(raw: &str, field: &str) -> Result<i64, TimeExpressionError> {
    raw.parse::<i64>().map_err(|_| {
        TimeExpressionError::InvalidTimestamp(format!("bad {} field '{}'", field, raw))
    })
}

fn check_frame_rate(ctx: &TimingContext) -> Result<f64, TimeExpressionError> {
    if ctx.frame_rate <= 0.0 {
        return Err(TimeExpressionError::InvalidTimestamp(format!(
            "frame rate must be positive, got {}",
            ctx.frame_rate
        )));
    }
    Ok(ctx.frame_rate)
}

/// Convert HH:MM:SS:FF[.subframe] to milliseconds.
///
/// The frame field goes through the frame rate with truncation toward zero.
/// A trailing subframe fraction is discarded outright - sub-frame precision
/// is below what SubRip can carry.
fn clock_frame_to_ms(raw: &str, ctx: &TimingContext) -> Result<i64, TimeExpressionError> {
    let caps = CLOCK_FRAME_REGEX
        .captures(raw)
        .ok_or_else(|| TimeExpressionError::UnrecognizedTimeExpression(raw.to_string()))?;

    let hh = parse_field(&caps[1], "hour")?;
    let mm = parse_field(&caps[2], "minute")?;
    let ss = parse_field(&caps[3], "second")?;
    let frames = parse_field(&caps[4], "frame")?;
    let frame_rate = check_frame_rate(ctx)?;

    let clock_ms = hh * 3_600_000 + mm * 60_000 + ss * 1_000;
    let frame_ms = (frames as f64 * (1_000.0 / frame_rate)) as i64;
    Ok(clock_ms + frame_ms)
}

/// Convert HH:MM:SS.fff to milliseconds.
///
/// The fraction text maps to exactly three millisecond digits: right-padded
/// when shorter, truncated when longer. ".23" is 230 ms and ".0003" is 0 ms.
fn clock_fraction_to_ms(raw: &str) -> Result<i64, TimeExpressionError> {
    let caps = CLOCK_FRACTION_REGEX
        .captures(raw)
        .ok_or_else(|| TimeExpressionError::UnrecognizedTimeExpression(raw.to_string()))?;

    let hh = parse_field(&caps[1], "hour")?;
    let mm = parse_field(&caps[2], "minute")?;
    let ss = parse_field(&caps[3], "second")?;

    let mut fraction = caps[4].to_string();
    fraction.truncate(3);
    while fraction.len() < 3 {
        fraction.push('0');
    }
    let millis = parse_field(&fraction, "fraction")?;

    Ok(hh * 3_600_000 + mm * 60_000 + ss * 1_000 + millis)
}

/// Convert `<digits>t` to milliseconds via the document tick rate.
fn offset_ticks_to_ms(raw: &str, ctx: &TimingContext) -> Result<i64, TimeExpressionError> {
    let tick_rate = ctx
        .tick_rate
        .ok_or_else(|| TimeExpressionError::MissingTickRate(raw.to_string()))?;
    if tick_rate == 0 {
        return Err(TimeExpressionError::InvalidTimestamp(
            "tick rate must be positive".to_string(),
        ));
    }

    let digits = raw.trim_end_matches('t');
    let ticks = digits.parse::<u64>().map_err(|_| {
        TimeExpressionError::InvalidTimestamp(format!("bad tick count '{}'", digits))
    })?;

    Ok((ticks as f64 / tick_rate as f64 * 1_000.0) as i64)
}

/// Convert a unit-suffixed decimal offset to milliseconds.
fn offset_to_ms(raw: &str, unit_ms: f64) -> Result<i64, TimeExpressionError> {
    let caps = OFFSET_REGEX
        .captures(raw)
        .ok_or_else(|| TimeExpressionError::UnrecognizedTimeExpression(raw.to_string()))?;
    let magnitude = caps[1].parse::<f64>().map_err(|_| {
        TimeExpressionError::InvalidTimestamp(format!("bad offset magnitude '{}'", &caps[1]))
    })?;
    Ok((magnitude * unit_ms) as i64)
}

/// Convert `<decimal>f` to milliseconds via the frame rate.
fn offset_frames_to_ms(raw: &str, ctx: &TimingContext) -> Result<i64, TimeExpressionError> {
    let caps = OFFSET_REGEX
        .captures(raw)
        .ok_or_else(|| TimeExpressionError::UnrecognizedTimeExpression(raw.to_string()))?;
    let frames = caps[1].parse::<f64>().map_err(|_| {
        TimeExpressionError::InvalidTimestamp(format!("bad frame count '{}'", &caps[1]))
    })?;
    let frame_rate = check_frame_rate(ctx)?;
    Ok((frames * (1_000.0 / frame_rate)) as i64)
}
