use anyhow::{Result, Context, anyhow};
use log::{warn, info, debug};
use std::io::Write;
use std::path::{Path, PathBuf};
use indicatif::{ProgressBar, ProgressStyle};

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::subtitle_processor::{Cue, CueCollection};
use crate::time_resolver::{resolve_cue_times, TimingContext};
use crate::ttml_document::TtmlDocument;

// @module: Application controller for subtitle conversion

/// Main application controller for TTML to SubRip conversion
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Timing defaults derived from configuration; document metadata
    /// overrides these per file.
    fn default_timing_context(&self) -> TimingContext {
        TimingContext {
            frame_rate: self.config.timing.frame_rate,
            scale: self.config.timing.scale(),
            shift_ms: self.config.timing.shift_ms,
            ..TimingContext::default()
        }
    }

    /// Convert TTML content into a merged cue collection.
    ///
    /// Resolution errors are local to one cue: the default policy logs and
    /// skips the cue, strict mode turns the first failure into an abort.
    pub fn convert_content(
        &self,
        content: &str,
        source_file: &Path,
        strict: bool,
    ) -> Result<CueCollection> {
        let document = TtmlDocument::parse(content)
            .with_context(|| format!("Failed to parse TTML document: {}", source_file.display()))?;

        let ctx = document.timing_context(&self.default_timing_context());
        debug!(
            "Timing context for {}: frame_rate={}, tick_rate={:?}, scale={}, shift={}ms",
            source_file.display(),
            ctx.frame_rate,
            ctx.tick_rate,
            ctx.scale,
            ctx.shift_ms
        );

        let mut cues = Vec::with_capacity(document.paragraphs.len());
        let mut skipped = 0usize;

        for parag in &document.paragraphs {
            match resolve_cue_times(&parag.begin, &parag.end, &ctx) {
                Ok((start_ms, end_ms)) => {
                    cues.push(Cue::new(0, start_ms, end_ms, parag.text.trim().to_string()));
                }
                Err(e) if strict => {
                    return Err(anyhow!(e)).with_context(|| {
                        format!(
                            "Failed to resolve cue timing ('{}' --> '{}')",
                            parag.begin, parag.end
                        )
                    });
                }
                Err(e) => {
                    warn!(
                        "Skipping cue with unresolvable timing ('{}' --> '{}'): {}",
                        parag.begin, parag.end, e
                    );
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            warn!("Skipped {} of {} cues", skipped, document.paragraphs.len());
        }

        let resolved = cues.len();
        let collection = CueCollection::from_unmerged(source_file.to_path_buf(), cues);
        if collection.entries.len() < resolved {
            info!(
                "Merged {} overlapping cues",
                resolved - collection.entries.len()
            );
        }

        Ok(collection)
    }

    /// Run the conversion for a single file.
    ///
    /// Without an output path the SubRip text goes to stdout, matching the
    /// usual shell-pipeline usage.
    pub fn run(
        &self,
        input_file: PathBuf,
        output_file: Option<PathBuf>,
        force_overwrite: bool,
        strict: bool,
    ) -> Result<()> {
        if !FileManager::file_exists(&input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        if let Some(output_file) = &output_file {
            if output_file.exists() && !force_overwrite {
                warn!(
                    "Skipping file, output already exists (use -F to force overwrite): {:?}",
                    output_file
                );
                return Ok(());
            }
        }

        let content = FileManager::read_to_string(&input_file)?;
        let collection = self.convert_content(&content, &input_file, strict)?;

        match output_file {
            Some(output_file) => {
                collection.write_to_srt(&output_file)?;
                info!(
                    "Wrote {} cues to {:?}",
                    collection.entries.len(),
                    output_file
                );
            }
            None => {
                let mut stdout = std::io::stdout();
                stdout
                    .write_all(collection.to_srt_string().as_bytes())
                    .context("Failed to write SubRip output to stdout")?;
            }
        }

        Ok(())
    }

    /// Convert every TTML document found under a directory.
    ///
    /// Output files land next to their inputs. A failing document is
    /// reported and the batch continues; strict mode still only aborts the
    /// failing document, not the batch.
    pub fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool, strict: bool) -> Result<()> {
        if !FileManager::dir_exists(&input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let files = FileManager::find_ttml_files(&input_dir)?;
        if files.is_empty() {
            warn!("No TTML documents found in {:?}", input_dir);
            return Ok(());
        }

        info!("Converting {} TTML document(s) in {:?}", files.len(), input_dir);

        let progress = ProgressBar::new(files.len() as u64);
        progress.set_style(
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let mut converted = 0usize;
        let mut failed = 0usize;

        for file in &files {
            progress.set_message(
                file.file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default(),
            );

            let output_dir = file.parent().unwrap_or(Path::new("."));
            let output_file =
                FileManager::generate_output_path(file, output_dir, &self.config.output.extension);

            match self.run(file.clone(), Some(output_file), force_overwrite, strict) {
                Ok(()) => converted += 1,
                Err(e) => {
                    warn!("Failed to convert {:?}: {:#}", file, e);
                    failed += 1;
                }
            }
            progress.inc(1);
        }

        progress.finish_and_clear();
        info!("Finished: {} converted, {} failed", converted, failed);

        if failed > 0 && converted == 0 {
            return Err(anyhow!("All {} documents failed to convert", failed));
        }

        Ok(())
    }
}
