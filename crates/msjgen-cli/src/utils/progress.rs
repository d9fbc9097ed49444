use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use msjgen::engine::progress::{Progress, ProgressCallback};
use std::time::Duration;

const SPINNER_TICK_MS: u64 = 80;

/// Renders the validation, working-directory and job-file phases on stderr.
///
/// Phases without a known size show a spinner; the job-file phase switches to a bar that
/// advances once per written file. Every written file is listed above the bar.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: ProgressBar,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let pb = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr());
        pb.finish_and_clear();
        Self { pb }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb = self.pb.clone();
        Box::new(move |progress: Progress| Self::render(&pb, progress))
    }

    fn render(pb: &ProgressBar, progress: Progress) {
        match progress {
            Progress::PhaseStart { name } => {
                pb.reset();
                pb.set_length(0);
                pb.set_style(spinner_style());
                pb.set_message(name);
                pb.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
            }
            Progress::JobFiles { total } => {
                pb.disable_steady_tick();
                pb.set_length(total);
                pb.set_position(0);
                pb.set_style(bar_style());
            }
            Progress::FileWritten { name } => {
                pb.println(format!("  ✓ {name}"));
                if pb.length().is_some_and(|len| len > 0) {
                    pb.inc(1);
                }
            }
            Progress::PhaseFinish => {
                pb.disable_steady_tick();
                pb.finish_with_message(format!("{} ✓", pb.message()));
            }
        }
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg:<20} [{bar:30.cyan/blue}] {pos}/{len} files")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-")
}
