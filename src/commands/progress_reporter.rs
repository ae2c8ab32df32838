use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::Arc;
use std::time::Instant;

const DETERMINATE_TEMPLATE: &str = "{prefix:>12.bold.cyan} [{bar:25}] {pos}/{len} {msg}";
const DETERMINATE_TEMPLATE_NO_COLOR: &str = "{prefix:>12} [{bar:25}] {pos}/{len} {msg}";

#[derive(Debug)]
struct DelayedProgressState {
    visible_after: Instant,
    visible: AtomicBool,
}

/// A progress bar that delays showing itself until a threshold is reached.
///
/// Quick runs finish without any progress chrome; anything slower gets a
/// determinate bar on stderr. When `use_colors` is false, the bar is rendered
/// without ANSI styling.
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    bar: ProgressBar,
    state: Arc<DelayedProgressState>,
    use_colors: bool,
}

impl ProgressReporter {
    /// Create a new progress reporter.
    ///
    /// The progress bar only becomes visible if operations continue beyond the delay threshold.
    #[must_use]
    pub fn new(delay: Duration, use_colors: bool) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_draw_target(ProgressDrawTarget::hidden());

        Self {
            bar,
            state: Arc::new(DelayedProgressState {
                visible_after: Instant::now() + delay,
                visible: AtomicBool::new(false),
            }),
            use_colors,
        }
    }

    /// Start a determinate phase with the given prefix label and item count.
    pub fn begin(&self, prefix: &str, total: u64) {
        let template = if self.use_colors { DETERMINATE_TEMPLATE } else { DETERMINATE_TEMPLATE_NO_COLOR };
        self.bar.set_style(
            ProgressStyle::default_bar()
                .template(template)
                .expect("could not create progress bar style")
                .progress_chars("=> "),
        );
        self.bar.set_prefix(prefix.to_string());
        self.bar.set_length(total);
        self.bar.set_position(0);
    }

    /// Advance the bar by one completed item.
    pub fn inc(&self) {
        self.reveal_if_due();
        self.bar.inc(1);
    }

    /// Set the trailing message shown next to the bar.
    pub fn set_message(&self, message: String) {
        self.reveal_if_due();
        self.bar.set_message(message);
    }

    /// Finish and clear the progress indicator.
    pub fn finish_and_clear(&self) {
        if self.state.visible.load(Ordering::Relaxed) {
            self.bar.finish_and_clear();
        }
    }

    fn reveal_if_due(&self) {
        if !self.state.visible.load(Ordering::Relaxed) && Instant::now() >= self.state.visible_after {
            self.state.visible.store(true, Ordering::Relaxed);
            self.bar.set_draw_target(ProgressDrawTarget::stderr_with_hz(10));
        }
    }
}
