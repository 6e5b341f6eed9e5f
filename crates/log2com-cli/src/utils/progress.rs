use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use log2com::workflows::progress::{Progress, ProgressCallback};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Renders batch conversion events as a single file-count bar on stderr.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let pb = ProgressBar::new(0).with_style(Self::bar_style());
        pb.set_draw_target(ProgressDrawTarget::stderr());
        pb.finish_and_clear();

        Self {
            pb: Arc::new(Mutex::new(pb)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb_clone = self.pb.clone();

        Box::new(move |progress: Progress| {
            let Ok(pb_guard) = pb_clone.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::BatchStarted { total_files } => {
                    pb_guard.reset();
                    pb_guard.set_style(Self::bar_style());
                    pb_guard.set_length(total_files);
                    pb_guard.set_position(0);
                    pb_guard.set_message("");
                }
                Progress::FileStarted { path } => {
                    pb_guard.set_message(display_name(&path));
                }
                Progress::FileConverted { .. } => {
                    pb_guard.inc(1);
                }
                Progress::FileFailed { path, reason } => {
                    pb_guard.println(format!("  ✗ {}: {}", display_name(&path), reason));
                    pb_guard.inc(1);
                }
                Progress::BatchFinished { converted, failed } => {
                    pb_guard.finish_with_message(format!(
                        "{} converted, {} failed",
                        converted, failed
                    ));
                }
            }
        })
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<24!} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .with_key(
                "eta",
                |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                    let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
                },
            )
            .progress_chars("##-")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}
