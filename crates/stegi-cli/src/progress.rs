use indicatif::{ProgressBar, ProgressStyle};
use stegi_core::SweepProgress;

/// Renders sweep progress as `Done: k/total`, created on the first event
#[derive(Default)]
pub struct SweepBar {
    bar: Option<ProgressBar>,
}

impl SweepBar {
    pub fn update(&mut self, progress: &SweepProgress) {
        let bar = self
            .bar
            .get_or_insert_with(|| Self::create(progress.total as u64));
        if let Some(name) = progress.file.file_name() {
            bar.set_message(name.to_string_lossy().into_owned());
        }
        bar.set_position(progress.done as u64);
    }

    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish();
        }
    }

    fn create(total: u64) -> ProgressBar {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::with_template("Done: {pos}/{len} {wide_msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar
    }
}
