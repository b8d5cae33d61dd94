use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

const ONLY_MESSAGE_TEMPLATE: &str = "{spinner} {wide_msg}";
const COUNT_TEMPLATE: &str = "{spinner} {msg:20} {wide_bar:} {pos:>3}/{len:3}";

pub struct ProgressStyleTemplate;

impl ProgressStyleTemplate {
    pub fn only_message() -> ProgressStyle {
        ProgressStyle::with_template(ONLY_MESSAGE_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    pub fn count_bar() -> ProgressStyle {
        ProgressStyle::with_template(COUNT_TEMPLATE)
            .map(|style| style.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
    }
}

pub trait MultiProgressNew {
    fn add_with_style(&self, pb: ProgressBar, style: ProgressStyle) -> ProgressBar;

    fn add_message(&self, message: impl Into<String>) -> ProgressBar {
        let pb = self.add_with_style(ProgressBar::new_spinner(), ProgressStyleTemplate::only_message());
        pb.set_message(message.into());
        pb
    }

    fn add_counter(&self, len: usize, message: impl Into<String>) -> ProgressBar {
        let pb = self.add_with_style(ProgressBar::new(len as u64), ProgressStyleTemplate::count_bar());
        pb.set_message(message.into());
        pb
    }
}

impl MultiProgressNew for MultiProgress {
    fn add_with_style(&self, pb: ProgressBar, style: ProgressStyle) -> ProgressBar {
        let pb = self.add(pb);
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}
