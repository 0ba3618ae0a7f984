//! Progress reporting while providers are queried

use colored::Colorize;
use dilemma_application::ports::progress::ProgressNotifier;
use dilemma_domain::ProviderId;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports progress with an indicatif bar, one tick per provider
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_dispatch(&self, providers: &[ProviderId]) {
        let pb = ProgressBar::new(providers.len() as u64);
        pb.set_style(Self::style());
        pb.set_prefix("Asking providers");
        pb.set_message("waiting...");
        pb.enable_steady_tick(std::time::Duration::from_millis(120));

        if let Ok(mut bar) = self.bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_provider_complete(&self, provider: ProviderId, success: bool) {
        if let Ok(bar) = self.bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            let status = if success {
                format!("{} {}", "v".green(), provider.display_name())
            } else {
                format!("{} {}", "x".red(), provider.display_name())
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_complete(&self) {
        if let Ok(mut bar) = self.bar.lock()
            && let Some(pb) = bar.take()
        {
            pb.finish_with_message(format!("{}", "done".green()));
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_dispatch(&self, providers: &[ProviderId]) {
        let names: Vec<_> = providers.iter().map(|p| p.display_name()).collect();
        println!("{} {} ({})", "->".cyan(), "Asking".bold(), names.join(", "));
    }

    fn on_provider_complete(&self, provider: ProviderId, success: bool) {
        if success {
            println!("  {} {}", "v".green(), provider.display_name());
        } else {
            println!("  {} {} (fallback)", "x".red(), provider.display_name());
        }
    }

    fn on_complete(&self) {
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter_tracks_providers() {
        let reporter = ProgressReporter::new();
        reporter.on_dispatch(&ProviderId::ALL);
        reporter.on_provider_complete(ProviderId::Gpt, true);
        reporter.on_provider_complete(ProviderId::Gemini, false);

        {
            let bar = reporter.bar.lock().unwrap();
            let pb = bar.as_ref().unwrap();
            assert_eq!(pb.position(), 2);
            assert_eq!(pb.length(), Some(3));
        }

        reporter.on_complete();
        assert!(reporter.bar.lock().unwrap().is_none());
    }
}
