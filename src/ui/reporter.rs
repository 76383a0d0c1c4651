//! Console rendering of fetch events
//!
//! Interactive terminals get an indicatif bar per download. Everything
//! else gets one plain line per resource, e.g.
//! `Checking zlib.tcz... Present!`.

use super::context::UiContext;
use crate::repo::{FetchEvent, FetchObserver};
use console::{style, Emoji};
use indicatif::{HumanBytes, ProgressBar, ProgressStyle};
use std::cell::RefCell;
use std::io::{self, Write};
use std::time::Duration;

static CACHED: Emoji<'_, '_> = Emoji("· ", "- ");
static FETCHED: Emoji<'_, '_> = Emoji("↓ ", "+ ");
static ABSENT: Emoji<'_, '_> = Emoji("∅ ", "0 ");
static FAILED: Emoji<'_, '_> = Emoji("✗ ", "x ");

const BAR_TEMPLATE: &str =
    "  {spinner:.cyan} {prefix}  {bar:20.cyan/dim} {bytes}/{total_bytes} {bytes_per_sec:.dim}";

/// Prints fetch progress to stdout
pub struct ConsoleReporter {
    fancy: bool,
    bar: RefCell<Option<ProgressBar>>,
    transferred: RefCell<u64>,
}

impl ConsoleReporter {
    pub fn new(ctx: &UiContext) -> Self {
        Self {
            fancy: ctx.use_fancy_output(),
            bar: RefCell::new(None),
            transferred: RefCell::new(0),
        }
    }

    fn plain(&self, resource: &str, event: FetchEvent) {
        let text = match event {
            FetchEvent::Checking => {
                print!("Checking {}... ", resource);
                let _ = io::stdout().flush();
                return;
            }
            FetchEvent::Present => "Present!",
            FetchEvent::KnownAbsent => "Known absent!",
            FetchEvent::Absent => "Absent!",
            FetchEvent::Downloading => {
                print!("Downloading {}... ", resource);
                let _ = io::stdout().flush();
                return;
            }
            FetchEvent::Transferred { .. } => return,
            FetchEvent::Ok => "OK!",
            FetchEvent::Failed => "Failed!",
        };
        println!("{}", text);
    }

    fn fancy(&self, resource: &str, event: FetchEvent) {
        match event {
            FetchEvent::Checking | FetchEvent::Absent => {}
            FetchEvent::Present => {
                println!("  {}{}", CACHED, style(resource).dim());
            }
            FetchEvent::KnownAbsent => {
                println!(
                    "  {}{} {}",
                    ABSENT,
                    style(resource).dim(),
                    style("(not on mirror)").dim()
                );
            }
            FetchEvent::Downloading => {
                *self.transferred.borrow_mut() = 0;
                let bar = ProgressBar::new_spinner();
                if let Ok(bar_style) = ProgressStyle::default_bar().template(BAR_TEMPLATE) {
                    bar.set_style(
                        bar_style
                            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
                            .progress_chars("━╸─"),
                    );
                }
                bar.set_prefix(resource.to_string());
                bar.enable_steady_tick(Duration::from_millis(120));
                *self.bar.borrow_mut() = Some(bar);
            }
            FetchEvent::Transferred { bytes, total } => {
                *self.transferred.borrow_mut() = bytes;
                if let Some(ref bar) = *self.bar.borrow() {
                    if let Some(total) = total {
                        bar.set_length(total);
                    }
                    bar.set_position(bytes);
                }
            }
            FetchEvent::Ok if *self.transferred.borrow() == 0 => {
                self.finish_bar();
                println!(
                    "  {}{} {}",
                    ABSENT,
                    style(resource).dim(),
                    style("(not on mirror)").dim()
                );
            }
            FetchEvent::Ok => {
                self.finish_bar();
                println!(
                    "  {}{} {}",
                    FETCHED,
                    style(resource).green(),
                    style(HumanBytes(*self.transferred.borrow())).dim()
                );
            }
            FetchEvent::Failed => {
                self.finish_bar();
                println!("  {}{}", FAILED, style(resource).red());
            }
        }
    }

    fn finish_bar(&self) {
        if let Some(bar) = self.bar.borrow_mut().take() {
            bar.disable_steady_tick();
            bar.finish_and_clear();
        }
    }
}

impl FetchObserver for ConsoleReporter {
    fn on_event(&self, resource: &str, event: FetchEvent) {
        if self.fancy {
            self.fancy(resource, event);
        } else {
            self.plain(resource, event);
        }
    }
}
