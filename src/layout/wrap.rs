//! Greedy line wrapping of styled runs.
//!
//! Runs are packed left to right. A run that does not fit is split at the
//! last whitespace whose head fits the remaining width, keeping its style on
//! both fragments. A single token wider than a whole line is cut by
//! characters. Hyperlinks are never split: a link that does not fit starts a
//! new line and, if still too wide, sits alone on it.

use super::TextMeasure;
use crate::model::{InlineRun, WrappedLine};

/// Slack for float comparisons against the line width.
const EPSILON: f32 = 1e-3;

/// Packs runs into lines no wider than a maximum width.
pub struct LineWrapper<'a> {
    measure: &'a dyn TextMeasure,
}

impl<'a> LineWrapper<'a> {
    /// Create a wrapper using `measure` for widths.
    pub fn new(measure: &'a dyn TextMeasure) -> Self {
        Self { measure }
    }

    /// Wrap `runs` into lines of at most `max_width`.
    ///
    /// A `\n` inside a run forces a break. Blank lines are dropped.
    pub fn wrap(&self, runs: &[InlineRun], max_width: f32) -> Vec<WrappedLine> {
        let mut state = LineState::new(self.measure, max_width);

        for run in runs {
            let mut pieces = run.text().split('\n').peekable();
            while let Some(piece) = pieces.next() {
                state.push(run.with_text(piece));
                if pieces.peek().is_some() {
                    state.flush();
                }
            }
        }

        state.finish()
    }

    fn width(&self, run: &InlineRun) -> f32 {
        self.measure.width(run.text(), run.style())
    }

    /// Measured width of a wrapped line's runs.
    pub fn line_width(&self, runs: &[InlineRun]) -> f32 {
        runs.iter().map(|run| self.width(run)).sum()
    }
}

/// The line being filled plus the lines already completed.
struct LineState<'a> {
    measure: &'a dyn TextMeasure,
    max_width: f32,
    runs: Vec<InlineRun>,
    width: f32,
    lines: Vec<WrappedLine>,
}

impl<'a> LineState<'a> {
    fn new(measure: &'a dyn TextMeasure, max_width: f32) -> Self {
        Self {
            measure,
            max_width,
            runs: Vec::new(),
            width: 0.0,
            lines: Vec::new(),
        }
    }

    fn remaining(&self) -> f32 {
        self.max_width - self.width
    }

    fn measure(&self, run: &InlineRun) -> f32 {
        self.measure.width(run.text(), run.style())
    }

    fn append(&mut self, run: InlineRun, width: f32) {
        self.width += width;
        self.runs.push(run);
    }

    fn push(&mut self, mut run: InlineRun) {
        loop {
            if self.runs.is_empty() {
                let trimmed = run.text().trim_start();
                if trimmed.len() != run.text().len() {
                    run = run.with_text(trimmed);
                }
            }
            if run.is_empty() {
                return;
            }

            let width = self.measure(&run);
            if width <= self.remaining() + EPSILON {
                self.append(run, width);
                return;
            }

            if run.is_link() {
                if !self.runs.is_empty() {
                    self.flush();
                    continue;
                }
                self.append(run, width);
                self.flush();
                return;
            }

            match self.split_at_whitespace(&run) {
                Some((head, tail)) => {
                    if !head.is_empty() {
                        let head = run.with_text(head);
                        let head_width = self.measure(&head);
                        self.append(head, head_width);
                    }
                    self.flush();
                    run = run.with_text(tail);
                }
                None if !self.runs.is_empty() => self.flush(),
                None => {
                    let (head, tail) = self.hard_cut(&run);
                    let head = run.with_text(head);
                    let head_width = self.measure(&head);
                    self.append(head, head_width);
                    self.flush();
                    run = run.with_text(tail);
                }
            }
        }
    }

    /// Split at the last whitespace whose trimmed head fits.
    ///
    /// The breaking whitespace belongs to neither fragment. An empty head
    /// means the break falls before the run.
    fn split_at_whitespace<'r>(&self, run: &'r InlineRun) -> Option<(&'r str, &'r str)> {
        let text = run.text();
        let style = run.style();
        let remaining = self.remaining() + EPSILON;

        text.char_indices()
            .rev()
            .filter(|(_, ch)| ch.is_whitespace())
            .find_map(|(i, ch)| {
                let head = text[..i].trim_end();
                let tail = &text[i + ch.len_utf8()..];
                (self.measure.width(head, style) <= remaining).then_some((head, tail))
            })
            .filter(|(head, _)| !head.is_empty() || !self.runs.is_empty())
    }

    /// Longest char prefix that fits an empty line, at least one char.
    fn hard_cut<'r>(&self, run: &'r InlineRun) -> (&'r str, &'r str) {
        let text = run.text();
        let style = run.style();
        let mut used = 0.0;
        let mut end = 0;

        for (i, ch) in text.char_indices() {
            let w = self.measure.width(&text[i..i + ch.len_utf8()], style);
            if end > 0 && used + w > self.max_width + EPSILON {
                break;
            }
            used += w;
            end = i + ch.len_utf8();
        }

        text.split_at(end)
    }

    /// Complete the current line, dropping trailing whitespace.
    fn flush(&mut self) {
        while let Some(last) = self.runs.pop() {
            let trimmed = last.text().trim_end();
            if trimmed.is_empty() {
                self.width -= self.measure(&last);
                continue;
            }
            if trimmed.len() != last.text().len() {
                let shorter = last.with_text(trimmed);
                self.width -= self.measure(&last) - self.measure(&shorter);
                self.runs.push(shorter);
            } else {
                self.runs.push(last);
            }
            break;
        }

        if !self.runs.is_empty() {
            let runs = std::mem::take(&mut self.runs);
            let width: f32 = runs.iter().map(|run| self.measure(run)).sum();
            self.lines.push(WrappedLine::new(runs, width));
        }
        self.width = 0.0;
    }

    fn finish(mut self) -> Vec<WrappedLine> {
        self.flush();
        self.lines
    }
}
