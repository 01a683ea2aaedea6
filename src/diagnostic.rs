use std::ops::Range;
use std::path::Path;

use crate::error::LinkError;

/// A user-facing diagnostic (error or warning).
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// Byte range in the input file the diagnostic points at, if any.
    pub span: Option<Range<usize>>,
    pub notes: Vec<String>,
    pub help: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Diagnostic {
    pub fn error(message: String) -> Self {
        Self {
            severity: Severity::Error,
            message,
            span: None,
            notes: Vec::new(),
            help: None,
        }
    }

    pub fn warning(message: String) -> Self {
        Self {
            severity: Severity::Warning,
            message,
            span: None,
            notes: Vec::new(),
            help: None,
        }
    }

    pub fn with_span(mut self, span: Range<usize>) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_note(mut self, note: String) -> Self {
        self.notes.push(note);
        self
    }

    pub fn with_help(mut self, help: String) -> Self {
        self.help = Some(help);
        self
    }

    /// Build the diagnostic for a failed operation.
    pub fn from_error(err: &LinkError) -> Self {
        let mut diag = match err {
            LinkError::Config {
                message,
                span: Some(span),
                ..
            } => Diagnostic::error(message.clone()).with_span(span.clone()),
            other => Diagnostic::error(other.to_string()),
        };
        let mut source = std::error::Error::source(err);
        while let Some(cause) = source {
            diag = diag.with_note(cause.to_string());
            source = cause.source();
        }
        if let Some(help) = err.help() {
            diag = diag.with_help(help);
        }
        diag
    }

    /// Plain-text rendering used when there is no source to point into.
    pub fn to_plain(&self) -> String {
        let label = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        let mut out = format!("{}: {}", label, self.message);
        for note in &self.notes {
            out.push_str(&format!("\n  note: {}", note));
        }
        if let Some(help) = &self.help {
            out.push_str(&format!("\n  help: {}", help));
        }
        out
    }

    /// Render to stderr; with a span and source text via ariadne.
    pub fn render(&self, filename: &str, source: Option<&str>) {
        use ariadne::{Color, Label, Report, ReportKind, Source};

        let (span, source) = match (&self.span, source) {
            (Some(span), Some(source)) => (span.clone(), source),
            _ => {
                eprintln!("{}", self.to_plain());
                return;
            }
        };

        let kind = match self.severity {
            Severity::Error => ReportKind::Error,
            Severity::Warning => ReportKind::Warning,
        };

        let color = match self.severity {
            Severity::Error => Color::Red,
            Severity::Warning => Color::Yellow,
        };

        // Parsers report byte offsets; ariadne counts chars.
        let start = char_offset(source, span.start);
        let end = char_offset(source, span.end).max(start);

        let mut report = Report::build(kind, filename, start)
            .with_message(&self.message)
            .with_label(
                Label::new((filename, start..end))
                    .with_message(&self.message)
                    .with_color(color),
            );

        for note in &self.notes {
            report = report.with_note(note);
        }

        if let Some(help) = &self.help {
            report = report.with_help(help);
        }

        if report
            .finish()
            .eprint((filename, Source::from(source)))
            .is_err()
        {
            eprintln!("{}", self.to_plain());
        }
    }
}

/// Report an error on stderr. Config errors re-read their file so the
/// offending span can be shown in context.
pub fn report_error(err: &LinkError) {
    let diag = Diagnostic::from_error(err);
    match err {
        LinkError::Config { path, .. } => {
            let source = std::fs::read_to_string(path).ok();
            diag.render(&display_name(path), source.as_deref());
        }
        _ => diag.render("", None),
    }
}

/// Number of chars before byte `offset`, clamped to the source and
/// rounded down to a char boundary.
fn char_offset(source: &str, offset: usize) -> usize {
    let mut at = offset.min(source.len());
    while !source.is_char_boundary(at) {
        at -= 1;
    }
    source[..at].chars().count()
}

fn display_name(path: &Path) -> String {
    path.display().to_string()
}
