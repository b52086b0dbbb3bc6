use crate::ParseError;
use ariadne::{Label, Report, ReportKind, Source};
use std::io;

impl ParseError {
    /// Writes a labelled diagnostic for this error against `input` to stderr.
    pub fn pretty_print(&self, source_name: &str, input: &str) -> io::Result<()> {
        let report = match self {
            ParseError::UnexpectedToken { found, expected } => {
                Report::build(ReportKind::Error, (source_name, found.span.to_range()))
                    .with_message(format!("Unexpected token: {}", found.kind))
                    .with_label(
                        Label::new((source_name, found.span.to_range()))
                            .with_message(format!("Expected {expected}")),
                    )
            }
            ParseError::UnexpectedEof(expected) => {
                let idx = input.len();
                Report::build(ReportKind::Error, (source_name, idx..idx))
                    .with_message("Unexpected end of input")
                    .with_label(
                        Label::new((source_name, idx..idx))
                            .with_message(format!("Expected {expected}")),
                    )
            }
            ParseError::InvalidAtom { token, span } => {
                Report::build(ReportKind::Error, (source_name, span.to_range()))
                    .with_message(format!("Invalid token: {}", token))
                    .with_label(
                        Label::new((source_name, span.to_range()))
                            .with_message("Starts like a number but is not one"),
                    )
            }
        };
        report
            .finish()
            .eprint((source_name, Source::from(input)))
    }
}
