//! Error adapter for converting ChipflowError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error type
//! and miette's rich diagnostic formatting used in the CLI. Scene errors keep
//! their source text and span so the offending value is underlined.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use chipflow::ChipflowError;

/// A [`ChipflowError`] that can be rendered by miette.
pub struct Reportable<'a>(&'a ChipflowError);

impl fmt::Debug for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.0 {
            ChipflowError::Io(_) => "chipflow::io",
            ChipflowError::Scene { .. } => "chipflow::scene",
            ChipflowError::Config(_) => "chipflow::config",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self.0 {
            ChipflowError::Scene { .. } => Some(Box::new(
                "a scene has a `width` and `[[chips]]` entries with `label`, optional `id` and `color`",
            )),
            _ => None,
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self.0 {
            ChipflowError::Scene { src, .. } => Some(src as &dyn miette::SourceCode),
            _ => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let ChipflowError::Scene {
            span: Some(span), ..
        } = self.0
        else {
            return None;
        };

        let span = SourceSpan::new(span.start.into(), span.len());
        Some(Box::new(std::iter::once(
            LabeledSpan::new_primary_with_span(Some("here".to_string()), span),
        )))
    }
}

/// Convert a [`ChipflowError`] into a reportable error.
pub fn to_reportable(err: &ChipflowError) -> Reportable<'_> {
    Reportable(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_error_has_label_and_source() {
        let err = ChipflowError::new_scene_error("bad width", Some(8..12), "width = -1.0");
        let reportable = to_reportable(&err);

        assert_eq!(reportable.to_string(), "bad width");
        assert_eq!(reportable.code().unwrap().to_string(), "chipflow::scene");
        assert!(reportable.source_code().is_some());
        assert!(reportable.help().is_some());

        let labels: Vec<_> = reportable.labels().unwrap().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].offset(), 8);
        assert_eq!(labels[0].len(), 4);
    }

    #[test]
    fn test_scene_error_without_span_has_no_labels() {
        let err = ChipflowError::new_scene_error("bad", None, "");
        assert!(to_reportable(&err).labels().is_none());
    }

    #[test]
    fn test_config_error() {
        let err = ChipflowError::Config("Invalid background color".to_string());
        let reportable = to_reportable(&err);

        assert_eq!(reportable.code().unwrap().to_string(), "chipflow::config");
        assert!(reportable.source_code().is_none());
        assert!(reportable.labels().is_none());
    }

    #[test]
    fn test_render_report() {
        let err = ChipflowError::new_scene_error("duplicate chip id `a`", Some(0..5), "label");
        let mut writer = String::new();
        miette::GraphicalReportHandler::new()
            .render_report(&mut writer, &to_reportable(&err))
            .unwrap();

        assert!(writer.contains("duplicate chip id"));
    }
}
