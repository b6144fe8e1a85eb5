mod document;
mod metrics;
mod pdf;
mod text;

pub use document::{
    format_report_date, recommendations_for, DiagnosticReport, GapSection, ProfileBar,
    Recommendation, Rgb, ScoreTone, UniverseSection, REPORT_SUBTITLE, REPORT_TITLE,
};
pub use pdf::render_pdf;
pub use text::render_text;
