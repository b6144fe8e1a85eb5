use chrono::{Local, NaiveDate};
use clap::Args;
use digital_diagnostic::diagnostic::{render_pdf, render_text, AnswerSet, CompanyInfo, DiagnosticReport};
use digital_diagnostic::error::AppError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// JSON file holding the answer set, bare or under an `answers` key
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Company name printed on the report
    #[arg(long)]
    pub(crate) company_name: String,
    /// Contact email for the company
    #[arg(long)]
    pub(crate) email: String,
    /// Company size bracket
    #[arg(long)]
    pub(crate) size: Option<String>,
    /// Business sector
    #[arg(long)]
    pub(crate) sector: Option<String>,
    /// Write the PDF report to this path
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Report date (YYYY-MM-DD); defaults to today
    #[arg(long, value_parser = parse_date)]
    pub(crate) date: Option<NaiveDate>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AnswersDocument {
    Wrapped { answers: AnswerSet },
    Bare(AnswerSet),
}

impl AnswersDocument {
    fn into_answers(self) -> AnswerSet {
        match self {
            AnswersDocument::Wrapped { answers } | AnswersDocument::Bare(answers) => answers,
        }
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn load_answers(path: &Path) -> Result<AnswerSet, AppError> {
    let bytes = fs::read(path)?;
    let document: AnswersDocument = serde_json::from_slice(&bytes)?;
    Ok(document.into_answers())
}

pub(crate) fn build_report(args: &ReportArgs) -> Result<DiagnosticReport, AppError> {
    let company = CompanyInfo {
        name: args.company_name.clone(),
        email: args.email.clone(),
        size: args.size.clone().unwrap_or_default(),
        sector: args.sector.clone().unwrap_or_default(),
    };
    company.validate()?;

    let answers = load_answers(&args.answers)?;
    let generated_on = args.date.unwrap_or_else(|| Local::now().date_naive());
    Ok(DiagnosticReport::from_answers(&company, &answers, generated_on))
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let report = build_report(&args)?;
    println!("{}", render_text(&report));

    if let Some(output) = args.output.as_deref() {
        fs::write(output, render_pdf(&report))?;
        println!("PDF written to {}", output.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(answers: PathBuf, output: Option<PathBuf>) -> ReportArgs {
        ReportArgs {
            answers,
            company_name: "Hexacube".to_string(),
            email: "contact@hexacube.fr".to_string(),
            size: Some("50-249".to_string()),
            sector: None,
            output,
            date: NaiveDate::from_ymd_opt(2024, 3, 18),
        }
    }

    fn answers_fixture() -> serde_json::Value {
        json!({
            "Data|Leaders": { "universe": "Data", "profile": "Leaders", "level": "Expert" },
            "Data|Managers": { "universe": "Data", "profile": "Managers", "level": "Débutant" }
        })
    }

    #[test]
    fn wrapped_and_bare_answer_files_are_accepted() {
        let dir = tempfile::tempdir().expect("temp dir");
        let bare = dir.path().join("bare.json");
        let wrapped = dir.path().join("wrapped.json");
        fs::write(&bare, answers_fixture().to_string()).expect("write bare");
        fs::write(&wrapped, json!({ "answers": answers_fixture() }).to_string())
            .expect("write wrapped");

        assert_eq!(load_answers(&bare).expect("bare loads").len(), 2);
        assert_eq!(load_answers(&wrapped).expect("wrapped loads").len(), 2);
    }

    #[test]
    fn report_command_writes_the_pdf() {
        let dir = tempfile::tempdir().expect("temp dir");
        let answers = dir.path().join("answers.json");
        let output = dir.path().join("rapport.pdf");
        fs::write(&answers, answers_fixture().to_string()).expect("write answers");

        run_report(args(answers, Some(output.clone()))).expect("report runs");

        let pdf = fs::read(&output).expect("pdf written");
        assert!(pdf.starts_with(b"%PDF-1.4"));
    }

    #[test]
    fn invalid_email_is_rejected_before_reading_answers() {
        let mut invalid = args(PathBuf::from("/nonexistent/answers.json"), None);
        invalid.email = "not-an-email".to_string();

        assert!(matches!(build_report(&invalid), Err(AppError::Validation(_))));
    }

    #[test]
    fn parse_date_reports_the_raw_value() {
        let error = parse_date("18/03/2024").expect_err("wrong format");
        assert!(error.contains("18/03/2024"));
    }
}
