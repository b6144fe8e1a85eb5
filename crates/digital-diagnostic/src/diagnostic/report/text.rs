use std::fmt::Write;

use super::document::{format_report_date, DiagnosticReport};

/// Plain-text rendering of the report, section for section with the PDF.
pub fn render_text(report: &DiagnosticReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", report.title);
    let _ = writeln!(out, "{}", report.subtitle);
    let _ = writeln!(out);

    section(&mut out, "Résumé Exécutif");
    let _ = writeln!(out, "{}", report.executive_summary);
    let _ = writeln!(out);

    section(&mut out, "Informations de l'entreprise");
    let _ = writeln!(out, "Nom: {}", report.company.name);
    let _ = writeln!(out, "Email: {}", report.company.email);
    let _ = writeln!(out, "Taille: {}", report.company.size);
    let _ = writeln!(out, "Secteur: {}", report.company.sector);
    let _ = writeln!(
        out,
        "Date du diagnostic: {}",
        format_report_date(report.generated_on)
    );
    let _ = writeln!(out);

    section(&mut out, "Résultats par univers");
    for universe in &report.universes {
        let _ = writeln!(out, "{} - {}%", universe.label, universe.score);
        let _ = writeln!(out, "  {}", universe.description);
        for bar in &universe.profiles {
            let _ = writeln!(out, "  - {}: {}%", bar.label, bar.score);
        }
        let _ = writeln!(out, "  {}", universe.explanation);
    }
    let _ = writeln!(out);

    section(&mut out, "Analyse des écarts entre les profils");
    if report.gaps.is_empty() {
        let _ = writeln!(
            out,
            "Aucun écart significatif n'a été identifié entre les profils dans les différents univers."
        );
    }
    for gap in &report.gaps {
        let _ = writeln!(out, "{}", gap.title);
        let _ = writeln!(out, "  {}", gap.description);
        let _ = writeln!(out, "  - Profil le plus performant : {}", gap.highest);
        let _ = writeln!(out, "  - Profil nécessitant le plus d'attention : {}", gap.lowest);
        let _ = writeln!(out, "  - Écart : {}%", gap.magnitude);
    }
    let _ = writeln!(out);

    section(&mut out, "Points forts");
    for strength in &report.strengths {
        let _ = writeln!(out, "{} ({}%)", strength.universe.label(), strength.score);
        let _ = writeln!(out, "  {}", strength.description);
    }
    let _ = writeln!(out);

    section(&mut out, "Points à améliorer");
    for weakness in &report.weaknesses {
        let _ = writeln!(out, "{} ({}%)", weakness.universe.label(), weakness.score);
        let _ = writeln!(out, "  {}", weakness.description);
    }

    if !report.recommendations.is_empty() {
        let _ = writeln!(out);
        section(&mut out, "Recommandations");
        for recommendation in &report.recommendations {
            let _ = writeln!(
                out,
                "{} - {}: {}",
                recommendation.universe.label(),
                recommendation.title,
                recommendation.text
            );
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", report.footer);
    out
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "=".repeat(title.chars().count()));
}
