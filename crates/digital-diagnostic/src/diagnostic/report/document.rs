use chrono::NaiveDate;
use serde::Serialize;

use super::super::analysis::{
    compute_gaps, compute_strengths_and_weaknesses, Highlight, ProfileGroup,
};
use super::super::domain::{AnswerSet, CompanyInfo, Level, Profile, Universe};
use super::super::scoring::{
    compute_global_profile, compute_universe_results, mean, round_percent, GlobalProfileEntry,
    UniverseResult,
};

pub const REPORT_TITLE: &str = "Diagnostic Digital";
pub const REPORT_SUBTITLE: &str = "Rapport détaillé des compétences";
const TRAINING_THRESHOLD: u8 = 60;
const EXTERNAL_SUPPORT_THRESHOLD: u8 = 40;

/// Colour band used for a displayed score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTone {
    Excellent,
    Good,
    Fair,
    Low,
}

impl ScoreTone {
    pub const fn for_score(score: u8) -> Self {
        if score >= 80 {
            ScoreTone::Excellent
        } else if score >= 60 {
            ScoreTone::Good
        } else if score >= 40 {
            ScoreTone::Fair
        } else {
            ScoreTone::Low
        }
    }

    pub const fn rgb(self) -> Rgb {
        match self {
            ScoreTone::Excellent => Rgb(0x22, 0xc5, 0x5e),
            ScoreTone::Good => Rgb(0x00, 0xa3, 0xc6),
            ScoreTone::Fair => Rgb(0xf5, 0x9e, 0x0b),
            ScoreTone::Low => Rgb(0xef, 0x44, 0x44),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const TEXT: Rgb = Rgb(0x1f, 0x29, 0x37);
    pub const MUTED: Rgb = Rgb(0x6b, 0x72, 0x80);
    pub const ACCENT: Rgb = Rgb(0x00, 0xa3, 0xc6);
    pub const TRACK: Rgb = Rgb(0xe5, 0xe7, 0xeb);

    pub const fn for_profile(profile: Profile) -> Self {
        match profile {
            Profile::Leaders => Rgb(0xff, 0x6b, 0x6b),
            Profile::Managers => Rgb(0x4e, 0xcd, 0xc4),
            Profile::SpecializedTeams => Rgb(0x45, 0xb7, 0xd1),
            Profile::Employees => Rgb(0x96, 0xce, 0xb4),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileBar {
    pub profile: Profile,
    pub label: &'static str,
    pub score: u8,
    pub color: Rgb,
}

#[derive(Debug, Clone, Serialize)]
pub struct UniverseSection {
    pub universe: Universe,
    pub label: &'static str,
    pub description: &'static str,
    pub score: u8,
    pub level: Level,
    pub tone: ScoreTone,
    pub profiles: Vec<ProfileBar>,
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GapSection {
    pub universe: Universe,
    pub title: String,
    pub description: String,
    pub highest: String,
    pub lowest: String,
    pub magnitude: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub universe: Universe,
    pub title: &'static str,
    pub text: String,
}

/// Fixed-structure report content; renderers only lay it out.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticReport {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub generated_on: NaiveDate,
    pub company: CompanyInfo,
    pub global_score: u8,
    pub executive_summary: String,
    pub universes: Vec<UniverseSection>,
    pub gaps: Vec<GapSection>,
    pub strengths: Vec<Highlight>,
    pub weaknesses: Vec<Highlight>,
    pub recommendations: Vec<Recommendation>,
    pub footer: String,
}

pub fn format_report_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

fn describe_group(group: &ProfileGroup) -> String {
    let labels: Vec<&str> = group.profiles.iter().map(|profile| profile.label()).collect();
    format!("{} ({}%)", labels.join(", "), round_percent(group.score))
}

/// Training below 60%, external support as well below 40%.
pub fn recommendations_for(entry: &GlobalProfileEntry) -> Vec<Recommendation> {
    let score = round_percent(entry.score);
    let domain = entry.universe.label().to_lowercase();
    let mut recommendations = Vec::new();

    if score < TRAINING_THRESHOLD {
        recommendations.push(Recommendation {
            universe: entry.universe,
            title: "Formation et développement",
            text: format!(
                "Renforcer les compétences en {domain} à travers des programmes de formation ciblés."
            ),
        });
    }
    if score < EXTERNAL_SUPPORT_THRESHOLD {
        recommendations.push(Recommendation {
            universe: entry.universe,
            title: "Accompagnement externe",
            text: format!(
                "Envisager un accompagnement externe pour accélérer la transformation digitale dans le domaine {domain}."
            ),
        });
    }

    recommendations
}

impl DiagnosticReport {
    pub fn build(
        company: &CompanyInfo,
        results: &[UniverseResult],
        global_profile: &[GlobalProfileEntry],
        generated_on: NaiveDate,
    ) -> Self {
        let date = format_report_date(generated_on);
        let global_score = round_percent(mean(global_profile.iter().map(|entry| entry.score)));

        let executive_summary = format!(
            "Ce diagnostic digital a été réalisé pour {} le {date}. L'analyse couvre {} univers digitaux et {} profils de compétences. Le score global moyen est de {global_score}%.",
            company.name,
            results.len(),
            Profile::ordered().len(),
        );

        let universes = results
            .iter()
            .map(|result| {
                let entry = global_profile
                    .iter()
                    .find(|entry| entry.universe == result.universe);
                let average = entry.map_or_else(|| result.average(), |entry| entry.score);
                let level = entry.map_or_else(|| Level::from_score(average), |entry| entry.level);
                let score = round_percent(average);

                UniverseSection {
                    universe: result.universe,
                    label: result.universe.label(),
                    description: result.universe.description(),
                    score,
                    level,
                    tone: ScoreTone::for_score(score),
                    profiles: Profile::ordered()
                        .into_iter()
                        .map(|profile| ProfileBar {
                            profile,
                            label: profile.label(),
                            score: round_percent(result.score_for(profile).score),
                            color: Rgb::for_profile(profile),
                        })
                        .collect(),
                    explanation: format!(
                        "Score d'évaluation : {score}% - Niveau : {}",
                        level.label()
                    ),
                }
            })
            .collect();

        let gaps = compute_gaps(results)
            .into_iter()
            .map(|gap| GapSection {
                universe: gap.universe,
                title: format!("Écart dans l'univers : {}", gap.universe.label()),
                highest: describe_group(&gap.highest),
                lowest: describe_group(&gap.lowest),
                magnitude: round_percent(gap.magnitude),
                description: gap.description,
            })
            .collect();

        let highlights = compute_strengths_and_weaknesses(results);
        let recommendations = global_profile.iter().flat_map(recommendations_for).collect();

        Self {
            title: REPORT_TITLE,
            subtitle: REPORT_SUBTITLE,
            generated_on,
            company: company.clone(),
            global_score,
            executive_summary,
            universes,
            gaps,
            strengths: highlights.strengths,
            weaknesses: highlights.weaknesses,
            recommendations,
            footer: format!("Rapport généré automatiquement par Digitancy • {date}"),
        }
    }

    /// Runs the scoring engine over `answers` and builds the report from its output.
    pub fn from_answers(company: &CompanyInfo, answers: &AnswerSet, generated_on: NaiveDate) -> Self {
        let results = compute_universe_results(answers);
        let global_profile = compute_global_profile(&results);
        Self::build(company, &results, &global_profile, generated_on)
    }
}
