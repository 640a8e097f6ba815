//! Keyword vocabularies and numeric phrase scanning for the prompt parser.
//!
//! Matching is plain substring containment over the lowercased prompt, plus
//! a small token scanner for numeric phrases ("30 dias", "10%", "10 por
//! cento"). Portuguese and English terms live in the same tables.

use crate::domain::{Horizon, Objective, RiskTolerance};

pub const OBJECTIVE_KEYWORDS: [(Objective, &[&str]); 5] = [
    (
        Objective::Return,
        &[
            "retorno",
            "return",
            "crescer",
            "crescimento",
            "valorizacao",
            "valorização",
            "alto retorno",
            "performance",
            "lucro",
            "ganho",
            "ganhar",
            "multiplicar",
            "appreciation",
            "growth",
        ],
    ),
    (
        Objective::Protection,
        &[
            "protecao",
            "proteção",
            "proteger",
            "preservar",
            "preservacao",
            "preservação",
            "seguranca",
            "segurança",
            "seguro",
            "defensivo",
            "capital",
            "safe",
            "protection",
            "preserve",
            "defensive",
        ],
    ),
    (
        Objective::Income,
        &[
            "renda",
            "dividendo",
            "dividendos",
            "proventos",
            "juros",
            "rendimento",
            "yield",
            "income",
            "dividend",
            "receita",
        ],
    ),
    (
        Objective::Speculation,
        &[
            "especulacao",
            "especulação",
            "especular",
            "trade",
            "trading",
            "swing",
            "daytrade",
            "day trade",
            "alavancagem",
            "alta volatilidade",
            "speculation",
            "speculative",
        ],
    ),
    (
        Objective::Balanced,
        &[
            "balanceado",
            "equilibrado",
            "misto",
            "diversificado",
            "balanced",
            "mixed",
        ],
    ),
];

pub const HORIZON_KEYWORDS: [(Horizon, &[&str]); 3] = [
    (
        Horizon::Short,
        &[
            "curto prazo",
            "curto",
            "dias",
            "dia",
            "semanas",
            "semana",
            "short term",
            "short",
            "quick",
            "fast",
            "week",
        ],
    ),
    (
        Horizon::Medium,
        &[
            "medio prazo",
            "médio prazo",
            "medio",
            "médio",
            "meses",
            "mes",
            "mês",
            "semestre",
            "medium term",
            "medium",
            "months",
            "semester",
        ],
    ),
    (
        Horizon::Long,
        &[
            "longo prazo",
            "longo",
            "anos",
            "ano",
            "long term",
            "long",
            "years",
            "buy and hold",
            "buy & hold",
            "hold",
        ],
    ),
];

pub const RISK_KEYWORDS: [(RiskTolerance, &[&str]); 4] = [
    (
        RiskTolerance::Conservative,
        &[
            "conservador",
            "baixo risco",
            "protegido",
            "conservative",
            "low risk",
            "cautious",
        ],
    ),
    (
        RiskTolerance::Moderate,
        &["moderado", "medio risco", "médio risco", "moderate", "medium risk"],
    ),
    (
        RiskTolerance::Aggressive,
        &[
            "agressivo",
            "alto risco",
            "arriscado",
            "ousado",
            "aggressive",
            "high risk",
            "risky",
            "bold",
        ],
    ),
    (
        RiskTolerance::Speculative,
        &[
            "especulativo",
            "muito arriscado",
            "alavancado",
            "aceitando alto risco",
            "very risky",
            "high leverage",
            "extreme",
        ],
    ),
];

/// Count how many keywords from `table` occur in the (lowercased) prompt.
pub fn keyword_hits(prompt: &str, table: &[&str]) -> usize {
    table.iter().filter(|k| prompt.contains(*k)).count()
}

/// A horizon stated as an explicit count of time units ("30 dias", "2 anos").
///
/// Scans whitespace-separated tokens for a number followed by a unit word.
/// Returns the first match; explicit numbers outrank bare unit keywords.
pub fn explicit_duration(prompt: &str) -> Option<Horizon> {
    let tokens: Vec<&str> = prompt.split_whitespace().collect();
    for pair in tokens.windows(2) {
        if parse_number(pair[0]).is_none() {
            continue;
        }
        match trim_token(pair[1]) {
            "dia" | "dias" | "day" | "days" | "semana" | "semanas" | "week" | "weeks" => {
                return Some(Horizon::Short)
            }
            "mes" | "mês" | "meses" | "month" | "months" => return Some(Horizon::Medium),
            "ano" | "anos" | "year" | "years" => return Some(Horizon::Long),
            _ => {}
        }
    }
    None
}

/// Explicit percentages found in the prompt, classified by the surrounding
/// words: a percent next to volatility vocabulary is a volatility ceiling,
/// next to loss vocabulary a drawdown ceiling, anything else a return
/// target. Numeric mentions override table-derived ceilings downstream.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NumericMentions {
    pub target_return: Option<f64>,
    pub max_volatility: Option<f64>,
    pub max_drawdown: Option<f64>,
}

impl NumericMentions {
    pub fn any(&self) -> bool {
        self.target_return.is_some() || self.max_volatility.is_some() || self.max_drawdown.is_some()
    }
}

const VOLATILITY_WORDS: &[&str] = &["volatilidade", "oscilacao", "oscilação", "volatility"];
const DRAWDOWN_WORDS: &[&str] = &[
    "queda", "quedas", "perda", "perdas", "perder", "cair", "drawdown", "prejuizo", "prejuízo",
    "loss", "lose",
];

/// Scan the prompt for explicit percentages ("10%", "10 por cento",
/// "12 ao ano") and classify each by context. The first mention of each
/// kind wins; `10` normalizes to `0.10`, values already below 1 are taken
/// as fractions.
pub fn numeric_mentions(prompt: &str) -> NumericMentions {
    let tokens: Vec<&str> = prompt.split_whitespace().collect();
    let mut mentions = NumericMentions::default();

    for (i, token) in tokens.iter().enumerate() {
        let value = if let Some(stripped) = token.strip_suffix('%') {
            parse_number(stripped)
        } else if let Some(value) = parse_number(token) {
            // "10 por cento" / "12 ao ano" / "1 a mes"
            let followed_by_percent_phrase = matches!(
                (
                    tokens.get(i + 1).copied().map(trim_token),
                    tokens.get(i + 2).copied().map(trim_token)
                ),
                (Some("por"), Some("cento"))
                    | (Some("ao"), Some("ano" | "mes" | "mês"))
                    | (Some("a"), Some("ano" | "mes" | "mês"))
            );
            followed_by_percent_phrase.then_some(value)
        } else {
            None
        };
        let Some(value) = value else {
            continue;
        };
        let value = normalize_percent(value);

        let slot = match classify_percent(&tokens, i) {
            PercentKind::Volatility => &mut mentions.max_volatility,
            PercentKind::Drawdown => &mut mentions.max_drawdown,
            PercentKind::Return => &mut mentions.target_return,
        };
        if slot.is_none() {
            *slot = Some(value);
        }
    }
    mentions
}

enum PercentKind {
    Volatility,
    Drawdown,
    Return,
}

/// Nearest metric word within four tokens before or two after the percent
/// decides its kind; a bare percent is a return target.
fn classify_percent(tokens: &[&str], at: usize) -> PercentKind {
    let start = at.saturating_sub(4);
    let end = (at + 3).min(tokens.len());
    let before = tokens[start..at].iter().rev();
    let after = tokens[at + 1..end].iter();
    for token in before.chain(after) {
        let word = trim_token(token);
        if VOLATILITY_WORDS.contains(&word) {
            return PercentKind::Volatility;
        }
        if DRAWDOWN_WORDS.contains(&word) {
            return PercentKind::Drawdown;
        }
    }
    PercentKind::Return
}

fn normalize_percent(value: f64) -> f64 {
    if value > 1.0 {
        value / 100.0
    } else {
        value
    }
}

fn parse_number(token: &str) -> Option<f64> {
    let cleaned = trim_token(token);
    if cleaned.is_empty() || !cleaned.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

fn trim_token(token: &str) -> &str {
    token.trim_matches(|c: char| c.is_ascii_punctuation() && c != '%')
}
