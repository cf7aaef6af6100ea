use std::collections::HashMap;
use std::collections::hash_map::Entry;

use log::debug;

use crate::catalog::StatDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
    Unknown,
}

impl Position {
    /// Squad pages label positions in Indonesian; tolerate English too.
    /// Two-letter codes only match the whole label, never as substrings.
    pub fn from_label(label: &str) -> Self {
        fn is(lower: &str, words: &[&str], codes: &[&str]) -> bool {
            codes.contains(&lower) || words.iter().any(|w| lower.contains(w))
        }

        let lower = label.trim().to_lowercase();
        if lower.is_empty() {
            Position::Unknown
        } else if is(&lower, &["penjaga gawang", "kiper", "goalkeeper"], &["gk"]) {
            Position::Goalkeeper
        } else if is(&lower, &["belakang", "bek", "defender"], &["df", "db"]) {
            Position::Defender
        } else if is(&lower, &["tengah", "gelandang", "midfielder"], &["mf"]) {
            Position::Midfielder
        } else if is(&lower, &["depan", "penyerang", "striker", "forward"], &["fw"]) {
            Position::Forward
        } else {
            Position::Unknown
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "Goalkeeper",
            Position::Defender => "Defender",
            Position::Midfielder => "Midfielder",
            Position::Forward => "Forward",
            Position::Unknown => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DemographicRecord {
    pub name: String,
    pub full_name: String,
    pub team: String,
    pub country: String,
    pub age: u32,
    pub position: Position,
    pub picture_url: String,
    pub appearances: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatisticRecord {
    pub player_name: String,
    pub team: String,
    pub metrics: HashMap<String, f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    Exact,
    Partial,
    Surname,
}

impl MatchTier {
    fn strength(self) -> u8 {
        match self {
            MatchTier::Exact => 3,
            MatchTier::Partial => 2,
            MatchTier::Surname => 1,
        }
    }

    fn status(self) -> MatchStatus {
        match self {
            MatchTier::Exact => MatchStatus::Exact,
            MatchTier::Partial => MatchStatus::Partial,
            MatchTier::Surname => MatchStatus::Surname,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    Exact,
    Partial,
    Surname,
    NoMatch,
    ClaimedByOther,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchEvent {
    pub demographic_key: String,
    pub status: MatchStatus,
    pub matched_statistic_key: Option<String>,
}

/// Demographic fields plus every catalog metric in catalog order; metrics
/// default to 0 when the record matched nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRecord {
    pub demographic: DemographicRecord,
    pub tier: Option<MatchTier>,
    pub metrics: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub merged: Vec<MergedRecord>,
    pub unmatched_statistics: Vec<StatisticRecord>,
    pub report: Vec<MatchEvent>,
}

/// Case-fold, strip diacritics, collapse internal whitespace. Both names
/// and teams go through this before any comparison or keying.
pub fn normalize_name(s: &str) -> String {
    let folded = fold_diacritics(&s.trim().to_lowercase());
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn fold_diacritics(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            'à'..='å' | 'ā' | 'ă' | 'ą' => out.push('a'),
            'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => out.push('c'),
            'ď' | 'đ' | 'ð' => out.push('d'),
            'è'..='ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => out.push('e'),
            'ĝ' | 'ğ' | 'ġ' | 'ģ' => out.push('g'),
            'ì'..='ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => out.push('i'),
            'ķ' => out.push('k'),
            'ĺ' | 'ļ' | 'ľ' | 'ł' => out.push('l'),
            'ñ' | 'ń' | 'ņ' | 'ň' => out.push('n'),
            'ò'..='ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => out.push('o'),
            'ŕ' | 'ŗ' | 'ř' => out.push('r'),
            'ś' | 'ŝ' | 'ş' | 'š' => out.push('s'),
            'ţ' | 'ť' | 'ŧ' => out.push('t'),
            'ù'..='ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => out.push('u'),
            'ý' | 'ÿ' => out.push('y'),
            'ź' | 'ż' | 'ž' => out.push('z'),
            'ß' => out.push_str("ss"),
            'æ' => out.push_str("ae"),
            'œ' => out.push_str("oe"),
            _ => out.push(c),
        }
    }
    out
}

struct StatNorm {
    name: String,
    tokens: Vec<String>,
    team: String,
}

#[derive(Clone, Copy)]
struct Proposal {
    stat_idx: usize,
    tier: MatchTier,
}

/// Match demographic records to statistic records by name, scoped to the
/// demographic's team. Demographics are the spine: exactly one merged
/// record per demographic, in input order; unmatched statistics keep their
/// input order. Resolution is two-phase so a statistic claimed by two
/// demographics goes to the stronger tier, then to the earlier demographic.
pub fn reconcile(
    demographics: &[DemographicRecord],
    statistics: &[StatisticRecord],
    catalog: &'static [StatDescriptor],
) -> Reconciled {
    let stat_norms: Vec<StatNorm> = statistics
        .iter()
        .map(|s| {
            let name = normalize_name(&s.player_name);
            StatNorm {
                tokens: name.split_whitespace().map(str::to_string).collect(),
                name,
                team: normalize_name(&s.team),
            }
        })
        .collect();

    let proposals: Vec<Option<Proposal>> = demographics
        .iter()
        .map(|d| propose(d, &stat_norms))
        .collect();

    // stat index -> winning demographic index
    let mut claimed: HashMap<usize, usize> = HashMap::new();
    for (demo_idx, proposal) in proposals.iter().enumerate() {
        let Some(p) = proposal else { continue };
        match claimed.entry(p.stat_idx) {
            Entry::Vacant(slot) => {
                slot.insert(demo_idx);
            }
            Entry::Occupied(mut slot) => {
                let holder = *slot.get();
                let holder_tier = proposals[holder]
                    .as_ref()
                    .map(|h| h.tier.strength())
                    .unwrap_or(0);
                // Equal strength keeps the earlier demographic.
                if p.tier.strength() > holder_tier {
                    slot.insert(demo_idx);
                }
            }
        }
    }

    let mut merged = Vec::with_capacity(demographics.len());
    let mut report = Vec::with_capacity(demographics.len());
    let mut consumed = vec![false; statistics.len()];

    for (demo_idx, d) in demographics.iter().enumerate() {
        let key = demographic_key(d);
        match proposals[demo_idx] {
            Some(p) if claimed.get(&p.stat_idx) == Some(&demo_idx) => {
                consumed[p.stat_idx] = true;
                let stat = &statistics[p.stat_idx];
                merged.push(MergedRecord {
                    demographic: d.clone(),
                    tier: Some(p.tier),
                    metrics: catalog
                        .iter()
                        .map(|desc| stat.metrics.get(desc.id).copied().unwrap_or(0.0))
                        .collect(),
                });
                report.push(MatchEvent {
                    demographic_key: key,
                    status: p.tier.status(),
                    matched_statistic_key: Some(stat.player_name.clone()),
                });
            }
            Some(p) => {
                debug!(
                    "{} lost {} to a stronger or earlier claim",
                    key, statistics[p.stat_idx].player_name
                );
                merged.push(zero_record(d, catalog));
                report.push(MatchEvent {
                    demographic_key: key,
                    status: MatchStatus::ClaimedByOther,
                    matched_statistic_key: Some(statistics[p.stat_idx].player_name.clone()),
                });
            }
            None => {
                merged.push(zero_record(d, catalog));
                report.push(MatchEvent {
                    demographic_key: key,
                    status: MatchStatus::NoMatch,
                    matched_statistic_key: None,
                });
            }
        }
    }

    let unmatched_statistics = statistics
        .iter()
        .zip(&consumed)
        .filter(|(_, used)| !**used)
        .map(|(s, _)| s.clone())
        .collect();

    Reconciled {
        merged,
        unmatched_statistics,
        report,
    }
}

fn zero_record(d: &DemographicRecord, catalog: &[StatDescriptor]) -> MergedRecord {
    MergedRecord {
        demographic: d.clone(),
        tier: None,
        metrics: vec![0.0; catalog.len()],
    }
}

fn demographic_key(d: &DemographicRecord) -> String {
    let name = if d.name.is_empty() { &d.full_name } else { &d.name };
    format!("{} ({})", name, d.team)
}

/// Tiered candidate search within the demographic's team. A tier accepts
/// only when exactly one candidate survives it; several equally-good
/// survivors fall through, and an ambiguous surname is never guessed.
fn propose(d: &DemographicRecord, stat_norms: &[StatNorm]) -> Option<Proposal> {
    let team = normalize_name(&d.team);
    if team.is_empty() {
        return None;
    }
    let candidates: Vec<usize> = stat_norms
        .iter()
        .enumerate()
        .filter(|(_, s)| s.team == team)
        .map(|(i, _)| i)
        .collect();
    if candidates.is_empty() {
        return None;
    }

    let full = normalize_name(&d.full_name);
    let short = normalize_name(&d.name);
    let names: Vec<&str> = [full.as_str(), short.as_str()]
        .into_iter()
        .filter(|n| !n.is_empty())
        .collect();
    if names.is_empty() {
        return None;
    }

    let exact: Vec<usize> = candidates
        .iter()
        .copied()
        .filter(|&i| names.iter().any(|n| stat_norms[i].name == *n))
        .collect();
    if let [only] = exact[..] {
        return Some(Proposal {
            stat_idx: only,
            tier: MatchTier::Exact,
        });
    }

    let partial: Vec<usize> = candidates
        .iter()
        .copied()
        .filter(|&i| {
            names.iter().any(|n| {
                let tokens: Vec<&str> = n.split_whitespace().collect();
                token_subset(&tokens, &stat_norms[i].tokens)
            })
        })
        .collect();
    if let [only] = partial[..] {
        return Some(Proposal {
            stat_idx: only,
            tier: MatchTier::Partial,
        });
    }

    let surname = names[0].split_whitespace().last()?;
    let by_surname: Vec<usize> = candidates
        .iter()
        .copied()
        .filter(|&i| stat_norms[i].tokens.last().map(String::as_str) == Some(surname))
        .collect();
    if let [only] = by_surname[..] {
        return Some(Proposal {
            stat_idx: only,
            tier: MatchTier::Surname,
        });
    }

    None
}

/// Subset in either direction, handling nickname vs full-name spellings.
fn token_subset(a: &[&str], b: &[String]) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    let a_in_b = a.iter().all(|t| b.iter().any(|u| u == t));
    let b_in_a = b.iter().all(|u| a.iter().any(|t| t == u));
    a_in_b || b_in_a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_folds_case_diacritics_whitespace() {
        assert_eq!(normalize_name("  José   ÁLVAREZ "), "jose alvarez");
        assert_eq!(normalize_name("Paulo\tMoccelin"), "paulo moccelin");
        assert_eq!(normalize_name("Müller"), "muller");
        assert_eq!(normalize_name("Bağcı"), "bagci");
        assert_eq!(normalize_name(""), "");
    }

    #[test]
    fn token_subset_both_directions() {
        let long: Vec<String> = ["paulo", "roberto", "moccelin"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert!(token_subset(&["paulo", "moccelin"], &long));
        assert!(token_subset(&["paulo", "roberto", "moccelin", "junior"], &long));
        assert!(!token_subset(&["paulo", "santos"], &long));
        assert!(!token_subset(&[], &long));
    }

    #[test]
    fn position_labels_parse_both_languages() {
        assert_eq!(Position::from_label("Penjaga Gawang"), Position::Goalkeeper);
        assert_eq!(Position::from_label("Pemain Belakang"), Position::Defender);
        assert_eq!(Position::from_label("Gelandang"), Position::Midfielder);
        assert_eq!(Position::from_label("Penyerang"), Position::Forward);
        assert_eq!(Position::from_label("Forward"), Position::Forward);
        assert_eq!(Position::from_label("???"), Position::Unknown);
        assert_eq!(Position::from_label(""), Position::Unknown);
    }
}
