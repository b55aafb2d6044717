//! Brazilian location handling: state abbreviation expansion and the ordered
//! city/state → region code rule table.

use crate::utils::normalize_key;
use regex::Regex;
use std::sync::LazyLock;

/// Brazilian states in table order. Expansion walks this order.
pub const BRAZILIAN_STATES: [(&str, &str); 27] = [
    ("AC", "Acre"),
    ("AL", "Alagoas"),
    ("AP", "Amapá"),
    ("AM", "Amazonas"),
    ("BA", "Bahia"),
    ("CE", "Ceará"),
    ("DF", "Distrito Federal"),
    ("ES", "Espírito Santo"),
    ("GO", "Goiás"),
    ("MA", "Maranhão"),
    ("MT", "Mato Grosso"),
    ("MS", "Mato Grosso do Sul"),
    ("MG", "Minas Gerais"),
    ("PA", "Pará"),
    ("PB", "Paraíba"),
    ("PR", "Paraná"),
    ("PE", "Pernambuco"),
    ("PI", "Piauí"),
    ("RJ", "Rio de Janeiro"),
    ("RN", "Rio Grande do Norte"),
    ("RS", "Rio Grande do Sul"),
    ("RO", "Rondônia"),
    ("RR", "Roraima"),
    ("SC", "Santa Catarina"),
    ("SP", "São Paulo"),
    ("SE", "Sergipe"),
    ("TO", "Tocantins"),
];

static STATE_PATTERNS: LazyLock<Vec<(Regex, String)>> = LazyLock::new(|| {
    BRAZILIAN_STATES
        .iter()
        .map(|(code, name)| {
            let re = Regex::new(&format!(r"(?i)\b{}\b", code)).expect("valid state code regex");
            (re, name.to_uppercase())
        })
        .collect()
});

pub fn state_name(code: &str) -> Option<&'static str> {
    let code = code.trim();
    BRAZILIAN_STATES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|(_, name)| *name)
}

/// Replaces every whole-word state code with the full state name and upper-cases the result.
///
/// `"UBERLANDIA - MG"` becomes `"UBERLANDIA - MINAS GERAIS"`.
pub fn expand_location_name(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut expanded = text.to_string();
    for (pattern, full_name) in STATE_PATTERNS.iter() {
        if pattern.is_match(&expanded) {
            expanded = pattern
                .replace_all(&expanded, regex::NoExpand(full_name.as_str()))
                .into_owned();
        }
    }
    expanded.to_uppercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchCondition {
    /// Any of `cities` located in any of `states`.
    CityInState {
        states: &'static [&'static str],
        cities: &'static [&'static str],
    },
    /// Anything located in one of `states`.
    State { states: &'static [&'static str] },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneRule {
    pub condition: MatchCondition,
    pub code: &'static str,
}

impl ZoneRule {
    fn matches(&self, city: &str, state: &str) -> bool {
        match self.condition {
            MatchCondition::CityInState { states, cities } => {
                state_in(state, states) && cities.iter().any(|c| normalize_key(c) == city)
            }
            MatchCondition::State { states } => state_in(state, states),
        }
    }
}

/// `state` is a normalized key; it matches either a code or its full name.
fn state_in(state: &str, codes: &[&str]) -> bool {
    codes.iter().any(|code| {
        state == *code || state_name(code).is_some_and(|name| normalize_key(name) == state)
    })
}

const NORDESTE_STATES: &[&str] = &["BA", "PE", "CE", "AL", "PB", "RN", "SE", "MA", "PI"];

/// Evaluated top to bottom; the first matching rule wins. City rules sit above the
/// state-wide rules so that a specific city overrides its state's default.
pub const ZONE_RULES: &[ZoneRule] = &[
    ZoneRule {
        condition: MatchCondition::CityInState {
            states: &["MG"],
            cities: &["UBERLÂNDIA", "ARAGUARI"],
        },
        code: "TM",
    },
    ZoneRule {
        condition: MatchCondition::CityInState {
            states: &["PR"],
            cities: &["PARANAGUÁ", "PONTA GROSSA"],
        },
        code: "LPR",
    },
    ZoneRule {
        condition: MatchCondition::CityInState {
            states: &["PR"],
            cities: &["LONDRINA", "TOLEDO"],
        },
        code: "OPR",
    },
    ZoneRule {
        condition: MatchCondition::CityInState {
            states: &["PR"],
            cities: &["DOIS VIZINHOS", "FRANCISCO BELTRÃO"],
        },
        code: "SPR",
    },
    ZoneRule {
        condition: MatchCondition::CityInState {
            states: &["SC"],
            cities: &["CONCÓRDIA", "CHAPECÓ", "IRANI"],
        },
        code: "ESC",
    },
    ZoneRule {
        condition: MatchCondition::CityInState {
            states: &["SC"],
            cities: &["VIDEIRA", "CAPINZAL", "HERVAL DO OESTE", "CAMPOS NOVOS"],
        },
        code: "CSC",
    },
    ZoneRule {
        condition: MatchCondition::State { states: &["GO"] },
        code: "GO",
    },
    ZoneRule {
        condition: MatchCondition::State { states: &["MT"] },
        code: "MT",
    },
    ZoneRule {
        condition: MatchCondition::State { states: &["MS"] },
        code: "MS",
    },
    ZoneRule {
        condition: MatchCondition::State { states: &["SP"] },
        code: "SP",
    },
    ZoneRule {
        condition: MatchCondition::State {
            states: NORDESTE_STATES,
        },
        code: "NE",
    },
];

/// Maps a city and state (code or full name) to a region code. `None` means unmapped.
///
/// Comparisons ignore case, surrounding whitespace and accents.
pub fn map_city_to_zone(city: &str, state: &str) -> Option<&'static str> {
    let city = normalize_key(city);
    let state = normalize_key(state);

    ZONE_RULES
        .iter()
        .find(|rule| rule.matches(&city, &state))
        .map(|rule| rule.code)
}

/// Region code for a canonical zone name.
///
/// Names shaped like `"CITY - ST"` or `"CITY / ST"` are split into city and state;
/// anything else is treated as a bare state name.
pub fn zone_region_code(zone_name: &str) -> Option<&'static str> {
    let split = zone_name
        .rsplit_once(" - ")
        .or_else(|| zone_name.rsplit_once('/'));

    match split {
        Some((city, state)) => map_city_to_zone(city, state),
        None => map_city_to_zone("", zone_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_single_and_multiple_codes() {
        assert_eq!(
            expand_location_name("Uberlandia - MG"),
            "UBERLANDIA - MINAS GERAIS"
        );
        assert_eq!(
            expand_location_name("PE / PB / AL"),
            "PERNAMBUCO / PARAÍBA / ALAGOAS"
        );
        assert_eq!(expand_location_name("rio verde go"), "RIO VERDE GOIÁS");
    }

    #[test]
    fn test_expand_only_whole_words() {
        assert_eq!(expand_location_name("GOIANIA"), "GOIANIA");
        assert_eq!(expand_location_name("CAMPO GRANDE"), "CAMPO GRANDE");
        assert_eq!(expand_location_name("SPR"), "SPR");
        assert_eq!(expand_location_name(""), "");
    }

    #[test]
    fn test_accented_letters_are_word_characters() {
        // "BA" after "Í" is inside the word, not a standalone code.
        assert_eq!(expand_location_name("PARAÍBA"), "PARAÍBA");
        assert_eq!(expand_location_name("Paraíba"), "PARAÍBA");
        assert_eq!(expand_location_name("JOÃO PESSOA - PARAÍBA"), "JOÃO PESSOA - PARAÍBA");
        assert_eq!(expand_location_name("ÍBA BA"), "ÍBA BAHIA");
    }

    #[test]
    fn test_expansion_does_not_reexpand_full_names() {
        // MS expands to a name containing "DO", which is not a state code.
        assert_eq!(expand_location_name("DOURADOS MS"), "DOURADOS MATO GROSSO DO SUL");
        assert_eq!(expand_location_name("SP"), "SÃO PAULO");
    }

    #[test]
    fn test_city_rules_take_priority_over_state_rules() {
        assert_eq!(map_city_to_zone("Uberlândia", "MG"), Some("TM"));
        assert_eq!(map_city_to_zone("ARAGUARI", "Minas Gerais"), Some("TM"));
        assert_eq!(map_city_to_zone("Paranagua", "PR"), Some("LPR"));
        assert_eq!(map_city_to_zone("Ponta Grossa", "Paraná"), Some("LPR"));
        assert_eq!(map_city_to_zone("toledo", "pr"), Some("OPR"));
        assert_eq!(map_city_to_zone("Francisco Beltrao", "PR"), Some("SPR"));
        assert_eq!(map_city_to_zone("Chapecó", "SC"), Some("ESC"));
        assert_eq!(map_city_to_zone("Herval do Oeste", "Santa Catarina"), Some("CSC"));
    }

    #[test]
    fn test_state_rules() {
        assert_eq!(map_city_to_zone("Rio Verde", "GO"), Some("GO"));
        assert_eq!(map_city_to_zone("Rio Verde", "Goiás"), Some("GO"));
        assert_eq!(map_city_to_zone("Sorriso", "MT"), Some("MT"));
        assert_eq!(map_city_to_zone("Dourados", "MS"), Some("MS"));
        assert_eq!(map_city_to_zone("Campinas", "São Paulo"), Some("SP"));
        assert_eq!(map_city_to_zone("Recife", "PE"), Some("NE"));
        assert_eq!(map_city_to_zone("Teresina", "PI"), Some("NE"));
    }

    #[test]
    fn test_unmapped() {
        assert_eq!(map_city_to_zone("Uberlândia", "GO"), Some("GO"));
        assert_eq!(map_city_to_zone("Belo Horizonte", "MG"), None);
        assert_eq!(map_city_to_zone("Curitiba", "PR"), None);
        assert_eq!(map_city_to_zone("Porto Alegre", "RS"), None);
        assert_eq!(map_city_to_zone("", ""), None);
    }

    #[test]
    fn test_zone_region_code() {
        assert_eq!(zone_region_code("GOIÁS"), Some("GO"));
        assert_eq!(zone_region_code("SAO PAULO"), Some("SP"));
        assert_eq!(zone_region_code("TOLEDO - PR"), Some("OPR"));
        assert_eq!(zone_region_code("NORDESTE"), None);
        assert_eq!(zone_region_code("EXTREMO SANTA CATARINA"), None);
    }

    #[test]
    fn test_state_name_lookup() {
        assert_eq!(state_name("sc"), Some("Santa Catarina"));
        assert_eq!(state_name("XX"), None);
    }
}
