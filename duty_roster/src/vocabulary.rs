use log::debug;
use regex::Regex;
use std::collections::HashMap;

use crate::config::{AnalysisErrors, UNKNOWN_MONTH};

/// A post name as written in the documents, and the name it is reported under.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PostAlias {
    pub alias: String,
    pub name: String,
}

/// The static tables the recognizers are built from.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct VocabularyTables {
    pub posts: Vec<PostAlias>,
    /// Rank and unit abbreviations removed from the names before grouping.
    pub rank_tokens: Vec<String>,
}

const BUILTIN_POSTS: [(&str, &str); 14] = [
    ("Sp Dia à Gu Campo Grande", "Sup de Dia à Gu Campo Grande"),
    ("Spvs Dia ao H Mil A CG", "Sup de Dia ao HMACG"),
    (
        "Veterinário de Sobreaviso à Gu CG",
        "Veterinário de Sobreaviso",
    ),
    (
        "Cmt Gd ao Edifício Mello e Cáceres",
        "Cmt Gd Ed Mello e Cáceres",
    ),
    ("Perito de Sobreaviso à Gu CG", "Perito de Sobreaviso"),
    ("Policial de Dia à Gu CG", "Policial de Dia"),
    ("Of Dia ao Forte Pantanal", "Of Dia ao Forte Pantanal"),
    (
        "Of Dia ao Forte Pantanal (Aprendiz)",
        "Of Dia ao Forte Pantanal (Aprendiz)",
    ),
    ("Adj Of Dia", "Adj Of Dia"),
    ("Cmt Gd ao Forte Pantanal", "Cmt Gd ao Forte Pantanal"),
    ("Aux Cmt Gd ao Forte Pantanal", "Aux Cmt Gd ao Forte Pantanal"),
    ("Cb Gd ao Forte Pantanal", "Cb Gd ao Forte Pantanal"),
    ("Aux Cb Gd ao Forte Pantanal", "Aux Cb Gd ao Forte Pantanal"),
    ("Corneteiro", "Corneteiro"),
];

const BUILTIN_RANK_TOKENS: [&str; 42] = [
    "1º TEN OTT",
    "2º TEN OTT",
    "1º OTT",
    "2º OTT",
    "TEN CEL",
    "TEN. CEL",
    "MAJ MED",
    "MAJ DENT",
    "1º SGT INF",
    "2º SGT INF",
    "3º SGT INF",
    "1º SGT COM",
    "3º SGT COM",
    "2º SGT MAT BEL",
    "3º SGT STT",
    "3º SGT SCT",
    "CAP QCO",
    "1º TEN",
    "2º TEN",
    "1o TEN",
    "2o TEN",
    "S TEN",
    "1º SGT",
    "2º SGT",
    "3º SGT",
    "MAJ",
    "CAP",
    "TEN",
    "SGT",
    "ASP",
    "CB",
    "SD",
    "OTT",
    "QCO",
    "QEM",
    "MED",
    "INF",
    "COM",
    "STT",
    "SCT",
    "MAT BEL",
    "º",
];

const MONTHS: [(&str, &str); 12] = [
    ("JANEIRO", "01"),
    ("FEVEREIRO", "02"),
    ("MARÇO", "03"),
    ("ABRIL", "04"),
    ("MAIO", "05"),
    ("JUNHO", "06"),
    ("JULHO", "07"),
    ("AGOSTO", "08"),
    ("SETEMBRO", "09"),
    ("OUTUBRO", "10"),
    ("NOVEMBRO", "11"),
    ("DEZEMBRO", "12"),
];

const DATE_HEADING_PATTERN: &str =
    r"PARA O DIA\s+([0-9]{1,2})\s+DE\s+([A-ZÇ]+)\s+DE\s+([0-9]{4})\s+\(([A-ZÀ-Ú-]+)\)";

// Company codes: uppercase letters, digits, ordinal indicators, slashes, periods and spaces.
const COMPANY_CODE_CLASS: &str = r"[A-Z0-9ºª\s/.]+";

impl VocabularyTables {
    /// The post aliases and rank tokens of the Campo Grande garrison rosters.
    pub fn builtin() -> VocabularyTables {
        VocabularyTables {
            posts: BUILTIN_POSTS
                .iter()
                .map(|(alias, name)| PostAlias {
                    alias: alias.to_string(),
                    name: name.to_string(),
                })
                .collect(),
            rank_tokens: BUILTIN_RANK_TOKENS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// The compiled recognizers.
///
/// A vocabulary is built once and can then be shared across documents.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    // None when the alias table is empty: nothing is recognized.
    post_regex: Option<Regex>,
    date_regex: Regex,
    posts: HashMap<String, String>,
    // Most specific first.
    rank_tokens: Vec<String>,
}

impl Vocabulary {
    pub fn compile(tables: &VocabularyTables) -> Result<Vocabulary, AnalysisErrors> {
        let date_regex = Regex::new(DATE_HEADING_PATTERN)
            .map_err(|e| AnalysisErrors::InvalidVocabulary(e.to_string()))?;

        let mut aliases: Vec<&str> = tables
            .posts
            .iter()
            .map(|p| p.alias.trim())
            .filter(|a| !a.is_empty())
            .collect();
        // Longer aliases first, so that an alias which is the prefix of another
        // one does not shadow it in the alternation.
        aliases.sort_by_key(|a| std::cmp::Reverse(a.chars().count()));

        let post_regex = if aliases.is_empty() {
            None
        } else {
            let alternation = aliases
                .iter()
                .map(|a| regex::escape(a))
                .collect::<Vec<String>>()
                .join("|");
            let pattern = format!(r"({}):\s*(.*?)\s*-\s*({})", alternation, COMPANY_CODE_CLASS);
            debug!("Vocabulary::compile: post pattern: {}", pattern);
            Some(
                Regex::new(&pattern)
                    .map_err(|e| AnalysisErrors::InvalidVocabulary(e.to_string()))?,
            )
        };

        let posts: HashMap<String, String> = tables
            .posts
            .iter()
            .map(|p| (p.alias.trim().to_string(), p.name.clone()))
            .collect();

        let mut rank_tokens: Vec<String> = tables
            .rank_tokens
            .iter()
            .filter(|t| !t.is_empty())
            .map(|t| t.to_uppercase())
            .collect();
        // Stable: tokens of equal length keep their table order.
        rank_tokens.sort_by_key(|t| std::cmp::Reverse(t.chars().count()));

        Ok(Vocabulary {
            post_regex,
            date_regex,
            posts,
            rank_tokens,
        })
    }

    pub fn date_regex(&self) -> &Regex {
        &self.date_regex
    }

    pub fn post_regex(&self) -> Option<&Regex> {
        self.post_regex.as_ref()
    }

    /// The canonical name of a post alias, if the alias is known.
    pub fn canonical_post(&self, alias: &str) -> Option<&str> {
        self.posts.get(alias.trim()).map(|s| s.as_str())
    }

    /// Maps a raw name to the key used to group the assignments of one person.
    ///
    /// Rank and unit tokens are removed and whitespace is collapsed. If nothing
    /// is left, the trimmed raw name is used instead, so the key is never empty
    /// for a non-empty name.
    pub fn normalize(&self, raw_name: &str) -> String {
        let mut cleaned = raw_name.to_uppercase();
        for token in self.rank_tokens.iter() {
            cleaned = cleaned.replace(token.as_str(), " ");
        }
        let collapsed = cleaned.split_whitespace().collect::<Vec<&str>>().join(" ");
        if collapsed.is_empty() {
            raw_name.trim().to_string()
        } else {
            collapsed
        }
    }
}

/// The two-digit number of a month name, or `XX` for an unknown name.
pub fn month_number(month_name: &str) -> &'static str {
    MONTHS
        .iter()
        .find(|(name, _)| *name == month_name)
        .map(|(_, num)| *num)
        .unwrap_or(UNKNOWN_MONTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin() -> Vocabulary {
        Vocabulary::compile(&VocabularyTables::builtin()).unwrap()
    }

    #[test]
    fn rank_variants_share_a_key() {
        let v = builtin();
        assert_eq!(v.normalize("1º SGT INF JOÃO SILVA"), "JOÃO SILVA");
        assert_eq!(v.normalize("2º SGT INF JOÃO SILVA"), "JOÃO SILVA");
        assert_eq!(v.normalize("  3º Sgt   João Silva "), "JOÃO SILVA");
    }

    #[test]
    fn normalize_falls_back_to_raw_name() {
        let v = builtin();
        assert_eq!(v.normalize(" 1º SGT INF "), "1º SGT INF");
        assert_eq!(v.normalize("CAP"), "CAP");
    }

    #[test]
    fn normalize_is_deterministic() {
        let v = builtin();
        let names = ["TEN CEL MARIA SOUZA", "MAJ DENT CARLOS", "SD PEDRO"];
        for n in names.iter() {
            assert_eq!(v.normalize(n), v.normalize(n));
            assert!(!v.normalize(n).is_empty());
        }
    }

    #[test]
    fn specific_tokens_win_over_generic_ones() {
        // Listed generic-first: the compiler must still strip the long token whole.
        let tables = VocabularyTables {
            posts: vec![],
            rank_tokens: vec!["SGT".to_string(), "SGT MAT BEL".to_string()],
        };
        let v = Vocabulary::compile(&tables).unwrap();
        assert_eq!(v.normalize("SGT MAT BEL ANA LIMA"), "ANA LIMA");
    }

    #[test]
    fn empty_alias_table_matches_nothing() {
        let tables = VocabularyTables {
            posts: vec![],
            rank_tokens: vec![],
        };
        let v = Vocabulary::compile(&tables).unwrap();
        assert!(v.post_regex().is_none());
        assert_eq!(v.canonical_post("Corneteiro"), None);
    }

    #[test]
    fn longer_alias_is_preferred() {
        let v = builtin();
        let caps = v
            .post_regex()
            .unwrap()
            .captures("Of Dia ao Forte Pantanal (Aprendiz): ASP RUI - 2ª CIA")
            .unwrap();
        assert_eq!(&caps[1], "Of Dia ao Forte Pantanal (Aprendiz)");
        assert_eq!(&caps[2], "ASP RUI");
        assert_eq!(&caps[3], "2ª CIA");
    }

    #[test]
    fn date_heading() {
        let v = builtin();
        let caps = v
            .date_regex()
            .captures("BI 42 PARA O DIA 5 DE MARÇO DE 2024 (TERÇA-FEIRA)")
            .unwrap();
        assert_eq!(&caps[1], "5");
        assert_eq!(&caps[2], "MARÇO");
        assert_eq!(&caps[3], "2024");
        assert_eq!(&caps[4], "TERÇA-FEIRA");
    }

    #[test]
    fn months() {
        assert_eq!(month_number("MARÇO"), "03");
        assert_eq!(month_number("DEZEMBRO"), "12");
        assert_eq!(month_number("MARCO"), "XX");
    }
}
