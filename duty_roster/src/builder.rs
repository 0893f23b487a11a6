pub use crate::config::*;
pub use crate::vocabulary::*;

/// A builder for adding duty documents.
///
/// Documents are analyzed in the order they are added. This order decides
/// which raw name is displayed for a person seen under several ranks.
///
/// ```
/// use duty_roster::builder::Builder;
/// use duty_roster::{AnalysisRules, VocabularyTables};
/// # use duty_roster::AnalysisErrors;
///
/// let mut builder = Builder::new(&AnalysisRules::DEFAULT_RULES)?
///     .vocabulary(&VocabularyTables::builtin())?;
///
/// builder.add_document(
///     "boletim_042.pdf",
///     "PARA O DIA 5 DE MARÇO DE 2024 (TERÇA-FEIRA)\n\
///      Policial de Dia à Gu CG: 2º SGT INF JOÃO SILVA - 1ª CIA\n",
/// );
///
/// let report = builder.run()?;
/// assert_eq!(report.analysis.persons[0].details(), "Policial de Dia: 1/1 (100.0%)");
///
/// # Ok::<(), AnalysisErrors>(())
/// ```
pub struct Builder {
    pub(crate) _rules: AnalysisRules,
    pub(crate) _vocabulary: Vocabulary,
    pub(crate) _documents: Vec<DutyDocument>,
}

impl Builder {
    /// A builder with the builtin vocabulary.
    pub fn new(rules: &AnalysisRules) -> Result<Builder, AnalysisErrors> {
        Ok(Builder {
            _rules: rules.clone(),
            _vocabulary: Vocabulary::compile(&VocabularyTables::builtin())?,
            _documents: Vec::new(),
        })
    }

    /// Replaces the vocabulary. Documents added so far are kept.
    pub fn vocabulary(self, tables: &VocabularyTables) -> Result<Builder, AnalysisErrors> {
        Ok(Builder {
            _rules: self._rules,
            _vocabulary: Vocabulary::compile(tables)?,
            _documents: self._documents,
        })
    }

    /// Adds a document with the text of all its pages.
    pub fn add_document(&mut self, name: &str, text: &str) {
        self.add_document_2(DutyDocument {
            name: name.to_string(),
            text: text.to_string(),
        })
    }

    pub fn add_document_2(&mut self, document: DutyDocument) {
        self._documents.push(document);
    }

    pub fn run(&self) -> Result<RosterReport, AnalysisErrors> {
        crate::run_roster_analysis(&self._documents, &self._vocabulary, &self._rules)
    }
}
