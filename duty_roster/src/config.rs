// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// Placeholder value for the columns of a document that could not be parsed.
pub const NOT_AVAILABLE: &str = "N/A";

/// Marker for a name that could not be resolved. Never counted.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Month number used when a date heading names a month outside the table.
pub const UNKNOWN_MONTH: &str = "XX";

/// One input document: an identifier (usually the file name) and the full
/// extracted text of all its pages.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct DutyDocument {
    pub name: String,
    pub text: String,
}

/// A span of a document bounded by one date heading and the next one.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct DutyPeriod<'a> {
    /// `DD/MM/YYYY`, or `N/A` for the placeholder period.
    pub date: String,
    pub weekday: String,
    pub text: &'a str,
}

impl<'a> DutyPeriod<'a> {
    /// The period emitted for a document without any date heading.
    pub fn placeholder() -> DutyPeriod<'a> {
        DutyPeriod {
            date: NOT_AVAILABLE.to_string(),
            weekday: NOT_AVAILABLE.to_string(),
            text: "",
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.date == NOT_AVAILABLE
    }
}

/// A single assignment line, already resolved to its canonical post name.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct DutyAssignment {
    pub post: String,
    pub raw_name: String,
    pub company_code: String,
    pub date: String,
    pub weekday: String,
    pub source_document: String,
}

impl DutyAssignment {
    /// Assignments carrying a sentinel name do not take part in the analysis.
    pub fn has_valid_name(&self) -> bool {
        self.raw_name != NOT_AVAILABLE && self.raw_name != UNKNOWN_NAME
    }
}

/// A row of the raw table.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum RawRecord {
    Assignment(DutyAssignment),
    /// The document had no recognizable date heading.
    Placeholder { source_document: String },
}

impl RawRecord {
    /// The columns of the raw table, in order: source file, date, weekday,
    /// post, raw name, company code.
    pub fn columns(&self) -> [&str; 6] {
        match self {
            RawRecord::Assignment(a) => [
                a.source_document.as_str(),
                a.date.as_str(),
                a.weekday.as_str(),
                a.post.as_str(),
                a.raw_name.as_str(),
                a.company_code.as_str(),
            ],
            RawRecord::Placeholder { source_document } => [
                source_document.as_str(),
                NOT_AVAILABLE,
                NOT_AVAILABLE,
                NOT_AVAILABLE,
                NOT_AVAILABLE,
                NOT_AVAILABLE,
            ],
        }
    }

    pub fn assignment(&self) -> Option<&DutyAssignment> {
        match self {
            RawRecord::Assignment(a) => Some(a),
            RawRecord::Placeholder { .. } => None,
        }
    }
}

// ******** Output data structures *********

/// The assignments of one person at one post, compared to the number of
/// days this post had to be covered.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PostBreakdown {
    pub post: String,
    pub local_count: u64,
    /// Number of distinct dates on which the post appears in the corpus.
    /// Always at least 1.
    pub opportunity: u64,
}

impl PostBreakdown {
    /// The fairness ratio, in percent.
    pub fn ratio(&self) -> f64 {
        (self.local_count as f64) / (self.opportunity as f64) * 100.0
    }
}

impl Display for PostBreakdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}/{} ({:.1}%)",
            self.post,
            self.local_count,
            self.opportunity,
            self.ratio()
        )
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PersonAggregate {
    /// The first raw name seen for this person, in processing order.
    pub display_name: String,
    /// The grouping key. Not meant for display.
    pub canonical_key: String,
    pub count: u64,
    pub breakdown: Vec<PostBreakdown>,
}

impl PersonAggregate {
    /// The breakdown column of the analysis table.
    pub fn details(&self) -> String {
        self.breakdown
            .iter()
            .map(|b| b.to_string())
            .collect::<Vec<String>>()
            .join(" | ")
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct FairnessAnalysis {
    /// Distinct dates across all the valid assignments.
    pub total_days: u64,
    /// Opportunity count per canonical post, sorted by post name.
    pub opportunities: Vec<(String, u64)>,
    /// Sorted by decreasing count, then by display name.
    pub persons: Vec<PersonAggregate>,
}

impl FairnessAnalysis {
    pub const EMPTY: FairnessAnalysis = FairnessAnalysis {
        total_days: 0,
        opportunities: Vec::new(),
        persons: Vec::new(),
    };

    /// The summary value shown above the analysis table.
    pub fn summary_header(&self) -> String {
        format!("Total Dias: {}", self.total_days)
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RosterReport {
    pub raw: Vec<RawRecord>,
    pub analysis: FairnessAnalysis,
}

/// Errors that prevent the analysis from completing.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum AnalysisErrors {
    /// No document was provided.
    EmptyInput,
    /// Documents were read but none of them contained a valid assignment.
    NoDataExtracted,
    /// One of the recognition patterns could not be built.
    InvalidVocabulary(String),
    /// A post was assigned but has no opportunity count.
    MissingOpportunity(String),
}

impl Error for AnalysisErrors {}

impl Display for AnalysisErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisErrors::EmptyInput => write!(f, "no duty document to analyze"),
            AnalysisErrors::NoDataExtracted => {
                write!(f, "could not extract any valid assignment from the documents")
            }
            AnalysisErrors::InvalidVocabulary(msg) => {
                write!(f, "invalid recognition vocabulary: {}", msg)
            }
            AnalysisErrors::MissingOpportunity(post) => {
                write!(f, "no opportunity count for post {:?}", post)
            }
        }
    }
}

// ********* Configuration **********

/// How the per-post entries of a person are ordered.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum BreakdownOrder {
    /// Sort by the rendered text `"<post>: <count>/<days> (<ratio>%)"`.
    /// This is the historical ordering of the report.
    RenderedString,
    /// Sort by canonical post name.
    PostName,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct AnalysisRules {
    pub breakdown_order: BreakdownOrder,
}

impl AnalysisRules {
    pub const DEFAULT_RULES: AnalysisRules = AnalysisRules {
        breakdown_order: BreakdownOrder::RenderedString,
    };
}
