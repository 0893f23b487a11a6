mod config;
pub mod builder;
pub mod manual;
mod vocabulary;

use log::{debug, info, warn};

use std::collections::{BTreeMap, BTreeSet, HashMap};

pub use crate::config::*;
pub use crate::vocabulary::*;

// **** Extraction ****

/// Splits the text of a document into one period per date heading.
///
/// The text of a period runs from the end of its heading to the start of the
/// next heading (or the end of the text). A document without any heading
/// yields a single placeholder period.
pub fn segment_periods<'a>(vocab: &Vocabulary, text: &'a str) -> Vec<DutyPeriod<'a>> {
    let headings: Vec<regex::Captures<'a>> = vocab.date_regex().captures_iter(text).collect();
    if headings.is_empty() {
        return vec![DutyPeriod::placeholder()];
    }

    let mut periods: Vec<DutyPeriod<'a>> = Vec::new();
    for (idx, caps) in headings.iter().enumerate() {
        // Group 0 always participates in a match.
        let (start, heading_end) = match caps.get(0) {
            Some(m) => (m.start(), m.end()),
            None => continue,
        };
        debug!("segment_periods: heading at {}: {:?}", start, &caps[0]);
        let end = headings
            .get(idx + 1)
            .and_then(|next| next.get(0))
            .map(|m| m.start())
            .unwrap_or(text.len());

        let day = &caps[1];
        let month_name = &caps[2];
        let month = month_number(month_name);
        if month == UNKNOWN_MONTH {
            warn!(
                "segment_periods: unrecognized month {:?} in heading {:?}",
                month_name, &caps[0]
            );
        }
        periods.push(DutyPeriod {
            date: format!("{:0>2}/{}/{}", day, month, &caps[3]),
            weekday: caps[4].to_string(),
            text: &text[heading_end..end],
        });
    }
    periods
}

/// Extracts the assignments listed in one period.
///
/// Lines that do not contain a known post followed by a name and a company
/// code are skipped.
pub fn parse_period(
    vocab: &Vocabulary,
    period: &DutyPeriod,
    source_document: &str,
) -> Vec<DutyAssignment> {
    let post_regex = match vocab.post_regex() {
        Some(r) => r,
        None => return Vec::new(),
    };

    let mut res: Vec<DutyAssignment> = Vec::new();
    for line in period.text.lines() {
        let caps = match post_regex.captures(line) {
            Some(c) => c,
            None => continue,
        };
        let post = match vocab.canonical_post(&caps[1]) {
            Some(p) => p.to_string(),
            None => {
                warn!("parse_period: no canonical post for alias {:?}", &caps[1]);
                continue;
            }
        };
        let assignment = DutyAssignment {
            post,
            raw_name: caps[2].trim().to_string(),
            company_code: caps[3].trim().trim_matches('.').to_string(),
            date: period.date.clone(),
            weekday: period.weekday.clone(),
            source_document: source_document.to_string(),
        };
        debug!("parse_period: {:?}", assignment);
        res.push(assignment);
    }
    res
}

/// Segments and parses one document.
///
/// A document without date headings contributes exactly one placeholder row.
pub fn extract_document(vocab: &Vocabulary, document: &DutyDocument) -> Vec<RawRecord> {
    let periods = segment_periods(vocab, &document.text);
    let mut res: Vec<RawRecord> = Vec::new();
    for period in periods.iter() {
        if period.is_placeholder() {
            warn!(
                "extract_document: no date heading found in {}",
                document.name
            );
            res.push(RawRecord::Placeholder {
                source_document: document.name.clone(),
            });
            continue;
        }
        for a in parse_period(vocab, period, &document.name) {
            res.push(RawRecord::Assignment(a));
        }
    }
    info!(
        "Document {}: {} periods, {} rows",
        document.name,
        periods.len(),
        res.len()
    );
    res
}

// **** Aggregation ****

// The assignments of one person, in processing order.
struct PersonGroup<'a> {
    key: String,
    display_name: &'a str,
    count: u64,
    // Post -> count, in order of first appearance.
    posts: Vec<(&'a str, u64)>,
}

impl<'a> PersonGroup<'a> {
    fn add(&mut self, post: &'a str) {
        self.count += 1;
        if let Some(p) = self.posts.iter_mut().find(|(name, _)| *name == post) {
            p.1 += 1;
        } else {
            self.posts.push((post, 1));
        }
    }
}

/// Number of distinct dates on which each post appears.
fn post_opportunities(assignments: &[&DutyAssignment]) -> BTreeMap<String, u64> {
    let mut dates: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for a in assignments.iter() {
        dates
            .entry(a.post.as_str())
            .or_insert_with(BTreeSet::new)
            .insert(a.date.as_str());
    }
    dates
        .iter()
        .map(|(post, days)| (post.to_string(), days.len() as u64))
        .collect()
}

fn group_by_person<'a>(
    assignments: &[&'a DutyAssignment],
    vocab: &Vocabulary,
) -> Vec<PersonGroup<'a>> {
    let mut groups: Vec<PersonGroup<'a>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for a in assignments.iter().copied() {
        let key = vocab.normalize(&a.raw_name);
        let idx = match index.get(&key) {
            Some(idx) => *idx,
            None => {
                // First seen wins the display name.
                groups.push(PersonGroup {
                    key: key.clone(),
                    display_name: a.raw_name.as_str(),
                    count: 0,
                    posts: Vec::new(),
                });
                index.insert(key, groups.len() - 1);
                groups.len() - 1
            }
        };
        groups[idx].add(a.post.as_str());
    }
    groups
}

fn person_breakdown(
    group: &PersonGroup,
    opportunities: &BTreeMap<String, u64>,
    order: BreakdownOrder,
) -> Result<Vec<PostBreakdown>, AnalysisErrors> {
    let mut breakdown: Vec<PostBreakdown> = Vec::new();
    for (post, local_count) in group.posts.iter() {
        let opportunity = opportunities
            .get(*post)
            .cloned()
            .filter(|days| *days > 0)
            .ok_or_else(|| AnalysisErrors::MissingOpportunity(post.to_string()))?;
        breakdown.push(PostBreakdown {
            post: post.to_string(),
            local_count: *local_count,
            opportunity,
        });
    }
    match order {
        BreakdownOrder::RenderedString => breakdown.sort_by_key(|b| b.to_string()),
        BreakdownOrder::PostName => breakdown.sort_by(|a, b| a.post.cmp(&b.post)),
    }
    Ok(breakdown)
}

/// Computes the fairness tally of a set of assignments.
///
/// The assignments must be given in processing order (documents in input
/// order, then document order): the first raw name seen for a person is the
/// one displayed. Assignments with a sentinel name are ignored. An empty set
/// of assignments gives an empty analysis.
pub fn aggregate(
    assignments: &[DutyAssignment],
    vocab: &Vocabulary,
    rules: &AnalysisRules,
) -> Result<FairnessAnalysis, AnalysisErrors> {
    let valid: Vec<&DutyAssignment> = assignments.iter().filter(|a| a.has_valid_name()).collect();
    debug!(
        "aggregate: {} assignments, {} valid",
        assignments.len(),
        valid.len()
    );
    if valid.is_empty() {
        return Ok(FairnessAnalysis::EMPTY);
    }

    let opportunities = post_opportunities(&valid);
    let all_days: BTreeSet<&str> = valid.iter().map(|a| a.date.as_str()).collect();

    let groups = group_by_person(&valid, vocab);
    let mut persons: Vec<PersonAggregate> = Vec::new();
    for group in groups.iter() {
        let breakdown = person_breakdown(group, &opportunities, rules.breakdown_order)?;
        persons.push(PersonAggregate {
            display_name: group.display_name.to_string(),
            canonical_key: group.key.clone(),
            count: group.count,
            breakdown,
        });
    }
    persons.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.display_name.cmp(&b.display_name))
    });

    info!(
        "Aggregated {} assignments into {} persons over {} days",
        valid.len(),
        persons.len(),
        all_days.len()
    );
    Ok(FairnessAnalysis {
        total_days: all_days.len() as u64,
        opportunities: opportunities.into_iter().collect(),
        persons,
    })
}

/// Runs the whole pipeline over a set of documents, in the given order.
///
/// Fails if there is no document, or if no valid assignment could be found
/// in any of them. Partial results are never returned.
pub fn run_roster_analysis(
    documents: &[DutyDocument],
    vocab: &Vocabulary,
    rules: &AnalysisRules,
) -> Result<RosterReport, AnalysisErrors> {
    info!("Processing {} documents, rules: {:?}", documents.len(), rules);
    if documents.is_empty() {
        return Err(AnalysisErrors::EmptyInput);
    }

    let mut raw: Vec<RawRecord> = Vec::new();
    for document in documents.iter() {
        raw.extend(extract_document(vocab, document));
    }

    let assignments: Vec<DutyAssignment> = raw
        .iter()
        .filter_map(|r| r.assignment())
        .filter(|a| a.has_valid_name())
        .cloned()
        .collect();
    if assignments.is_empty() {
        return Err(AnalysisErrors::NoDataExtracted);
    }

    let analysis = aggregate(&assignments, vocab, rules)?;
    Ok(RosterReport { raw, analysis })
}
