//! Agency directory: which CFR titles and chapters each agency issues.
//!
//! The upstream directory lists agencies with their own CFR references and
//! child agencies holding further references. Each agency is flattened into
//! a sorted set of labels such as `"Title 7 CFR Chapter 1"`.

use std::collections::BTreeSet;

use serde::Deserialize;

use crate::config::agencies_url;
use crate::error::Result;
use crate::http::EcfrClient;
use crate::types::AgencyRecord;

/// Top level of the upstream `agencies.json` document.
#[derive(Debug, Clone, Deserialize)]
pub struct AgencyDirectory {
    pub agencies: Vec<Agency>,
}

/// An agency as listed upstream. Children share the same shape.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Agency {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub cfr_references: Vec<CfrReference>,
    #[serde(default)]
    pub children: Vec<Agency>,
}

/// Reference from an agency to (part of) a CFR title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CfrReference {
    pub title: Option<u32>,
    pub chapter: Option<String>,
}

/// Parse a chapter designator such as `"IV"`, `"Chapter XII"` or `"3"`.
///
/// Returns `None` for anything that is not a canonical Roman numeral or a
/// positive decimal number.
///
/// # Examples
/// ```
/// use ecfr_backend::agencies::parse_chapter;
///
/// assert_eq!(parse_chapter("Chapter I"), Some(1));
/// assert_eq!(parse_chapter("XLVIII"), Some(48));
/// assert_eq!(parse_chapter("Subchapter A"), None);
/// ```
pub fn parse_chapter(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    let designator = match trimmed.get(..7) {
        Some(prefix) if prefix.eq_ignore_ascii_case("chapter") => trimmed[7..].trim_start(),
        _ => trimmed,
    };

    if designator.is_empty() {
        return None;
    }
    if designator.bytes().all(|b| b.is_ascii_digit()) {
        return designator.parse().ok().filter(|n| *n > 0);
    }
    parse_roman(designator)
}

const ROMAN_VALUES: [(u32, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

fn roman_digit(c: char) -> Option<u32> {
    match c {
        'I' => Some(1),
        'V' => Some(5),
        'X' => Some(10),
        'L' => Some(50),
        'C' => Some(100),
        'D' => Some(500),
        'M' => Some(1000),
        _ => None,
    }
}

fn to_roman(mut value: u32) -> String {
    let mut out = String::new();
    for (amount, numeral) in ROMAN_VALUES {
        while value >= amount {
            out.push_str(numeral);
            value -= amount;
        }
    }
    out
}

fn parse_roman(numeral: &str) -> Option<u32> {
    let upper = numeral.to_ascii_uppercase();
    let digits: Vec<u32> = upper.chars().map(roman_digit).collect::<Option<_>>()?;

    let mut total: i64 = 0;
    for (i, digit) in digits.iter().enumerate() {
        match digits.get(i + 1) {
            Some(next) if next > digit => total -= i64::from(*digit),
            _ => total += i64::from(*digit),
        }
    }

    // Reject non-canonical forms such as "IIII" or "IC".
    let total = u32::try_from(total).ok().filter(|t| *t > 0)?;
    (to_roman(total) == upper).then_some(total)
}

/// Label a reference, or `None` when it names no title.
///
/// # Examples
/// ```
/// use ecfr_backend::agencies::{reference_label, CfrReference};
///
/// let reference = CfrReference { title: Some(7), chapter: Some("Chapter I".into()) };
/// assert_eq!(reference_label(&reference).as_deref(), Some("Title 7 CFR Chapter 1"));
/// ```
pub fn reference_label(reference: &CfrReference) -> Option<String> {
    let title = reference.title?;
    let label = match reference.chapter.as_deref() {
        Some(chapter) => match parse_chapter(chapter) {
            Some(number) => format!("Title {title} CFR Chapter {number}"),
            None => format!("Title {title} CFR {chapter}"),
        },
        None => format!("Title {title}"),
    };
    Some(label)
}

/// Labels of an agency's own references and those of its direct children.
///
/// Sorted lexicographically, without duplicates.
pub fn agency_titles(agency: &Agency) -> Vec<String> {
    let own = agency.cfr_references.iter();
    let children = agency.children.iter().flat_map(|c| c.cfr_references.iter());

    own.chain(children)
        .filter_map(reference_label)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Whether an agency name contains `query`, ignoring case.
pub fn name_matches(name: &str, query: &str) -> bool {
    name.to_lowercase().contains(&query.to_lowercase())
}

/// Flatten agencies into records, keeping only names matching `query` if given.
pub fn aggregate(agencies: &[Agency], query: Option<&str>) -> Vec<AgencyRecord> {
    agencies
        .iter()
        .filter(|agency| query.map_or(true, |q| name_matches(&agency.name, q)))
        .map(|agency| AgencyRecord {
            agency: agency.name.clone(),
            titles: agency_titles(agency),
        })
        .collect()
}

/// Download the full agency directory.
pub async fn download_agencies(client: &EcfrClient) -> Result<Vec<Agency>> {
    let url = agencies_url(client.base_url());
    let directory: AgencyDirectory = client.fetch_json(&url).await?;
    Ok(directory.agencies)
}

/// Every agency with its titles.
pub async fn list_agencies(client: &EcfrClient) -> Result<Vec<AgencyRecord>> {
    let agencies = download_agencies(client).await?;
    tracing::info!(agencies = agencies.len(), "loaded agency directory");
    Ok(aggregate(&agencies, None))
}

/// Agencies whose name contains `query` (case-insensitive), with their titles.
///
/// No match is an empty list, not an error.
pub async fn search_agencies(client: &EcfrClient, query: &str) -> Result<Vec<AgencyRecord>> {
    let agencies = download_agencies(client).await?;
    let records = aggregate(&agencies, Some(query));
    tracing::info!(query, matches = records.len(), "searched agency directory");
    Ok(records)
}
