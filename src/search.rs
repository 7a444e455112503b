//! Keyword search over tool metadata for `find`, `where`, and `what`.

use std::collections::{BTreeMap, BTreeSet};

use crate::tool::Tool;

/// Words ignored when extracting keywords from prose.
const STOP_WORDS: [&str; 27] = [
    "a", "an", "the", "is", "are", "was", "were", "be", "been", "and", "or", "but", "for", "to",
    "from", "with", "in", "on", "of", "at", "by", "this", "that", "it", "its", "does", "do",
];

/// Shortest word kept by [`extract_keywords`].
const MIN_KEYWORD_LEN: usize = 3;

/// Per-field weights for a scored search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Weights {
    /// Term appears in the tool name.
    pub name: u32,
    /// Term appears in the description.
    pub description: u32,
    /// Term appears in a provided artifact.
    pub provides: u32,
    /// Term appears in a capability.
    pub capability: u32,
    /// Term and a keyword contain one another.
    pub keyword: u32,
}

/// Weights used by `find`.
pub const FIND_WEIGHTS: Weights = Weights {
    name: 10,
    description: 5,
    provides: 3,
    capability: 4,
    keyword: 3,
};

/// Weights used by `where`; provided data weighs more for placement.
pub const WHERE_WEIGHTS: Weights = Weights {
    name: 10,
    description: 5,
    provides: 6,
    capability: 4,
    keyword: 3,
};

/// A tool that matched a search, with the reasons it scored.
#[derive(Debug, Clone)]
pub struct Match<'a> {
    /// Matching tool.
    pub tool: &'a Tool,
    /// Sum of weights for every hit.
    pub score: u32,
    /// Human-readable hit descriptions, without duplicates.
    pub reasons: Vec<String>,
}

impl Match<'_> {
    /// Record a hit unless the same reason was already counted for display.
    fn hit(&mut self, weight: u32, reason: String) {
        self.score += weight;
        if !self.reasons.contains(&reason) {
            self.reasons.push(reason);
        }
    }
}

/// A tool whose `@boundary` mentions a search term.
#[derive(Debug, Clone)]
pub struct Exclusion<'a> {
    /// Excluding tool.
    pub tool: &'a Tool,
    /// The boundary that mentioned a term.
    pub boundary: &'a str,
}

/// Split a query into lowercase terms.
pub fn terms(query: &[String]) -> Vec<String> {
    query
        .iter()
        .flat_map(|part| part.split_whitespace())
        .map(str::to_lowercase)
        .collect()
}

/// Score every tool against `terms`, best first.
///
/// Every (term, field value) pair that hits adds that field's weight.
/// Ties keep registry order.
pub fn search<'a>(
    tools: impl IntoIterator<Item = &'a Tool>,
    terms: &[String],
    weights: Weights,
) -> Vec<Match<'a>> {
    let mut matches: Vec<Match<'a>> = tools
        .into_iter()
        .map(|tool| score(tool, terms, weights))
        .filter(|found| found.score > 0)
        .collect();
    matches.sort_by(|left, right| right.score.cmp(&left.score));
    matches
}

/// Score a single tool.
fn score<'a>(tool: &'a Tool, terms: &[String], weights: Weights) -> Match<'a> {
    let mut found = Match {
        tool,
        score: 0,
        reasons: Vec::new(),
    };

    let name = tool.name.to_lowercase();
    let description = tool.description.to_lowercase();
    for term in terms {
        if name.contains(term.as_str()) {
            found.hit(weights.name, format!("name contains '{term}'"));
        }
        if description.contains(term.as_str()) {
            found.hit(weights.description, format!("description mentions '{term}'"));
        }
    }

    for artifact in &tool.provides {
        let lower = artifact.to_lowercase();
        for term in terms {
            if lower.contains(term.as_str()) {
                found.hit(weights.provides, format!("provides '{artifact}'"));
            }
        }
    }

    for capability in &tool.capabilities {
        let lower = capability.to_lowercase();
        for term in terms {
            if lower.contains(term.as_str()) {
                found.hit(weights.capability, format!("capability matches '{term}'"));
            }
        }
    }

    for keyword in &tool.keywords {
        let lower = keyword.to_lowercase();
        for term in terms {
            if lower.contains(term.as_str()) || term.contains(lower.as_str()) {
                found.hit(weights.keyword, format!("keyword '{keyword}'"));
            }
        }
    }

    found
}

/// Tools whose boundaries mention any term, in registry order.
pub fn exclusions<'a>(
    tools: impl IntoIterator<Item = &'a Tool>,
    terms: &[String],
) -> Vec<Exclusion<'a>> {
    let mut excluded = Vec::new();
    for tool in tools {
        for boundary in &tool.boundaries {
            let lower = boundary.to_lowercase();
            if terms.iter().any(|term| lower.contains(term.as_str())) {
                excluded.push(Exclusion {
                    tool,
                    boundary: boundary.as_str(),
                });
            }
        }
    }
    excluded
}

/// Suggest a hyphenated tool name from the first three terms.
pub fn suggest_name(terms: &[String]) -> String {
    terms
        .iter()
        .take(3)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("-")
}

/// Lowercase ASCII words of at least three letters, minus stop words.
pub fn extract_keywords(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|word| word.len() >= MIN_KEYWORD_LEN)
        .filter(|word| word.chars().all(|c| c.is_ascii_alphabetic()))
        .filter(|word| !STOP_WORDS.contains(word))
        .map(str::to_string)
        .collect()
}

/// Map each keyword to the tools it describes.
///
/// Keywords come from `@keywords` and from words in capabilities.
pub fn keyword_map<'a>(
    tools: impl IntoIterator<Item = &'a Tool>,
) -> BTreeMap<String, BTreeSet<String>> {
    let mut map: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for tool in tools {
        let words = tool
            .keywords
            .iter()
            .map(|keyword| keyword.to_lowercase())
            .chain(tool.capabilities.iter().map(String::as_str).flat_map(extract_keywords));
        for word in words {
            map.entry(word).or_default().insert(tool.name.clone());
        }
    }
    map
}

/// The `limit` keywords shared by the most tools; ties sort alphabetically.
pub fn top_keywords(
    map: &BTreeMap<String, BTreeSet<String>>,
    limit: usize,
) -> Vec<(&str, &BTreeSet<String>)> {
    let mut ranked: Vec<_> = map
        .iter()
        .map(|(keyword, tools)| (keyword.as_str(), tools))
        .collect();
    ranked.sort_by(|left, right| right.1.len().cmp(&left.1.len()));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::{
        FIND_WEIGHTS, WHERE_WEIGHTS, exclusions, extract_keywords, keyword_map, search,
        suggest_name, terms, top_keywords,
    };
    use crate::tool::Tool;

    fn tool(name: &str, description: &str) -> Tool {
        Tool {
            name: name.to_string(),
            description: description.to_string(),
            ..Tool::default()
        }
    }

    fn catalog() -> Vec<Tool> {
        let mut logs = tool("log-parser", "Parse application logs for errors.");
        logs.capabilities = vec!["Parse error stacks from logs".to_string()];
        logs.keywords = vec!["logs".to_string(), "errors".to_string()];
        logs.provides = vec!["error-summary".to_string()];
        logs.boundaries = vec!["Does not fetch remote logs".to_string()];

        let mut prices = tool("gpu-prices", "Fetch GPU prices.");
        prices.provides = vec!["gpu-prices".to_string()];
        prices.keywords = vec!["gpu".to_string(), "prices".to_string()];
        prices.capabilities = vec!["Fetch prices from the market".to_string()];

        vec![logs, prices, tool("misc", "Nothing relevant.")]
    }

    #[test]
    fn splits_query_terms() {
        let query = vec!["Parse Logs".to_string(), "errors".to_string()];
        assert_eq!(terms(&query), vec!["parse", "logs", "errors"]);
    }

    #[test]
    fn find_scores_each_field() {
        let tools = catalog();
        let matches = search(&tools, &terms(&["logs".to_string()]), FIND_WEIGHTS);
        assert_eq!(matches.len(), 1);
        let top = &matches[0];
        assert_eq!(top.tool.name, "log-parser");
        // description 5 + capability 4 + keyword 3
        assert_eq!(top.score, 12);
        assert!(top.reasons.contains(&"keyword 'logs'".to_string()));
    }

    #[test]
    fn keywords_match_in_either_direction() {
        let tools = catalog();
        let matches = search(&tools, &terms(&["gpus".to_string()]), FIND_WEIGHTS);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].score, 3);
    }

    #[test]
    fn where_weighs_provides_higher() {
        let tools = catalog();
        let query = terms(&["summary".to_string()]);
        assert_eq!(search(&tools, &query, FIND_WEIGHTS)[0].score, 3);
        assert_eq!(search(&tools, &query, WHERE_WEIGHTS)[0].score, 6);
    }

    #[test]
    fn results_are_sorted_by_score() {
        let tools = catalog();
        let matches = search(&tools, &terms(&["prices logs".to_string()]), FIND_WEIGHTS);
        let names: Vec<_> = matches.iter().map(|found| found.tool.name.as_str()).collect();
        assert_eq!(names, vec!["gpu-prices", "log-parser"]);
        assert!(matches[0].score > matches[1].score);
    }

    #[test]
    fn boundaries_exclude_tools() {
        let tools = catalog();
        let excluded = exclusions(&tools, &terms(&["remote".to_string()]));
        assert_eq!(excluded.len(), 1);
        assert_eq!(excluded[0].tool.name, "log-parser");
        assert_eq!(excluded[0].boundary, "Does not fetch remote logs");
        assert!(exclusions(&tools, &terms(&["jira".to_string()])).is_empty());
    }

    #[test]
    fn suggests_names_from_first_terms() {
        let query = terms(&["Jira weekly summary export".to_string()]);
        assert_eq!(suggest_name(&query), "jira-weekly-summary");
    }

    #[test]
    fn extracts_keywords_without_stop_words() {
        assert_eq!(
            extract_keywords("Fetch the GPU prices from AWS, v2 and h100s"),
            vec!["fetch", "gpu", "prices", "aws"]
        );
        assert!(extract_keywords("it is a to do").is_empty());
    }

    #[test]
    fn ranks_keywords_by_tool_count() {
        let mut tools = catalog();
        let mut tail = tool("tail", "Follow a file.");
        tail.keywords = vec!["Logs".to_string()];
        tools.push(tail);
        let map = keyword_map(&tools);
        assert_eq!(
            map["prices"].iter().collect::<Vec<_>>(),
            vec!["gpu-prices"]
        );
        assert!(map.contains_key("stacks"));

        let top = top_keywords(&map, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].0, "logs");
        assert_eq!(top[0].1.len(), 2);
        assert_eq!(top[1].0, "error");
    }
}
