//! Company, role and keyword hints pulled from a pasted job description.
//!
//! Pure string scanning. Results only fill in what the caller left blank.

const COMPANY_SCAN_LINES: usize = 10;
const ROLE_SCAN_LINES: usize = 5;
const MAX_KEYWORDS: usize = 20;

const ROLE_NOUNS: &[&str] = &[
    "engineer",
    "developer",
    "manager",
    "designer",
    "analyst",
    "specialist",
    "lead",
    "director",
    "architect",
    "consultant",
];

const NOT_A_TITLE: &[&str] = &[
    "about",
    "we are",
    "our company",
    "responsibilities",
    "requirements",
];

const TECH_VOCABULARY: &[&str] = &[
    "JavaScript", "TypeScript", "Python", "Java", "Ruby", "Go", "Rust", "C++", "PHP", "Swift",
    "Kotlin", "React", "Angular", "Vue", "Node.js", "Express", "Django", "Flask", "Rails",
    "Spring", "Laravel", "AWS", "Azure", "GCP", "Docker", "Kubernetes", "Jenkins", "CI/CD", "Git",
    "GitHub", "GitLab", "SQL", "PostgreSQL", "MySQL", "MongoDB", "Redis", "Elasticsearch",
    "GraphQL", "REST API", "Agile", "Scrum", "Kanban", "Jira", "Confluence", "Slack", "Teams",
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobMetadata {
    pub company_name: Option<String>,
    pub role_title: Option<String>,
}

pub fn extract_metadata(description: &str) -> JobMetadata {
    let lines: Vec<&str> = description
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    JobMetadata {
        company_name: find_company(&lines),
        role_title: find_role(&lines),
    }
}

/// Allowed in a company name: letters, digits, spaces, `&` and `.`.
fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == ' ' || c == '&' || c == '.'
}

fn starts_uppercase(s: &str) -> bool {
    s.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

fn plausible_company(candidate: &str) -> Option<String> {
    let candidate = candidate.trim().trim_end_matches('.').trim();
    let len = candidate.chars().count();
    ((2..=50).contains(&len) && starts_uppercase(candidate)).then(|| candidate.to_string())
}

/// Leading run of name characters, cut before a standalone " is " or " in ".
fn name_run(text: &str) -> &str {
    let end = text.find(|c: char| !is_name_char(c)).unwrap_or(text.len());
    let run = &text[..end];
    let mut cut = run.len();
    for stop in [" is ", " in "] {
        if let Some(i) = run.to_ascii_lowercase().find(stop) {
            cut = cut.min(i);
        }
    }
    for stop in [" is", " in"] {
        if run.to_ascii_lowercase().ends_with(stop) {
            cut = cut.min(run.len() - stop.len());
        }
    }
    &run[..cut]
}

/// Byte offsets just past each whole-word, case-insensitive occurrence of `word`.
fn after_word<'a>(line: &'a str, word: &'a str) -> impl Iterator<Item = usize> + 'a {
    let lower = line.to_ascii_lowercase();
    let bytes = line.as_bytes().to_vec();
    let mut from = 0;
    std::iter::from_fn(move || {
        while let Some(pos) = lower[from..].find(word) {
            let start = from + pos;
            let end = start + word.len();
            from = end;
            let before_ok = start == 0 || !bytes[start - 1].is_ascii_alphanumeric();
            let after_ok = end == bytes.len() || !bytes[end].is_ascii_alphanumeric();
            if before_ok && after_ok {
                return Some(end);
            }
        }
        None
    })
}

fn company_after_preposition(line: &str) -> Option<String> {
    ["at", "join", "about"].iter().find_map(|word| {
        after_word(line, word).find_map(|end| {
            let rest = &line[end..];
            rest.starts_with(char::is_whitespace)
                .then(|| plausible_company(name_run(rest.trim_start())))
                .flatten()
        })
    })
}

fn company_before_verb(line: &str) -> Option<String> {
    let lower = line.to_ascii_lowercase();
    let verb_at = [" is ", " seeks ", " looking ", " hiring "]
        .iter()
        .filter_map(|v| lower.find(v))
        .min()?;
    let subject = &line[..verb_at];
    subject
        .chars()
        .all(is_name_char)
        .then(|| plausible_company(subject))
        .flatten()
}

fn labelled<'a>(line: &'a str, labels: &[&str]) -> Option<&'a str> {
    let lower = line.to_ascii_lowercase();
    labels.iter().find_map(|label| {
        let i = lower.find(label)?;
        Some(line[i + label.len()..].trim_start())
    })
}

fn company_from_label(line: &str) -> Option<String> {
    labelled(line, &["company:", "employer:"]).and_then(|rest| plausible_company(name_run(rest)))
}

fn find_company(lines: &[&str]) -> Option<String> {
    let head = &lines[..lines.len().min(COMPANY_SCAN_LINES)];
    let rules: [fn(&str) -> Option<String>; 3] =
        [company_after_preposition, company_before_verb, company_from_label];
    rules
        .iter()
        .find_map(|rule| head.iter().find_map(|line| rule(line)))
}

fn plausible_role(candidate: &str) -> Option<String> {
    let candidate = candidate.trim();
    let len = candidate.chars().count();
    ((5..=80).contains(&len) && starts_uppercase(candidate)).then(|| candidate.to_string())
}

fn is_title_text(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic() || c == ' ')
}

/// "Senior Backend Engineer", optionally followed by " - ...", " at ..." or " (...".
fn role_ending_in_noun(line: &str) -> Option<String> {
    let mut head = line;
    for sep in [" - ", " at ", " ("] {
        if let Some(i) = head.find(sep) {
            head = &head[..i];
        }
    }
    let head = head.trim();
    if !is_title_text(head) {
        return None;
    }
    let last = head.split_whitespace().last()?.to_ascii_lowercase();
    ROLE_NOUNS
        .iter()
        .any(|noun| last.ends_with(noun))
        .then(|| plausible_role(head))
        .flatten()
}

fn role_from_label(line: &str) -> Option<String> {
    let rest = labelled(line, &["position:", "role:", "job title:", "title:"])?;
    let end = rest
        .find(|c: char| !(c.is_ascii_alphabetic() || c == ' '))
        .unwrap_or(rest.len());
    plausible_role(&rest[..end])
}

/// "Staff Engineer - Acme": the part before a dash followed by a capital.
fn role_before_dash(line: &str) -> Option<String> {
    let (title, rest) = line.split_once(" - ")?;
    (is_title_text(title.trim()) && starts_uppercase(rest.trim_start()))
        .then(|| plausible_role(title))
        .flatten()
}

fn role_from_first_line(line: &str) -> Option<String> {
    let len = line.chars().count();
    let lower = line.to_ascii_lowercase();
    if !(10..=80).contains(&len)
        || !starts_uppercase(line)
        || NOT_A_TITLE.iter().any(|p| lower.starts_with(p))
    {
        return None;
    }
    let title = [" - ", " \u{2013} "]
        .iter()
        .filter_map(|sep| line.find(sep))
        .min()
        .map_or(line, |i| &line[..i]);
    Some(title.trim().to_string()).filter(|t| !t.is_empty())
}

fn find_role(lines: &[&str]) -> Option<String> {
    let head = &lines[..lines.len().min(ROLE_SCAN_LINES)];
    head.iter()
        .find_map(|line| {
            role_ending_in_noun(line)
                .or_else(|| role_from_label(line))
                .or_else(|| role_before_dash(line))
        })
        .or_else(|| lines.first().and_then(|l| role_from_first_line(l)))
}

/// Technical terms from a fixed vocabulary, in order of first appearance.
pub fn extract_keywords(description: &str) -> Vec<String> {
    let lower = description.to_ascii_lowercase();
    let bytes = lower.as_bytes();
    let boundary = |i: usize| i >= bytes.len() || !bytes[i].is_ascii_alphanumeric();

    let mut found: Vec<(usize, &str)> = TECH_VOCABULARY
        .iter()
        .filter_map(|term| {
            let needle = term.to_ascii_lowercase();
            let mut from = 0;
            while let Some(pos) = lower[from..].find(&needle) {
                let start = from + pos;
                let end = start + needle.len();
                if (start == 0 || boundary(start - 1)) && boundary(end) {
                    return Some((start, *term));
                }
                from = end;
            }
            None
        })
        .collect();
    found.sort_by_key(|(pos, _)| *pos);
    found
        .into_iter()
        .take(MAX_KEYWORDS)
        .map(|(_, term)| term.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_after_preposition() {
        let jd = "Senior Rust Engineer\nJoin Acme Robotics in building the future of warehouses.";
        assert_eq!(
            extract_metadata(jd).company_name.as_deref(),
            Some("Acme Robotics")
        );
    }

    #[test]
    fn test_company_as_sentence_subject() {
        let jd = "Nimbus Labs is hiring a platform developer to scale our data plane.";
        assert_eq!(extract_metadata(jd).company_name.as_deref(), Some("Nimbus Labs"));
    }

    #[test]
    fn test_company_from_label() {
        let jd = "Role: Data Analyst\nCompany: Fjord & Co\nWe crunch numbers.";
        assert_eq!(extract_metadata(jd).company_name.as_deref(), Some("Fjord & Co"));
    }

    #[test]
    fn test_lowercase_candidate_is_rejected() {
        let jd = "you will work at scale on hard problems every day";
        assert_eq!(extract_metadata(jd).company_name, None);
    }

    #[test]
    fn test_role_ending_in_role_noun() {
        let jd = "Senior Backend Engineer - Payments\nWe are a fintech.";
        assert_eq!(
            extract_metadata(jd).role_title.as_deref(),
            Some("Senior Backend Engineer")
        );
    }

    #[test]
    fn test_role_from_label() {
        let jd = "We are growing fast.\nPosition: Product Marketing Lead\nApply today.";
        assert_eq!(
            extract_metadata(jd).role_title.as_deref(),
            Some("Product Marketing Lead")
        );
    }

    #[test]
    fn test_first_line_fallback_drops_company_suffix() {
        let jd = "Head of Growth \u{2013} Tidewater\nResponsibilities include everything.";
        assert_eq!(extract_metadata(jd).role_title.as_deref(), Some("Head of Growth"));
    }

    #[test]
    fn test_first_line_fallback_skips_section_headings() {
        let jd = "Responsibilities for this opening\n- ship code";
        assert_eq!(extract_metadata(jd).role_title, None);
    }

    #[test]
    fn test_keywords_in_first_seen_order_without_duplicates() {
        let jd = "We use Kubernetes and rust daily. Rust services talk to PostgreSQL via REST API.";
        assert_eq!(
            extract_keywords(jd),
            vec!["Kubernetes", "Rust", "PostgreSQL", "REST API"]
        );
    }

    #[test]
    fn test_keywords_respect_word_boundaries() {
        let jd = "Gopher fans welcome; JavaScripting is not a skill. Java and C++ are.";
        assert_eq!(extract_keywords(jd), vec!["Java", "C++"]);
    }

    #[test]
    fn test_keywords_are_capped() {
        let jd = TECH_VOCABULARY.join(", ");
        assert_eq!(extract_keywords(&jd).len(), MAX_KEYWORDS);
    }
}
