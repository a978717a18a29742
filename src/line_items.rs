//! Parsing of free-text course lists into (name, commission) rows.
//!
//! Institution courses are often pasted as a single multi-line blob with one
//! commission value for the whole block. Individual lines may still carry
//! their own commission, e.g. `Bachelor of IT - 15%` or `Diploma (AUD 500)`.
//! A commission embedded in a line always wins over the shared one.

use crate::models::{Commission, CourseItem};

/// Marker shown when no commission is known
pub const NOT_AVAILABLE: &str = "N/A";

/// Separators that may precede an embedded commission, tried right-most first
const SEPARATORS: [&str; 5] = [" - ", " – ", " — ", ": ", " | "];

/// One display row of a nested list (course, insurance item, room type)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub name: String,
    pub commission: String,
}

impl LineItem {
    pub fn new(name: impl Into<String>, commission: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commission: commission.into(),
        }
    }

    pub fn from_commission(name: &str, commission: Option<&Commission>) -> Self {
        let commission = match commission {
            Some(c) if !c.is_blank() => c.to_string(),
            _ => NOT_AVAILABLE.to_string(),
        };
        Self::new(name.trim(), commission)
    }
}

/// A single course line split into its name and optional embedded commission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub course: String,
    pub commission: Option<String>,
}

/// A commission-looking fragment must carry a number and a unit.
fn looks_like_commission(fragment: &str) -> bool {
    let fragment = fragment.trim();
    if fragment.is_empty() || !fragment.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }

    fragment.contains('%') || fragment.contains('$') || has_currency_word(fragment)
}

/// `AUD 500`, `500 aud`, `AUD500`; words such as `Audio` don't count.
fn has_currency_word(fragment: &str) -> bool {
    fragment
        .split(|c: char| !c.is_ascii_alphanumeric())
        .map(|word| word.trim_matches(|c: char| c.is_ascii_digit()))
        .any(|word| word.eq_ignore_ascii_case("aud"))
}

/// Split one line into course name and embedded commission.
pub fn parse_course_line(line: &str) -> ParsedLine {
    let line = line.trim();

    // "Course (15%)"
    if line.ends_with(')') {
        if let Some(open) = line.rfind('(') {
            let inner = &line[open + 1..line.len() - 1];
            let head = line[..open].trim_end();
            if looks_like_commission(inner) && !head.is_empty() {
                return ParsedLine {
                    course: trim_separator(head).to_string(),
                    commission: Some(inner.trim().to_string()),
                };
            }
        }
    }

    // "Course - 15%"
    let split = SEPARATORS
        .iter()
        .filter_map(|sep| line.rfind(sep).map(|idx| (idx, sep.len())))
        .max_by_key(|(idx, _)| *idx);

    if let Some((idx, sep_len)) = split {
        let head = line[..idx].trim();
        let tail = line[idx + sep_len..].trim();
        if looks_like_commission(tail) && !head.is_empty() {
            return ParsedLine {
                course: head.to_string(),
                commission: Some(tail.to_string()),
            };
        }
    }

    ParsedLine {
        course: line.to_string(),
        commission: None,
    }
}

fn trim_separator(head: &str) -> &str {
    head.trim_end_matches(|c: char| c == '-' || c == ':' || c == '|' || c.is_whitespace())
}

/// Expand one course entry into a row per non-empty line.
///
/// `shared_commission` applies to every line that does not carry its own.
pub fn expand_course_text(text: &str, shared_commission: &str) -> Vec<LineItem> {
    let shared = shared_commission.trim();

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let parsed = parse_course_line(line);
            let commission = match parsed.commission {
                Some(embedded) => embedded,
                None if !shared.is_empty() => shared.to_string(),
                None => NOT_AVAILABLE.to_string(),
            };
            LineItem::new(parsed.course, commission)
        })
        .collect()
}

/// Flatten an institution's course list into display rows.
pub fn parse_courses(courses: &[CourseItem]) -> Vec<LineItem> {
    courses
        .iter()
        .flat_map(|item| expand_course_text(&item.course, &item.commission))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(text: &str, commission: &str) -> CourseItem {
        CourseItem {
            id: None,
            course: text.to_string(),
            commission: commission.to_string(),
        }
    }

    #[test]
    fn test_shared_commission_applies_to_every_line() {
        let rows = expand_course_text("Course A\nCourse B", "10%");
        assert_eq!(
            rows,
            vec![LineItem::new("Course A", "10%"), LineItem::new("Course B", "10%")]
        );
    }

    #[test]
    fn test_embedded_commission_wins() {
        let rows = expand_course_text("Course A - 5%", "10%");
        assert_eq!(rows, vec![LineItem::new("Course A", "5%")]);

        let rows = expand_course_text("Course A - 5%", "");
        assert_eq!(rows, vec![LineItem::new("Course A", "5%")]);
    }

    #[test]
    fn test_mixed_lines_and_missing_commission() {
        let rows = expand_course_text("  Bachelor of IT (15%)\n\nMaster of Data Science\n", "");
        assert_eq!(
            rows,
            vec![
                LineItem::new("Bachelor of IT", "15%"),
                LineItem::new("Master of Data Science", NOT_AVAILABLE),
            ]
        );
    }

    #[test]
    fn test_hyphenated_names_are_not_split() {
        let parsed = parse_course_line("Diploma - Early Childhood");
        assert_eq!(parsed.course, "Diploma - Early Childhood");
        assert_eq!(parsed.commission, None);

        let parsed = parse_course_line("Diploma - Early Childhood - AUD 500");
        assert_eq!(parsed.course, "Diploma - Early Childhood");
        assert_eq!(parsed.commission.as_deref(), Some("AUD 500"));
    }

    #[test]
    fn test_words_containing_aud_stay_in_the_name() {
        let rows = expand_course_text("Certificate IV: Audio Production 2024", "10%");
        assert_eq!(
            rows,
            vec![LineItem::new("Certificate IV: Audio Production 2024", "10%")]
        );

        let rows = expand_course_text("Graduate Diploma - Auditing Level 2", "10%");
        assert_eq!(rows, vec![LineItem::new("Graduate Diploma - Auditing Level 2", "10%")]);

        let parsed = parse_course_line("Cookery - 500 aud");
        assert_eq!(parsed.commission.as_deref(), Some("500 aud"));
        let parsed = parse_course_line("Cookery (AUD1200)");
        assert_eq!(parsed.commission.as_deref(), Some("AUD1200"));
    }

    #[test]
    fn test_parse_is_deterministic() {
        let input = "Course A: $1,200\nCourse B";
        assert_eq!(expand_course_text(input, "8%"), expand_course_text(input, "8%"));
        assert_eq!(expand_course_text(input, "8%")[0].commission, "$1,200");
    }

    #[test]
    fn test_parse_courses_flattens_entries() {
        let rows = parse_courses(&[course("A\nB", "10%"), course("", "5%"), course("C", "")]);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2], LineItem::new("C", NOT_AVAILABLE));
    }
}
