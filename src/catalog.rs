//! Static option lists for filter selects

pub const PAGE_SIZE_OPTIONS: [usize; 4] = [15, 25, 50, 100];

pub const COUNTRIES: &[&str] = &[
    "Australia",
    "Canada",
    "USA",
    "UK",
    "New Zealand",
    "Ireland",
    "Germany",
    "France",
    "Netherlands",
    "Sweden",
    "Dubai",
    "Malta",
    "Singapore",
    "Japan",
];

pub const SECTORS: &[&str] = &[
    "Higher Education",
    "VET",
    "ELICOS",
    "School",
    "University",
    "College",
];

pub const TERRITORIES: &[&str] = &[
    "Global",
    "Nepal",
    "India",
    "Bangladesh",
    "Sri Lanka",
    "Pakistan",
    "Bhutan",
    "Vietnam",
    "Philippines",
];

pub const GROUPS: &[&str] = &[
    "Navitas",
    "Study Group",
    "Kaplan",
    "INTO",
    "Shorelight",
    "Oxford International",
    "QA Higher Education",
];

pub const PROMOTED: &[&str] = &["Promoted", "Not Promoted"];

pub const YES_NO: &[&str] = &["yes", "no"];

const AUSTRALIAN_STATES: &[&str] = &["NSW", "VIC", "QLD", "WA", "SA", "TAS", "ACT", "NT"];

const CANADIAN_PROVINCES: &[&str] = &[
    "Alberta",
    "British Columbia",
    "Manitoba",
    "New Brunswick",
    "Newfoundland and Labrador",
    "Nova Scotia",
    "Ontario",
    "Prince Edward Island",
    "Quebec",
    "Saskatchewan",
];

const US_STATES: &[&str] = &[
    "California",
    "Florida",
    "Illinois",
    "Massachusetts",
    "New York",
    "Pennsylvania",
    "Texas",
    "Washington",
];

/// States known for a country, if any
pub fn states_for(country: &str) -> Option<&'static [&'static str]> {
    match country.trim().to_lowercase().as_str() {
        "australia" => Some(AUSTRALIAN_STATES),
        "canada" => Some(CANADIAN_PROVINCES),
        "usa" | "united states" => Some(US_STATES),
        _ => None,
    }
}

/// Next page size after `current`, wrapping around
pub fn next_page_size(current: usize) -> usize {
    PAGE_SIZE_OPTIONS
        .iter()
        .copied()
        .find(|size| *size > current)
        .unwrap_or(PAGE_SIZE_OPTIONS[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_states_for_known_countries() {
        assert!(states_for("Australia").unwrap().contains(&"NSW"));
        assert!(states_for("canada").is_some());
        assert!(states_for("Nepal").is_none());
    }

    #[test]
    fn test_next_page_size_wraps() {
        assert_eq!(next_page_size(15), 25);
        assert_eq!(next_page_size(50), 100);
        assert_eq!(next_page_size(100), 15);
        assert_eq!(next_page_size(20), 25);
    }
}
