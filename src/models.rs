use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::line_items::{self, LineItem};
use crate::state::filters::FilterKey;

/// Form values keyed by the field keys declared in [`Editable::form_fields`].
pub type FormValues = BTreeMap<&'static str, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Institutions,
    Insurance,
    VisaServices,
    SkillAssessments,
    Accommodation,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Institutions,
        ResourceKind::Insurance,
        ResourceKind::VisaServices,
        ResourceKind::SkillAssessments,
        ResourceKind::Accommodation,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ResourceKind::Institutions => "Institutions",
            ResourceKind::Insurance => "Health Insurance",
            ResourceKind::VisaServices => "Visa Services",
            ResourceKind::SkillAssessments => "Skill Assessments",
            ResourceKind::Accommodation => "Accommodation",
        }
    }

    /// Name used on the command line
    pub fn cli_name(&self) -> &str {
        match self {
            ResourceKind::Institutions => "institutions",
            ResourceKind::Insurance => "insurance",
            ResourceKind::VisaServices => "visa",
            ResourceKind::SkillAssessments => "skill-assessments",
            ResourceKind::Accommodation => "accommodation",
        }
    }

    pub fn singular(&self) -> &str {
        match self {
            ResourceKind::Institutions => "institution",
            ResourceKind::Insurance => "health insurance",
            ResourceKind::VisaServices => "visa service",
            ResourceKind::SkillAssessments => "skill assessment",
            ResourceKind::Accommodation => "accommodation",
        }
    }

    pub fn plural(&self) -> &str {
        match self {
            ResourceKind::Institutions => "institutions",
            ResourceKind::Insurance => "health insurances",
            ResourceKind::VisaServices => "visa services",
            ResourceKind::SkillAssessments => "skill assessments",
            ResourceKind::Accommodation => "accommodations",
        }
    }

    pub fn noun(&self, count: usize) -> &str {
        if count == 1 {
            self.singular()
        } else {
            self.plural()
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "institutions" | "institution" => Ok(ResourceKind::Institutions),
            "insurance" | "health-insurance" => Ok(ResourceKind::Insurance),
            "visa" | "visa-services" => Ok(ResourceKind::VisaServices),
            "skill-assessments" | "skill-assessment" | "skills" => {
                Ok(ResourceKind::SkillAssessments)
            }
            "accommodation" | "accommodations" => Ok(ResourceKind::Accommodation),
            _ => anyhow::bail!(
                "Unknown resource '{}'. Expected one of: institutions, insurance, visa, skill-assessments, accommodation",
                s
            ),
        }
    }
}

/// A record owned by the backend and identified by its `_id`.
pub trait Resource: Clone + fmt::Debug + Send + Sync + DeserializeOwned + 'static {
    const KIND: ResourceKind;

    fn id(&self) -> &str;

    /// Primary display label (institution name, insurance company, ...)
    fn title(&self) -> &str;

    /// Client-side criterion check. Keys a resource does not know about match everything.
    fn matches(&self, key: FilterKey, value: &str) -> bool;

    /// Nested rows shown when the entity is expanded in a table
    fn line_items(&self) -> Vec<LineItem> {
        Vec::new()
    }
}

/// Field description for create/edit forms
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub placeholder: &'static str,
}

impl FieldSpec {
    pub const fn optional(key: &'static str, label: &'static str, placeholder: &'static str) -> Self {
        Self {
            key,
            label,
            required: false,
            placeholder,
        }
    }

    pub const fn required(key: &'static str, label: &'static str, placeholder: &'static str) -> Self {
        Self {
            key,
            label,
            required: true,
            placeholder,
        }
    }
}

/// Resources that can be created and edited through a form
pub trait Editable: Resource {
    type Draft: Serialize + Clone + fmt::Debug + Send + Sync + 'static;

    fn form_fields() -> &'static [FieldSpec];

    fn form_values(&self) -> FormValues;

    fn draft_from(values: &FormValues) -> Self::Draft;

    fn empty_form() -> FormValues {
        Self::form_fields()
            .iter()
            .map(|field| (field.key, String::new()))
            .collect()
    }
}

/// Commission as stored by the backend: usually free text, sometimes a bare amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Commission {
    Amount(f64),
    Text(String),
}

impl Commission {
    pub fn is_blank(&self) -> bool {
        match self {
            Commission::Amount(_) => false,
            Commission::Text(s) => s.trim().is_empty(),
        }
    }
}

impl fmt::Display for Commission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Commission::Amount(amount) => write!(f, "${:.2}", amount),
            Commission::Text(text) => f.write_str(text),
        }
    }
}

fn blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn non_empty(values: &FormValues, key: &str) -> Option<String> {
    values
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn required_text(values: &FormValues, key: &str) -> String {
    values.get(key).map(|v| v.trim().to_string()).unwrap_or_default()
}

pub(crate) fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.trim().to_lowercase())
}

pub(crate) fn eq_ci(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// "yes"/"no" criteria against an optional text field
fn yes_no_matches(field: &Option<String>, value: &str) -> bool {
    match value.trim().to_lowercase().as_str() {
        "yes" => !blank(field),
        "no" => blank(field),
        _ => true,
    }
}

// ---------------------------------------------------------------------------
// Institutions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseItem {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub course: String,
    #[serde(default)]
    pub commission: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Institution {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country: String,
    pub state: Option<String>,
    #[serde(default)]
    pub sector: String,
    pub url: Option<String>,
    #[serde(default)]
    pub territory: Vec<String>,
    #[serde(default)]
    pub global: bool,
    /// "100% promotion" marker
    pub promotion: Option<String>,
    pub promoted: Option<String>,
    /// Scholarship page URL
    pub scholarship: Option<String>,
    pub group: Option<String>,
    #[serde(default)]
    pub course: Vec<CourseItem>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Institution {
    /// Group label, treating the `_` placeholder as empty
    pub fn group_label(&self) -> Option<&str> {
        self.group
            .as_deref()
            .map(str::trim)
            .filter(|g| !g.is_empty() && *g != "_")
    }

    pub fn territory_label(&self) -> String {
        if self.global {
            "Global".to_string()
        } else {
            self.territory
                .iter()
                .map(|t| t.trim())
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}

impl Resource for Institution {
    const KIND: ResourceKind = ResourceKind::Institutions;

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.name
    }

    fn matches(&self, key: FilterKey, value: &str) -> bool {
        match key {
            FilterKey::Search => contains_ci(&self.name, value),
            FilterKey::Country => eq_ci(&self.country, value),
            FilterKey::State => self.state.as_deref().map_or(false, |s| eq_ci(s, value)),
            FilterKey::Sector => eq_ci(&self.sector, value),
            FilterKey::Territory => {
                (self.global && eq_ci(value, "Global"))
                    || self.territory.iter().any(|t| eq_ci(t, value))
            }
            FilterKey::Group => self.group_label().map_or(false, |g| eq_ci(g, value)),
            FilterKey::Promoted => self.promoted.as_deref().map_or(false, |p| eq_ci(p, value)),
            FilterKey::Promotion => yes_no_matches(&self.promotion, value),
            FilterKey::Scholarship => yes_no_matches(&self.scholarship, value),
            _ => true,
        }
    }

    fn line_items(&self) -> Vec<LineItem> {
        line_items::parse_courses(&self.course)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InstitutionDraft {
    pub name: String,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub territory: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promotion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promoted: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scholarship: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

const INSTITUTION_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("name", "Name", "e.g., University of Sydney"),
    FieldSpec::required("country", "Country", "e.g., Australia"),
    FieldSpec::optional("state", "State", "e.g., NSW"),
    FieldSpec::optional("sector", "Sector", "e.g., Higher Education"),
    FieldSpec::optional("url", "Website", "https://"),
    FieldSpec::optional("territory", "Territory (comma separated)", "e.g., Nepal, India"),
    FieldSpec::optional("promotion", "100% Promotion", "e.g., Yes"),
    FieldSpec::optional("promoted", "Promoted", "e.g., Promoted"),
    FieldSpec::optional("scholarship", "Scholarship Link", "https://"),
    FieldSpec::optional("group", "Group", "e.g., Navitas"),
];

impl Editable for Institution {
    type Draft = InstitutionDraft;

    fn form_fields() -> &'static [FieldSpec] {
        INSTITUTION_FIELDS
    }

    fn form_values(&self) -> FormValues {
        let mut values = FormValues::new();
        values.insert("name", self.name.clone());
        values.insert("country", self.country.clone());
        values.insert("state", text(&self.state));
        values.insert("sector", self.sector.clone());
        values.insert("url", text(&self.url));
        values.insert("territory", self.territory.join(", "));
        values.insert("promotion", text(&self.promotion));
        values.insert("promoted", text(&self.promoted));
        values.insert("scholarship", text(&self.scholarship));
        values.insert("group", text(&self.group));
        values
    }

    fn draft_from(values: &FormValues) -> InstitutionDraft {
        InstitutionDraft {
            name: required_text(values, "name"),
            country: required_text(values, "country"),
            state: non_empty(values, "state"),
            sector: non_empty(values, "sector"),
            url: non_empty(values, "url"),
            territory: non_empty(values, "territory").map(|t| {
                t.split(',')
                    .map(|part| part.trim().to_string())
                    .filter(|part| !part.is_empty())
                    .collect()
            }),
            promotion: non_empty(values, "promotion"),
            promoted: non_empty(values, "promoted"),
            scholarship: non_empty(values, "scholarship"),
            group: non_empty(values, "group"),
        }
    }
}

// ---------------------------------------------------------------------------
// Health insurance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsuranceItem {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    pub commission: Option<Commission>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthInsurance {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub items: Vec<InsuranceItem>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Resource for HealthInsurance {
    const KIND: ResourceKind = ResourceKind::Insurance;

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.company
    }

    fn matches(&self, key: FilterKey, value: &str) -> bool {
        match key {
            FilterKey::Search => contains_ci(&self.company, value),
            FilterKey::Country => eq_ci(&self.country, value),
            _ => true,
        }
    }

    fn line_items(&self) -> Vec<LineItem> {
        self.items
            .iter()
            .map(|item| LineItem::from_commission(&item.name, item.commission.as_ref()))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HealthInsuranceDraft {
    pub company: String,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<InsuranceItem>>,
}

const INSURANCE_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("company", "Company Name", "e.g., Allianz Care"),
    FieldSpec::required("country", "Country", "e.g., Australia"),
    FieldSpec::optional("items", "Items (name - commission; ...)", "e.g., OSHC - 10%; OVHC - 8%"),
];

impl Editable for HealthInsurance {
    type Draft = HealthInsuranceDraft;

    fn form_fields() -> &'static [FieldSpec] {
        INSURANCE_FIELDS
    }

    fn form_values(&self) -> FormValues {
        let items = self
            .items
            .iter()
            .map(|item| match &item.commission {
                Some(c) if !c.is_blank() => format!("{} - {}", item.name, c),
                _ => item.name.clone(),
            })
            .collect::<Vec<_>>()
            .join("; ");

        let mut values = FormValues::new();
        values.insert("company", self.company.clone());
        values.insert("country", self.country.clone());
        values.insert("items", items);
        values
    }

    fn draft_from(values: &FormValues) -> HealthInsuranceDraft {
        HealthInsuranceDraft {
            company: required_text(values, "company"),
            country: required_text(values, "country"),
            items: non_empty(values, "items").map(|raw| {
                raw.split(';')
                    .map(str::trim)
                    .filter(|entry| !entry.is_empty())
                    .map(|entry| {
                        let parsed = line_items::parse_course_line(entry);
                        InsuranceItem {
                            id: None,
                            name: parsed.course,
                            commission: parsed.commission.map(Commission::Text),
                        }
                    })
                    .collect()
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Visa services
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisaService {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub service_type: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub service_fee: String,
    #[serde(default)]
    pub referral_fee: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Resource for VisaService {
    const KIND: ResourceKind = ResourceKind::VisaServices;

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.service_type
    }

    fn matches(&self, key: FilterKey, value: &str) -> bool {
        match key {
            FilterKey::Search => contains_ci(&self.service_type, value),
            FilterKey::Country => eq_ci(&self.country, value),
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisaServiceDraft {
    pub service_type: String,
    pub country: String,
    pub service_fee: String,
    pub referral_fee: String,
}

const VISA_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("serviceType", "Service Type", "e.g., Student Visa (500)"),
    FieldSpec::required("country", "Country", "e.g., Australia"),
    FieldSpec::optional("serviceFee", "Service Fee", "e.g., AUD 1,200"),
    FieldSpec::optional("referralFee", "Referral Fee", "e.g., AUD 200"),
];

impl Editable for VisaService {
    type Draft = VisaServiceDraft;

    fn form_fields() -> &'static [FieldSpec] {
        VISA_FIELDS
    }

    fn form_values(&self) -> FormValues {
        let mut values = FormValues::new();
        values.insert("serviceType", self.service_type.clone());
        values.insert("country", self.country.clone());
        values.insert("serviceFee", self.service_fee.clone());
        values.insert("referralFee", self.referral_fee.clone());
        values
    }

    fn draft_from(values: &FormValues) -> VisaServiceDraft {
        VisaServiceDraft {
            service_type: required_text(values, "serviceType"),
            country: required_text(values, "country"),
            service_fee: required_text(values, "serviceFee"),
            referral_fee: required_text(values, "referralFee"),
        }
    }
}

// ---------------------------------------------------------------------------
// Skill assessments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillAssessment {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub occupation_groups: String,
    #[serde(default)]
    pub pathways_streams: String,
    #[serde(rename = "standardFeeAUD")]
    pub standard_fee_aud: Option<String>,
    #[serde(rename = "priorityFeeAUD")]
    pub priority_fee_aud: Option<String>,
    pub standard_processing_time: Option<String>,
    pub priority_processing_time: Option<String>,
    pub priority_available: Option<String>,
    pub documents_checklist: Option<String>,
    pub official_link: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Resource for SkillAssessment {
    const KIND: ResourceKind = ResourceKind::SkillAssessments;

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.occupation_groups
    }

    fn matches(&self, key: FilterKey, value: &str) -> bool {
        match key {
            FilterKey::Search => {
                contains_ci(&self.occupation_groups, value)
                    || contains_ci(&self.pathways_streams, value)
            }
            FilterKey::OccupationGroups => eq_ci(&self.occupation_groups, value),
            FilterKey::PathwaysStreams => eq_ci(&self.pathways_streams, value),
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillAssessmentDraft {
    pub occupation_groups: String,
    pub pathways_streams: String,
    #[serde(rename = "standardFeeAUD")]
    pub standard_fee_aud: String,
    #[serde(rename = "priorityFeeAUD")]
    pub priority_fee_aud: String,
    pub standard_processing_time: String,
    pub priority_processing_time: String,
    pub priority_available: String,
    pub documents_checklist: String,
    pub official_link: String,
}

const SKILL_ASSESSMENT_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("occupationGroups", "Occupation Groups", "e.g., Engineering Professionals"),
    FieldSpec::required("pathwaysStreams", "Pathways/Streams", "e.g., General Stream"),
    FieldSpec::optional("standardFeeAUD", "Standard Fee (AUD)", "e.g., 1,070"),
    FieldSpec::optional("priorityFeeAUD", "Priority Fee (AUD)", "e.g., 1,500"),
    FieldSpec::optional("standardProcessingTime", "Standard Processing Time", "e.g., 8-12 weeks"),
    FieldSpec::optional("priorityProcessingTime", "Priority Processing Time", "e.g., 2 weeks"),
    FieldSpec::optional("priorityAvailable", "Priority Available", "Yes / No"),
    FieldSpec::optional("documentsChecklist", "Documents Checklist", "Passport, CV, ..."),
    FieldSpec::optional("officialLink", "Official Link", "https://"),
];

impl Editable for SkillAssessment {
    type Draft = SkillAssessmentDraft;

    fn form_fields() -> &'static [FieldSpec] {
        SKILL_ASSESSMENT_FIELDS
    }

    fn form_values(&self) -> FormValues {
        let mut values = FormValues::new();
        values.insert("occupationGroups", self.occupation_groups.clone());
        values.insert("pathwaysStreams", self.pathways_streams.clone());
        values.insert("standardFeeAUD", text(&self.standard_fee_aud));
        values.insert("priorityFeeAUD", text(&self.priority_fee_aud));
        values.insert("standardProcessingTime", text(&self.standard_processing_time));
        values.insert("priorityProcessingTime", text(&self.priority_processing_time));
        values.insert("priorityAvailable", text(&self.priority_available));
        values.insert("documentsChecklist", text(&self.documents_checklist));
        values.insert("officialLink", text(&self.official_link));
        values
    }

    fn draft_from(values: &FormValues) -> SkillAssessmentDraft {
        SkillAssessmentDraft {
            occupation_groups: required_text(values, "occupationGroups"),
            pathways_streams: required_text(values, "pathwaysStreams"),
            standard_fee_aud: required_text(values, "standardFeeAUD"),
            priority_fee_aud: required_text(values, "priorityFeeAUD"),
            standard_processing_time: required_text(values, "standardProcessingTime"),
            priority_processing_time: required_text(values, "priorityProcessingTime"),
            priority_available: required_text(values, "priorityAvailable"),
            documents_checklist: required_text(values, "documentsChecklist"),
            official_link: required_text(values, "officialLink"),
        }
    }
}

// ---------------------------------------------------------------------------
// Accommodation (read-only)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccommodationItem {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    pub commission: Option<Commission>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accommodation {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub items: Vec<AccommodationItem>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Resource for Accommodation {
    const KIND: ResourceKind = ResourceKind::Accommodation;

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.company
    }

    fn matches(&self, key: FilterKey, value: &str) -> bool {
        match key {
            FilterKey::Search => {
                contains_ci(&self.company, value)
                    || self.locations.iter().any(|l| contains_ci(l, value))
            }
            FilterKey::Country => eq_ci(&self.country, value),
            _ => true,
        }
    }

    fn line_items(&self) -> Vec<LineItem> {
        self.items
            .iter()
            .map(|item| LineItem::from_commission(&item.name, item.commission.as_ref()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_institution_deserialization() {
        let json = r#"{
            "_id": "inst-1",
            "name": "Sydney Institute",
            "country": "Australia",
            "state": "NSW",
            "sector": "Higher Education",
            "territory": ["Nepal", "India"],
            "global": false,
            "group": "_",
            "course": [{"course": "Bachelor of IT - 15%", "commission": ""}],
            "createdAt": "2024-05-01T10:00:00.000Z"
        }"#;

        let institution: Institution = serde_json::from_str(json).unwrap();
        assert_eq!(institution.id(), "inst-1");
        assert_eq!(institution.group_label(), None);
        assert_eq!(institution.territory_label(), "Nepal, India");
        assert!(institution.created_at.is_some());
        assert_eq!(institution.line_items()[0].commission, "15%");
    }

    #[test]
    fn test_skill_assessment_uses_aud_field_names() {
        let json = r#"{
            "_id": "sa-1",
            "occupationGroups": "Engineering Professionals",
            "pathwaysStreams": "General Stream",
            "standardFeeAUD": "1,070"
        }"#;

        let assessment: SkillAssessment = serde_json::from_str(json).unwrap();
        assert_eq!(assessment.standard_fee_aud.as_deref(), Some("1,070"));
        assert_eq!(assessment.priority_fee_aud, None);

        let draft = SkillAssessment::draft_from(&assessment.form_values());
        let body = serde_json::to_value(&draft).unwrap();
        assert_eq!(body["standardFeeAUD"], "1,070");
        assert_eq!(body["occupationGroups"], "Engineering Professionals");
    }

    #[test]
    fn test_accommodation_numeric_commission() {
        let json = r#"{
            "_id": "acc-1",
            "company": "Student Stay",
            "country": "Australia",
            "locations": ["Sydney", "Melbourne"],
            "items": [{"name": "Studio", "commission": 12.5}, {"name": "Shared", "commission": "5%"}]
        }"#;

        let accommodation: Accommodation = serde_json::from_str(json).unwrap();
        let items = accommodation.line_items();
        assert_eq!(items[0].commission, "$12.50");
        assert_eq!(items[1].commission, "5%");
    }

    #[test]
    fn test_institution_client_side_matching() {
        let institution = Institution {
            id: "1".to_string(),
            name: "Melbourne Polytechnic".to_string(),
            country: "Australia".to_string(),
            state: Some("VIC".to_string()),
            sector: "VET".to_string(),
            url: None,
            territory: vec!["Nepal".to_string()],
            global: false,
            promotion: Some("100%".to_string()),
            promoted: None,
            scholarship: None,
            group: Some("Group A".to_string()),
            course: Vec::new(),
            created_at: None,
            updated_at: None,
        };

        assert!(institution.matches(FilterKey::Search, "poly"));
        assert!(institution.matches(FilterKey::Country, "australia"));
        assert!(institution.matches(FilterKey::Territory, "Nepal"));
        assert!(!institution.matches(FilterKey::Territory, "Global"));
        assert!(institution.matches(FilterKey::Promotion, "yes"));
        assert!(institution.matches(FilterKey::Scholarship, "no"));
        assert!(!institution.matches(FilterKey::Sector, "Higher Education"));
    }

    #[test]
    fn test_insurance_items_form_round() {
        let mut values = HealthInsurance::empty_form();
        values.insert("company", "Allianz Care".to_string());
        values.insert("country", "Australia".to_string());
        values.insert("items", "OSHC - 10%; OVHC".to_string());

        let draft = HealthInsurance::draft_from(&values);
        let items = draft.items.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "OSHC");
        assert_eq!(items[0].commission, Some(Commission::Text("10%".to_string())));
        assert_eq!(items[1].commission, None);
    }

    #[test]
    fn test_resource_kind_from_str() {
        assert_eq!("visa".parse::<ResourceKind>().unwrap(), ResourceKind::VisaServices);
        assert_eq!(
            "Skill-Assessments".parse::<ResourceKind>().unwrap(),
            ResourceKind::SkillAssessments
        );
        assert!("courses".parse::<ResourceKind>().is_err());
        assert_eq!(ResourceKind::Institutions.noun(1), "institution");
        assert_eq!(ResourceKind::Institutions.noun(3), "institutions");
    }
}
