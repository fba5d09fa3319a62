//! Static table definitions for the case-management schema
//!
//! These are the only identifiers that ever reach SQL text.

use super::projection::FieldRule;

/// Primary entity table
pub const INCIDENT_TABLE: &str = "gbv_incident_reports";

/// Scalar columns read from the primary entity
pub const INCIDENT_COLUMNS: [&str; 25] = [
    "id",
    "client_referred",
    "survivor_access_justice",
    "survivor_status_id",
    "crisis_related_survivor_status_id",
    "health_state_id",
    "gbv_related_case",
    "type_of_non_gbv_related",
    "non_intervention",
    "incident_date",
    "category_id",
    "sub_category_id",
    "gbv_crisis_id",
    "place_of_incident_id",
    "details_of_incident_id",
    "has_vulnerability",
    "survivor_emotional_state_start_id",
    "survivor_emotional_state_end_id",
    "client_safe",
    "explained_possible_consequence",
    "client_consent_share_data",
    "tlc_id",
    "status",
    "created_at",
    "updated_at",
];

/// Primary columns stored as a sentinel string and uploaded as booleans
pub const BOOLEAN_FLAGS: [&str; 7] = [
    "client_referred",
    "survivor_access_justice",
    "gbv_related_case",
    "has_vulnerability",
    "client_safe",
    "explained_possible_consequence",
    "client_consent_share_data",
];

/// Raw flag value that normalizes to `true`
pub const AFFIRMATIVE_TOKEN: &str = "yes";

/// Foreign key every child table uses to point at its incident
pub const CASE_FOREIGN_KEY: &str = "case_id";

/// A one-to-many relation aggregated into an id collection per incident
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildRelation {
    /// Child table
    pub table: &'static str,
    /// Column whose values are collected
    pub value_column: &'static str,
    /// Name of the collection on the incident record
    pub output: &'static str,
}

/// Child id relations of the primary entity
pub const CHILD_RELATIONS: [ChildRelation; 2] = [
    ChildRelation {
        table: "gbv_nature_of_violences",
        value_column: "nature_of_violence_id",
        output: "nature_of_violences",
    },
    ChildRelation {
        table: "gbv_survivor_statuses",
        value_column: "survivor_status_id",
        output: "survivor_statuses",
    },
];

/// Survivor sub-record table, fetched separately and attached by `case_id`
pub const SURVIVOR_TABLE: &str = "gbv_survivors_datas";

/// Columns read from the survivor table
pub const SURVIVOR_COLUMNS: [&str; 8] = [
    "age_estimate",
    "gender",
    "county_id",
    "sub_county_id",
    "ward_id",
    "created_at",
    "updated_at",
    "case_id",
];

/// Parent geographic unit
pub const COUNTY_TABLE: &str = "counties";

/// Child geographic unit
pub const SUB_COUNTY_TABLE: &str = "sub_counties";

/// Foreign key from a sub-county to its county
pub const COUNTY_FOREIGN_KEY: &str = "county_id";

/// Payload key holding the nested hierarchy
pub const COUNTY_PAYLOAD_KEY: &str = "counties";

/// Key each county carries its sub-counties under
pub const SUB_COUNTY_NEST_KEY: &str = "subcounties";

/// Rules applied to the base field set for counties
pub const COUNTY_RULES: &[FieldRule] = &[FieldRule::Add("latitude"), FieldRule::Add("longitude")];

/// Rules applied to the base field set for sub-counties
pub const SUB_COUNTY_RULES: &[FieldRule] = &[
    FieldRule::Remove("name"),
    FieldRule::AddAs {
        column: "subcounty",
        alias: "name",
    },
    FieldRule::Add(COUNTY_FOREIGN_KEY),
    FieldRule::Add("latitude"),
    FieldRule::Add("longitude"),
];

/// Generic reference entities and their field rules
pub const REFERENCE_ENTITIES: &[(&str, &[FieldRule])] = &[
    ("actions_to_safeguard_clients", &[]),
    (
        "age_brackets",
        &[
            FieldRule::Remove("name"),
            FieldRule::Add("min"),
            FieldRule::Add("max"),
        ],
    ),
    ("crisis_related_survivor_statuses", &[]),
    ("displacement_statuses", &[]),
    ("domestic_relations", &[]),
    (
        "gbvrc_contacts",
        &[
            FieldRule::Remove("name"),
            FieldRule::Add("gbv_name"),
            FieldRule::Add("phone_number_1"),
            FieldRule::Add("phone_number_2"),
            FieldRule::Add("email_address"),
        ],
    ),
    ("gbv_crises", &[]),
    ("gbv_crisis_abductions", &[]),
    ("gbv_locations", &[]),
    ("gb_crises", &[]),
    (
        "health_centers_contacts",
        &[
            FieldRule::Remove("name"),
            FieldRule::Add("center_name"),
            FieldRule::Add("county_id"),
            FieldRule::Add("phone_number_1"),
            FieldRule::Add("phone_number_2"),
            FieldRule::Add("email_address"),
        ],
    ),
    ("health_states", &[]),
    ("impacts_of_violences", &[]),
    ("incident_details_statuses", &[]),
    ("medical_facilities", &[]),
    ("medical_service_referrals", &[]),
    ("perpetrator_statuses", &[]),
    ("perptrator_occupations", &[]),
    ("places_of_incidents", &[]),
    ("political_events", &[]),
    ("psychosocial_facilities", &[]),
    ("psychosocial_referrals", &[]),
    ("referrals", &[]),
    ("referral_types", &[]),
    ("roles_of_gbv_perpetrators", &[]),
    ("safe_house_referrals", &[]),
    ("security_service_referrals", &[]),
    ("survivors_of_gbv_crises", &[]),
    ("survivor_emotional_states_ends", &[]),
    ("survivor_emotional_states_starts", &[]),
    ("survivor_statuses", &[]),
    ("vulnerabilities", &[]),
];
