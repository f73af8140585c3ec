//! Customer model, the aggregate root of the customer core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Custom field payload keyed by field definition id.
///
/// Owned by the field service: values are only stored after
/// `FieldService::clean_multi` has sanitized them.
pub type CustomFieldData = BTreeMap<String, serde_json::Value>;

/// Sales pipeline status of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LeadStatus {
    New,
    Open,
    InProgress,
    OpenDeal,
    Unqualified,
    AttemptedToContact,
    Connected,
    BadTiming,
}

/// Marketing lifecycle stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LifecycleState {
    Subscriber,
    Lead,
    MarketingQualifiedLead,
    SalesQualifiedLead,
    Opportunity,
    Customer,
    Evangelist,
    Other,
}

/// Profile links shown on the customer card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked_in: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// Twitter account the customer was captured from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TwitterData {
    /// Twitter user id (identity field)
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
}

/// Facebook account the customer was captured from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FacebookData {
    /// Facebook user id (identity field)
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_pic: Option<String>,
}

/// Messenger widget state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MessengerData {
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen_at: Option<DateTime<Utc>>,
    pub session_count: u32,
}

/// Where a messenger visitor was last seen from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Location {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

/// Contact details an anonymous visitor typed into the messenger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisitorContactInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// A customer record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Customer {
    /// Store-assigned identifier (empty until persisted)
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    /// Primary email (identity field)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_email: Option<String>,
    /// Secondary emails, also covered by email uniqueness
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub emails: Vec<String>,

    /// Primary phone (identity field)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_phone: Option<String>,
    /// Secondary phones, also covered by phone uniqueness
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub phones: Vec<String>,

    /// User responsible for this customer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_status: Option<LeadStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifecycle_state: Option<LifecycleState>,
    pub has_authority: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub do_not_disturb: bool,
    pub links: CustomerLinks,

    /// Tag ids (set)
    pub tag_ids: Vec<String>,
    /// Company ids (set)
    pub company_ids: Vec<String>,

    pub custom_field_data: CustomFieldData,

    /// Integration the customer came in through
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integration_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_data: Option<TwitterData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook_data: Option<FacebookData>,

    pub messenger_data: MessengerData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visitor_contact_info: Option<VisitorContactInfo>,
    /// Visit count per page url
    pub url_visits: BTreeMap<String, u32>,

    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Customer {
    /// Human readable name: full name, then primary email, then primary phone.
    pub fn display_name(&self) -> String {
        let full_name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if !full_name.is_empty() {
            return full_name;
        }

        self.primary_email
            .clone()
            .or_else(|| self.primary_phone.clone())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    pub fn twitter_id(&self) -> Option<&str> {
        self.twitter_data.as_ref().map(|t| t.id.as_str())
    }

    pub fn facebook_id(&self) -> Option<&str> {
        self.facebook_data.as_ref().map(|f| f.id.as_str())
    }

    /// Whether `email` is this customer's primary or one of its secondary emails.
    pub fn holds_email(&self, email: &str) -> bool {
        self.primary_email.as_deref() == Some(email) || self.emails.iter().any(|e| e == email)
    }

    /// Whether `phone` is this customer's primary or one of its secondary phones.
    pub fn holds_phone(&self, phone: &str) -> bool {
        self.primary_phone.as_deref() == Some(phone) || self.phones.iter().any(|p| p == phone)
    }
}

/// Partial customer attributes used by create, update, merge and import.
///
/// `None` means "not supplied": create leaves the attribute at its default,
/// update leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerFields {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub primary_email: Option<String>,
    pub emails: Option<Vec<String>>,
    pub primary_phone: Option<String>,
    pub phones: Option<Vec<String>>,
    pub owner_id: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub lead_status: Option<LeadStatus>,
    pub lifecycle_state: Option<LifecycleState>,
    pub has_authority: Option<bool>,
    pub description: Option<String>,
    pub do_not_disturb: Option<bool>,
    pub links: Option<CustomerLinks>,
    pub tag_ids: Option<Vec<String>>,
    pub company_ids: Option<Vec<String>>,
    pub custom_field_data: Option<CustomFieldData>,
    pub integration_id: Option<String>,
    pub twitter_data: Option<TwitterData>,
    pub facebook_data: Option<FacebookData>,
}

impl CustomerFields {
    pub fn twitter_id(&self) -> Option<&str> {
        self.twitter_data.as_ref().map(|t| t.id.as_str())
    }

    pub fn facebook_id(&self) -> Option<&str> {
        self.facebook_data.as_ref().map(|f| f.id.as_str())
    }

    /// Write every supplied attribute onto `customer`.
    ///
    /// Tag and company ids are deduplicated on the way in.
    pub fn apply_to(&self, customer: &mut Customer) {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(value) = value {
                *target = value.clone();
            }
        }
        fn set_opt<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
            if value.is_some() {
                *target = value.clone();
            }
        }

        set_opt(&mut customer.first_name, &self.first_name);
        set_opt(&mut customer.last_name, &self.last_name);
        set_opt(&mut customer.primary_email, &self.primary_email);
        set(&mut customer.emails, &self.emails);
        set_opt(&mut customer.primary_phone, &self.primary_phone);
        set(&mut customer.phones, &self.phones);
        set_opt(&mut customer.owner_id, &self.owner_id);
        set_opt(&mut customer.position, &self.position);
        set_opt(&mut customer.department, &self.department);
        set_opt(&mut customer.lead_status, &self.lead_status);
        set_opt(&mut customer.lifecycle_state, &self.lifecycle_state);
        set(&mut customer.has_authority, &self.has_authority);
        set_opt(&mut customer.description, &self.description);
        set(&mut customer.do_not_disturb, &self.do_not_disturb);
        set(&mut customer.links, &self.links);
        set(&mut customer.custom_field_data, &self.custom_field_data);
        set_opt(&mut customer.integration_id, &self.integration_id);
        set_opt(&mut customer.twitter_data, &self.twitter_data);
        set_opt(&mut customer.facebook_data, &self.facebook_data);

        if let Some(tag_ids) = &self.tag_ids {
            customer.tag_ids = unique(tag_ids.iter().cloned());
        }
        if let Some(company_ids) = &self.company_ids {
            customer.company_ids = unique(company_ids.iter().cloned());
        }
    }
}

/// Collect `values` keeping the first occurrence of each.
pub fn unique<I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = std::collections::HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}
