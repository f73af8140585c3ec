//! Targeted customer mutations shared by every repository implementation.

use super::customer::{Customer, CustomerFields, Location, VisitorContactInfo};
use chrono::{DateTime, Utc};

/// A partial write against one stored customer.
///
/// Repositories receive the mutation rather than a whole record so writes
/// stay partial; they apply it with [`CustomerUpdate::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum CustomerUpdate {
    /// Merge supplied attributes and stamp the modification time
    Fields {
        fields: CustomerFields,
        modified_at: DateTime<Utc>,
    },
    /// Set the messenger activity flag, optionally stamping last-seen
    MessengerActivity {
        is_active: bool,
        last_seen_at: Option<DateTime<Utc>>,
    },
    /// Insert a company id if not already linked
    AddCompany(String),
    /// Replace the company id list as given
    SetCompanies(Vec<String>),
    Location(Location),
    /// Merge visitor-supplied contact details
    VisitorContactInfo(VisitorContactInfo),
    /// A new messenger session started
    Session { seen_at: DateTime<Utc> },
    /// One more visit to the given url
    UrlVisit(String),
}

impl CustomerUpdate {
    pub fn apply(&self, customer: &mut Customer) {
        match self {
            CustomerUpdate::Fields {
                fields,
                modified_at,
            } => {
                fields.apply_to(customer);
                customer.modified_at = *modified_at;
            }
            CustomerUpdate::MessengerActivity {
                is_active,
                last_seen_at,
            } => {
                customer.messenger_data.is_active = *is_active;
                if let Some(seen) = last_seen_at {
                    customer.messenger_data.last_seen_at = Some(*seen);
                }
            }
            CustomerUpdate::AddCompany(company_id) => {
                if !customer.company_ids.contains(company_id) {
                    customer.company_ids.push(company_id.clone());
                }
            }
            CustomerUpdate::SetCompanies(company_ids) => {
                customer.company_ids = company_ids.clone();
            }
            CustomerUpdate::Location(location) => {
                customer.location = Some(location.clone());
            }
            CustomerUpdate::VisitorContactInfo(info) => {
                let current = customer.visitor_contact_info.get_or_insert_with(Default::default);
                if info.email.is_some() {
                    current.email = info.email.clone();
                }
                if info.phone.is_some() {
                    current.phone = info.phone.clone();
                }
            }
            CustomerUpdate::Session { seen_at } => {
                let messenger = &mut customer.messenger_data;
                messenger.is_active = true;
                messenger.last_seen_at = Some(*seen_at);
                messenger.session_count = messenger.session_count.saturating_add(1);
            }
            CustomerUpdate::UrlVisit(url) => {
                *customer.url_visits.entry(url.clone()).or_insert(0) += 1;
            }
        }
    }
}
