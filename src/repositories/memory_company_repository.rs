use crate::error::{CustomerError, CustomerResult};
use crate::models::{Company, CompanyInput};
use crate::repositories::traits::CompanyRepository;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Company store kept in process memory.
#[derive(Default)]
pub struct InMemoryCompanyRepository {
    companies: RwLock<HashMap<String, Company>>,
}

impl InMemoryCompanyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, id: &str) -> Option<Company> {
        self.companies.read().await.get(id).cloned()
    }
}

#[async_trait]
impl CompanyRepository for InMemoryCompanyRepository {
    async fn create_company(&self, input: &CompanyInput) -> CustomerResult<Company> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(CustomerError::InvalidRequest(
                "Company name cannot be empty".to_string(),
            ));
        }

        let company = Company {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            website: input.website.clone(),
            created_at: Utc::now(),
        };

        self.companies
            .write()
            .await
            .insert(company.id.clone(), company.clone());

        tracing::debug!(company_id = %company.id, name = %company.name, "Company created");
        Ok(company)
    }
}
