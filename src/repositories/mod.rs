mod memory_company_repository;
mod memory_customer_repository;
mod memory_linked_record_repository;
mod traits;

pub use memory_company_repository::InMemoryCompanyRepository;
pub use memory_customer_repository::InMemoryCustomerRepository;
pub use memory_linked_record_repository::InMemoryLinkedRecordRepository;
pub use traits::{
    CompanyRepository, CustomerQuery, CustomerRepository, IdentityMatch, LinkedRecordRepository,
};
