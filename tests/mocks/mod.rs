//! Mock repositories shared by the integration tests.

mod call_log;
mod mock_customer_repository;
mod mock_linked_record_repository;

#[allow(unused_imports)]
pub use call_log::CallLog;
#[allow(unused_imports)]
pub use mock_customer_repository::MockCustomerRepository;
#[allow(unused_imports)]
pub use mock_linked_record_repository::MockLinkedRecordRepository;
