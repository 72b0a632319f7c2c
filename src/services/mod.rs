pub mod expiry_worker;
pub mod quiz_attempt_service;
pub mod quiz_service;
pub mod quiz_validation;
pub mod results_service;
pub mod scheduler;
pub mod scoring;
