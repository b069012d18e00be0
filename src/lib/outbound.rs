pub mod device_repository;
pub mod document_store;
pub mod identity;
pub mod memory;
pub mod mongo;
