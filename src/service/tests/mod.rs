mod export_service_tests;
mod file_service_tests;
