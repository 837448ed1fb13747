pub mod facility_repository;
