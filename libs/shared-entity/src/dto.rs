// Data Transfer Objects (DTO)
pub mod workflow_dto;
pub mod workflow_version_dto;
