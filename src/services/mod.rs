// Services
// Stateless helpers and configuration: export/import documents and settings.

pub mod export_service;
pub mod settings_engine;
