pub mod score_service;
